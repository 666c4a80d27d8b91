use reqwest::Url;

const REDACTED: &str = "[REDACTED]";
const SENSITIVE_PARAMS: [&str; 2] = ["sig", "signature"];

/// Renders a URL for logging with signature query parameters blanked out.
///
/// Signed blob URLs grant read access to anyone holding them.
pub fn redact_signed_url(url: &Url) -> String {
    if url.query().is_none() {
        return url.to_string();
    }

    let mut redacted = url.clone();
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| {
            let value = if SENSITIVE_PARAMS.contains(&k.to_ascii_lowercase().as_str()) {
                REDACTED.to_string()
            } else {
                v.into_owned()
            };
            (k.into_owned(), value)
        })
        .collect();

    redacted.query_pairs_mut().clear().extend_pairs(pairs);
    redacted.to_string()
}
