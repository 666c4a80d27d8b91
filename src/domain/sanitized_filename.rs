use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use unicode_normalization::UnicodeNormalization;

static UNSAFE_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9_.-]").expect("static pattern is valid"));

const FALLBACK_NAME: &str = "upload";

/// A client-supplied filename reduced to a safe, flat, ASCII-only name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SanitizedFilename(String);

impl SanitizedFilename {
    /// Returns `None` when the client sent an empty filename.
    ///
    /// Names that sanitize down to nothing (`"../.."`, `"日本.."`) fall back to
    /// `upload` so the request can still proceed.
    pub fn new(raw: &str) -> Option<Self> {
        if raw.is_empty() {
            return None;
        }

        let ascii: String = raw.nfkd().filter(char::is_ascii).collect();
        let flattened = ascii.replace(['/', '\\'], " ");
        let joined = flattened.split_whitespace().collect::<Vec<_>>().join("_");
        let stripped = UNSAFE_CHARS.replace_all(&joined, "");
        let trimmed = stripped.trim_matches(|c| c == '.' || c == '_');

        if trimmed.is_empty() {
            Some(Self(FALLBACK_NAME.to_string()))
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SanitizedFilename {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
