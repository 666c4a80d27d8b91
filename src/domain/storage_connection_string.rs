/// Parsed Azure storage connection string (`Key=Value;Key=Value;...`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageConnectionString {
    Account {
        account_name: String,
        account_key: String,
    },
    DevelopmentStorage,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConnectionStringError {
    #[error("connection string is missing {0}")]
    MissingField(&'static str),
    #[error("malformed connection string segment: {0}")]
    Malformed(String),
}

impl StorageConnectionString {
    pub fn parse(raw: &str) -> Result<Self, ConnectionStringError> {
        let mut account_name = None;
        let mut account_key = None;

        for segment in raw.split(';').map(str::trim).filter(|s| !s.is_empty()) {
            // Keys are base64 and may themselves contain '='.
            let (key, value) = segment
                .split_once('=')
                .ok_or_else(|| ConnectionStringError::Malformed(segment.to_string()))?;

            match key {
                "UseDevelopmentStorage" if value.eq_ignore_ascii_case("true") => {
                    return Ok(Self::DevelopmentStorage);
                }
                "AccountName" => account_name = Some(value.to_string()),
                "AccountKey" => account_key = Some(value.to_string()),
                _ => {}
            }
        }

        Ok(Self::Account {
            account_name: account_name.ok_or(ConnectionStringError::MissingField("AccountName"))?,
            account_key: account_key.ok_or(ConnectionStringError::MissingField("AccountKey"))?,
        })
    }
}
