use std::time::Duration;

use config::{Config, ConfigError, File};
use serde::Deserialize;

use crate::application::services::{
    DEFAULT_POLL_INTERVAL, DEFAULT_POLL_TIMEOUT, DEFAULT_SAS_EXPIRY,
};
use crate::infrastructure::audio::DEFAULT_CONVERSION_TIMEOUT;
use crate::infrastructure::speech::{
    DEFAULT_DISPLAY_NAME, DEFAULT_LOCALE, DEFAULT_PUNCTUATION_MODE,
};
use crate::infrastructure::storage::DEFAULT_CONTAINER;

use super::Environment;

const ENV_PREFIX: &str = "APP";
const ENV_SEPARATOR: &str = "__";

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub speech: SpeechSettings,
    pub storage: StorageSettings,
    pub pipeline: PipelineSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub max_upload_mb: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SpeechSettings {
    pub key: String,
    pub region: String,
    pub endpoint: Option<String>,
    pub locale: String,
    pub display_name: String,
    pub punctuation_mode: String,
    pub word_level_timestamps: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageProviderSetting {
    Azure,
    Local,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageSettings {
    pub provider: StorageProviderSetting,
    pub connection_string: Option<String>,
    pub container: String,
    pub local_path: String,
    pub sas_expiry_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PipelineSettings {
    pub scratch_dir: String,
    pub ffmpeg_path: String,
    pub poll_interval_secs: u64,
    pub poll_timeout_secs: u64,
    pub conversion_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    pub level: String,
    pub enable_json: bool,
}

/// The unprefixed variables the service has always been configured with.
#[derive(Debug, Clone, Default)]
pub struct LegacyVariables {
    pub speech_key: Option<String>,
    pub speech_region: Option<String>,
    pub storage_connection_string: Option<String>,
}

impl LegacyVariables {
    pub fn from_env() -> Self {
        let read = |name: &str| std::env::var(name).ok().filter(|v| !v.trim().is_empty());
        Self {
            speech_key: read("SPEECH_KEY"),
            speech_region: read("SPEECH_REGION"),
            storage_connection_string: read("AZURE_STORAGE_CONNECTION_STRING"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("missing required setting: {0}")]
    Missing(&'static str),
    #[error("invalid setting {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}

impl Settings {
    /// Defaults, then `appsettings.<env>`, then `APP__*` variables, then the
    /// legacy variables.
    pub fn load(environment: Environment) -> Result<Self, SettingsError> {
        Self::load_with(environment, &LegacyVariables::from_env())
    }

    pub fn load_with(
        environment: Environment,
        legacy: &LegacyVariables,
    ) -> Result<Self, SettingsError> {
        let configuration = Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 5001)?
            .set_default("server.max_upload_mb", 300)?
            .set_default("speech.key", "")?
            .set_default("speech.region", "")?
            .set_default("speech.locale", DEFAULT_LOCALE)?
            .set_default("speech.display_name", DEFAULT_DISPLAY_NAME)?
            .set_default("speech.punctuation_mode", DEFAULT_PUNCTUATION_MODE)?
            .set_default("speech.word_level_timestamps", false)?
            .set_default("storage.provider", "azure")?
            .set_default("storage.container", DEFAULT_CONTAINER)?
            .set_default("storage.local_path", "blob-storage")?
            .set_default("storage.sas_expiry_secs", DEFAULT_SAS_EXPIRY.as_secs())?
            .set_default("pipeline.scratch_dir", "uploads")?
            .set_default("pipeline.ffmpeg_path", "ffmpeg")?
            .set_default("pipeline.poll_interval_secs", DEFAULT_POLL_INTERVAL.as_secs())?
            .set_default("pipeline.poll_timeout_secs", DEFAULT_POLL_TIMEOUT.as_secs())?
            .set_default(
                "pipeline.conversion_timeout_secs",
                DEFAULT_CONVERSION_TIMEOUT.as_secs(),
            )?
            .set_default("logging.level", "")?
            .set_default("logging.enable_json", false)?
            .add_source(
                File::with_name(&format!("appsettings.{}", environment.as_str())).required(false),
            )
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator(ENV_SEPARATOR)
                    .separator(ENV_SEPARATOR)
                    .try_parsing(true),
            )
            .set_override_option("speech.key", legacy.speech_key.clone())?
            .set_override_option("speech.region", legacy.speech_region.clone())?
            .set_override_option(
                "storage.connection_string",
                legacy.storage_connection_string.clone(),
            )?
            .build()?;

        let settings: Settings = configuration.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.speech.key.trim().is_empty() {
            return Err(SettingsError::Missing("SPEECH_KEY"));
        }
        if self.speech.region.trim().is_empty() && self.speech.endpoint.is_none() {
            return Err(SettingsError::Missing("SPEECH_REGION"));
        }
        if self.storage.provider == StorageProviderSetting::Azure
            && self
                .storage
                .connection_string
                .as_deref()
                .is_none_or(|c| c.trim().is_empty())
        {
            return Err(SettingsError::Missing("AZURE_STORAGE_CONNECTION_STRING"));
        }
        if self.pipeline.poll_interval_secs == 0 {
            return Err(SettingsError::Invalid {
                name: "pipeline.poll_interval_secs",
                reason: "must be greater than zero".to_string(),
            });
        }
        if self.pipeline.poll_timeout_secs < self.pipeline.poll_interval_secs {
            return Err(SettingsError::Invalid {
                name: "pipeline.poll_timeout_secs",
                reason: "must not be shorter than the poll interval".to_string(),
            });
        }
        Ok(())
    }
}

impl ServerSettings {
    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_mb.saturating_mul(1024 * 1024)
    }
}

impl StorageSettings {
    pub fn sas_expiry(&self) -> Duration {
        Duration::from_secs(self.sas_expiry_secs)
    }
}

impl PipelineSettings {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn poll_timeout(&self) -> Duration {
        Duration::from_secs(self.poll_timeout_secs)
    }

    pub fn conversion_timeout(&self) -> Duration {
        Duration::from_secs(self.conversion_timeout_secs)
    }
}
