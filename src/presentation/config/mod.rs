mod environment;
mod settings;

pub use environment::Environment;
pub use settings::{
    LegacyVariables, LoggingSettings, PipelineSettings, ServerSettings, Settings, SettingsError,
    SpeechSettings, StorageProviderSetting, StorageSettings,
};
