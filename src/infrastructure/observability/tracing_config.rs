use crate::presentation::config::{Environment, LoggingSettings};

use super::init_tracing::default_directives;

/// Configuration for tracing initialization.
#[derive(Debug, Clone)]
pub struct TracingConfig {
    pub environment: Environment,
    pub level: Option<String>,
    pub json_format: bool,
}

impl TracingConfig {
    pub fn new(environment: Environment, logging: &LoggingSettings) -> Self {
        Self {
            environment,
            level: Some(logging.level.clone()).filter(|l| !l.trim().is_empty()),
            json_format: logging.enable_json,
        }
    }

    /// Filter directives: the configured level, or the crate defaults.
    pub fn directives(&self) -> String {
        match &self.level {
            Some(level) => level.clone(),
            None => default_directives().to_string(),
        }
    }
}
