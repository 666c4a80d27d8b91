use vidscribe::infrastructure::observability::TracingConfig;
use vidscribe::presentation::config::{Environment, LoggingSettings};

#[test]
fn given_configured_level_when_building_directives_then_level_is_used() {
    let logging = LoggingSettings {
        level: "warn,vidscribe=info".to_string(),
        enable_json: true,
    };

    let config = TracingConfig::new(Environment::Prod, &logging);

    assert_eq!(config.directives(), "warn,vidscribe=info");
    assert!(config.json_format);
    assert_eq!(config.environment, Environment::Prod);
}

#[test]
fn given_blank_level_when_building_directives_then_crate_defaults_apply() {
    let logging = LoggingSettings {
        level: "  ".to_string(),
        enable_json: false,
    };

    let config = TracingConfig::new(Environment::Local, &logging);

    assert!(config.level.is_none());
    assert!(config.directives().contains("vidscribe=debug"));
}
