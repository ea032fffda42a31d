//! Configuration loading and management.
//!
//! This module is split into logical submodules:
//! - [`types`]: Core config struct definitions (Config, ServerConfig, DatabaseConfig)
//! - [`stats`]: Collection cadence for the login statistics task (StatsConfig)
//! - [`defaults`]: serde default functions
//! - [`validation`]: startup validation

mod defaults;
mod stats;
mod types;
mod validation;

pub use types::{Config, ConfigError};

#[cfg(test)]
mod tests {
    use super::validation::ValidationError;
    use super::*;
    use std::io::Write;
    use std::time::Duration;

    #[test]
    fn empty_file_uses_defaults() {
        let config = Config::parse("").unwrap();
        assert_eq!(config.server.name, "loginstats");
        assert_eq!(config.server.metrics_port, 9090);
        assert_eq!(config.database.path, "loginstats.db");
        assert_eq!(config.stats.interval(), Duration::from_secs(1800));
        assert_eq!(config.stats.fetch_timeout(), Duration::from_secs(60));
    }

    #[test]
    fn sections_override_defaults() {
        let config = Config::parse(
            r#"
            [server]
            name = "prod-1"
            metrics_port = 0

            [database]
            path = ":memory:"

            [stats]
            collection_interval = 15
            fetch_timeout = 5
            "#,
        )
        .unwrap();
        assert_eq!(config.server.name, "prod-1");
        assert_eq!(config.server.metrics_port, 0);
        assert_eq!(config.database.path, ":memory:");
        assert_eq!(config.stats.interval(), Duration::from_secs(15));
        assert_eq!(config.stats.fetch_timeout(), Duration::from_secs(5));
    }

    #[test]
    fn validation_reports_every_error() {
        let err = Config::parse(
            r#"
            [database]
            path = "/definitely/not/here/users.db"

            [stats]
            collection_interval = 0
            fetch_timeout = 0
            "#,
        )
        .unwrap_err();

        match err {
            ConfigError::Invalid(errors) => {
                assert_eq!(
                    errors,
                    vec![
                        ValidationError::ZeroCollectionInterval,
                        ValidationError::ZeroFetchTimeout,
                        ValidationError::DatabasePathInvalid(
                            "/definitely/not/here/users.db".to_string()
                        ),
                    ]
                );
            }
            other => panic!("expected validation failure, got {other:?}"),
        }
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let err = Config::parse("[stats\ncollection_interval = 1").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn load_reads_file_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "[stats]\ncollection_interval = 120").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.stats.collection_interval, 120);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load(dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
