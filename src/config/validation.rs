//! Configuration validation logic
//!
//! Validation methods for the configuration structures, run once after
//! loading so the server never starts with out-of-range values.

use crate::config::error::ConfigError;
use crate::config::settings::{
    DatabaseConfig, FileSettings, LoggerSettings, ServerConfig, Settings,
};

/// Valid log levels
const VALID_LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Valid log formats
const VALID_LOG_FORMATS: &[&str] = &["full", "compact", "json"];

impl ServerConfig {
    /// Validate server configuration
    ///
    /// # Validation Rules
    /// - Host must not be empty
    /// - Port must be between 1 and 65535
    /// - Every CORS origin must parse as a header value with a scheme
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.host.trim().is_empty() {
            return Err(ConfigError::validation(
                "server.host",
                "Host must not be empty.",
            ));
        }

        if self.port == 0 {
            return Err(ConfigError::validation(
                "server.port",
                "Port must be between 1 and 65535. Please specify a valid port number.",
            ));
        }

        for origin in &self.cors_origins {
            let has_scheme = origin.starts_with("http://") || origin.starts_with("https://");
            if !has_scheme || axum::http::HeaderValue::from_str(origin).is_err() {
                return Err(ConfigError::ValidationError {
                    field: "server.cors_origins".to_string(),
                    message: format!("Invalid CORS origin '{}'", origin),
                });
            }
        }

        Ok(())
    }
}

impl DatabaseConfig {
    /// Validate database configuration
    ///
    /// # Validation Rules
    /// - URL must not be empty and must use a PostgreSQL scheme
    /// - Pool bounds must be positive with min <= max
    /// - Connection timeout must be greater than 0
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.url.is_empty() {
            return Err(ConfigError::validation(
                "database.url",
                "Database URL is required. Set database.url, ROLES_DATABASE__URL or DATABASE_URL.",
            ));
        }

        if !self.is_valid_database_url() {
            return Err(ConfigError::validation(
                "database.url",
                "Invalid database URL format. Expected format: postgres://[user:password@]host[:port]/database",
            ));
        }

        if self.max_connections == 0 {
            return Err(ConfigError::validation(
                "database.max_connections",
                "Max connections must be greater than 0.",
            ));
        }

        if self.min_connections == 0 {
            return Err(ConfigError::validation(
                "database.min_connections",
                "Min connections must be greater than 0.",
            ));
        }

        if self.min_connections > self.max_connections {
            return Err(ConfigError::ValidationError {
                field: "database.min_connections".to_string(),
                message: format!(
                    "Min connections ({}) cannot exceed max connections ({}).",
                    self.min_connections, self.max_connections
                ),
            });
        }

        if self.connection_timeout == 0 {
            return Err(ConfigError::validation(
                "database.connection_timeout",
                "Connection timeout must be greater than 0 seconds.",
            ));
        }

        Ok(())
    }

    fn is_valid_database_url(&self) -> bool {
        ["postgres://", "postgresql://"]
            .iter()
            .any(|scheme| self.url.starts_with(scheme))
    }
}

impl FileSettings {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.enabled && self.path.trim().is_empty() {
            return Err(ConfigError::validation(
                "logger.file.path",
                "File path is required when file logging is enabled.",
            ));
        }

        if !VALID_LOG_FORMATS.contains(&self.format.to_lowercase().as_str()) {
            return Err(ConfigError::ValidationError {
                field: "logger.file.format".to_string(),
                message: format!(
                    "Invalid log format '{}'. Valid formats are: {}",
                    self.format,
                    VALID_LOG_FORMATS.join(", ")
                ),
            });
        }

        if self.rotation.max_size == 0 {
            return Err(ConfigError::validation(
                "logger.file.rotation.max_size",
                "Maximum file size must be greater than 0.",
            ));
        }

        if self.rotation.max_backups == 0 {
            return Err(ConfigError::validation(
                "logger.file.rotation.max_backups",
                "At least one backup must be kept.",
            ));
        }

        Ok(())
    }
}

impl LoggerSettings {
    /// Validate logger settings
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !VALID_LOG_LEVELS.contains(&self.level.to_lowercase().as_str()) {
            return Err(ConfigError::ValidationError {
                field: "logger.level".to_string(),
                message: format!(
                    "Invalid log level '{}'. Valid levels are: {}",
                    self.level,
                    VALID_LOG_LEVELS.join(", ")
                ),
            });
        }

        if !self.console.enabled && !self.file.enabled {
            return Err(ConfigError::validation(
                "logger",
                "At least one output (console or file) must be enabled.",
            ));
        }

        self.file.validate()
    }
}

impl Settings {
    /// Validate all configuration settings, returning the first failure.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.server.validate()?;
        self.database.validate()?;
        self.logger.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_settings() -> Settings {
        let mut settings = Settings::default();
        settings.database.url = "postgres://localhost/roles".to_string();
        settings
    }

    fn failing_field(result: Result<(), ConfigError>) -> String {
        match result {
            Err(ConfigError::ValidationError { field, .. }) => field,
            other => panic!("Expected validation error, got: {:?}", other),
        }
    }

    #[test]
    fn test_defaults_with_url_are_valid() {
        assert!(valid_settings().validate().is_ok());
    }

    #[test]
    fn test_port_zero_rejected() {
        let mut settings = valid_settings();
        settings.server.port = 0;
        assert_eq!(failing_field(settings.validate()), "server.port");
    }

    #[test]
    fn test_bad_cors_origin_rejected() {
        let mut settings = valid_settings();
        settings.server.cors_origins.push("localhost:4200".to_string());
        assert_eq!(failing_field(settings.validate()), "server.cors_origins");
    }

    #[test]
    fn test_empty_database_url_rejected() {
        let settings = Settings::default();
        assert_eq!(failing_field(settings.validate()), "database.url");
    }

    #[test]
    fn test_non_postgres_url_rejected() {
        let mut settings = valid_settings();
        settings.database.url = "mysql://localhost/roles".to_string();
        assert_eq!(failing_field(settings.validate()), "database.url");

        settings.database.url = "postgresql://u:p@db:5432/roles".to_string();
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_pool_bounds() {
        let mut settings = valid_settings();
        settings.database.min_connections = 20;
        assert_eq!(
            failing_field(settings.validate()),
            "database.min_connections"
        );

        let mut settings = valid_settings();
        settings.database.max_connections = 0;
        assert_eq!(
            failing_field(settings.validate()),
            "database.max_connections"
        );
    }

    #[test]
    fn test_logger_level_and_outputs() {
        let mut settings = valid_settings();
        settings.logger.level = "loud".to_string();
        assert_eq!(failing_field(settings.validate()), "logger.level");

        let mut settings = valid_settings();
        settings.logger.console.enabled = false;
        assert_eq!(failing_field(settings.validate()), "logger");
    }

    #[test]
    fn test_file_settings_checks() {
        let mut settings = valid_settings();
        settings.logger.file.enabled = true;
        settings.logger.file.path = "  ".to_string();
        assert_eq!(failing_field(settings.validate()), "logger.file.path");

        let mut settings = valid_settings();
        settings.logger.file.rotation.max_backups = 0;
        assert_eq!(
            failing_field(settings.validate()),
            "logger.file.rotation.max_backups"
        );
    }
}
