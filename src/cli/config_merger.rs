//! Configuration merger for CLI arguments and config files
//!
//! CLI flags sit above every file and environment layer. The merged result
//! is validated once, after all overrides are in place.

use super::parser::{Cli, Commands};
use crate::config::error::ConfigError;
use crate::config::{ConfigLoader, Settings};

/// Applies CLI overrides on top of the loaded settings
pub struct ConfigurationMerger {
    base_config: Settings,
}

impl ConfigurationMerger {
    pub fn new(base_config: Settings) -> Self {
        Self { base_config }
    }

    /// Load the base settings honouring `--config` and `--env`.
    ///
    /// Validation is deferred to [`merge_cli_args`](Self::merge_cli_args) so
    /// that a CLI flag can repair a value the files leave invalid.
    pub fn from_cli(cli: &Cli) -> Result<Self, ConfigError> {
        let mut loader = ConfigLoader::new()?;
        if let Some(path) = &cli.config {
            loader = loader.with_file(path);
        }
        if let Some(env) = cli.env {
            loader = loader.with_environment(env.into());
        }

        Ok(Self::new(loader.load_unvalidated()?))
    }

    /// Merge CLI arguments with the base configuration and validate the result
    pub fn merge_cli_args(&self, cli: &Cli) -> Result<Settings, ConfigError> {
        let mut config = self.base_config.clone();

        if cli.verbose {
            config.logger.level = "debug".to_string();
        } else if cli.quiet {
            config.logger.level = "error".to_string();
        }

        if let Some(Commands::Serve {
            host,
            port,
            log_level,
            ..
        }) = &cli.command
        {
            if let Some(host) = host {
                config.server.host = host.clone();
            }
            if let Some(port) = port {
                config.server.port = *port;
            }
            // Wins over --verbose and --quiet
            if let Some(level) = log_level {
                config.logger.level = level.as_str().to_string();
            }
        }

        config.validate()?;
        Ok(config)
    }

    pub fn config(&self) -> &Settings {
        &self.base_config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn base_settings() -> Settings {
        let mut settings = Settings::default();
        settings.database.url = "postgres://localhost/roles".to_string();
        settings
    }

    fn merge(args: &[&str], settings: Settings) -> Result<Settings, ConfigError> {
        let cli = Cli::try_parse_from(args).unwrap();
        ConfigurationMerger::new(settings).merge_cli_args(&cli)
    }

    #[test]
    fn test_no_overrides_keeps_base() {
        let merged = merge(&["role-management"], base_settings()).unwrap();
        assert_eq!(merged, base_settings());
    }

    #[test]
    fn test_serve_overrides_host_and_port() {
        let merged = merge(
            &["role-management", "serve", "--host", "127.0.0.1", "--port", "9000"],
            base_settings(),
        )
        .unwrap();

        assert_eq!(merged.server.host, "127.0.0.1");
        assert_eq!(merged.server.port, 9000);
        assert_eq!(merged.server.address(), "127.0.0.1:9000");
    }

    #[test]
    fn test_log_level_precedence() {
        let merged = merge(&["role-management", "-v"], base_settings()).unwrap();
        assert_eq!(merged.logger.level, "debug");

        let merged = merge(&["role-management", "--quiet"], base_settings()).unwrap();
        assert_eq!(merged.logger.level, "error");

        let merged = merge(
            &["role-management", "-v", "serve", "--log-level", "warn"],
            base_settings(),
        )
        .unwrap();
        assert_eq!(merged.logger.level, "warn");
    }

    #[test]
    fn test_migrate_leaves_server_untouched() {
        let merged = merge(&["role-management", "migrate", "--dry-run"], base_settings()).unwrap();
        assert_eq!(merged.server, base_settings().server);
    }

    #[test]
    fn test_cli_can_repair_invalid_port() {
        let mut settings = base_settings();
        settings.server.port = 0;
        assert!(merge(&["role-management"], settings.clone()).is_err());

        let merged = merge(&["role-management", "serve", "--port", "5002"], settings).unwrap();
        assert_eq!(merged.server.port, 5002);
    }

    #[test]
    fn test_missing_database_url_is_rejected() {
        let result = merge(&["role-management"], Settings::default());
        assert!(matches!(result, Err(ConfigError::ValidationError { .. })));
    }
}
