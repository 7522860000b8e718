//! Serve command handler

use crate::config::Settings;
use crate::error::{AppError, AppResult};
use crate::server::Server;

pub struct ServeCommandHandler {
    config: Settings,
}

impl ServeCommandHandler {
    pub fn new(config: Settings) -> Self {
        Self { config }
    }

    /// Start the HTTP server and block until shutdown.
    pub async fn run(self) -> AppResult<()> {
        self.config.validate()?;
        Server::new(self.config)
            .run()
            .await
            .map_err(|source| AppError::Internal { source })
    }

    /// Validate configuration without starting the server
    pub fn validate_only(&self) -> AppResult<()> {
        self.config.validate()?;

        println!("✓ Configuration is valid");
        println!("✓ Server would bind to: {}", self.config.server.address());
        println!(
            "✓ Database pool: {}..{} connections",
            self.config.database.min_connections, self.config.database.max_connections
        );
        println!(
            "✓ Migrations on startup: {}",
            if self.config.database.auto_migrate { "enabled" } else { "disabled" }
        );
        println!("✓ CORS origins: {}", self.config.server.cors_origins.join(", "));
        println!("Dry run completed successfully - configuration is ready for deployment");
        Ok(())
    }

    pub fn config(&self) -> &Settings {
        &self.config
    }
}
