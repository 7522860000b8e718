//! Migrate command handler
//!
//! Applies, previews or reverts the embedded migrations.

use crate::config::Settings;
use crate::db;
use crate::error::AppResult;

pub struct MigrateCommandHandler {
    config: Settings,
}

impl MigrateCommandHandler {
    pub fn new(config: Settings) -> Self {
        Self { config }
    }

    /// Execute the migrate command
    ///
    /// `dry_run` lists pending migrations, `rollback` reverts that many of the
    /// most recent ones, and with neither every pending migration is applied.
    ///
    /// # Errors
    /// Configuration, connection and migration failures, or
    /// `AppError::Validation` for zero or too many rollback steps.
    pub async fn execute(&self, dry_run: bool, rollback: Option<u32>) -> AppResult<()> {
        self.config.database.validate()?;
        let database_url = self.config.database.url.clone();

        if dry_run {
            let pending = db::pending_migrations(database_url).await?;
            if pending.is_empty() {
                println!("✓ No pending migrations found - database is up to date");
            } else {
                println!("Found {} pending migration(s):", pending.len());
                for name in &pending {
                    println!("  - {}", name);
                }
                println!("\nRun without --dry-run to apply these migrations");
            }
            return Ok(());
        }

        if let Some(steps) = rollback {
            println!("Rolling back {} migration(s)...", steps);
            let reverted = db::revert_migrations(database_url, steps).await?;
            println!("✓ Rolled back {} migration(s)", reverted);
            return Ok(());
        }

        println!("Running database migrations...");
        let applied = db::run_pending_migrations(database_url).await?;
        if applied.is_empty() {
            println!("✓ No migrations to apply - database is already up to date");
        } else {
            println!("✓ Applied {} migration(s):", applied.len());
            for version in &applied {
                println!("  - {}", version);
            }
        }
        Ok(())
    }

    pub fn config(&self) -> &Settings {
        &self.config
    }
}
