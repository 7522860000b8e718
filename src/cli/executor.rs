//! Command dispatch after parsing and configuration loading

use super::handlers::{MigrateCommandHandler, ServeCommandHandler};
use super::parser::{Cli, Commands};
use crate::config::Settings;
use crate::error::AppResult;

/// Run the parsed command with the merged settings.
///
/// No subcommand means `serve`.
pub async fn execute_command(cli: &Cli, settings: Settings) -> AppResult<()> {
    match cli.resolved_command() {
        Commands::Serve { dry_run: true, .. } => {
            ServeCommandHandler::new(settings).validate_only()
        }
        Commands::Serve { .. } => ServeCommandHandler::new(settings).run().await,
        Commands::Migrate { dry_run, rollback } => {
            MigrateCommandHandler::new(settings)
                .execute(dry_run, rollback)
                .await
        }
    }
}
