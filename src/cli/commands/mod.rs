//! CLI command implementations.
//!
//! `run.rs` calls [`dispatch`]; each subcommand lives in its own module.

mod assign;
mod batch;
mod catalog;
mod common;
mod generate;
mod review;

use anyhow::Result;

use encyc_config::{Config, Registry};

use super::args::Commands;

pub use assign::execute_assign_command;
pub use batch::execute_batch_command;
pub use catalog::execute_catalog_command;
pub use generate::{execute_generate_command, execute_generate_volume_command};
pub use review::execute_review_command;

/// Run one subcommand to completion.
pub async fn dispatch(command: Commands, config: &Config, registry: &Registry) -> Result<()> {
    match command {
        Commands::Assign { volume, dry_run } => {
            execute_assign_command(volume, dry_run, config, registry)
        }
        Commands::Catalog { volume, format } => execute_catalog_command(volume, format, registry),
        Commands::Generate {
            entry,
            faculty,
            edition,
            volume,
            entry_type,
        } => {
            execute_generate_command(&entry, &faculty, edition, volume, entry_type, config, registry)
                .await
        }
        Commands::GenerateVolume {
            volume,
            edition,
            entry,
        } => execute_generate_volume_command(volume, edition, entry.as_deref(), config, registry).await,
        Commands::Review {
            entry,
            faculty,
            edition,
            volume,
            entry_type,
            reviewers,
            multi_perspective,
            additional_authors,
        } => {
            let options = review::ReviewOptions {
                entry,
                faculty,
                edition,
                volume,
                entry_type,
                reviewers,
                multi_perspective,
                additional_authors,
            };
            execute_review_command(options, config, registry).await
        }
        // --no-push is already folded into config.publish
        Commands::Batch {
            volume, edition, ..
        } => execute_batch_command(volume, edition, config, registry).await,
    }
}
