//! CLI entry point and dispatch logic
//!
//! This module owns the `run()` function which:
//! - Parses CLI arguments
//! - Initializes tracing
//! - Builds CliArgs and discovers Config
//! - Loads the faculty registry once
//! - Creates the tokio runtime and dispatches to command handlers
//! - Handles all error output

use anyhow::Result;
use clap::Parser;

use encyc_config::{CliArgs, Config, Registry};
use encyc_llm::redact_error_message;
use encyc_utils::error::{ConfigError, EncycError, LlmError, UserFriendlyError, ValidationError};
use encyc_utils::exit_codes::ExitCode;
use encyc_utils::logging::init_tracing;

use super::args::{Cli, Commands};
use super::commands;

/// Main CLI execution function.
///
/// Handles ALL output including errors and returns `Result<(), ExitCode>`.
/// main.rs only calls `std::process::exit(code.as_i32())` on error.
pub fn run() -> Result<(), ExitCode> {
    let cli = Cli::parse();

    if let Err(e) = init_tracing(cli.verbose) {
        eprintln!("Warning: failed to initialize logging: {e}");
    }

    let cli_args = CliArgs {
        config_path: cli.config.clone(),
        content_root: cli.content_root.clone(),
        no_push: matches!(cli.command, Commands::Batch { no_push: true, .. }),
    };

    let config = match Config::discover(&cli_args) {
        Ok(config) => config,
        Err(err) => {
            report_error(&err, "config");
            return Err(exit_code_for(&err));
        }
    };

    let registry = match Registry::load(config.paths.registry.as_deref()) {
        Ok(registry) => registry,
        Err(err) => {
            report_error(&err, "registry");
            return Err(exit_code_for(&err));
        }
    };

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("✗ Failed to create async runtime: {e}");
            return Err(ExitCode::INTERNAL);
        }
    };

    let operation = cli.command.name();
    let result = rt.block_on(commands::dispatch(cli.command, &config, &registry));

    if let Err(error) = result {
        report_error(&error, operation);
        return Err(exit_code_for(&error));
    }

    Ok(())
}

/// The typed error behind an `anyhow` chain, if it is one of ours.
fn friendly(error: &anyhow::Error) -> Option<&dyn UserFriendlyError> {
    if let Some(e) = error.downcast_ref::<EncycError>() {
        return Some(e);
    }
    if let Some(e) = error.downcast_ref::<ConfigError>() {
        return Some(e);
    }
    if let Some(e) = error.downcast_ref::<ValidationError>() {
        return Some(e);
    }
    if let Some(e) = error.downcast_ref::<LlmError>() {
        return Some(e);
    }
    None
}

fn exit_code_for(error: &anyhow::Error) -> ExitCode {
    if let Some(e) = error.downcast_ref::<EncycError>() {
        return e.to_exit_code();
    }
    if error.downcast_ref::<ConfigError>().is_some()
        || error.downcast_ref::<ValidationError>().is_some()
    {
        return ExitCode::CLI_ARGS;
    }
    match error.downcast_ref::<LlmError>() {
        Some(LlmError::Misconfiguration(_)) => ExitCode::CLI_ARGS,
        Some(_) => ExitCode::UPSTREAM_FAILURE,
        None => ExitCode::INTERNAL,
    }
}

fn report_error(error: &anyhow::Error, operation: &str) {
    eprintln!(
        "✗ {operation} failed: {}",
        redact_error_message(&format!("{error:#}"))
    );

    let Some(typed) = friendly(error) else {
        eprintln!("\n  Run with --verbose for more detailed output");
        return;
    };
    if let Some(context) = typed.context() {
        eprintln!("\n  Context: {context}");
    }
    let suggestions = typed.suggestions();
    if !suggestions.is_empty() {
        eprintln!("\n  Suggestions:");
        for (i, suggestion) in suggestions.iter().enumerate() {
            eprintln!("    {}. {}", i + 1, suggestion);
        }
    }
}
