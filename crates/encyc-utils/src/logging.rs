//! Tracing setup and span helpers.
//!
//! The CLI calls [`init_tracing`] once; library crates only emit events.

use tracing::{Level, info, span, warn};
use tracing_subscriber::{
    EnvFilter,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

/// Initialize the global tracing subscriber.
///
/// Events go to stderr so command output on stdout stays pipeable.
/// `RUST_LOG` wins when set. Otherwise `verbose` selects debug output for the
/// encyclopaedia crates and info for everything else.
pub fn init_tracing(verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| {
            if verbose {
                EnvFilter::try_new("encyclopaedia=debug,encyc=debug,info")
            } else {
                EnvFilter::try_new("info")
            }
        })
        .unwrap_or_else(|_| EnvFilter::new("info"));

    if verbose {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_line_number(false)
                    .with_file(false)
                    .with_span_events(FmtSpan::CLOSE)
                    .compact(),
            )
            .try_init()?;
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_line_number(false)
                    .with_file(false)
                    .compact(),
            )
            .try_init()?;
    }

    Ok(())
}

/// Span covering every stage of one entry's workflow.
pub fn entry_span(slug: &str, edition: &str, faculty_id: &str) -> tracing::Span {
    span!(
        Level::INFO,
        "entry",
        slug = %slug,
        edition = %edition,
        faculty_id = %faculty_id,
    )
}

/// Span for a single workflow stage.
pub fn stage_span(stage: &str) -> tracing::Span {
    span!(Level::INFO, "stage", stage = %stage)
}

/// Log a stage start with structured fields.
pub fn log_stage_start(slug: &str, stage: &str) {
    info!(slug = %slug, stage = %stage, "Starting stage");
}

/// Log a degraded stage (the workflow continues).
pub fn log_stage_degraded(slug: &str, stage: &str, reason: &str) {
    warn!(slug = %slug, stage = %stage, reason = %reason, "Stage degraded, continuing");
}
