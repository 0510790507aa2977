//! encyclopaedia - faculty assignment and generation-with-review pipeline
//!
//! Turns a static assignment table into AsciiDoc entry files and fills them
//! with canonical text written, reviewed and annotated in the voices of the
//! assigned faculty.
//!
//! # Quick Start (CLI)
//!
//! ```bash
//! # Create or update every entry stub from the registry
//! encyc assign --dry-run
//!
//! # Generate one entry with peer review and marginalia
//! encyc review --entry attention --faculty a.james --volume 1 --type major
//!
//! # Review every pending entry of volume 3, both editions, without pushing
//! encyc batch --volume 3 --no-push
//! ```
//!
//! # Crates
//!
//! - [`encyc_utils`]: errors, exit codes, logging, atomic writes, domain enums
//! - [`encyc_config`]: layered configuration and the faculty registry
//! - [`encyc_prompt`]: prompt text for every generation and evaluation call
//! - [`encyc_llm`]: the ask-faculty backend and the fidelity evaluator
//! - [`encyc_entry`]: entry paths, stubs, metadata and canonical patching
//! - [`encyc_engine`]: assignment, catalog, draft, review and batch workflows

pub mod cli;

pub use encyc_config::{CliArgs, Config, Registry};
pub use encyc_utils::error::{EncycError, UserFriendlyError};
pub use encyc_utils::exit_codes::ExitCode;
