//! Foundation utilities shared by every encyclopaedia crate.
//!
//! Holds the error taxonomy, exit-code mapping, tracing setup, atomic file
//! writes and the small domain enums (edition, entry type, marginalia kind).

pub mod atomic_write;
pub mod error;
pub mod exit_codes;
pub mod logging;
pub mod types;

pub use error::{EncycError, UserFriendlyError};
pub use exit_codes::ExitCode;
