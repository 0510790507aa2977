use std::time::Duration;
use thiserror::Error;

/// Library-level error type with user-facing reporting.
///
/// `EncycError` is what the pipeline crates hand back to the CLI. It wraps the
/// narrower error enums, carries context and suggestions through
/// [`UserFriendlyError`], and maps onto a process exit code
/// ([`to_exit_code`](Self::to_exit_code)).
///
/// | Exit Code | Error Type |
/// |-----------|------------|
/// | 2 | Configuration and argument validation errors |
/// | 70 | Upstream generation service failures |
/// | 1 | Everything else |
///
/// Library code returns `EncycError` and never calls `std::process::exit()`.
#[derive(Error, Debug)]
pub enum EncycError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Generation service error: {0}")]
    Llm(#[from] LlmError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

/// Context and suggestions printed under the error line by the CLI.
pub trait UserFriendlyError {
    /// Get contextual information about the error
    fn context(&self) -> Option<String>;

    /// Get suggested actions to resolve the error
    fn suggestions(&self) -> Vec<String>;
}

/// Configuration-related errors. Raised before any work starts.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid configuration file: {0}")]
    InvalidFile(String),

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),

    #[error("Invalid configuration value for {key}: {value}")]
    InvalidValue { key: String, value: String },

    #[error("Configuration file not found at {path}")]
    NotFound { path: String },

    #[error("Missing credential: none of [{env_vars}] is set")]
    MissingCredential { env_vars: String },

    #[error("Invalid faculty registry: {0}")]
    InvalidRegistry(String),
}

impl UserFriendlyError for ConfigError {
    fn context(&self) -> Option<String> {
        match self {
            Self::InvalidFile(_) | Self::InvalidValue { .. } => Some(
                "Configuration files are TOML with [paths], [faculty], [generation], [evaluator], [pacing] and [publish] sections."
                    .to_string(),
            ),
            Self::MissingRequired(_) => None,
            Self::NotFound { .. } => Some(
                "encyc searches for .encyclopaedia/config.toml starting from the current directory upward."
                    .to_string(),
            ),
            Self::MissingCredential { .. } => Some(
                "Credentials are read from the environment only, never from configuration files."
                    .to_string(),
            ),
            Self::InvalidRegistry(_) => Some(
                "The registry maps volumes to topics and ordered faculty author ids.".to_string(),
            ),
        }
    }

    fn suggestions(&self) -> Vec<String> {
        match self {
            Self::InvalidFile(_) => vec![
                "Check the TOML syntax using a TOML validator".to_string(),
                "Remove unknown keys from the configuration file".to_string(),
            ],
            Self::MissingRequired(key) => {
                vec![format!("Add '{key}' to .encyclopaedia/config.toml or pass it as a flag")]
            }
            Self::InvalidValue { key, .. } => {
                vec![format!("Check the allowed values for '{key}'")]
            }
            Self::NotFound { path } => vec![
                format!("Create the configuration file at {path}"),
                "Omit --config to use discovery and built-in defaults".to_string(),
            ],
            Self::MissingCredential { env_vars } => vec![
                format!("Export one of: {env_vars}"),
                "Point [faculty] url_env / key_env at the variables you use".to_string(),
            ],
            Self::InvalidRegistry(_) => vec![
                "Check [paths] registry in the configuration file".to_string(),
                "Every volume needs a number, slug and title".to_string(),
            ],
        }
    }
}

/// Errors raised by the HTTP clients for the generation and evaluator services.
#[derive(Error, Debug)]
pub enum LlmError {
    /// Transport-level failure (connect, TLS, body read)
    #[error("Transport error: {0}")]
    Transport(String),

    /// Non-2xx answer from the service
    #[error("Upstream returned HTTP {status}: {body}")]
    Upstream { status: u16, body: String },

    /// Request timed out
    #[error("Timeout after {duration:?}")]
    Timeout { duration: Duration },

    /// 2xx answer whose body could not be decoded
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Client could not be built from configuration
    #[error("Misconfiguration: {0}")]
    Misconfiguration(String),
}

impl UserFriendlyError for LlmError {
    fn context(&self) -> Option<String> {
        match self {
            Self::Upstream { status, .. } if *status == 401 || *status == 403 => Some(
                "Authentication errors indicate a missing or invalid service key.".to_string(),
            ),
            Self::Upstream { status, .. } if *status == 429 => {
                Some("The service is rate limiting requests.".to_string())
            }
            Self::Upstream { .. } => None,
            Self::Transport(_) => Some(
                "Transport errors occur when the service cannot be reached at all.".to_string(),
            ),
            Self::Timeout { .. } => Some(
                "Long entries can take minutes; the limit is [generation] timeout_secs."
                    .to_string(),
            ),
            Self::InvalidResponse(_) | Self::Misconfiguration(_) => None,
        }
    }

    fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Upstream { status, .. } if *status == 401 || *status == 403 => vec![
                "Check SUPABASE_SERVICE_ROLE_KEY or NEXT_PUBLIC_SUPABASE_ANON_KEY".to_string(),
            ],
            Self::Upstream { .. } | Self::InvalidResponse(_) => {
                vec!["Re-run the command; the workflow does not retry on its own".to_string()]
            }
            Self::Transport(_) => vec![
                "Verify network connectivity".to_string(),
                "Check that SUPABASE_URL points at the right project".to_string(),
            ],
            Self::Timeout { .. } => {
                vec!["Raise [generation] timeout_secs in .encyclopaedia/config.toml".to_string()]
            }
            Self::Misconfiguration(_) => vec!["Check the [generation] section".to_string()],
        }
    }
}

/// Errors raised while rewriting entry file content.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PatchError {
    #[error("no [role=canonical] block found")]
    PatternNotFound,
}

/// Invalid user input caught before any work starts.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("unknown volume number {0} (expected 1-12)")]
    UnknownVolume(u32),
}

impl UserFriendlyError for ValidationError {
    fn context(&self) -> Option<String> {
        None
    }

    fn suggestions(&self) -> Vec<String> {
        match self {
            Self::UnknownVolume(_) => vec!["Volumes are numbered 1 through 12".to_string()],
        }
    }
}

impl UserFriendlyError for EncycError {
    fn context(&self) -> Option<String> {
        match self {
            Self::Config(e) => e.context(),
            Self::Llm(e) => e.context(),
            Self::Validation(e) => e.context(),
        }
    }

    fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Config(e) => e.suggestions(),
            Self::Llm(e) => e.suggestions(),
            Self::Validation(e) => e.suggestions(),
        }
    }
}

impl EncycError {
    /// Map this error to the CLI exit code.
    #[must_use]
    pub fn to_exit_code(&self) -> crate::exit_codes::ExitCode {
        use crate::exit_codes::ExitCode;

        match self {
            Self::Config(_) | Self::Validation(_) => ExitCode::CLI_ARGS,
            Self::Llm(LlmError::Misconfiguration(_)) => ExitCode::CLI_ARGS,
            Self::Llm(_) => ExitCode::UPSTREAM_FAILURE,
        }
    }
}
