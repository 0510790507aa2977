use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

/// Default Supabase project URL variables, first match wins.
pub const DEFAULT_URL_ENV: [&str; 2] = ["SUPABASE_URL", "NEXT_PUBLIC_SUPABASE_URL"];

/// Default Supabase key variables, first match wins.
pub const DEFAULT_KEY_ENV: [&str; 2] = ["SUPABASE_SERVICE_ROLE_KEY", "NEXT_PUBLIC_SUPABASE_ANON_KEY"];

/// Where a configuration value came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    Cli,
    ConfigFile(PathBuf),
    Defaults,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cli => write!(f, "cli"),
            Self::ConfigFile(path) => write!(f, "config ({})", path.display()),
            Self::Defaults => write!(f, "default"),
        }
    }
}

/// Values supplied on the command line. `None` means "not given".
#[derive(Debug, Clone, Default)]
pub struct CliArgs {
    pub config_path: Option<PathBuf>,
    pub content_root: Option<PathBuf>,
    pub no_push: bool,
}

/// `[paths]` section
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathsConfig {
    /// Directory that holds `editions/`
    pub content_root: Utf8PathBuf,
    /// Registry TOML replacing the embedded one
    pub registry: Option<Utf8PathBuf>,
}

/// `[faculty]` section: names of the environment variables holding credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FacultyConfig {
    pub url_env: Vec<String>,
    pub key_env: Vec<String>,
}

impl Default for FacultyConfig {
    fn default() -> Self {
        Self {
            url_env: DEFAULT_URL_ENV.iter().map(|s| (*s).to_string()).collect(),
            key_env: DEFAULT_KEY_ENV.iter().map(|s| (*s).to_string()).collect(),
        }
    }
}

/// `[generation]` section
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationConfig {
    pub temperature: f32,
    /// Budget for review and marginalia calls; drafts use the entry-type budget.
    pub max_tokens: u32,
    pub use_rag: bool,
    pub use_commonplace: bool,
    pub timeout_secs: u64,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            max_tokens: 4000,
            use_rag: true,
            use_commonplace: true,
            timeout_secs: 300,
        }
    }
}

impl GenerationConfig {
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// `[evaluator]` section
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluatorConfig {
    pub api_key_env: String,
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        Self {
            api_key_env: "OPENROUTER_API_KEY".to_string(),
            base_url: "https://openrouter.ai/api/v1/chat/completions".to_string(),
            model: "openai/gpt-4o".to_string(),
            temperature: 0.3,
        }
    }
}

/// `[pacing]` section. Fixed pauses between sequential remote calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PacingConfig {
    pub review_delay_ms: u64,
    pub author_delay_ms: u64,
    pub entry_delay_ms: u64,
    pub edition_delay_ms: u64,
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            review_delay_ms: 1000,
            author_delay_ms: 2000,
            entry_delay_ms: 2000,
            edition_delay_ms: 3000,
        }
    }
}

impl PacingConfig {
    /// All pauses disabled. Used by tests and dry runs.
    #[must_use]
    pub fn none() -> Self {
        Self {
            review_delay_ms: 0,
            author_delay_ms: 0,
            entry_delay_ms: 0,
            edition_delay_ms: 0,
        }
    }

    #[must_use]
    pub fn review_delay(&self) -> Duration {
        Duration::from_millis(self.review_delay_ms)
    }

    #[must_use]
    pub fn author_delay(&self) -> Duration {
        Duration::from_millis(self.author_delay_ms)
    }

    #[must_use]
    pub fn entry_delay(&self) -> Duration {
        Duration::from_millis(self.entry_delay_ms)
    }

    #[must_use]
    pub fn edition_delay(&self) -> Duration {
        Duration::from_millis(self.edition_delay_ms)
    }
}

/// `[publish]` section
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishConfig {
    pub enabled: bool,
    pub remote: String,
    pub branch: String,
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            remote: "origin".to_string(),
            branch: "main".to_string(),
        }
    }
}

/// Effective configuration for one invocation.
///
/// Built by [`Config::discover`] with precedence CLI > config file > defaults.
/// Each overridden key is recorded in `source_attribution`.
#[derive(Debug, Clone)]
pub struct Config {
    pub paths: PathsConfig,
    pub faculty: FacultyConfig,
    pub generation: GenerationConfig,
    pub evaluator: EvaluatorConfig,
    pub pacing: PacingConfig,
    pub publish: PublishConfig,
    pub config_path: Option<PathBuf>,
    pub source_attribution: HashMap<String, ConfigSource>,
}

impl Config {
    /// Built-in defaults rooted at `content_root`, no file involved.
    #[must_use]
    pub fn with_content_root(content_root: Utf8PathBuf) -> Self {
        Self {
            paths: PathsConfig {
                content_root,
                registry: None,
            },
            faculty: FacultyConfig::default(),
            generation: GenerationConfig::default(),
            evaluator: EvaluatorConfig::default(),
            pacing: PacingConfig::default(),
            publish: PublishConfig::default(),
            config_path: None,
            source_attribution: HashMap::new(),
        }
    }

    /// Source of a key, `Defaults` when never overridden.
    #[must_use]
    pub fn source_of(&self, key: &str) -> ConfigSource {
        self.source_attribution
            .get(key)
            .cloned()
            .unwrap_or(ConfigSource::Defaults)
    }
}

// Raw TOML shapes. Every field is optional so a file only overrides what it names.

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct TomlConfig {
    pub paths: Option<TomlPaths>,
    pub faculty: Option<TomlFaculty>,
    pub generation: Option<TomlGeneration>,
    pub evaluator: Option<TomlEvaluator>,
    pub pacing: Option<TomlPacing>,
    pub publish: Option<TomlPublish>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct TomlPaths {
    pub content_root: Option<PathBuf>,
    pub registry: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct TomlFaculty {
    pub url_env: Option<Vec<String>>,
    pub key_env: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct TomlGeneration {
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    pub use_rag: Option<bool>,
    pub use_commonplace: Option<bool>,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct TomlEvaluator {
    pub api_key_env: Option<String>,
    pub base_url: Option<String>,
    pub model: Option<String>,
    pub temperature: Option<f32>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct TomlPacing {
    pub review_delay_ms: Option<u64>,
    pub author_delay_ms: Option<u64>,
    pub entry_delay_ms: Option<u64>,
    pub edition_delay_ms: Option<u64>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct TomlPublish {
    pub enabled: Option<bool>,
    pub remote: Option<String>,
    pub branch: Option<String>,
}
