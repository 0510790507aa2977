use anyhow::{Context, Result};
use camino::Utf8PathBuf;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use encyc_utils::error::ConfigError;

use crate::model::{
    CliArgs, Config, ConfigSource, EvaluatorConfig, FacultyConfig, GenerationConfig,
    PacingConfig, PathsConfig, PublishConfig, TomlConfig,
};

/// Directory searched for upward from the working directory.
pub const CONFIG_DIR: &str = ".encyclopaedia";

/// File name inside [`CONFIG_DIR`].
pub const CONFIG_FILE: &str = "config.toml";

impl Config {
    /// Discover and load configuration with precedence: CLI > file > defaults
    pub fn discover(cli_args: &CliArgs) -> Result<Self> {
        let start_dir = std::env::current_dir().context("Failed to get current directory")?;
        Self::discover_from(&start_dir, cli_args)
    }

    /// Discover and load configuration starting from a specific directory.
    ///
    /// Path-driven variant used by tests to avoid process-global state.
    pub fn discover_from(start_dir: &Path, cli_args: &CliArgs) -> Result<Self> {
        let mut source_attribution = HashMap::new();

        let mut paths = PathsConfig {
            content_root: to_utf8(start_dir.to_path_buf(), "content_root")?,
            registry: None,
        };
        let mut faculty = FacultyConfig::default();
        let mut generation = GenerationConfig::default();
        let mut evaluator = EvaluatorConfig::default();
        let mut pacing = PacingConfig::default();
        let mut publish = PublishConfig::default();

        let config_path = match &cli_args.config_path {
            Some(explicit) => {
                if !explicit.exists() {
                    return Err(ConfigError::NotFound {
                        path: explicit.display().to_string(),
                    }
                    .into());
                }
                Some(explicit.clone())
            }
            None => Self::discover_config_file_from(start_dir)?,
        };

        if let Some(path) = &config_path {
            let file_config = Self::load_config_file(path)
                .with_context(|| format!("Failed to load config file: {}", path.display()))?;
            let source = ConfigSource::ConfigFile(path.clone());
            let project_root = project_root_of(path, start_dir);

            // A discovered config anchors the content root at its project directory.
            paths.content_root = to_utf8(project_root.clone(), "content_root")?;

            if let Some(file_paths) = file_config.paths {
                if let Some(root) = file_paths.content_root {
                    paths.content_root = to_utf8(project_root.join(root), "paths.content_root")?;
                    source_attribution.insert("content_root".to_string(), source.clone());
                }
                if let Some(registry) = file_paths.registry {
                    paths.registry = Some(to_utf8(project_root.join(registry), "paths.registry")?);
                    source_attribution.insert("registry".to_string(), source.clone());
                }
            }

            if let Some(file_faculty) = file_config.faculty {
                if let Some(url_env) = file_faculty.url_env {
                    faculty.url_env = url_env;
                    source_attribution.insert("faculty_url_env".to_string(), source.clone());
                }
                if let Some(key_env) = file_faculty.key_env {
                    faculty.key_env = key_env;
                    source_attribution.insert("faculty_key_env".to_string(), source.clone());
                }
            }

            if let Some(file_generation) = file_config.generation {
                if let Some(temperature) = file_generation.temperature {
                    generation.temperature = temperature;
                    source_attribution.insert("temperature".to_string(), source.clone());
                }
                if let Some(max_tokens) = file_generation.max_tokens {
                    generation.max_tokens = max_tokens;
                    source_attribution.insert("max_tokens".to_string(), source.clone());
                }
                if let Some(use_rag) = file_generation.use_rag {
                    generation.use_rag = use_rag;
                    source_attribution.insert("use_rag".to_string(), source.clone());
                }
                if let Some(use_commonplace) = file_generation.use_commonplace {
                    generation.use_commonplace = use_commonplace;
                    source_attribution.insert("use_commonplace".to_string(), source.clone());
                }
                if let Some(timeout_secs) = file_generation.timeout_secs {
                    generation.timeout_secs = timeout_secs;
                    source_attribution.insert("timeout_secs".to_string(), source.clone());
                }
            }

            if let Some(file_evaluator) = file_config.evaluator {
                if let Some(api_key_env) = file_evaluator.api_key_env {
                    evaluator.api_key_env = api_key_env;
                    source_attribution.insert("evaluator_api_key_env".to_string(), source.clone());
                }
                if let Some(base_url) = file_evaluator.base_url {
                    evaluator.base_url = base_url;
                    source_attribution.insert("evaluator_base_url".to_string(), source.clone());
                }
                if let Some(model) = file_evaluator.model {
                    evaluator.model = model;
                    source_attribution.insert("evaluator_model".to_string(), source.clone());
                }
                if let Some(temperature) = file_evaluator.temperature {
                    evaluator.temperature = temperature;
                    source_attribution
                        .insert("evaluator_temperature".to_string(), source.clone());
                }
            }

            if let Some(file_pacing) = file_config.pacing {
                if let Some(ms) = file_pacing.review_delay_ms {
                    pacing.review_delay_ms = ms;
                    source_attribution.insert("review_delay_ms".to_string(), source.clone());
                }
                if let Some(ms) = file_pacing.author_delay_ms {
                    pacing.author_delay_ms = ms;
                    source_attribution.insert("author_delay_ms".to_string(), source.clone());
                }
                if let Some(ms) = file_pacing.entry_delay_ms {
                    pacing.entry_delay_ms = ms;
                    source_attribution.insert("entry_delay_ms".to_string(), source.clone());
                }
                if let Some(ms) = file_pacing.edition_delay_ms {
                    pacing.edition_delay_ms = ms;
                    source_attribution.insert("edition_delay_ms".to_string(), source.clone());
                }
            }

            if let Some(file_publish) = file_config.publish {
                if let Some(enabled) = file_publish.enabled {
                    publish.enabled = enabled;
                    source_attribution.insert("publish_enabled".to_string(), source.clone());
                }
                if let Some(remote) = file_publish.remote {
                    publish.remote = remote;
                    source_attribution.insert("publish_remote".to_string(), source.clone());
                }
                if let Some(branch) = file_publish.branch {
                    publish.branch = branch;
                    source_attribution.insert("publish_branch".to_string(), source);
                }
            }
        }

        // CLI overrides
        if let Some(root) = &cli_args.content_root {
            paths.content_root = to_utf8(start_dir.join(root), "--content-root")?;
            source_attribution.insert("content_root".to_string(), ConfigSource::Cli);
        }
        if cli_args.no_push {
            publish.enabled = false;
            source_attribution.insert("publish_enabled".to_string(), ConfigSource::Cli);
        }

        let config = Config {
            paths,
            faculty,
            generation,
            evaluator,
            pacing,
            publish,
            config_path,
            source_attribution,
        };
        config.validate()?;
        Ok(config)
    }

    /// Search upward from `start_dir` for `.encyclopaedia/config.toml`.
    ///
    /// Stops at the first repository root (`.git`) so a parent project's
    /// configuration never leaks in.
    pub fn discover_config_file_from(start_dir: &Path) -> Result<Option<PathBuf>> {
        let mut current_dir = start_dir.to_path_buf();

        loop {
            let config_path = current_dir.join(CONFIG_DIR).join(CONFIG_FILE);
            if config_path.exists() {
                return Ok(Some(config_path));
            }

            if current_dir.join(".git").exists() {
                break;
            }

            match current_dir.parent() {
                Some(parent) => current_dir = parent.to_path_buf(),
                None => break,
            }
        }

        Ok(None)
    }

    fn load_config_file(path: &Path) -> Result<TomlConfig> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: TomlConfig = toml::from_str(&content)
            .map_err(|e| ConfigError::InvalidFile(e.to_string()))?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=2.0).contains(&self.generation.temperature) {
            return Err(ConfigError::InvalidValue {
                key: "generation.temperature".to_string(),
                value: self.generation.temperature.to_string(),
            });
        }
        if self.generation.max_tokens == 0 {
            return Err(ConfigError::InvalidValue {
                key: "generation.max_tokens".to_string(),
                value: "0".to_string(),
            });
        }
        if self.generation.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                key: "generation.timeout_secs".to_string(),
                value: "0".to_string(),
            });
        }
        if self.faculty.url_env.is_empty() || self.faculty.key_env.is_empty() {
            return Err(ConfigError::MissingRequired(
                "faculty.url_env and faculty.key_env".to_string(),
            ));
        }
        Ok(())
    }
}

/// `<root>/.encyclopaedia/config.toml` → `<root>`. Explicit paths elsewhere
/// anchor at the file's own directory.
fn project_root_of(config_path: &Path, start_dir: &Path) -> PathBuf {
    let parent = config_path.parent().unwrap_or(start_dir);
    let root = if parent.file_name().is_some_and(|n| n == CONFIG_DIR) {
        parent.parent().unwrap_or(parent)
    } else {
        parent
    };
    if root.as_os_str().is_empty() {
        start_dir.to_path_buf()
    } else if root.is_relative() {
        start_dir.join(root)
    } else {
        root.to_path_buf()
    }
}

fn to_utf8(path: PathBuf, key: &str) -> Result<Utf8PathBuf, ConfigError> {
    Utf8PathBuf::from_path_buf(path).map_err(|p| ConfigError::InvalidValue {
        key: key.to_string(),
        value: format!("non UTF-8 path {}", p.display()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_config(root: &Path, body: &str) -> PathBuf {
        let dir = root.join(CONFIG_DIR);
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join(CONFIG_FILE);
        fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn test_defaults_without_config_file() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join(".git")).unwrap();

        let config = Config::discover_from(temp.path(), &CliArgs::default()).unwrap();

        assert!(config.config_path.is_none());
        assert_eq!(config.paths.content_root.as_std_path(), temp.path());
        assert_eq!(config.generation.max_tokens, 4000);
        assert_eq!(config.evaluator.model, "openai/gpt-4o");
        assert_eq!(config.pacing.review_delay_ms, 1000);
        assert!(config.publish.enabled);
        assert_eq!(config.source_of("max_tokens"), ConfigSource::Defaults);
    }

    #[test]
    fn test_discovers_config_upward() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join(".git")).unwrap();
        let path = write_config(
            temp.path(),
            "[generation]\nmax_tokens = 2500\n\n[pacing]\nreview_delay_ms = 0\n",
        );
        let nested = temp.path().join("editions/adult");
        fs::create_dir_all(&nested).unwrap();

        let config = Config::discover_from(&nested, &CliArgs::default()).unwrap();

        assert_eq!(config.config_path.as_deref(), Some(path.as_path()));
        assert_eq!(config.paths.content_root.as_std_path(), temp.path());
        assert_eq!(config.generation.max_tokens, 2500);
        assert_eq!(config.pacing.review_delay_ms, 0);
        assert_eq!(config.pacing.entry_delay_ms, 2000);
        assert_eq!(
            config.source_of("max_tokens"),
            ConfigSource::ConfigFile(path.clone())
        );
    }

    #[test]
    fn test_cli_overrides_file() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join(".git")).unwrap();
        write_config(
            temp.path(),
            "[paths]\ncontent_root = \"site\"\n\n[publish]\nenabled = true\nbranch = \"drafts\"\n",
        );
        let cli = CliArgs {
            content_root: Some(PathBuf::from("elsewhere")),
            no_push: true,
            ..CliArgs::default()
        };

        let config = Config::discover_from(temp.path(), &cli).unwrap();

        assert_eq!(
            config.paths.content_root.as_std_path(),
            temp.path().join("elsewhere")
        );
        assert!(!config.publish.enabled);
        assert_eq!(config.publish.branch, "drafts");
        assert_eq!(config.source_of("publish_enabled"), ConfigSource::Cli);
    }

    #[test]
    fn test_file_content_root_is_relative_to_project() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join(".git")).unwrap();
        write_config(temp.path(), "[paths]\ncontent_root = \"site\"\n");

        let config = Config::discover_from(temp.path(), &CliArgs::default()).unwrap();

        assert_eq!(config.paths.content_root.as_std_path(), temp.path().join("site"));
    }

    #[test]
    fn test_unknown_key_is_invalid_file() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join(".git")).unwrap();
        write_config(temp.path(), "[generation]\nmodel = \"x\"\n");

        let err = Config::discover_from(temp.path(), &CliArgs::default()).unwrap_err();

        assert!(err.chain().any(|e| e.to_string().contains("Invalid configuration file")));
    }

    #[test]
    fn test_explicit_missing_config_is_not_found() {
        let temp = TempDir::new().unwrap();
        let cli = CliArgs {
            config_path: Some(temp.path().join("missing.toml")),
            ..CliArgs::default()
        };

        let err = Config::discover_from(temp.path(), &cli).unwrap_err();

        assert!(matches!(
            err.downcast_ref::<ConfigError>(),
            Some(ConfigError::NotFound { .. })
        ));
    }

    #[test]
    fn test_invalid_temperature_rejected() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join(".git")).unwrap();
        write_config(temp.path(), "[generation]\ntemperature = 3.5\n");

        let err = Config::discover_from(temp.path(), &CliArgs::default()).unwrap_err();

        assert!(matches!(
            err.downcast_ref::<ConfigError>(),
            Some(ConfigError::InvalidValue { .. })
        ));
    }
}
