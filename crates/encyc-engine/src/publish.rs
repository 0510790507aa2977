//! Commit and push generated content with git.
//!
//! Publishing is best effort: a failure at any step is logged and the run
//! carries on. Commands are spawned argv-style in the content root.

use camino::{Utf8Path, Utf8PathBuf};
use serde::Serialize;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;
use thiserror::Error;
use tokio::process::Command;
use tracing::{debug, info, warn};

use encyc_config::PublishConfig;
use encyc_utils::types::Edition;

/// Upper bound for a single git invocation.
pub const GIT_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Debug, Error)]
pub enum PublishError {
    #[error("git executable not found on PATH")]
    GitNotFound,

    #[error("git {step} could not be started: {reason}")]
    Spawn { step: String, reason: String },

    #[error("git {step} exited with {code}: {stderr}")]
    Failed {
        step: String,
        code: i32,
        stderr: String,
    },

    #[error("git {step} timed out after {}s", .timeout.as_secs())]
    Timeout { step: String, timeout: Duration },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PublishOutcome {
    Published,
    Disabled,
    Failed,
}

#[derive(Debug, Clone)]
pub struct Publisher {
    git: Option<PathBuf>,
    cwd: Utf8PathBuf,
    remote: String,
    branch: String,
    enabled: bool,
}

impl Publisher {
    /// Publisher for `content_root`, locating git on `PATH`.
    #[must_use]
    pub fn new(content_root: &Utf8Path, config: &PublishConfig) -> Self {
        let git = which::which("git").ok();
        if git.is_none() && config.enabled {
            warn!("git not found on PATH, publishing will be skipped");
        }
        Self {
            git,
            cwd: content_root.to_path_buf(),
            remote: config.remote.clone(),
            branch: config.branch.clone(),
            enabled: config.enabled,
        }
    }

    /// Use a specific git executable.
    #[must_use]
    pub fn with_git(mut self, git: impl Into<PathBuf>) -> Self {
        self.git = Some(git.into());
        self
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Commit message for one volume edition.
    #[must_use]
    pub fn commit_message(volume: u32, edition: Edition) -> String {
        format!("Generate Volume {volume} articles ({edition})")
    }

    /// Stage everything, commit and push. Never fails the caller.
    pub async fn publish(&self, volume: u32, edition: Edition) -> PublishOutcome {
        if !self.enabled {
            debug!(volume, edition = %edition, "Publishing disabled");
            return PublishOutcome::Disabled;
        }
        match self.try_publish(volume, edition).await {
            Ok(()) => {
                info!(
                    volume,
                    edition = %edition,
                    remote = %self.remote,
                    branch = %self.branch,
                    "Published"
                );
                PublishOutcome::Published
            }
            Err(e) => {
                warn!(volume, edition = %edition, error = %e, "Publishing failed, continuing");
                PublishOutcome::Failed
            }
        }
    }

    async fn try_publish(&self, volume: u32, edition: Edition) -> Result<(), PublishError> {
        let message = Self::commit_message(volume, edition);
        self.git(&["add", "-A"]).await?;
        self.git(&["commit", "-m", &message]).await?;
        self.git(&["push", &self.remote, &self.branch]).await
    }

    async fn git(&self, args: &[&str]) -> Result<(), PublishError> {
        let git = self.git.as_ref().ok_or(PublishError::GitNotFound)?;
        let step = args.first().copied().unwrap_or_default().to_string();
        debug!(step = %step, cwd = %self.cwd, "Running git");

        let child = Command::new(git)
            .args(args)
            .current_dir(&self.cwd)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| PublishError::Spawn {
                step: step.clone(),
                reason: e.to_string(),
            })?;

        let output = match tokio::time::timeout(GIT_TIMEOUT, child.wait_with_output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => {
                return Err(PublishError::Spawn {
                    step,
                    reason: e.to_string(),
                });
            }
            Err(_) => {
                return Err(PublishError::Timeout {
                    step,
                    timeout: GIT_TIMEOUT,
                });
            }
        };

        if output.status.success() {
            Ok(())
        } else {
            Err(PublishError::Failed {
                step,
                code: output.status.code().unwrap_or(-1),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            })
        }
    }
}
