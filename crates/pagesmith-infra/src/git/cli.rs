//! GitCli -- concrete [`VersionControl`] implementation that shells out to `git`.
//!
//! Every command runs with a timeout and `kill_on_drop`, so a hung network
//! operation is terminated rather than left behind. Network commands carry
//! the credential header (see [`super::credential`]); local commands do not.

use std::path::{Component, Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use tokio::process::Command;
use tracing::debug;

use pagesmith_core::publish::{CheckoutMode, VersionControl};
use pagesmith_types::config::GitSettings;
use pagesmith_types::error::{GitError, GitStep};

use super::credential::{auth_env, redact};

const REMOTE: &str = "origin";

/// Git backend driving one local working copy. Not `Debug`: holds the token.
pub struct GitCli {
    repo_url: String,
    token: SecretString,
    work_dir: PathBuf,
    settings: GitSettings,
    timeout: Duration,
}

impl GitCli {
    pub fn new(
        repo_url: impl Into<String>,
        token: SecretString,
        work_dir: impl Into<PathBuf>,
        settings: GitSettings,
        timeout: Duration,
    ) -> Self {
        Self {
            repo_url: repo_url.into(),
            token,
            work_dir: work_dir.into(),
            settings,
            timeout,
        }
    }

    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    /// `git --version`, or `None` if git cannot be run.
    pub async fn installed_version() -> Option<String> {
        let output = Command::new("git")
            .arg("--version")
            .kill_on_drop(true)
            .output()
            .await
            .ok()?;
        output
            .status
            .success()
            .then(|| String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    /// Run one git command and return its stdout.
    async fn run(
        &self,
        step: GitStep,
        args: &[&str],
        in_work_dir: bool,
        network: bool,
    ) -> Result<String, GitError> {
        let mut cmd = Command::new("git");
        cmd.args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .env("GIT_TERMINAL_PROMPT", "0")
            .kill_on_drop(true);
        if in_work_dir {
            cmd.current_dir(&self.work_dir);
        }
        if network {
            for (key, value) in auth_env(&self.token) {
                cmd.env(key, value);
            }
        }

        debug!(%step, ?args, "running git");
        let output = tokio::time::timeout(self.timeout, cmd.output())
            .await
            .map_err(|_| GitError::TimedOut {
                step,
                seconds: self.timeout.as_secs(),
            })?
            .map_err(|e| GitError::Spawn {
                step,
                message: e.to_string(),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(GitError::CommandFailed {
                step,
                status: output.status.code(),
                stderr: redact(stderr.trim(), &self.token),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    /// Resolve `path` inside the working copy, refusing anything that escapes it.
    fn artifact_path(&self, path: &str) -> Result<PathBuf, GitError> {
        let relative = Path::new(path);
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_)));
        if path.is_empty() || escapes {
            return Err(GitError::Io {
                step: GitStep::WriteFile,
                message: format!("refusing to write outside the working copy: {path:?}"),
            });
        }
        Ok(self.work_dir.join(relative))
    }
}

impl VersionControl for GitCli {
    fn is_configured(&self) -> bool {
        !self.repo_url.trim().is_empty() && !self.token.expose_secret().trim().is_empty()
    }

    async fn exists(&self) -> bool {
        tokio::fs::try_exists(self.work_dir.join(".git"))
            .await
            .unwrap_or(false)
    }

    async fn clone_remote(&self) -> Result<(), GitError> {
        if let Some(parent) = self.work_dir.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| GitError::Io {
                    step: GitStep::Clone,
                    message: e.to_string(),
                })?;
        }
        let target = self.work_dir.to_string_lossy().into_owned();
        self.run(
            GitStep::Clone,
            &["clone", "--origin", REMOTE, self.repo_url.as_str(), target.as_str()],
            false,
            true,
        )
        .await?;
        Ok(())
    }

    async fn default_branch(&self) -> Result<String, GitError> {
        let resolved = self
            .run(
                GitStep::Checkout,
                &["symbolic-ref", "--short", "refs/remotes/origin/HEAD"],
                true,
                false,
            )
            .await;

        match resolved {
            Ok(out) => {
                let name = out.trim();
                let name = name.strip_prefix("origin/").unwrap_or(name);
                if name.is_empty() {
                    Ok(self.settings.default_branch.clone())
                } else {
                    Ok(name.to_string())
                }
            }
            Err(e) => {
                debug!(error = %e, fallback = %self.settings.default_branch, "origin/HEAD not set");
                Ok(self.settings.default_branch.clone())
            }
        }
    }

    async fn discard_local_changes(&self) -> Result<(), GitError> {
        self.run(GitStep::Reset, &["reset", "--hard"], true, false)
            .await?;
        self.run(GitStep::Reset, &["clean", "-fd"], true, false)
            .await?;
        Ok(())
    }

    async fn checkout(&self, branch: &str, mode: CheckoutMode) -> Result<(), GitError> {
        match mode {
            CheckoutMode::TrackRemote => {
                let refspec = format!("+refs/heads/{branch}:refs/remotes/{REMOTE}/{branch}");
                self.run(GitStep::Checkout, &["fetch", REMOTE, refspec.as_str()], true, true)
                    .await?;
                let start = format!("{REMOTE}/{branch}");
                self.run(
                    GitStep::Checkout,
                    &["checkout", "-B", branch, start.as_str()],
                    true,
                    false,
                )
                .await?;
            }
            CheckoutMode::CreateFromHead => {
                self.run(GitStep::Checkout, &["checkout", "-B", branch], true, false)
                    .await?;
            }
        }
        Ok(())
    }

    async fn pull(&self) -> Result<(), GitError> {
        self.run(GitStep::Pull, &["pull", "--ff-only"], true, true)
            .await?;
        Ok(())
    }

    async fn remote_branches(&self) -> Result<Vec<String>, GitError> {
        let out = self
            .run(
                GitStep::ListBranches,
                &["ls-remote", "--heads", REMOTE],
                true,
                true,
            )
            .await?;
        Ok(parse_ls_remote_heads(&out))
    }

    async fn write_file(&self, path: &str, contents: &[u8]) -> Result<(), GitError> {
        let target = self.artifact_path(path)?;
        let io_error = |e: std::io::Error| GitError::Io {
            step: GitStep::WriteFile,
            message: format!("{path}: {e}"),
        };
        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(io_error)?;
        }
        tokio::fs::write(&target, contents).await.map_err(io_error)
    }

    async fn stage(&self, path: &str) -> Result<(), GitError> {
        self.run(GitStep::Add, &["add", "--", path], true, false)
            .await?;
        Ok(())
    }

    async fn commit(&self, message: &str) -> Result<(), GitError> {
        let name = format!("user.name={}", self.settings.committer_name);
        let email = format!("user.email={}", self.settings.committer_email);
        self.run(
            GitStep::Commit,
            &[
                "-c",
                name.as_str(),
                "-c",
                email.as_str(),
                "commit",
                "--allow-empty",
                "-m",
                message,
            ],
            true,
            false,
        )
        .await?;
        Ok(())
    }

    async fn push(&self, branch: &str, set_upstream: bool) -> Result<(), GitError> {
        let mut args = vec!["push"];
        if set_upstream {
            args.push("-u");
        }
        args.extend([REMOTE, branch]);
        self.run(GitStep::Push, &args, true, true).await?;
        Ok(())
    }
}

/// Branch names from `git ls-remote --heads` output.
fn parse_ls_remote_heads(output: &str) -> Vec<String> {
    output
        .lines()
        .filter_map(|line| line.split_once('\t'))
        .filter_map(|(_, reference)| reference.trim().strip_prefix("refs/heads/"))
        .map(str::to_string)
        .collect()
}
