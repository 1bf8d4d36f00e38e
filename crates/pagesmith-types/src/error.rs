use thiserror::Error;

use std::fmt;

/// A single git step, carried by [`GitError`] for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GitStep {
    Clone,
    Pull,
    Reset,
    Checkout,
    ListBranches,
    WriteFile,
    Add,
    Commit,
    Push,
}

impl fmt::Display for GitStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GitStep::Clone => "clone",
            GitStep::Pull => "pull",
            GitStep::Reset => "reset",
            GitStep::Checkout => "checkout",
            GitStep::ListBranches => "list-branches",
            GitStep::WriteFile => "write-file",
            GitStep::Add => "add",
            GitStep::Commit => "commit",
            GitStep::Push => "push",
        };
        f.write_str(name)
    }
}

/// Errors from operations on the local working copy or the remote.
#[derive(Debug, Error)]
pub enum GitError {
    #[error("git {step} exited with status {status:?}: {stderr}")]
    CommandFailed {
        step: GitStep,
        status: Option<i32>,
        stderr: String,
    },

    #[error("git {step} could not be started: {message}")]
    Spawn { step: GitStep, message: String },

    #[error("git {step} timed out after {seconds}s")]
    TimedOut { step: GitStep, seconds: u64 },

    #[error("git {step} i/o error: {message}")]
    Io { step: GitStep, message: String },
}

impl GitError {
    /// The step that failed.
    pub fn step(&self) -> GitStep {
        match self {
            GitError::CommandFailed { step, .. }
            | GitError::Spawn { step, .. }
            | GitError::TimedOut { step, .. }
            | GitError::Io { step, .. } => *step,
        }
    }
}

/// Errors from the content generation service.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("generation request failed: {0}")]
    Request(String),

    #[error("generation service returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed generation response: {0}")]
    Malformed(String),

    #[error("generation service returned empty content")]
    Empty,

    #[error("generation timed out after {seconds}s")]
    TimedOut { seconds: u64 },
}

/// Errors from the deployment service. Never fatal to publishing.
#[derive(Debug, Error)]
pub enum DeployError {
    #[error("deployment credentials are not configured")]
    NotConfigured,

    #[error("deploy site unavailable (HTTP {status})")]
    SiteUnavailable { status: u16 },

    #[error("deploy rejected with HTTP {status}: {body}")]
    Rejected { status: u16, body: String },

    #[error("deploy request failed: {0}")]
    Request(String),

    #[error("deploy timed out after {seconds}s")]
    TimedOut { seconds: u64 },
}

/// Errors from the chat transport.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("chat request failed: {0}")]
    Request(String),

    #[error("chat API error: {0}")]
    Api(String),

    #[error("asset download failed: {0}")]
    Download(String),

    #[error("asset too large: {size} bytes (limit {limit})")]
    AssetTooLarge { size: u64, limit: u64 },
}

/// Errors from loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variables: {}", .0.join(", "))]
    MissingVariables(Vec<String>),

    #[error("invalid value for {name}: {reason}")]
    InvalidValue { name: String, reason: String },
}

/// The orchestrator stage a failure occurred in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Configuration,
    RepositoryReady,
    Generation,
    Publish,
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PipelineStage::Configuration => "configuration",
            PipelineStage::RepositoryReady => "repository",
            PipelineStage::Generation => "generation",
            PipelineStage::Publish => "publish",
        };
        f.write_str(name)
    }
}

/// Fatal errors that end a publish attempt.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("repository unavailable: {0}")]
    RepositoryUnavailable(GitError),

    #[error("generation failed: {0}")]
    Generation(GenerationError),

    #[error("git operation failed: {0}")]
    GitOperation(GitError),

    #[error("{stage} timed out after {seconds}s")]
    Timeout { stage: PipelineStage, seconds: u64 },
}

impl PipelineError {
    /// Classify a failure from `ensure_ready`.
    pub fn from_repository(err: GitError) -> Self {
        match err {
            GitError::TimedOut { seconds, .. } => PipelineError::Timeout {
                stage: PipelineStage::RepositoryReady,
                seconds,
            },
            other => PipelineError::RepositoryUnavailable(other),
        }
    }

    /// Classify a failure from `publish`.
    pub fn from_publish(err: GitError) -> Self {
        match err {
            GitError::TimedOut { seconds, .. } => PipelineError::Timeout {
                stage: PipelineStage::Publish,
                seconds,
            },
            other => PipelineError::GitOperation(other),
        }
    }

    /// Classify a failure from the generator.
    pub fn from_generation(err: GenerationError) -> Self {
        match err {
            GenerationError::TimedOut { seconds } => PipelineError::Timeout {
                stage: PipelineStage::Generation,
                seconds,
            },
            other => PipelineError::Generation(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_git_error_display_names_step() {
        let err = GitError::CommandFailed {
            step: GitStep::Push,
            status: Some(128),
            stderr: "remote rejected".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "git push exited with status Some(128): remote rejected"
        );
        assert_eq!(err.step(), GitStep::Push);
    }

    #[test]
    fn test_missing_variables_lists_all() {
        let err = ConfigError::MissingVariables(vec![
            "GEMINI_API_KEY".to_string(),
            "GITHUB_PAT".to_string(),
        ]);
        assert_eq!(
            err.to_string(),
            "missing required environment variables: GEMINI_API_KEY, GITHUB_PAT"
        );
    }

    #[test]
    fn test_timeouts_are_classified_separately() {
        let err = PipelineError::from_publish(GitError::TimedOut {
            step: GitStep::Push,
            seconds: 30,
        });
        assert!(matches!(
            err,
            PipelineError::Timeout {
                stage: PipelineStage::Publish,
                seconds: 30
            }
        ));

        let err = PipelineError::from_generation(GenerationError::Empty);
        assert!(matches!(err, PipelineError::Generation(GenerationError::Empty)));

        let err = PipelineError::from_repository(GitError::Spawn {
            step: GitStep::Clone,
            message: "no git".to_string(),
        });
        assert!(matches!(err, PipelineError::RepositoryUnavailable(_)));
    }
}
