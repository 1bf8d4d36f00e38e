//! Final classification of a publish attempt.

use crate::error::{DeployError, PipelineError, PipelineStage};
use crate::page_type::PageType;

/// What the orchestrator reports back for one publish attempt.
#[derive(Debug)]
pub enum Outcome {
    /// Published and deployed.
    FullSuccess {
        url: String,
        branch: String,
        page_type: PageType,
    },
    /// Published, but the deploy did not happen.
    PartialSuccess {
        branch: String,
        page_type: PageType,
        deploy_error: DeployError,
    },
    /// A fatal error ended the attempt at `stage`.
    Failed {
        stage: PipelineStage,
        error: PipelineError,
    },
}

impl Outcome {
    /// Whether the branch was pushed.
    pub fn is_published(&self) -> bool {
        matches!(
            self,
            Outcome::FullSuccess { .. } | Outcome::PartialSuccess { .. }
        )
    }
}

