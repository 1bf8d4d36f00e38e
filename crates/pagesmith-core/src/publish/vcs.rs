//! VersionControl trait definition.
//!
//! Low-level operations on the single local working copy. Implementations
//! are not expected to be safe under concurrent use; `RepositoryPublisher`
//! serializes every call.

use std::future::Future;

use pagesmith_types::error::GitError;

/// How to check out a branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutMode {
    /// The branch exists on the remote: check it out reset to the remote tip.
    TrackRemote,
    /// Create (or reset) the branch at the current HEAD.
    CreateFromHead,
}

/// Trait for version control backends.
///
/// Implementations live in pagesmith-infra (e.g., `GitCli`).
pub trait VersionControl: Send + Sync {
    /// Whether the remote URL and credential are present.
    fn is_configured(&self) -> bool;

    /// Whether the local working copy has been cloned.
    fn exists(&self) -> impl Future<Output = bool> + Send;

    /// Clone the remote into the working copy location.
    fn clone_remote(&self) -> impl Future<Output = Result<(), GitError>> + Send;

    /// Name of the remote's default branch.
    fn default_branch(&self) -> impl Future<Output = Result<String, GitError>> + Send;

    /// Throw away uncommitted and untracked changes left by an earlier attempt.
    fn discard_local_changes(&self) -> impl Future<Output = Result<(), GitError>> + Send;

    fn checkout(
        &self,
        branch: &str,
        mode: CheckoutMode,
    ) -> impl Future<Output = Result<(), GitError>> + Send;

    /// Pull the currently checked out branch.
    fn pull(&self) -> impl Future<Output = Result<(), GitError>> + Send;

    /// Branch names (without `refs/heads/`) that exist on the remote.
    fn remote_branches(&self) -> impl Future<Output = Result<Vec<String>, GitError>> + Send;

    /// Write a file relative to the working copy root.
    fn write_file(
        &self,
        path: &str,
        contents: &[u8],
    ) -> impl Future<Output = Result<(), GitError>> + Send;

    /// Stage a path relative to the working copy root.
    fn stage(&self, path: &str) -> impl Future<Output = Result<(), GitError>> + Send;

    fn commit(&self, message: &str) -> impl Future<Output = Result<(), GitError>> + Send;

    fn push(
        &self,
        branch: &str,
        set_upstream: bool,
    ) -> impl Future<Output = Result<(), GitError>> + Send;
}
