//! Repository publisher.
//!
//! `RepositoryPublisher` owns the shared working copy behind a mutex. The
//! only way to touch it is through the [`WorkingCopy`] guard returned by
//! [`RepositoryPublisher::lock`], so publishes from different users can never
//! interleave their checkout/stage/commit steps.

pub mod vcs;

use tokio::sync::{Mutex, MutexGuard};
use tracing::{debug, info};

use pagesmith_types::error::GitError;

pub use vcs::{CheckoutMode, VersionControl};

/// Generated page, at the working copy root.
pub const INDEX_FILE: &str = "index.html";

/// Uploaded logo, at the working copy root.
pub const LOGO_FILE: &str = "logo.png";

/// A file to commit, relative to the working copy root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactFile {
    pub path: String,
    pub contents: Vec<u8>,
}

impl ArtifactFile {
    pub fn new(path: impl Into<String>, contents: impl Into<Vec<u8>>) -> Self {
        Self {
            path: path.into(),
            contents: contents.into(),
        }
    }
}

/// Result of a successful publish.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishReceipt {
    pub branch: String,
    /// Whether the branch was new on the remote.
    pub created: bool,
}

/// Commit message for a publish to `branch`.
pub fn commit_message(branch: &str) -> String {
    format!("feat: add new landing page for {branch}")
}

/// Owner of the shared working copy.
pub struct RepositoryPublisher<V: VersionControl> {
    vcs: Mutex<V>,
    configured: bool,
}

impl<V: VersionControl> RepositoryPublisher<V> {
    pub fn new(vcs: V) -> Self {
        let configured = vcs.is_configured();
        Self {
            vcs: Mutex::new(vcs),
            configured,
        }
    }

    /// Whether the underlying backend has its remote URL and credential.
    pub fn is_configured(&self) -> bool {
        self.configured
    }

    /// Wait for exclusive access to the working copy.
    pub async fn lock(&self) -> WorkingCopy<'_, V> {
        WorkingCopy {
            vcs: self.vcs.lock().await,
        }
    }
}

/// Exclusive handle on the working copy. Dropping it releases the lock.
pub struct WorkingCopy<'a, V: VersionControl> {
    vcs: MutexGuard<'a, V>,
}

impl<V: VersionControl> WorkingCopy<'_, V> {
    /// Make sure the working copy exists and matches the remote default branch.
    ///
    /// Clones on first use. Afterwards discards whatever an earlier failed
    /// attempt left behind, checks out the default branch and pulls it.
    pub async fn ensure_ready(&mut self) -> Result<(), GitError> {
        if !self.vcs.exists().await {
            info!("cloning working copy");
            return self.vcs.clone_remote().await;
        }

        self.vcs.discard_local_changes().await?;
        let default_branch = self.vcs.default_branch().await?;
        debug!(branch = %default_branch, "refreshing default branch");
        self.vcs
            .checkout(&default_branch, CheckoutMode::TrackRemote)
            .await?;
        self.vcs.pull().await
    }

    /// Commit `files` to `branch` and push it.
    ///
    /// Reuses the branch if it already exists on the remote, otherwise
    /// creates it from the current HEAD. On error the working copy may be in
    /// any state; call [`WorkingCopy::ensure_ready`] before trying again.
    pub async fn publish(
        &mut self,
        branch: &str,
        files: &[ArtifactFile],
    ) -> Result<PublishReceipt, GitError> {
        let exists = self
            .vcs
            .remote_branches()
            .await?
            .iter()
            .any(|name| name == branch);

        let mode = if exists {
            CheckoutMode::TrackRemote
        } else {
            CheckoutMode::CreateFromHead
        };
        debug!(branch, ?mode, "checking out publish branch");
        self.vcs.checkout(branch, mode).await?;

        for file in files {
            self.vcs.write_file(&file.path, &file.contents).await?;
            self.vcs.stage(&file.path).await?;
        }

        self.vcs.commit(&commit_message(branch)).await?;
        self.vcs.push(branch, !exists).await?;

        info!(branch, created = !exists, files = files.len(), "branch pushed");
        Ok(PublishReceipt {
            branch: branch.to_string(),
            created: !exists,
        })
    }
}
