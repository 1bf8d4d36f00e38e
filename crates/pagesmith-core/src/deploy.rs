//! Deployment trigger port.

use std::future::Future;

use pagesmith_types::error::DeployError;

/// Trait for deployment backends.
///
/// Deployment is optional: an implementation without credentials returns
/// [`DeployError::NotConfigured`] straight away. Every error is non-fatal
/// to the publish pipeline.
pub trait Deployer: Send + Sync {
    /// Request a deploy of `branch` and return the public URL it will be served at.
    fn deploy(
        &self,
        branch: &str,
        channel_name: &str,
    ) -> impl Future<Output = Result<String, DeployError>> + Send;
}
