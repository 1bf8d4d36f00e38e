//! Publish orchestrator.
//!
//! Runs one publish attempt for a completed wizard:
//!
//! ```text
//! configured? -> lock -> ensure_ready -> generate -> publish -> unlock -> deploy
//! ```
//!
//! Every fatal failure ends the attempt with `Outcome::Failed`; a deploy
//! failure only downgrades the result to `Outcome::PartialSuccess`. Nothing is
//! retried here.

use tracing::{error, info, info_span, warn, Instrument};
use uuid::Uuid;

use pagesmith_types::error::{PipelineError, PipelineStage};
use pagesmith_types::outcome::Outcome;
use pagesmith_types::sanitize::sanitize_branch_name;
use pagesmith_types::session::PublishRequest;

use crate::deploy::Deployer;
use crate::generator::{GenerationRequest, PageGenerator};
use crate::publish::{ArtifactFile, RepositoryPublisher, VersionControl, INDEX_FILE, LOGO_FILE};

/// Branch a channel's page is published to.
pub fn branch_for(channel_name: &str) -> String {
    sanitize_branch_name(&format!("page-{channel_name}"))
}

/// Files committed for one page.
pub fn artifacts(html: &str, request: &PublishRequest) -> Vec<ArtifactFile> {
    let mut files = vec![ArtifactFile::new(INDEX_FILE, html.as_bytes())];
    if let Some(logo) = &request.logo {
        files.push(ArtifactFile::new(LOGO_FILE, logo.bytes.clone()));
    }
    files
}

/// Drives generation, publishing and deployment.
pub struct Orchestrator<G, V, D>
where
    G: PageGenerator,
    V: VersionControl,
    D: Deployer,
{
    generator: G,
    publisher: RepositoryPublisher<V>,
    deployer: D,
}

impl<G, V, D> Orchestrator<G, V, D>
where
    G: PageGenerator,
    V: VersionControl,
    D: Deployer,
{
    pub fn new(generator: G, vcs: V, deployer: D) -> Self {
        Self {
            generator,
            publisher: RepositoryPublisher::new(vcs),
            deployer,
        }
    }

    /// Whether the generator and the repository have their credentials.
    pub fn is_configured(&self) -> bool {
        self.generator.is_configured() && self.publisher.is_configured()
    }

    /// Run one publish attempt.
    pub async fn run(&self, request: &PublishRequest) -> Outcome {
        let span = info_span!(
            "publish",
            run_id = %Uuid::now_v7(),
            channel = %request.channel_name,
            page_type = request.page_type.key(),
        );
        let outcome = self.run_inner(request).instrument(span).await;

        match &outcome {
            Outcome::FullSuccess { url, branch, .. } => {
                info!(%branch, %url, "page published and deployed");
            }
            Outcome::PartialSuccess {
                branch,
                deploy_error,
                ..
            } => {
                warn!(%branch, error = %deploy_error, "page published, deploy failed");
            }
            Outcome::Failed { stage, error } => {
                error!(%stage, %error, channel = %request.channel_name, "publish failed");
            }
        }
        outcome
    }

    async fn run_inner(&self, request: &PublishRequest) -> Outcome {
        if !self.generator.is_configured() {
            return failed(
                PipelineStage::Configuration,
                PipelineError::Configuration("content generator credentials are missing".into()),
            );
        }
        if !self.publisher.is_configured() {
            return failed(
                PipelineStage::Configuration,
                PipelineError::Configuration("repository URL or token is missing".into()),
            );
        }

        let branch = branch_for(&request.channel_name);

        // The working copy stays locked from ensure_ready through publish.
        {
            let mut copy = self.publisher.lock().await;

            info!("preparing working copy");
            if let Err(e) = copy.ensure_ready().await {
                return failed(
                    PipelineStage::RepositoryReady,
                    PipelineError::from_repository(e),
                );
            }

            info!("generating page");
            let generation = GenerationRequest::for_page(request);
            let html = match self.generator.generate(&generation).await {
                Ok(html) => html,
                Err(e) => {
                    return failed(PipelineStage::Generation, PipelineError::from_generation(e));
                }
            };
            info!(bytes = html.len(), "page generated");

            let files = artifacts(&html, request);
            if let Err(e) = copy.publish(&branch, &files).await {
                return failed(PipelineStage::Publish, PipelineError::from_publish(e));
            }
        }

        info!(%branch, "requesting deploy");
        match self.deployer.deploy(&branch, &request.channel_name).await {
            Ok(url) => Outcome::FullSuccess {
                url,
                branch,
                page_type: request.page_type,
            },
            Err(deploy_error) => Outcome::PartialSuccess {
                branch,
                page_type: request.page_type,
                deploy_error,
            },
        }
    }
}

fn failed(stage: PipelineStage, error: PipelineError) -> Outcome {
    // Timeouts carry their own stage; keep it in sync with the reported one.
    let stage = match &error {
        PipelineError::Timeout { stage, .. } => *stage,
        _ => stage,
    };
    Outcome::Failed { stage, error }
}
