//! Application state wiring the adapters into the conversation service.
//!
//! The core service is generic over its ports; AppState pins it to the
//! Telegram, Gemini, git and Netlify implementations.

use std::path::Path;
use std::sync::Arc;

use pagesmith_core::orchestrator::Orchestrator;
use pagesmith_core::wizard::ConversationService;
use pagesmith_infra::config::{load_pipeline_config, Credentials};
use pagesmith_infra::gemini::GeminiGenerator;
use pagesmith_infra::git::GitCli;
use pagesmith_infra::netlify::NetlifyDeployer;
use pagesmith_infra::telegram::types::Update;
use pagesmith_infra::telegram::{to_incoming, TelegramClient, TelegramTransport};
use pagesmith_types::config::PipelineConfig;
use secrecy::SecretString;
use tracing::{debug, warn};

pub type ConcreteOrchestrator = Orchestrator<GeminiGenerator, GitCli, NetlifyDeployer>;

pub type ConcreteConversationService =
    ConversationService<TelegramTransport, GeminiGenerator, GitCli, NetlifyDeployer>;

/// Shared state for the poller and the webhook handlers.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<ConcreteConversationService>,
    pub telegram: TelegramClient,
    pub config: Arc<PipelineConfig>,
    pub webhook_secret: Option<Arc<SecretString>>,
}

impl AppState {
    /// Read credentials from the environment and tunables from `config_path`.
    pub async fn init(config_path: &Path) -> anyhow::Result<Self> {
        let credentials = Credentials::from_env()?;
        let config = load_pipeline_config(config_path).await;
        Ok(Self::build(credentials, config))
    }

    pub fn build(credentials: Credentials, config: PipelineConfig) -> Self {
        let Credentials {
            telegram_token,
            gemini_api_key,
            repo_url,
            github_token,
            repo_dir,
            netlify_token,
            netlify_site_id,
            webhook_secret,
        } = credentials;
        let timeouts = &config.timeouts;

        let generator =
            GeminiGenerator::new(gemini_api_key, &config.generator, timeouts.generation());
        let vcs = GitCli::new(
            repo_url,
            github_token,
            repo_dir,
            config.git.clone(),
            timeouts.git(),
        );
        let deployer = NetlifyDeployer::new(
            netlify_token,
            netlify_site_id,
            &config.deploy,
            timeouts.deploy(),
        );
        let orchestrator: Arc<ConcreteOrchestrator> =
            Arc::new(Orchestrator::new(generator, vcs, deployer));

        let telegram = TelegramClient::new(telegram_token, &config.telegram, timeouts.telegram());
        let transport = TelegramTransport::new(telegram.clone(), config.telegram.max_logo_bytes);

        Self {
            service: Arc::new(ConversationService::new(transport, orchestrator)),
            telegram,
            config: Arc::new(config),
            webhook_secret: webhook_secret.map(Arc::new),
        }
    }

    /// Handle one update end to end. Failures are logged, never returned:
    /// a bad update must not stop the poller or fail the webhook.
    pub async fn dispatch(&self, update: Update) {
        let Some(incoming) = to_incoming(&update) else {
            debug!(update_id = update.update_id, "skipping update");
            return;
        };

        if let Some(callback_id) = &incoming.callback_id {
            if let Err(err) = self.telegram.answer_callback_query(callback_id).await {
                warn!(update_id = update.update_id, error = %err, "failed to acknowledge button");
            }
        }

        if let Some(event) = incoming.event {
            let user = event.user;
            if let Err(err) = self.service.handle(event).await {
                warn!(update_id = update.update_id, %user, error = %err, "failed to handle update");
            }
        }
    }
}
