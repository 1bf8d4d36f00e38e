//! Tunable settings for Pagesmith.
//!
//! `PipelineConfig` represents the optional `pagesmith.toml` file. Credentials
//! never live here; they come from the environment (see
//! `pagesmith_infra::config`). All fields have sensible defaults.

use serde::{Deserialize, Serialize};

use std::time::Duration;

/// Top-level tunables.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PipelineConfig {
    #[serde(default)]
    pub generator: GeneratorSettings,
    #[serde(default)]
    pub git: GitSettings,
    #[serde(default)]
    pub deploy: DeploySettings,
    #[serde(default)]
    pub telegram: TelegramSettings,
    #[serde(default)]
    pub timeouts: TimeoutSettings,
}

/// Content generation service settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorSettings {
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_generator_base_url")]
    pub base_url: String,
}

fn default_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_generator_base_url() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self {
            model: default_model(),
            base_url: default_generator_base_url(),
        }
    }
}

/// Working copy and commit settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitSettings {
    /// Branch pulled before every publish. Used when `origin/HEAD` cannot be resolved.
    #[serde(default = "default_branch")]
    pub default_branch: String,
    #[serde(default = "default_committer_name")]
    pub committer_name: String,
    #[serde(default = "default_committer_email")]
    pub committer_email: String,
}

fn default_branch() -> String {
    "main".to_string()
}

fn default_committer_name() -> String {
    "Pagesmith".to_string()
}

fn default_committer_email() -> String {
    "pagesmith@users.noreply.github.com".to_string()
}

impl Default for GitSettings {
    fn default() -> Self {
        Self {
            default_branch: default_branch(),
            committer_name: default_committer_name(),
            committer_email: default_committer_email(),
        }
    }
}

/// Deployment service settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeploySettings {
    #[serde(default = "default_deploy_api")]
    pub api_base_url: String,
    /// Domain deployed pages are served under (`<subdomain>.<platform_domain>`).
    #[serde(default = "default_platform_domain")]
    pub platform_domain: String,
}

fn default_deploy_api() -> String {
    "https://api.netlify.com".to_string()
}

fn default_platform_domain() -> String {
    "netlify.app".to_string()
}

impl Default for DeploySettings {
    fn default() -> Self {
        Self {
            api_base_url: default_deploy_api(),
            platform_domain: default_platform_domain(),
        }
    }
}

/// Chat transport settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelegramSettings {
    #[serde(default = "default_telegram_api")]
    pub api_base_url: String,
    /// Long-poll wait passed to `getUpdates`.
    #[serde(default = "default_poll_timeout")]
    pub poll_timeout_secs: u64,
    /// Largest logo accepted for download.
    #[serde(default = "default_max_logo_bytes")]
    pub max_logo_bytes: u64,
}

fn default_telegram_api() -> String {
    "https://api.telegram.org".to_string()
}

fn default_poll_timeout() -> u64 {
    30
}

fn default_max_logo_bytes() -> u64 {
    10 * 1024 * 1024
}

impl Default for TelegramSettings {
    fn default() -> Self {
        Self {
            api_base_url: default_telegram_api(),
            poll_timeout_secs: default_poll_timeout(),
            max_logo_bytes: default_max_logo_bytes(),
        }
    }
}

/// Upper bounds for every outbound call, in seconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeoutSettings {
    #[serde(default = "default_generation_secs")]
    pub generation_secs: u64,
    /// Applied to each git command separately.
    #[serde(default = "default_git_secs")]
    pub git_secs: u64,
    #[serde(default = "default_deploy_secs")]
    pub deploy_secs: u64,
    /// Applied to each chat API call, on top of the long-poll wait.
    #[serde(default = "default_telegram_secs")]
    pub telegram_secs: u64,
}

fn default_generation_secs() -> u64 {
    180
}

fn default_git_secs() -> u64 {
    120
}

fn default_deploy_secs() -> u64 {
    30
}

fn default_telegram_secs() -> u64 {
    30
}

impl TimeoutSettings {
    pub fn generation(&self) -> Duration {
        Duration::from_secs(self.generation_secs)
    }

    pub fn git(&self) -> Duration {
        Duration::from_secs(self.git_secs)
    }

    pub fn deploy(&self) -> Duration {
        Duration::from_secs(self.deploy_secs)
    }

    pub fn telegram(&self) -> Duration {
        Duration::from_secs(self.telegram_secs)
    }
}

impl Default for TimeoutSettings {
    fn default() -> Self {
        Self {
            generation_secs: default_generation_secs(),
            git_secs: default_git_secs(),
            deploy_secs: default_deploy_secs(),
            telegram_secs: default_telegram_secs(),
        }
    }
}
