//! Configuration loading.
//!
//! Credentials come from the environment and are wrapped in
//! [`SecretString`] as soon as they are read. Tunables come from an optional
//! TOML file and fall back to defaults when the file is missing or malformed.

use std::path::{Path, PathBuf};

use secrecy::SecretString;

use pagesmith_types::config::PipelineConfig;
use pagesmith_types::error::ConfigError;

pub const TELEGRAM_BOT_TOKEN: &str = "TELEGRAM_BOT_TOKEN";
pub const GEMINI_API_KEY: &str = "GEMINI_API_KEY";
pub const GITHUB_REPO_URL: &str = "GITHUB_REPO_URL";
pub const GITHUB_PAT: &str = "GITHUB_PAT";
pub const REPO_DIR: &str = "REPO_DIR";
pub const NETLIFY_API_TOKEN: &str = "NETLIFY_API_TOKEN";
pub const NETLIFY_SITE_ID: &str = "NETLIFY_SITE_ID";
pub const TELEGRAM_WEBHOOK_SECRET: &str = "TELEGRAM_WEBHOOK_SECRET";

/// Every variable without which the bot cannot publish.
pub const REQUIRED_VARIABLES: [&str; 4] =
    [TELEGRAM_BOT_TOKEN, GEMINI_API_KEY, GITHUB_REPO_URL, GITHUB_PAT];

const DEFAULT_REPO_DIR: &str = "landing_pages_repo";

/// Credentials and locations read from the environment.
///
/// Intentionally not `Debug`: every field but the paths is sensitive.
#[derive(Clone)]
pub struct Credentials {
    pub telegram_token: SecretString,
    pub gemini_api_key: SecretString,
    pub repo_url: String,
    pub github_token: SecretString,
    pub repo_dir: PathBuf,
    pub netlify_token: Option<SecretString>,
    pub netlify_site_id: Option<String>,
    pub webhook_secret: Option<SecretString>,
}

impl Credentials {
    /// Read credentials from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read credentials through `lookup`. Blank values count as missing.
    ///
    /// Every missing required variable is reported at once.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let missing = missing_variables(&get);
        if !missing.is_empty() {
            return Err(ConfigError::MissingVariables(missing));
        }

        let required = |name: &str| {
            get(name).ok_or_else(|| ConfigError::MissingVariables(vec![name.to_string()]))
        };

        let repo_url = required(GITHUB_REPO_URL)?;
        if !repo_url.starts_with("https://") {
            return Err(ConfigError::InvalidValue {
                name: GITHUB_REPO_URL.to_string(),
                reason: "must be an https:// URL".to_string(),
            });
        }

        Ok(Self {
            telegram_token: SecretString::from(required(TELEGRAM_BOT_TOKEN)?),
            gemini_api_key: SecretString::from(required(GEMINI_API_KEY)?),
            repo_url,
            github_token: SecretString::from(required(GITHUB_PAT)?),
            repo_dir: PathBuf::from(get(REPO_DIR).unwrap_or_else(|| DEFAULT_REPO_DIR.to_string())),
            netlify_token: get(NETLIFY_API_TOKEN).map(SecretString::from),
            netlify_site_id: get(NETLIFY_SITE_ID),
            webhook_secret: get(TELEGRAM_WEBHOOK_SECRET).map(SecretString::from),
        })
    }

    /// Whether both deploy credentials are present.
    pub fn deploy_configured(&self) -> bool {
        self.netlify_token.is_some() && self.netlify_site_id.is_some()
    }
}

/// Names of required variables that `lookup` does not provide.
pub fn missing_variables(lookup: impl Fn(&str) -> Option<String>) -> Vec<String> {
    REQUIRED_VARIABLES
        .iter()
        .filter(|name| lookup(name).is_none_or(|v| v.trim().is_empty()))
        .map(|name| name.to_string())
        .collect()
}

/// Load tunables from `path`.
///
/// - If the file does not exist, returns [`PipelineConfig::default()`].
/// - If the file exists but fails to parse, logs a warning and returns the default.
pub async fn load_pipeline_config(path: &Path) -> PipelineConfig {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config file at {}, using defaults", path.display());
            return PipelineConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", path.display());
            return PipelineConfig::default();
        }
    };

    match toml::from_str::<PipelineConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!("Failed to parse {}: {err}, using defaults", path.display());
            PipelineConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    fn full_env() -> Vec<(&'static str, &'static str)> {
        vec![
            (TELEGRAM_BOT_TOKEN, "123:abc"),
            (GEMINI_API_KEY, "gem-key"),
            (GITHUB_REPO_URL, "https://github.com/acme/pages.git"),
            (GITHUB_PAT, "ghp_x"),
        ]
    }

    #[test]
    fn credentials_from_complete_env() {
        let creds = Credentials::from_lookup(env(&full_env())).unwrap();
        assert_eq!(creds.telegram_token.expose_secret(), "123:abc");
        assert_eq!(creds.repo_url, "https://github.com/acme/pages.git");
        assert_eq!(creds.repo_dir, PathBuf::from("landing_pages_repo"));
        assert!(creds.netlify_token.is_none());
        assert!(!creds.deploy_configured());
        assert!(creds.webhook_secret.is_none());
    }

    #[test]
    fn credentials_list_every_missing_variable() {
        let err = Credentials::from_lookup(env(&[(TELEGRAM_BOT_TOKEN, "t"), (GITHUB_PAT, "  ")]))
            .err()
            .unwrap();
        match err {
            ConfigError::MissingVariables(names) => {
                assert_eq!(names, vec![GEMINI_API_KEY, GITHUB_REPO_URL, GITHUB_PAT]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn credentials_optional_values() {
        let mut pairs = full_env();
        pairs.push((REPO_DIR, "/srv/pages"));
        pairs.push((NETLIFY_API_TOKEN, "nf"));
        pairs.push((NETLIFY_SITE_ID, "site-1"));
        pairs.push((TELEGRAM_WEBHOOK_SECRET, "hook"));

        let creds = Credentials::from_lookup(env(&pairs)).unwrap();
        assert_eq!(creds.repo_dir, PathBuf::from("/srv/pages"));
        assert!(creds.deploy_configured());
        assert_eq!(creds.webhook_secret.unwrap().expose_secret(), "hook");
    }

    #[test]
    fn credentials_reject_non_https_repo() {
        let mut pairs = full_env();
        pairs[2] = (GITHUB_REPO_URL, "git@github.com:acme/pages.git");
        let err = Credentials::from_lookup(env(&pairs)).err().unwrap();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[tokio::test]
    async fn load_pipeline_config_missing_file_returns_default() {
        let tmp = TempDir::new().unwrap();
        let config = load_pipeline_config(&tmp.path().join("pagesmith.toml")).await;
        assert_eq!(config.git.default_branch, "main");
        assert_eq!(config.timeouts.generation_secs, 180);
    }

    #[tokio::test]
    async fn load_pipeline_config_valid_toml_returns_parsed() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("pagesmith.toml");
        tokio::fs::write(
            &path,
            r#"
[generator]
model = "gemini-2.5-pro"

[deploy]
platform_domain = "pages.example.org"

[timeouts]
git_secs = 15
"#,
        )
        .await
        .unwrap();

        let config = load_pipeline_config(&path).await;
        assert_eq!(config.generator.model, "gemini-2.5-pro");
        assert_eq!(config.deploy.platform_domain, "pages.example.org");
        assert_eq!(config.timeouts.git_secs, 15);
        assert_eq!(config.timeouts.deploy_secs, 30);
    }

    #[tokio::test]
    async fn load_pipeline_config_invalid_toml_returns_default() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("pagesmith.toml");
        tokio::fs::write(&path, "this is not { valid toml !!!")
            .await
            .unwrap();

        let config = load_pipeline_config(&path).await;
        assert_eq!(config.generator.model, "gemini-2.5-flash");
    }
}
