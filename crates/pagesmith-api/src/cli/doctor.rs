//! Environment diagnostics.
//!
//! Reports every problem it finds instead of stopping at the first one, so a
//! fresh deployment can be fixed in a single pass.

use std::path::Path;

use anyhow::Result;
use console::style;
use secrecy::SecretString;
use serde::Serialize;

use pagesmith_infra::config::{
    missing_variables, NETLIFY_API_TOKEN, NETLIFY_SITE_ID, TELEGRAM_BOT_TOKEN,
};
use pagesmith_infra::git::GitCli;
use pagesmith_infra::telegram::TelegramClient;
use pagesmith_types::config::PipelineConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Ok,
    Warn,
    Fail,
}

#[derive(Debug, Serialize)]
pub struct Check {
    pub name: &'static str,
    pub status: Status,
    pub detail: String,
}

impl Check {
    fn new(name: &'static str, status: Status, detail: impl Into<String>) -> Self {
        Self {
            name,
            status,
            detail: detail.into(),
        }
    }
}

/// Run all checks and print them. Fails if any check failed.
pub async fn doctor(config_path: &Path, json: bool) -> Result<()> {
    let lookup = |name: &str| std::env::var(name).ok();

    let checks = vec![
        environment_check(lookup),
        deploy_check(lookup),
        config_check(config_path).await,
        git_check().await,
        telegram_check(lookup(TELEGRAM_BOT_TOKEN)).await,
    ];

    if json {
        println!("{}", serde_json::to_string_pretty(&checks)?);
    } else {
        println!();
        println!(
            "  {} Pagesmith v{}",
            style("⚡").bold(),
            env!("CARGO_PKG_VERSION")
        );
        println!();
        for check in &checks {
            let mark = match check.status {
                Status::Ok => style("✓").green(),
                Status::Warn => style("!").yellow(),
                Status::Fail => style("✗").red(),
            };
            println!("  {mark} {:<12} {}", check.name, style(&check.detail).dim());
        }
        println!();
    }

    let failed = checks.iter().filter(|c| c.status == Status::Fail).count();
    if failed > 0 {
        anyhow::bail!("{failed} check(s) failed");
    }
    Ok(())
}

pub fn environment_check(lookup: impl Fn(&str) -> Option<String>) -> Check {
    let missing = missing_variables(lookup);
    if missing.is_empty() {
        Check::new("environment", Status::Ok, "all required variables set")
    } else {
        Check::new(
            "environment",
            Status::Fail,
            format!("missing {}", missing.join(", ")),
        )
    }
}

pub fn deploy_check(lookup: impl Fn(&str) -> Option<String>) -> Check {
    let present = |name: &str| lookup(name).is_some_and(|v| !v.trim().is_empty());
    match (present(NETLIFY_API_TOKEN), present(NETLIFY_SITE_ID)) {
        (true, true) => Check::new("deploy", Status::Ok, "Netlify credentials set"),
        (false, false) => Check::new(
            "deploy",
            Status::Warn,
            "Netlify not configured, pages will be pushed but not deployed",
        ),
        (token, _) => {
            let missing = if token { NETLIFY_SITE_ID } else { NETLIFY_API_TOKEN };
            Check::new("deploy", Status::Warn, format!("{missing} is not set"))
        }
    }
}

pub async fn config_check(path: &Path) -> Check {
    match tokio::fs::read_to_string(path).await {
        Ok(content) => match toml::from_str::<PipelineConfig>(&content) {
            Ok(config) => Check::new(
                "config",
                Status::Ok,
                format!("{} (model {})", path.display(), config.generator.model),
            ),
            Err(err) => Check::new(
                "config",
                Status::Warn,
                format!("{} does not parse, defaults apply: {err}", path.display()),
            ),
        },
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Check::new(
            "config",
            Status::Ok,
            format!("{} not found, using defaults", path.display()),
        ),
        Err(err) => Check::new(
            "config",
            Status::Warn,
            format!("cannot read {}: {err}", path.display()),
        ),
    }
}

async fn git_check() -> Check {
    match GitCli::installed_version().await {
        Some(version) => Check::new("git", Status::Ok, version),
        None => Check::new("git", Status::Fail, "git is not installed or not on PATH"),
    }
}

async fn telegram_check(token: Option<String>) -> Check {
    let Some(token) = token.filter(|t| !t.trim().is_empty()) else {
        return Check::new("telegram", Status::Fail, "no bot token");
    };

    let config = PipelineConfig::default();
    let client = TelegramClient::new(
        SecretString::from(token),
        &config.telegram,
        config.timeouts.telegram(),
    );
    match client.get_me().await {
        Ok(me) => Check::new(
            "telegram",
            Status::Ok,
            format!("bot @{}", me.username.unwrap_or(me.first_name)),
        ),
        Err(err) => Check::new("telegram", Status::Fail, err.to_string()),
    }
}
