//! NetlifyDeployer -- concrete [`Deployer`] implementation for Netlify.
//!
//! Checks that the configured site exists, then asks Netlify to deploy the
//! published branch. Deployment is optional: without a token and a site id
//! every call returns [`DeployError::NotConfigured`] without touching the
//! network.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use tracing::{debug, info_span, Instrument};

use pagesmith_core::deploy::Deployer;
use pagesmith_types::config::DeploySettings;
use pagesmith_types::error::DeployError;
use pagesmith_types::sanitize::sanitize_subdomain;

use crate::error_body::truncate_error_body;

#[derive(Debug, Serialize)]
struct DeployRequest<'a> {
    branch: &'a str,
    title: String,
}

/// Public URL a channel's page is served at.
pub fn page_url(channel_name: &str, platform_domain: &str) -> String {
    format!("https://{}.{platform_domain}", sanitize_subdomain(channel_name))
}

/// Netlify deploy trigger.
pub struct NetlifyDeployer {
    client: reqwest::Client,
    token: Option<SecretString>,
    site_id: Option<String>,
    api_base_url: String,
    platform_domain: String,
    timeout: Duration,
}

impl NetlifyDeployer {
    pub fn new(
        token: Option<SecretString>,
        site_id: Option<String>,
        settings: &DeploySettings,
        timeout: Duration,
    ) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("failed to create reqwest client");

        Self {
            client,
            token,
            site_id,
            api_base_url: settings.api_base_url.trim_end_matches('/').to_string(),
            platform_domain: settings.platform_domain.clone(),
            timeout,
        }
    }

    /// Whether both the token and the site id are present.
    pub fn is_configured(&self) -> bool {
        self.credentials().is_some()
    }

    fn credentials(&self) -> Option<(&SecretString, &str)> {
        let token = self.token.as_ref()?;
        let site_id = self.site_id.as_deref()?;
        Some((token, site_id))
    }

    fn map_transport_error(&self, err: reqwest::Error) -> DeployError {
        if err.is_timeout() {
            DeployError::TimedOut {
                seconds: self.timeout.as_secs(),
            }
        } else {
            DeployError::Request(err.without_url().to_string())
        }
    }

    async fn trigger(
        &self,
        token: &SecretString,
        site_id: &str,
        branch: &str,
        channel_name: &str,
    ) -> Result<String, DeployError> {
        let site_url = format!("{}/api/v1/sites/{site_id}", self.api_base_url);

        let site = self
            .client
            .get(&site_url)
            .bearer_auth(token.expose_secret())
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;
        if site.status() != reqwest::StatusCode::OK {
            return Err(DeployError::SiteUnavailable {
                status: site.status().as_u16(),
            });
        }
        debug!(site_id, "deploy site found");

        let body = DeployRequest {
            branch,
            title: format!("Deploy {channel_name} landing page"),
        };
        let response = self
            .client
            .post(format!("{site_url}/deploys"))
            .bearer_auth(token.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        let status = response.status();
        if status != reqwest::StatusCode::CREATED {
            let body = truncate_error_body(response.text().await.unwrap_or_default());
            return Err(DeployError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        Ok(page_url(channel_name, &self.platform_domain))
    }
}

impl Deployer for NetlifyDeployer {
    async fn deploy(&self, branch: &str, channel_name: &str) -> Result<String, DeployError> {
        let Some((token, site_id)) = self.credentials() else {
            return Err(DeployError::NotConfigured);
        };
        let span = info_span!("netlify.deploy", branch, site_id);
        self.trigger(token, site_id, branch, channel_name)
            .instrument(span)
            .await
    }
}
