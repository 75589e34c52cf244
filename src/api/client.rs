use super::Gateway;
use crate::error::{CliError, Result};
use crate::models::{AccessToken, Cluster, Profile};
use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Response, StatusCode};
use serde::{Deserialize, Serialize};

const GRANT_TYPE: &str = "client_credentials";

#[derive(Debug, Serialize)]
struct TokenRequest<'a> {
    grant_type: &'a str,
    audience: &'a str,
    client_id: &'a str,
    client_secret: &'a str,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
}

/// reqwest-backed gateway
#[derive(Debug, Clone, Default)]
pub struct HttpGateway {
    client: reqwest::Client,
}

impl HttpGateway {
    pub fn new() -> Self {
        Self::default()
    }

    fn clusters_url(base_url: &str) -> String {
        format!("{}/clusters", base_url.trim_end_matches('/'))
    }

    /// Turn anything other than 200 into an `Http` error carrying the raw body
    async fn expect_ok(response: Response) -> Result<Response> {
        let status = response.status();
        if status == StatusCode::OK {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(CliError::Http {
            status: status.as_u16(),
            body,
        })
    }
}

#[async_trait]
impl Gateway for HttpGateway {
    async fn acquire_token(&self, profile: &Profile) -> Result<AccessToken> {
        tracing::debug!(
            "Requesting token for '{}' from {}",
            profile.name,
            profile.oauth_url
        );

        let request = TokenRequest {
            grant_type: GRANT_TYPE,
            audience: &profile.audience,
            client_id: &profile.client_id,
            client_secret: &profile.client_secret,
        };

        let response = self
            .client
            .post(&profile.oauth_url)
            .header(CONTENT_TYPE, "application/json")
            .json(&request)
            .send()
            .await?;
        let response = Self::expect_ok(response).await?;

        let body: TokenResponse = response
            .json()
            .await
            .map_err(|e| CliError::Decode(format!("token response: {}", e)))?;
        let token = body
            .access_token
            .ok_or_else(|| CliError::Decode("No access_token in response".to_string()))?;

        tracing::info!("Token acquired for '{}'", profile.name);
        Ok(AccessToken::new(token))
    }

    async fn list_clusters(&self, base_url: &str, token: &AccessToken) -> Result<Vec<Cluster>> {
        let url = Self::clusters_url(base_url);
        tracing::debug!("Fetching clusters from {}", url);

        let response = self
            .client
            .get(&url)
            .header(ACCEPT, "application/json")
            .bearer_auth(token.as_str())
            .send()
            .await?;
        let response = Self::expect_ok(response).await?;

        let clusters: Vec<Cluster> = response
            .json()
            .await
            .map_err(|e| CliError::Decode(format!("cluster list: {}", e)))?;

        tracing::info!("Fetched {} cluster(s)", clusters.len());
        Ok(clusters)
    }
}
