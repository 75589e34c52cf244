// Platform API access: OAuth token exchange and cluster listing
mod client;

pub use client::HttpGateway;

use crate::error::Result;
use crate::models::{AccessToken, Cluster, Profile};
use async_trait::async_trait;

/// Network operations used by the TUI. Each call is a single attempt.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Gateway: Send + Sync {
    /// Exchange the profile's client credentials for a bearer token
    async fn acquire_token(&self, profile: &Profile) -> Result<AccessToken>;

    /// Fetch `{base_url}/clusters` with the given token
    async fn list_clusters(&self, base_url: &str, token: &AccessToken) -> Result<Vec<Cluster>>;
}
