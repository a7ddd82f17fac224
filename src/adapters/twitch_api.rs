use anyhow::{anyhow, Result};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, instrument};
use twitch_oauth2::{AccessToken, ClientId};

use crate::adapters::http_client::HttpClient;
use crate::config::TwitchConfig;

/// Helix streams endpoint
const STREAMS_ENDPOINT: &str = "streams";
/// Helix users endpoint
const USERS_ENDPOINT: &str = "users";

/// A live stream as returned by Helix `streams`
#[derive(Debug, Clone, Deserialize)]
pub struct HelixStream {
    pub id: String,
    pub user_id: String,
    #[serde(default)]
    pub user_name: String,
    #[serde(default)]
    pub game_name: String,
    #[serde(default)]
    pub title: String,
    /// `"live"` for live streams, empty string on errors
    #[serde(rename = "type", default)]
    pub stream_type: String,
    #[serde(default)]
    pub viewer_count: u64,
    /// Template URL with `{width}` and `{height}` placeholders
    #[serde(default)]
    pub thumbnail_url: String,
}

/// A user profile as returned by Helix `users`
#[derive(Debug, Clone, Deserialize)]
pub struct HelixUser {
    pub id: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub profile_image_url: String,
}

/// Envelope shared by Helix list responses
#[derive(Debug, Deserialize)]
struct HelixPage<T> {
    data: Vec<T>,
}

/// Client for Twitch Helix API requests
pub struct TwitchApiClient {
    /// HTTP client for API requests
    http_client: Arc<dyn HttpClient + Send + Sync>,
    /// Client ID sent with every request
    client_id: ClientId,
    /// Base URL of the Helix API
    api_url: String,
}

impl TwitchApiClient {
    /// Create a new API client with a custom HTTP client
    pub fn with_http_client(
        config: &TwitchConfig,
        http_client: Arc<dyn HttpClient + Send + Sync>,
    ) -> Self {
        Self {
            http_client,
            client_id: config.client_id.clone(),
            api_url: config.api_url.trim_end_matches('/').to_string(),
        }
    }

    /// Fetch up to `first` live streams in the given language
    #[instrument(skip(self, token), level = "debug")]
    pub async fn fetch_live_streams(
        &self,
        token: &AccessToken,
        first: usize,
        language: &str,
    ) -> Result<Vec<HelixStream>> {
        let first = first.to_string();
        let query = [("first", first.as_str()), ("language", language)];

        self.get_data(STREAMS_ENDPOINT, &query, token).await
    }

    /// Fetch the profiles for a batch of user IDs in one request
    #[instrument(skip(self, token), level = "debug")]
    pub async fn fetch_users_by_id(
        &self,
        token: &AccessToken,
        user_ids: &[String],
    ) -> Result<Vec<HelixUser>> {
        let query: Vec<(&str, &str)> = user_ids.iter().map(|id| ("id", id.as_str())).collect();

        self.get_data(USERS_ENDPOINT, &query, token).await
    }

    /// Fetch the profile of the user a user access token belongs to
    #[instrument(skip(self, token), level = "debug")]
    pub async fn fetch_current_user(&self, token: &AccessToken) -> Result<Option<HelixUser>> {
        let users: Vec<HelixUser> = self.get_data(USERS_ENDPOINT, &[], token).await?;
        Ok(users.into_iter().next())
    }

    fn headers(&self, token: &AccessToken) -> HashMap<String, String> {
        let mut headers = HashMap::new();
        headers.insert("Client-ID".to_string(), self.client_id.as_str().to_string());
        headers.insert(
            "Authorization".to_string(),
            format!("Bearer {}", token.secret()),
        );
        headers
    }

    async fn get_data<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &[(&str, &str)],
        token: &AccessToken,
    ) -> Result<Vec<T>> {
        let url = format!("{}/{}", self.api_url, endpoint);

        let response = self
            .http_client
            .get(&url, query, self.headers(token))
            .await?;

        if !response.is_success() {
            return Err(anyhow!(
                "Helix {} request failed: HTTP {} - {}",
                endpoint,
                response.status(),
                response.body()
            ));
        }

        let page: HelixPage<T> = response
            .json()
            .map_err(|e| anyhow!("Invalid Helix {} response: {}", endpoint, e))?;

        debug!(endpoint, count = page.data.len(), "Helix request succeeded");
        Ok(page.data)
    }
}
