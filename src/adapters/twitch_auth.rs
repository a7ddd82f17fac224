use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, instrument};
use twitch_oauth2::AccessToken;

use crate::adapters::http_client::HttpClient;
use crate::config::TwitchConfig;
use crate::error::{RelayError, RelayResult};

/// Grant type for the application token
const CLIENT_CREDENTIALS_GRANT: &str = "client_credentials";
/// Grant type for the user authorization code exchange
const AUTHORIZATION_CODE_GRANT: &str = "authorization_code";

/// Body of a successful token endpoint response
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<u64>,
    #[serde(default)]
    token_type: Option<String>,
}

/// Client for the Twitch OAuth2 token endpoint
pub struct TwitchAuthClient {
    /// HTTP client for token requests
    http_client: Arc<dyn HttpClient + Send + Sync>,
    /// Credentials and endpoint configuration
    config: TwitchConfig,
}

impl TwitchAuthClient {
    /// Create a new auth client with a custom HTTP client
    pub fn with_http_client(
        config: TwitchConfig,
        http_client: Arc<dyn HttpClient + Send + Sync>,
    ) -> Self {
        Self {
            http_client,
            config,
        }
    }

    /// Request an application token with the client credentials grant
    #[instrument(skip(self), level = "debug")]
    pub async fn request_app_token(&self) -> RelayResult<AccessToken> {
        self.request_token(CLIENT_CREDENTIALS_GRANT, &[]).await
    }

    /// Exchange an authorization code for a user access token
    #[instrument(skip(self, code), level = "debug")]
    pub async fn exchange_code(&self, code: &str) -> RelayResult<AccessToken> {
        let extra = [
            ("code", code),
            ("redirect_uri", self.config.redirect_uri.as_str()),
        ];
        self.request_token(AUTHORIZATION_CODE_GRANT, &extra).await
    }

    async fn request_token(
        &self,
        grant_type: &str,
        extra: &[(&str, &str)],
    ) -> RelayResult<AccessToken> {
        let mut params = vec![
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.secret()),
        ];
        params.extend_from_slice(extra);
        params.push(("grant_type", grant_type));

        let url = self.config.token_url();
        let response = self
            .http_client
            .post(&url, &params, HashMap::new())
            .await
            .map_err(|e| RelayError::auth(e.to_string()))?;

        if !response.is_success() {
            return Err(RelayError::Auth {
                message: format!("token endpoint returned HTTP {}", response.status()),
                payload: Some(response.body().to_string()),
            });
        }

        let token: TokenResponse = response.json().map_err(|e| RelayError::Auth {
            message: format!("invalid token response: {}", e),
            payload: Some(response.body().to_string()),
        })?;

        debug!(
            grant_type,
            expires_in = ?token.expires_in,
            token_type = ?token.token_type,
            "Received token from Twitch"
        );

        Ok(AccessToken::new(token.access_token))
    }
}
