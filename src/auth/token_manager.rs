use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, error, info, instrument};
use twitch_oauth2::AccessToken;

use crate::adapters::TwitchAuthClient;
use crate::error::{RelayError, RelayResult};

/// Holds the process-wide application token
///
/// Clones share the same slot. The token is never checked for expiry: it is
/// either present (assumed valid) or absent. No lock is held while talking to
/// Twitch, so concurrent acquisitions may overlap and the last write wins.
#[derive(Clone)]
pub struct TokenManager {
    auth_client: Arc<TwitchAuthClient>,
    token: Arc<RwLock<Option<AccessToken>>>,
}

impl TokenManager {
    /// Create a token manager with an empty slot
    pub fn new(auth_client: Arc<TwitchAuthClient>) -> Self {
        Self {
            auth_client,
            token: Arc::new(RwLock::new(None)),
        }
    }

    /// The stored application token, if any
    pub async fn current(&self) -> Option<AccessToken> {
        self.token.read().await.clone()
    }

    /// Whether an application token is stored
    pub async fn is_present(&self) -> bool {
        self.token.read().await.is_some()
    }

    /// Drop the stored token
    pub async fn clear(&self) {
        *self.token.write().await = None;
    }

    /// Acquire a new application token with the client credentials grant
    ///
    /// On success the token replaces whatever was stored. On failure the slot
    /// is cleared and the provider's error is returned.
    #[instrument(skip(self), level = "debug")]
    pub async fn acquire_app_token(&self) -> RelayResult<AccessToken> {
        match self.auth_client.request_app_token().await {
            Ok(token) => {
                *self.token.write().await = Some(token.clone());
                info!("Twitch app token acquired");
                Ok(token)
            }
            Err(e) => {
                self.clear().await;
                if let RelayError::Auth { message, payload } = &e {
                    error!(
                        %message,
                        payload = payload.as_deref().unwrap_or(""),
                        "Failed to acquire Twitch app token, check TWITCH_CLIENT_ID and TWITCH_CLIENT_SECRET"
                    );
                } else {
                    error!(error = %e, "Failed to acquire Twitch app token");
                }
                Err(e)
            }
        }
    }

    /// Return the stored token, acquiring one first if the slot is empty
    pub async fn ensure_app_token(&self) -> RelayResult<AccessToken> {
        if let Some(token) = self.current().await {
            return Ok(token);
        }

        debug!("No app token stored, acquiring one");
        self.acquire_app_token().await
    }
}
