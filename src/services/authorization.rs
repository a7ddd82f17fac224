use std::sync::Arc;

use serde::Serialize;
use tracing::{error, info, instrument};

use crate::adapters::{TwitchApiClient, TwitchAuthClient};
use crate::error::{RelayError, RelayResult, EXCHANGE_FAILED_MESSAGE, MISSING_CODE_MESSAGE};

/// Basic profile of the user who authorized the application
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserProfile {
    pub id: String,
    /// Display name
    pub name: String,
    pub profile_image_url: String,
}

/// Result of a successful code exchange
#[derive(Debug, Clone, Serialize)]
pub struct AuthExchangeResult {
    pub success: bool,
    pub user: UserProfile,
    /// Raw user access token, handed to the frontend as-is
    pub access_token: String,
}

/// Exchanges authorization codes for user tokens and profiles
///
/// Holds no state between calls.
pub struct AuthExchangeService {
    auth: Arc<TwitchAuthClient>,
    api: Arc<TwitchApiClient>,
}

impl AuthExchangeService {
    pub fn new(auth: Arc<TwitchAuthClient>, api: Arc<TwitchApiClient>) -> Self {
        Self { auth, api }
    }

    /// Exchange a code for a user access token and fetch that user's profile
    #[instrument(skip_all, level = "debug")]
    pub async fn exchange_code(&self, code: Option<&str>) -> RelayResult<AuthExchangeResult> {
        let code = match code {
            Some(code) if !code.is_empty() => code,
            _ => return Err(RelayError::BadRequest(MISSING_CODE_MESSAGE.to_string())),
        };

        let token = self.auth.exchange_code(code).await.map_err(|e| {
            error!(error = %e, "Failed to exchange authorization code");
            RelayError::upstream(EXCHANGE_FAILED_MESSAGE, e)
        })?;

        let user = self
            .api
            .fetch_current_user(&token)
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to fetch authorized user profile");
                RelayError::upstream(EXCHANGE_FAILED_MESSAGE, e)
            })?
            .ok_or_else(|| {
                error!("Helix returned no user for the exchanged token");
                RelayError::upstream(EXCHANGE_FAILED_MESSAGE, "empty users response")
            })?;

        info!(user_id = %user.id, "Twitch user authorized");

        Ok(AuthExchangeResult {
            success: true,
            user: UserProfile {
                id: user.id,
                name: user.display_name,
                profile_image_url: user.profile_image_url,
            },
            access_token: token.secret().to_string(),
        })
    }
}
