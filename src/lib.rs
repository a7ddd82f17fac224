use std::sync::Arc;

use tracing::{info, warn};

// Export modules
pub mod adapters;
pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod services;

use adapters::{HttpClient, ReqwestHttpClient, TwitchApiClient, TwitchAuthClient};
use auth::TokenManager;
use services::{AuthExchangeService, StreamListingService};

// Re-export core components
pub use crate::api::{router, ApiServer};
pub use crate::config::Config;
pub use crate::error::{ErrorCode, RelayError, RelayResult};

/// Shared application state handed to every request handler
#[derive(Clone)]
pub struct AppState {
    /// Loaded configuration
    pub config: Arc<Config>,
    /// Holder of the application token
    pub tokens: TokenManager,
    /// Live stream listing
    pub streams: Arc<StreamListingService>,
    /// Authorization code exchange
    pub authorization: Arc<AuthExchangeService>,
}

impl AppState {
    /// Create the application state with the default HTTP client
    pub fn new(config: Config) -> Self {
        Self::with_http_client(config, Arc::new(ReqwestHttpClient::new()))
    }

    /// Create the application state with a custom HTTP client
    pub fn with_http_client(config: Config, http_client: Arc<dyn HttpClient + Send + Sync>) -> Self {
        let auth_client = Arc::new(TwitchAuthClient::with_http_client(
            config.twitch.clone(),
            http_client.clone(),
        ));
        let api_client = Arc::new(TwitchApiClient::with_http_client(
            &config.twitch,
            http_client,
        ));

        let tokens = TokenManager::new(auth_client.clone());
        let streams = Arc::new(StreamListingService::new(
            tokens.clone(),
            api_client.clone(),
            config.twitch.stream_language.clone(),
        ));
        let authorization = Arc::new(AuthExchangeService::new(auth_client, api_client));

        Self {
            config: Arc::new(config),
            tokens,
            streams,
            authorization,
        }
    }

    /// Best-effort startup: try to acquire the app token, log and carry on if it fails
    ///
    /// The stream listing re-attempts acquisition on demand, so a failure here
    /// only degrades availability until Twitch accepts the credentials.
    pub async fn initialize(&self) {
        info!("Initializing application");

        if !self.config.has_credentials() {
            warn!("TWITCH_CLIENT_ID or TWITCH_CLIENT_SECRET is not set");
        }

        if self.tokens.acquire_app_token().await.is_err() {
            warn!("Server starting without a Twitch app token. Check the .env credentials");
        }
    }
}
