use twitch_oauth2::{ClientId, ClientSecret};

// Default configuration values
pub const DEFAULT_PORT: u16 = 3001;
pub const DEFAULT_REDIRECT_URI: &str = "http://localhost:5173/auth/twitch";
pub const DEFAULT_AUTH_URL: &str = "https://id.twitch.tv/oauth2";
pub const DEFAULT_API_URL: &str = "https://api.twitch.tv/helix";
pub const DEFAULT_STREAM_LANGUAGE: &str = "es";

/// Local development origins that are always allowed
pub const DEV_ORIGINS: [&str; 2] = ["http://localhost:5173", "http://localhost:5174"];

// Environment variable names
pub const PORT_ENV: &str = "PORT";
pub const FRONTEND_URL_ENV: &str = "FRONTEND_URL";
pub const TWITCH_CLIENT_ID_ENV: &str = "TWITCH_CLIENT_ID";
pub const TWITCH_CLIENT_SECRET_ENV: &str = "TWITCH_CLIENT_SECRET";
pub const TWITCH_REDIRECT_URI_ENV: &str = "TWITCH_REDIRECT_URI";
pub const TWITCH_AUTH_URL_ENV: &str = "TWITCH_AUTH_URL";
pub const TWITCH_API_URL_ENV: &str = "TWITCH_API_URL";
pub const TWITCH_STREAM_LANGUAGE_ENV: &str = "TWITCH_STREAM_LANGUAGE";

/// Main configuration struct for the relay
#[derive(Debug, Clone)]
pub struct Config {
    /// Port to bind the HTTP server to
    pub port: u16,
    /// Production frontend origin, added to the CORS allow-list
    pub frontend_url: Option<String>,
    /// Twitch credentials and endpoints
    pub twitch: TwitchConfig,
}

/// Twitch application credentials and endpoints
#[derive(Debug, Clone)]
pub struct TwitchConfig {
    pub client_id: ClientId,
    pub client_secret: ClientSecret,
    /// Redirect URI registered for the authorization-code grant
    pub redirect_uri: String,
    /// Base URL of the identity provider (`/token` is appended)
    pub auth_url: String,
    /// Base URL of the Helix API
    pub api_url: String,
    /// Language code the stream listing is filtered to
    pub stream_language: String,
}

impl Config {
    /// Load configuration from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        Self {
            port: non_empty(PORT_ENV)
                .and_then(|val| val.parse().ok())
                .unwrap_or(DEFAULT_PORT),
            frontend_url: non_empty(FRONTEND_URL_ENV),
            twitch: TwitchConfig {
                client_id: ClientId::new(lookup(TWITCH_CLIENT_ID_ENV).unwrap_or_default()),
                client_secret: ClientSecret::new(
                    lookup(TWITCH_CLIENT_SECRET_ENV).unwrap_or_default(),
                ),
                redirect_uri: non_empty(TWITCH_REDIRECT_URI_ENV)
                    .unwrap_or_else(|| DEFAULT_REDIRECT_URI.to_string()),
                auth_url: non_empty(TWITCH_AUTH_URL_ENV)
                    .unwrap_or_else(|| DEFAULT_AUTH_URL.to_string()),
                api_url: non_empty(TWITCH_API_URL_ENV)
                    .unwrap_or_else(|| DEFAULT_API_URL.to_string()),
                stream_language: non_empty(TWITCH_STREAM_LANGUAGE_ENV)
                    .unwrap_or_else(|| DEFAULT_STREAM_LANGUAGE.to_string()),
            },
        }
    }

    /// Origins allowed by the CORS policy
    pub fn allowed_origins(&self) -> Vec<String> {
        let mut origins: Vec<String> = DEV_ORIGINS.iter().map(|o| o.to_string()).collect();
        if let Some(frontend_url) = &self.frontend_url {
            origins.push(frontend_url.clone());
        }
        origins
    }

    /// Whether both client credentials are configured
    pub fn has_credentials(&self) -> bool {
        !self.twitch.client_id.as_str().is_empty()
            && !self.twitch.client_secret.secret().is_empty()
    }
}

impl TwitchConfig {
    /// Full URL of the OAuth token endpoint
    pub fn token_url(&self) -> String {
        format!("{}/token", self.auth_url.trim_end_matches('/'))
    }

    /// Full URL of a Helix endpoint
    pub fn helix_url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.api_url.trim_end_matches('/'), endpoint)
    }
}
