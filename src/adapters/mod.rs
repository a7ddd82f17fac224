//! Adapters for the Twitch identity provider and Helix API

pub mod http_client;
pub mod twitch_api;
pub mod twitch_auth;


// Re-export the HTTP client for use in adapters
pub use http_client::{HttpClient, HttpMethod, ReqwestHttpClient, SimpleHttpResponse};
pub use twitch_api::{HelixStream, HelixUser, TwitchApiClient};
pub use twitch_auth::TwitchAuthClient;
