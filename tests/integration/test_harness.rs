//! Integration test harness
//! Spins up a mockito server standing in for Twitch and a router pointed at it

use std::collections::HashMap;

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use mockito::{Matcher, Mock, ServerGuard};
use serde_json::Value;
use tower::ServiceExt;

use twitch_relay::config::{
    FRONTEND_URL_ENV, TWITCH_API_URL_ENV, TWITCH_AUTH_URL_ENV, TWITCH_CLIENT_ID_ENV,
    TWITCH_CLIENT_SECRET_ENV,
};
use twitch_relay::{router, AppState, Config};

pub const FRONTEND_URL: &str = "https://streams.example.com";

/// Relay wired to a mock Twitch server
pub struct TestRelay {
    pub twitch: ServerGuard,
    pub state: AppState,
    pub app: Router,
    /// Mocks that must stay registered for the whole test
    pub mocks: Vec<Mock>,
}

impl TestRelay {
    /// Start a mock Twitch server and build the router against it
    pub async fn start() -> Self {
        let twitch = mockito::Server::new_async().await;

        let mut vars: HashMap<&str, String> = HashMap::new();
        vars.insert(TWITCH_CLIENT_ID_ENV, "test_client_id".to_string());
        vars.insert(TWITCH_CLIENT_SECRET_ENV, "test_client_secret".to_string());
        vars.insert(TWITCH_AUTH_URL_ENV, format!("{}/oauth2", twitch.url()));
        vars.insert(TWITCH_API_URL_ENV, format!("{}/helix", twitch.url()));
        vars.insert(FRONTEND_URL_ENV, FRONTEND_URL.to_string());

        let config = Config::from_lookup(|key| vars.get(key).cloned());
        let state = AppState::new(config);
        let app = router(state.clone());

        Self {
            twitch,
            state,
            app,
            mocks: Vec::new(),
        }
    }

    /// Send a request through the router and decode the JSON body
    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    /// Token endpoint mock for a grant type, ready to be created
    pub fn token_mock(&mut self, grant_type: &str, status: usize, body: Value) -> Mock {
        self.twitch
            .mock("POST", "/oauth2/token")
            .match_query(Matcher::UrlEncoded(
                "grant_type".to_string(),
                grant_type.to_string(),
            ))
            .with_status(status)
            .with_header("content-type", "application/json")
            .with_body(body.to_string())
    }

    /// Helix endpoint mock returning `{"data": entries}`, ready to be created
    pub fn helix_mock(
        &mut self,
        endpoint: &str,
        query: Matcher,
        status: usize,
        entries: Vec<Value>,
    ) -> Mock {
        self.twitch
            .mock("GET", format!("/helix/{}", endpoint).as_str())
            .match_query(query)
            .with_status(status)
            .with_header("content-type", "application/json")
            .with_body(serde_json::json!({ "data": entries }).to_string())
    }
}

/// Token endpoint success body
pub fn token_body(access_token: &str) -> Value {
    serde_json::json!({
        "access_token": access_token,
        "expires_in": 5011271,
        "token_type": "bearer"
    })
}

/// A Helix stream entry
pub fn stream_json(id: &str, user_id: &str, stream_type: &str) -> Value {
    serde_json::json!({
        "id": id,
        "user_id": user_id,
        "user_login": format!("user{}", user_id),
        "user_name": format!("User{}", user_id),
        "game_id": "509658",
        "game_name": "Just Chatting",
        "type": stream_type,
        "title": format!("Stream {}", id),
        "viewer_count": 1200,
        "started_at": "2024-01-01T12:00:00Z",
        "language": "es",
        "thumbnail_url": format!(
            "https://static-cdn.jtvnw.net/previews-ttv/live_user_user{}-{{width}}x{{height}}.jpg",
            user_id
        ),
        "tags": [],
        "is_mature": false
    })
}

/// A Helix user entry
pub fn user_json(id: &str) -> Value {
    serde_json::json!({
        "id": id,
        "login": format!("user{}", id),
        "display_name": format!("User{}", id),
        "profile_image_url": format!("https://static-cdn.jtvnw.net/jtv_user_pictures/{}-profile.png", id),
    })
}

/// GET request, optionally with an Origin header
pub fn get(uri: &str, origin: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(origin) = origin {
        builder = builder.header("origin", origin);
    }
    builder.body(Body::empty()).unwrap()
}

/// POST request with a JSON body
pub fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}
