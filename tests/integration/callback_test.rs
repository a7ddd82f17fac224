use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use mockito::Matcher;

use super::test_harness::{post_json, token_body, user_json, TestRelay};

const CALLBACK_URI: &str = "/auth/twitch/callback";

#[tokio::test]
async fn test_code_exchange_returns_user_and_token() {
    let mut relay = TestRelay::start().await;
    let exchange = relay
        .twitch
        .mock("POST", "/oauth2/token")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("grant_type".into(), "authorization_code".into()),
            Matcher::UrlEncoded("code".into(), "abc123".into()),
            Matcher::UrlEncoded("client_id".into(), "test_client_id".into()),
            Matcher::UrlEncoded(
                "redirect_uri".into(),
                "http://localhost:5173/auth/twitch".into(),
            ),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(token_body("user_token").to_string())
        .create_async()
        .await;
    let user = relay
        .twitch
        .mock("GET", "/helix/users")
        .match_header("authorization", "Bearer user_token")
        .match_header("client-id", "test_client_id")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(serde_json::json!({ "data": [user_json("42")] }).to_string())
        .create_async()
        .await;

    let (status, body) = relay
        .send(post_json(CALLBACK_URI, serde_json::json!({ "code": "abc123" })))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        serde_json::json!({
            "success": true,
            "user": {
                "id": "42",
                "name": "User42",
                "profile_image_url": "https://static-cdn.jtvnw.net/jtv_user_pictures/42-profile.png"
            },
            "access_token": "user_token"
        })
    );

    exchange.assert_async().await;
    user.assert_async().await;
}

#[tokio::test]
async fn test_missing_code_is_400_without_outbound_calls() {
    let mut relay = TestRelay::start().await;
    let token = relay
        .twitch
        .mock("POST", Matcher::Any)
        .expect(0)
        .create_async()
        .await;
    let helix = relay
        .twitch
        .mock("GET", Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let empty = Request::builder()
        .method("POST")
        .uri(CALLBACK_URI)
        .body(Body::empty())
        .unwrap();
    let requests = vec![
        empty,
        post_json(CALLBACK_URI, serde_json::json!({})),
        post_json(CALLBACK_URI, serde_json::json!({ "code": "" })),
    ];

    for request in requests {
        let (status, body) = relay.send(request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "No se encontró el código de autorización.");
    }

    token.assert_async().await;
    helix.assert_async().await;
}

#[tokio::test]
async fn test_rejected_code_is_500() {
    let mut relay = TestRelay::start().await;
    let _token = relay
        .token_mock(
            "authorization_code",
            400,
            serde_json::json!({"status": 400, "message": "Invalid authorization code"}),
        )
        .create_async()
        .await;
    let helix = relay
        .twitch
        .mock("GET", Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let (status, body) = relay
        .send(post_json(CALLBACK_URI, serde_json::json!({ "code": "stale" })))
        .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Fallo en la autenticación con Twitch.");
    helix.assert_async().await;
}

#[tokio::test]
async fn test_profile_failure_is_500() {
    let mut relay = TestRelay::start().await;
    let _token = relay
        .token_mock("authorization_code", 200, token_body("user_token"))
        .create_async()
        .await;
    let _users = relay
        .helix_mock("users", Matcher::Any, 503, Vec::new())
        .create_async()
        .await;

    let (status, body) = relay
        .send(post_json(CALLBACK_URI, serde_json::json!({ "code": "abc123" })))
        .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Fallo en la autenticación con Twitch.");
    assert!(body.get("access_token").is_none());
}
