//! Authorization and refresh-on-401 behaviour against a mock API.

mod common;

use common::{authorization, client_with, requests_to};
use learnverse_core::error::AuthError;
use learnverse_core::model::UploadFile;
use learnverse_core::{AccessToken, Error, RefreshToken};
use learnverse_http::repo::{ActivityRepository, CommunityRepository};
use learnverse_http::{
    ApiRequest, Authenticator, ClientConfig, InvalidationReason, SKIP_AUTHORIZATION_HEADER,
    TokenRefresher,
};
use reqwest::Method;
use serde_json::json;
use tokio::sync::broadcast::error::TryRecvError;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const FEED: &str = "/api/activities/my-feed";
const REFRESH: &str = "/auth/refresh";

async fn mount_feed(server: &MockServer, token: &str, status: u16) {
    let template = if status == 200 {
        ResponseTemplate::new(200).set_body_json(json!([
            {"id": 1, "title": "Intro to chess"}
        ]))
    } else {
        ResponseTemplate::new(status).set_body_json(json!({"message": "token expired"}))
    };

    Mock::given(method("GET"))
        .and(path(FEED))
        .and(header("authorization", format!("Bearer {}", token).as_str()))
        .respond_with(template)
        .mount(server)
        .await;
}

async fn mount_refresh(server: &MockServer, from: &str, to: (&str, &str), expected: u64) {
    Mock::given(method("POST"))
        .and(path(REFRESH))
        .and(body_json(json!({"refreshToken": from})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "accessToken": to.0,
            "refreshToken": to.1
        })))
        .expect(expected)
        .mount(server)
        .await;
}

// ============================================================================
// Refresh and replay
// ============================================================================

#[tokio::test]
async fn expired_token_is_refreshed_and_request_replayed() {
    let server = MockServer::start().await;
    mount_feed(&server, "A1", 401).await;
    mount_feed(&server, "A2", 200).await;
    mount_refresh(&server, "R1", ("A2", "R2"), 1).await;

    let (client, backend) = client_with(&server, Some("A1"), Some("R1")).await;
    let activities = ActivityRepository::new(client.clone()).my_feed().await.unwrap();

    assert_eq!(activities.len(), 1);
    assert_eq!(activities[0].title, "Intro to chess");

    let persisted = backend.snapshot();
    assert_eq!(persisted.access_token, Some(AccessToken::new("A2")));
    assert_eq!(persisted.refresh_token, Some(RefreshToken::new("R2")));
    assert_eq!(client.store().access_token(), Some(AccessToken::new("A2")));

    let feed_requests = requests_to(&server, FEED).await;
    assert_eq!(feed_requests.len(), 2);
    assert_eq!(authorization(&feed_requests[0]).as_deref(), Some("Bearer A1"));
    assert_eq!(authorization(&feed_requests[1]).as_deref(), Some("Bearer A2"));
}

#[tokio::test]
async fn refresh_request_carries_no_bearer_header() {
    let server = MockServer::start().await;
    mount_feed(&server, "A1", 401).await;
    mount_feed(&server, "A2", 200).await;
    mount_refresh(&server, "R1", ("A2", "R2"), 1).await;

    let (client, _) = client_with(&server, Some("A1"), Some("R1")).await;
    ActivityRepository::new(client).my_feed().await.unwrap();

    let refresh_requests = requests_to(&server, REFRESH).await;
    assert_eq!(refresh_requests.len(), 1);
    assert!(authorization(&refresh_requests[0]).is_none());
}

#[tokio::test]
async fn rejected_replay_is_not_recovered_again() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(FEED))
        .respond_with(ResponseTemplate::new(401))
        .expect(2)
        .mount(&server)
        .await;
    mount_refresh(&server, "R1", ("A2", "R2"), 1).await;

    let (client, _) = client_with(&server, Some("A1"), Some("R1")).await;
    let err = ActivityRepository::new(client).my_feed().await.unwrap_err();

    assert!(err.is_unauthorized());
}

#[tokio::test]
async fn missing_refresh_token_is_terminal_without_network() {
    let server = MockServer::start().await;
    mount_feed(&server, "A1", 401).await;
    Mock::given(path(REFRESH))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let (client, backend) = client_with(&server, Some("A1"), None).await;
    let mut invalidated = client.subscribe_invalidation();

    let err = ActivityRepository::new(client).my_feed().await.unwrap_err();

    match err {
        Error::Auth(AuthError::Unauthorized { message }) => {
            assert_eq!(message.as_deref(), Some("token expired"));
        }
        other => panic!("expected Unauthorized, got {other:?}"),
    }
    assert_eq!(
        invalidated.try_recv().unwrap().reason,
        InvalidationReason::MissingRefreshToken
    );
    // Recovery never clears credentials on its own.
    assert_eq!(backend.snapshot().access_token, Some(AccessToken::new("A1")));
}

#[tokio::test]
async fn rejected_refresh_token_signals_invalidation() {
    let server = MockServer::start().await;
    mount_feed(&server, "A1", 401).await;
    Mock::given(method("POST"))
        .and(path(REFRESH))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"message": "revoked"})))
        .expect(1)
        .mount(&server)
        .await;

    let (client, backend) = client_with(&server, Some("A1"), Some("R1")).await;
    let mut invalidated = client.subscribe_invalidation();

    let err = ActivityRepository::new(client).my_feed().await.unwrap_err();

    assert!(err.is_unauthorized());
    assert_eq!(
        invalidated.try_recv().unwrap().reason,
        InvalidationReason::RefreshRejected { status: 401 }
    );
    let persisted = backend.snapshot();
    assert_eq!(persisted.access_token, Some(AccessToken::new("A1")));
    assert_eq!(persisted.refresh_token, Some(RefreshToken::new("R1")));
}

#[tokio::test]
async fn refresh_server_error_does_not_invalidate() {
    let server = MockServer::start().await;
    mount_feed(&server, "A1", 401).await;
    Mock::given(method("POST"))
        .and(path(REFRESH))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    let (client, _) = client_with(&server, Some("A1"), Some("R1")).await;
    let mut invalidated = client.subscribe_invalidation();

    let err = ActivityRepository::new(client).my_feed().await.unwrap_err();

    assert!(err.is_unauthorized());
    assert!(matches!(invalidated.try_recv(), Err(TryRecvError::Empty)));
}

#[tokio::test]
async fn malformed_refresh_body_surfaces_original_401() {
    let server = MockServer::start().await;
    mount_feed(&server, "A1", 401).await;
    Mock::given(method("POST"))
        .and(path(REFRESH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token": "nope"})))
        .expect(1)
        .mount(&server)
        .await;

    let (client, backend) = client_with(&server, Some("A1"), Some("R1")).await;
    let err = ActivityRepository::new(client).my_feed().await.unwrap_err();

    assert!(err.is_unauthorized());
    assert_eq!(backend.snapshot().refresh_token, Some(RefreshToken::new("R1")));
    assert_eq!(requests_to(&server, FEED).await.len(), 1);
}

#[tokio::test]
async fn other_failures_are_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(FEED))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "error": "InternalError",
            "message": "feed unavailable"
        })))
        .expect(1)
        .mount(&server)
        .await;
    mount_refresh(&server, "R1", ("A2", "R2"), 0).await;

    let (client, _) = client_with(&server, Some("A1"), Some("R1")).await;
    let err = ActivityRepository::new(client).my_feed().await.unwrap_err();

    match &err {
        Error::Api(api) => {
            assert_eq!(api.status, 500);
            assert!(api.is_server_error());
        }
        other => panic!("expected Api error, got {other:?}"),
    }
    assert_eq!(err.user_message(), "feed unavailable");
}

#[tokio::test]
async fn multipart_upload_is_replayed_intact() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/community/posts"))
        .and(header("authorization", "Bearer A1"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/community/posts"))
        .and(header("authorization", "Bearer A2"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": 9,
            "authorId": 3,
            "authorName": "Ana",
            "content": "my first sketch",
            "imageUrl": "https://cdn.learnverse.app/9.png"
        })))
        .mount(&server)
        .await;
    mount_refresh(&server, "R1", ("A2", "R2"), 1).await;

    let (client, _) = client_with(&server, Some("A1"), Some("R1")).await;
    let post = CommunityRepository::new(client)
        .create_post(
            "my first sketch",
            Some(UploadFile::new("sketch.png", "image/png", b"PNGDATA".to_vec())),
        )
        .await
        .unwrap();

    assert_eq!(post.id, 9);

    let uploads = requests_to(&server, "/api/community/posts").await;
    assert_eq!(uploads.len(), 2);
    let replayed = String::from_utf8_lossy(&uploads[1].body);
    assert!(replayed.contains("my first sketch"));
    assert!(replayed.contains("PNGDATA"));
    assert!(replayed.contains("sketch.png"));
}

// ============================================================================
// Skipping authorization
// ============================================================================

#[tokio::test]
async fn skip_marked_requests_get_no_injected_header() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(FEED))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let (client, _) = client_with(&server, Some("A1"), Some("R1")).await;

    let flagged = client.get("api/activities/my-feed").skip_authorization();
    client.send_empty(flagged).await.unwrap();

    let marked = client
        .get("api/activities/my-feed")
        .header(SKIP_AUTHORIZATION_HEADER, "true")
        .unwrap();
    client.send_empty(marked).await.unwrap();

    for request in requests_to(&server, FEED).await {
        assert!(authorization(&request).is_none());
        assert!(!request.headers.contains_key(SKIP_AUTHORIZATION_HEADER));
    }
}

#[tokio::test]
async fn skip_marked_401_is_not_recovered() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(FEED))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;
    mount_refresh(&server, "R1", ("A2", "R2"), 0).await;

    let (client, _) = client_with(&server, Some("A1"), Some("R1")).await;
    let request = client
        .get("api/activities/my-feed")
        .with_manual_bearer(&AccessToken::new("MANUAL"))
        .unwrap();

    let err = client.send_empty(request).await.unwrap_err();
    assert!(err.is_unauthorized());
}

// ============================================================================
// Authenticator in isolation
// ============================================================================

async fn authenticator(
    server: &MockServer,
    access: Option<&str>,
    refresh: Option<&str>,
) -> Authenticator {
    let (client, _) = client_with(server, access, refresh).await;
    let config = ClientConfig::new(client.base_url().clone());
    Authenticator::new(client.store().clone(), TokenRefresher::new(&config).unwrap())
}

fn feed_request(server: &MockServer, token: &str) -> ApiRequest {
    let mut request = ApiRequest::new(
        Method::GET,
        format!("{}{}", server.uri(), FEED).parse().unwrap(),
    );
    request.set_bearer(&AccessToken::new(token)).unwrap();
    request
}

#[tokio::test]
async fn replayed_request_is_never_refreshed_again() {
    let server = MockServer::start().await;
    mount_refresh(&server, "R1", ("A2", "R2"), 0).await;

    let authenticator = authenticator(&server, Some("A1"), Some("R1")).await;
    let replay = feed_request(&server, "A0")
        .replay_with(&AccessToken::new("A1"))
        .unwrap();

    assert!(authenticator.authenticate(&replay).await.is_none());
}

#[tokio::test]
async fn single_replay_carries_new_token() {
    let server = MockServer::start().await;
    mount_refresh(&server, "R1", ("A2", "R2"), 1).await;

    let authenticator = authenticator(&server, Some("A1"), Some("R1")).await;
    let replay = authenticator
        .authenticate(&feed_request(&server, "A1"))
        .await
        .unwrap();

    assert_eq!(replay.bearer_token(), Some("A2"));
    assert_eq!(replay.attempt(), 1);
}

#[tokio::test]
async fn stale_request_reuses_token_refreshed_meanwhile() {
    let server = MockServer::start().await;
    mount_refresh(&server, "R1", ("A3", "R3"), 0).await;

    // The store already moved on to A2 while a request with A1 was in flight.
    let authenticator = authenticator(&server, Some("A2"), Some("R2")).await;
    let replay = authenticator
        .authenticate(&feed_request(&server, "A1"))
        .await
        .unwrap();

    assert_eq!(replay.bearer_token(), Some("A2"));
}
