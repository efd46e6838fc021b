#![allow(clippy::unwrap_used)]
// Integration tests for `Client` using wiremock.

use pretty_assertions::assert_eq;
use serde_json::json;
use url::Url;
use uuid::Uuid;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use lanportal_api::{Client, Error, Login, UserInput};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, Client) {
    let server = MockServer::start().await;
    let base_url = Url::parse(&format!("{}/api", server.uri())).unwrap();
    let client = Client::with_client(reqwest::Client::new(), base_url);
    (server, client)
}

fn user_json(id: Uuid, is_allowed: bool) -> serde_json::Value {
    json!({
        "id": id,
        "username": "ana",
        "firstname": "Ana",
        "lastname": "Lopez",
        "email": "ana@example.org",
        "phone": "0601020304",
        "role": "user",
        "is_allowed": is_allowed
    })
}

// ── Authentication tests ────────────────────────────────────────────

#[tokio::test]
async fn test_login_success() {
    let (server, client) = setup().await;
    let user_id = Uuid::new_v4();

    Mock::given(method("POST"))
        .and(path("/api/login"))
        .and(body_json(json!({ "username": "ana", "password": "hunter22" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "biscuit": "token-123",
            "role": "user",
            "user_id": user_id
        })))
        .mount(&server)
        .await;

    let creds = client.login(&Login::new("ana", "hunter22")).await.unwrap();

    assert_eq!(creds.biscuit, "token-123");
    assert_eq!(creds.user_id, user_id);
    assert!(!creds.is_admin());
}

#[tokio::test]
async fn test_login_failure_carries_body_text() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/login"))
        .respond_with(ResponseTemplate::new(403).set_body_string("mot de passe incorrect"))
        .mount(&server)
        .await;

    let result = client.login(&Login::new("ana", "wrong")).await;

    match result {
        Err(Error::Api { status, ref body }) => {
            assert_eq!(status, 403);
            assert_eq!(body, "mot de passe incorrect");
        }
        other => panic!("expected Api error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_create_user_posts_form() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/users"))
        .and(body_json(json!({
            "username": "ana",
            "firstname": "Ana",
            "lastname": "Lopez",
            "email": "ana@example.org",
            "password": "hunter22",
            "phone": "0601020304"
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let input = UserInput {
        username: "ana".into(),
        firstname: "Ana".into(),
        lastname: "Lopez".into(),
        email: "ana@example.org".into(),
        password: "hunter22".to_string().into(),
        phone: "0601020304".into(),
    };
    client.create_user(&input).await.unwrap();
}

// ── User tests ──────────────────────────────────────────────────────

#[tokio::test]
async fn test_get_user_sends_bearer_token() {
    let (server, client) = setup().await;
    let id = Uuid::new_v4();

    Mock::given(method("GET"))
        .and(path(format!("/api/users/{id}")))
        .and(header("authorization", "Bearer tok"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_json(id, true)))
        .mount(&server)
        .await;

    let user = client.get_user("tok", id).await.unwrap();

    assert_eq!(user.id, id);
    assert_eq!(user.firstname, "Ana");
    assert!(user.is_allowed);
}

#[tokio::test]
async fn test_list_users() {
    let (server, client) = setup().await;
    let (a, b) = (Uuid::new_v4(), Uuid::new_v4());

    Mock::given(method("GET"))
        .and(path("/api/users"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([user_json(a, true), user_json(b, false)])),
        )
        .mount(&server)
        .await;

    let users = client.list_users("tok").await.unwrap();

    assert_eq!(users.len(), 2);
    assert_eq!(users[1].id, b);
    assert!(!users[1].is_allowed);
}

#[tokio::test]
async fn test_set_allowed_patches_user() {
    let (server, client) = setup().await;
    let id = Uuid::new_v4();

    Mock::given(method("PATCH"))
        .and(path("/api/users"))
        .and(body_json(json!({ "id": id, "is_allowed": true })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    client.set_allowed("tok", id, true).await.unwrap();
}

// ── Device tests ────────────────────────────────────────────────────

#[tokio::test]
async fn test_list_user_devices() {
    let (server, client) = setup().await;
    let user_id = Uuid::new_v4();

    Mock::given(method("GET"))
        .and(path(format!("/api/devices/{user_id}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "id": Uuid::new_v4(),
            "mac": "aa:bb:cc:dd:ee:ff",
            "user_id": user_id,
            "internet": false,
            "date_time": "2024-06-15T10:30:00"
        }])))
        .mount(&server)
        .await;

    let devices = client.list_user_devices("tok", user_id).await.unwrap();

    assert_eq!(devices.len(), 1);
    assert_eq!(devices[0].mac, "aa:bb:cc:dd:ee:ff");
    assert!(!devices[0].internet);
}

#[tokio::test]
async fn test_add_device() {
    let (server, client) = setup().await;
    let user_id = Uuid::new_v4();

    Mock::given(method("POST"))
        .and(path("/api/devices"))
        .and(body_json(json!({ "user_id": user_id })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    client.add_device("tok", user_id).await.unwrap();
}

// ── Error tests ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_empty_error_body_falls_back_to_reason() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = client.list_users("tok").await.unwrap_err();

    assert!(matches!(err, Error::Api { status: 404, .. }));
    assert_eq!(err.to_string(), "Not Found");
}

#[tokio::test]
async fn test_malformed_body_is_deserialization_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/users"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let result = client.list_users("tok").await;

    match result {
        Err(Error::Deserialization { ref body, .. }) => assert_eq!(body, "<html>oops</html>"),
        other => panic!("expected Deserialization error, got: {other:?}"),
    }
}
