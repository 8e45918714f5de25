//! Registration, login, and bearer authentication over HTTP

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};

mod common;

use common::{authed, login_request, register_request, TestApp};

#[tokio::test]
async fn test_health() {
    let app = TestApp::new();

    let response = app
        .raw(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await;

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_register_user() {
    let app = TestApp::new();

    let (status, json) = app.send(register_request("user2", "user2@mail.com")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["username"], "user2");
    assert_eq!(json["email"], "user2@mail.com");
    assert!(json["id"].is_i64());
    assert!(json.get("password").is_none());
    assert!(json.get("password_hash").is_none());
}

#[tokio::test]
async fn test_register_duplicate_user() {
    let app = TestApp::new();
    app.register("user2").await;

    let (status, json) = app.send(register_request("user2", "another@mail.com")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["detail"], "User exists");
}

#[tokio::test]
async fn test_register_creates_zero_balance_account() {
    let app = TestApp::new();
    app.register("fresh").await;
    let token = app.login("fresh").await;

    let (status, json) = app.send(authed("GET", "/show-balance", &token)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["user_balance"], "0");
}

#[tokio::test]
async fn test_login_user() {
    let app = TestApp::new();
    app.register("user").await;

    let (status, json) = app.send(login_request("user", common::PASSWORD)).await;

    assert_eq!(status, StatusCode::OK);
    assert!(json["access_token"].is_string());
    assert_eq!(json["token_type"], "bearer");
}

#[tokio::test]
async fn test_fail_login() {
    let app = TestApp::new();

    let response = app.raw(login_request("fakeuser", "fakepassword")).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        response.headers().get(header::WWW_AUTHENTICATE).unwrap(),
        "Bearer"
    );
    let json = common::body_json(response).await;
    assert_eq!(json["detail"], "Incorrect username or password");
}

#[tokio::test]
async fn test_wrong_password() {
    let app = TestApp::new();
    app.register("user").await;

    let (status, _) = app.send(login_request("user", "not-the-password")).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_protected_route_requires_token() {
    let app = TestApp::new();

    let request = Request::builder()
        .method("GET")
        .uri("/show-balance")
        .body(Body::empty())
        .unwrap();
    let (status, json) = app.send(request).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["detail"], "Could not validate credentials");
}

#[tokio::test]
async fn test_protected_route_rejects_bogus_token() {
    let app = TestApp::new();

    let (status, _) = app.send(authed("POST", "/deposit?amount=10", "not.a.jwt")).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_correlation_id_echoed() {
    let app = TestApp::new();
    let correlation_id = "6f1c2f6e-2a57-4c36-9a0b-3c4a4f1d2e11";

    let response = app
        .raw(
            Request::builder()
                .uri("/health")
                .header("X-Correlation-Id", correlation_id)
                .body(Body::empty())
                .unwrap(),
        )
        .await;

    assert_eq!(
        response.headers().get("x-correlation-id").unwrap(),
        correlation_id
    );
}
