//! Common test utilities

#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Request, Response, StatusCode},
    Router,
};
use finance_ledger::api::{self, AppState};
use finance_ledger::auth::{hash_password, TokenIssuer};
use finance_ledger::domain::NewUser;
use finance_ledger::store::MemoryStore;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::util::ServiceExt;

pub const PASSWORD: &str = "test";

/// Router over a fresh in-memory store
pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryStore>,
}

impl TestApp {
    pub fn new() -> Self {
        let store = Arc::new(MemoryStore::new());
        let state = AppState::new(
            store.clone(),
            store.clone(),
            TokenIssuer::new(b"test-secret", 20).unwrap(),
        );

        Self {
            router: api::create_router(state),
            store,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        (status, body_json(response).await)
    }

    pub async fn raw(&self, request: Request<Body>) -> Response<Body> {
        self.router.clone().oneshot(request).await.unwrap()
    }

    /// Register through the API and return the new user id
    pub async fn register(&self, username: &str) -> i64 {
        let (status, json) = self
            .send(register_request(username, &format!("{}@example.com", username)))
            .await;
        assert_eq!(status, StatusCode::OK, "registration failed: {}", json);
        json["id"].as_i64().unwrap()
    }

    /// Insert a user that has no account row
    pub fn insert_user_without_account(&self, username: &str) -> i64 {
        self.store
            .insert_user(&NewUser {
                username: username.to_string(),
                email: format!("{}@example.com", username),
                password_hash: hash_password(PASSWORD).unwrap(),
            })
            .id
    }

    pub async fn login(&self, username: &str) -> String {
        let (status, json) = self.send(login_request(username, PASSWORD)).await;
        assert_eq!(status, StatusCode::OK, "login failed: {}", json);
        json["access_token"].as_str().unwrap().to_string()
    }

    /// Register, log in, and deposit `balance` when non-zero
    pub async fn user_with_balance(&self, username: &str, balance: &str) -> (i64, String) {
        let id = self.register(username).await;
        let token = self.login(username).await;

        if balance != "0" {
            let (status, _) = self
                .send(authed("POST", &format!("/deposit?amount={}", balance), &token))
                .await;
            assert_eq!(status, StatusCode::OK);
        }

        (id, token)
    }
}

pub fn register_request(username: &str, email: &str) -> Request<Body> {
    let body = serde_json::json!({
        "username": username,
        "email": email,
        "password": PASSWORD,
    });

    Request::builder()
        .method("POST")
        .uri("/register")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn login_request(username: &str, password: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/authorization")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(format!("username={}&password={}", username, password)))
        .unwrap()
}

pub fn authed(method: &str, uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap()
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    if bytes.is_empty() {
        return Value::Null;
    }
    serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
}
