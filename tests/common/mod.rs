#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header::AUTHORIZATION, Request},
    response::Response,
    Router,
};
use libris_server::{
    api::create_router,
    config::AppConfig,
    error::{AppError, AppResult},
    repository::MemoryStore,
    services::identity::{IdentityVerifier, VerifiedIdentity},
    AppState,
};

/// Accepts tokens of the form `token:<email>`
pub struct StaticVerifier;

#[async_trait]
impl IdentityVerifier for StaticVerifier {
    async fn verify(&self, token: &str) -> AppResult<VerifiedIdentity> {
        token
            .strip_prefix("token:")
            .filter(|email| !email.is_empty())
            .map(|email| VerifiedIdentity { email: email.to_string() })
            .ok_or_else(|| AppError::Authentication("unknown token".to_string()))
    }
}

pub fn app() -> Router {
    app_with_config(AppConfig::default())
}

pub fn app_with_config(config: AppConfig) -> Router {
    let state = AppState::new(config, Arc::new(MemoryStore::new()), Arc::new(StaticVerifier));
    create_router(state)
}

pub fn bearer(email: &str) -> String {
    format!("Bearer token:{}", email)
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).expect("request")
}

pub fn authed(method: &str, uri: &str, email: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(AUTHORIZATION, bearer(email))
        .body(Body::empty())
        .expect("request")
}

pub fn json_request(
    method: &str,
    uri: &str,
    auth: Option<&str>,
    body: serde_json::Value,
) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(email) = auth {
        builder = builder.header(AUTHORIZATION, bearer(email));
    }
    builder.body(Body::from(body.to_string())).expect("request")
}

pub async fn read_json(response: Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    serde_json::from_slice(&bytes).expect("json")
}

pub async fn read_text(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    String::from_utf8(bytes.to_vec()).expect("utf8")
}
