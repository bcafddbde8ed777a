// Shared helpers for the integration tests
#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, HeaderMap, Method, Request, StatusCode},
    Router,
};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use saas_forge::api::{auth::SessionClaims, create_router};
use saas_forge::{AppConfig, AppState, AuthConfig};
use serde_json::Value;
use tower::ServiceExt;

pub const SECRET: &str = "integration-test-secret";
pub const USER_ID: &str = "user_2abc";

/// App configuration with HS256 auth and nothing else configured
pub fn base_config() -> AppConfig {
    AppConfig {
        auth: AuthConfig::with_secret(SECRET),
        ..AppConfig::default()
    }
}

pub fn app(config: AppConfig) -> Router {
    create_router(AppState::new(config), true)
}

/// A valid session token for `user_id`
pub fn token_for(user_id: &str) -> String {
    let claims = SessionClaims {
        sub: user_id.to_string(),
        exp: (chrono::Utc::now().timestamp() + 3600) as usize,
    };
    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(SECRET.as_bytes()),
    )
    .unwrap()
}

pub fn token() -> String {
    token_for(USER_ID)
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

/// Send one request through the router; an empty body decodes as `null`
pub async fn send(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> TestResponse {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }

    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = hyper::body::to_bytes(response.into_body()).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| {
            Value::String(String::from_utf8_lossy(&bytes).into_owned())
        })
    };

    TestResponse {
        status,
        headers,
        body,
    }
}

pub async fn get(app: Router, uri: &str, token: Option<&str>) -> TestResponse {
    send(app, Method::GET, uri, token, None).await
}

pub async fn post(app: Router, uri: &str, token: Option<&str>, body: Value) -> TestResponse {
    send(app, Method::POST, uri, token, Some(body)).await
}
