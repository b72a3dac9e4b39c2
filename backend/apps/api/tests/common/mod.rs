//! Shared helpers for the HTTP tests

#![allow(dead_code)]

use std::collections::HashMap;

use api::{AppConfig, build_app};
use auth::InMemoryUserRepository;
use axum::Router;
use axum::body::Body;
use axum::http::{HeaderMap, Method, Request, StatusCode, header};
use http_body_util::BodyExt;
use platform::password::PasswordHashConfig;
use serde_json::Value;
use task::InMemoryTaskRepository;
use tower::ServiceExt;

pub const PASSWORD: &str = "Passw0rd1";

pub struct TestApp {
    pub router: Router,
    pub users: InMemoryUserRepository,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl TestResponse {
    /// RFC 7807 `detail`
    pub fn detail(&self) -> &str {
        self.body["detail"].as_str().unwrap_or_default()
    }

    pub fn set_cookie(&self) -> Option<&str> {
        self.headers
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
    }
}

impl TestApp {
    /// App in the `test` environment with cheap password hashing
    pub fn new() -> Self {
        Self::with_env(&[("APP_ENV", "test")])
    }

    pub fn with_env(pairs: &[(&str, &str)]) -> Self {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let mut config = AppConfig::from_lookup(|key| env.get(key).cloned()).unwrap();
        config.auth.password_hash = PasswordHashConfig::minimal();

        let users = InMemoryUserRepository::new();
        let router = build_app(&config, users.clone(), InMemoryTaskRepository::new()).unwrap();
        Self { router, users }
    }

    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        TestResponse {
            status,
            headers,
            body,
        }
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        self.send(request).await
    }

    pub async fn get(&self, uri: &str, token: &str) -> TestResponse {
        self.request(Method::GET, uri, Some(token), None).await
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> TestResponse {
        self.request(Method::POST, uri, token, Some(body)).await
    }

    pub async fn patch(&self, uri: &str, token: &str, body: Value) -> TestResponse {
        self.request(Method::PATCH, uri, Some(token), Some(body)).await
    }

    pub async fn delete(&self, uri: &str, token: &str) -> TestResponse {
        self.request(Method::DELETE, uri, Some(token), None).await
    }

    pub async fn sign_up(&self, name: &str, email: &str) -> TestResponse {
        self.post(
            "/api/auth/signup",
            None,
            serde_json::json!({
                "name": name,
                "email": email,
                "password": PASSWORD,
                "passwordConfirm": PASSWORD,
            }),
        )
        .await
    }

    /// Sign up and return the access token
    pub async fn user_token(&self, name: &str, email: &str) -> String {
        let response = self.sign_up(name, email).await;
        assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);
        response.body["accessToken"].as_str().unwrap().to_string()
    }

    pub async fn login(&self, email: &str, password: &str) -> TestResponse {
        self.post(
            "/api/auth/login",
            None,
            serde_json::json!({ "email": email, "password": password }),
        )
        .await
    }

    /// Login as sent through a proxy chain
    pub async fn login_forwarded_for(
        &self,
        email: &str,
        password: &str,
        forwarded_for: &str,
    ) -> TestResponse {
        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/auth/login")
            .header(header::CONTENT_TYPE, "application/json")
            .header("x-forwarded-for", forwarded_for)
            .body(Body::from(
                serde_json::json!({ "email": email, "password": password }).to_string(),
            ))
            .unwrap();
        self.send(request).await
    }
}
