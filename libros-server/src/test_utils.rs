//! Shared fixtures and helpers for endpoint tests.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use libros_policy::{issue_claims, ClaimSet, SubjectProfile};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::MockServer;

use crate::config::{AppConfig, OAuthClientConfig};
use crate::state::AppState;
use crate::store::BookStore;
use crate::verifier::{TokenVerifier, VerifyError};

/// Verifier that resolves a fixed set of opaque test tokens to claim sets,
/// standing in for real JWT validation.
pub struct StaticTokenVerifier {
    tokens: HashMap<String, ClaimSet>,
}

impl StaticTokenVerifier {
    /// The demo subjects the sample catalog is partitioned for, plus two
    /// deliberately broken tokens.
    pub fn with_demo_subjects() -> Self {
        let mut tokens = HashMap::new();
        tokens.insert(
            "admin-token".to_string(),
            issue_claims(
                "admin",
                &SubjectProfile::new(
                    &["ADMIN"],
                    &["PROGRAMMING", "FRAMEWORKS", "ARCHITECTURE"],
                    &[
                        "Robert C. Martin",
                        "Joshua Bloch",
                        "David Thomas",
                        "Gang of Four",
                        "Craig Walls",
                        "Chris Richardson",
                        "Eric Evans",
                    ],
                ),
            ),
        );
        tokens.insert(
            "client1-token".to_string(),
            issue_claims(
                "client1",
                &SubjectProfile::new(
                    &["CLIENT"],
                    &["PROGRAMMING"],
                    &["Robert C. Martin", "Joshua Bloch"],
                ),
            ),
        );
        tokens.insert(
            "client2-token".to_string(),
            issue_claims(
                "client2",
                &SubjectProfile::new(
                    &["CLIENT"],
                    &["FRAMEWORKS", "ARCHITECTURE"],
                    &["Craig Walls", "Chris Richardson", "Eric Evans"],
                ),
            ),
        );
        // Write scope without the admin role; not issuable through the
        // normal profile path, but a hostile token could carry it.
        tokens.insert(
            "elevated-client-token".to_string(),
            claims_object(json!({
                "sub": "elevated-client",
                "scope": "libros.read libros.write",
                "roles": ["ROLE_CLIENT"],
                "categorias": ["PROGRAMMING"],
                "autores": ["Robert C. Martin"],
            })),
        );
        tokens.insert(
            "no-subject-token".to_string(),
            claims_object(json!({ "scope": "libros.read" })),
        );
        Self { tokens }
    }
}

fn claims_object(value: Value) -> ClaimSet {
    value
        .as_object()
        .cloned()
        .expect("claim literals are json objects")
}

#[async_trait]
impl TokenVerifier for StaticTokenVerifier {
    async fn verify(&self, token: &str) -> Result<ClaimSet, VerifyError> {
        self.tokens.get(token).cloned().ok_or_else(|| {
            VerifyError::Jwt(jsonwebtoken::errors::ErrorKind::InvalidSignature.into())
        })
    }
}

/// Config for tests that never reach the network.
pub fn placeholder_config() -> AppConfig {
    AppConfig {
        port: 0,
        oauth: OAuthClientConfig {
            client_id: "test-client".to_string(),
            client_secret: "test-secret".to_string(),
            authorization_server: "http://localhost:9000".to_string(),
        },
    }
}

/// Full application wired against a mock authorization server, a freshly
/// seeded catalog and [`StaticTokenVerifier`] tokens.
pub struct TestFixture {
    pub app: Router,
    pub auth_server: MockServer,
}

impl TestFixture {
    pub async fn new() -> Self {
        init_logging();
        let auth_server = MockServer::start().await;
        let config = AppConfig::for_test_with_mocks(&auth_server);
        let state = AppState::for_testing(
            config,
            Arc::new(BookStore::with_sample_catalog()),
            Arc::new(StaticTokenVerifier::with_demo_subjects()),
        );

        Self {
            app: crate::create_app(state),
            auth_server,
        }
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> TestResponse {
        let request = request_builder("GET", uri, token)
            .body(Body::empty())
            .expect("valid request");
        self.dispatch(request).await
    }

    pub async fn post_json<B: Serialize + ?Sized>(
        &self,
        uri: &str,
        body: &B,
        token: Option<&str>,
    ) -> TestResponse {
        let payload = serde_json::to_vec(body).expect("serializable body");
        let request = request_builder("POST", uri, token)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(payload))
            .expect("valid request");
        self.dispatch(request).await
    }

    pub async fn delete(&self, uri: &str, token: Option<&str>) -> TestResponse {
        let request = request_builder("DELETE", uri, token)
            .body(Body::empty())
            .expect("valid request");
        self.dispatch(request).await
    }

    async fn dispatch(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .app
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");
        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("collected body")
            .to_bytes();
        // Rejections generated by axum itself carry plain-text bodies.
        let json = serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));

        TestResponse { status, json }
    }
}

fn request_builder(method: &str, uri: &str, token: Option<&str>) -> axum::http::request::Builder {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder
}

pub struct TestResponse {
    pub status: StatusCode,
    pub json: Value,
}

impl TestResponse {
    #[track_caller]
    pub fn assert_status(&self, expected: StatusCode) {
        assert_eq!(
            self.status, expected,
            "unexpected status, body: {}",
            self.json
        );
    }

    #[track_caller]
    pub fn assert_ok(&self) {
        self.assert_status(StatusCode::OK);
    }

    /// Deserializes the body into the expected response type.
    pub fn json_as<T: DeserializeOwned>(&self) -> T {
        serde_json::from_value(self.json.clone()).expect("body matches the expected shape")
    }

    /// The `"error"` code of an error envelope, if the body carries one.
    pub fn error_code(&self) -> Option<&str> {
        self.json["error"].as_str()
    }
}

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}
