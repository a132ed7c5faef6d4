use axum::response::IntoResponse;
use axum::Json;
use http::StatusCode;
use libros_policy::{AccessDecision, DecisionReason};
use serde_json::json;

/// Error envelope for every non-2xx response the service emits.
///
/// The body is `{"error", "message"}` plus a `"reason"` code on policy
/// denials. Keeping 401 and 403 distinct here is deliberate: callers must be
/// able to tell a missing identity from an insufficient one.
#[derive(Debug, Clone)]
pub struct ApiError {
    pub error: &'static str,
    pub message: String,
    pub reason: Option<DecisionReason>,
    pub status_code: StatusCode,
}

impl ApiError {
    fn new<S: ToString>(error: &'static str, message: S, status_code: StatusCode) -> Self {
        Self {
            error,
            message: message.to_string(),
            reason: None,
            status_code,
        }
    }

    /// 401: no usable bearer identity reached a protected operation.
    pub fn authentication_required<S: ToString>(message: S) -> Self {
        Self::new(
            "authentication_required",
            message,
            StatusCode::UNAUTHORIZED,
        )
    }

    /// 403: an authenticated principal failed a policy gate.
    pub fn denied(decision: AccessDecision) -> Self {
        let mut error = Self::new(
            "authorization_denied",
            decision.reason,
            StatusCode::FORBIDDEN,
        );
        error.reason = Some(decision.reason);
        error
    }

    /// 404: the requested record does not exist.
    pub fn not_found<S: ToString>(message: S) -> Self {
        Self::new("not_found", message, StatusCode::NOT_FOUND)
    }

    /// 400: the request was rejected locally, before any outbound call.
    pub fn invalid_request<S: ToString>(message: S) -> Self {
        Self::new("invalid_request", message, StatusCode::BAD_REQUEST)
    }

    /// 400: the authorization server rejected or never answered an exchange.
    /// `error` is the flow-specific code the browser client switches on.
    pub fn upstream<S: ToString>(error: &'static str, message: S) -> Self {
        Self::new(error, message, StatusCode::BAD_REQUEST)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let mut body = json!({
            "error": self.error,
            "message": self.message,
        });
        if let Some(reason) = self.reason {
            body["reason"] = json!(reason);
        }
        (self.status_code, Json(body)).into_response()
    }
}
