//! Edge authentication errors

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use edgegate_verify::VerifyError;
use serde_json::json;

/// Edge authentication error.
///
/// Every variant renders as the same 401 response; the cause is only
/// visible in the gateway's own logs, never to the caller.
#[derive(Debug)]
pub enum AuthError {
    /// Mutating request without a well-formed credential
    MissingCredential,
    /// The verifier rejected the credential or could not be reached
    VerificationFailed(VerifyError),
    /// A verified identity attribute cannot travel as a header value
    InvalidIdentity(String),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        match &self {
            AuthError::MissingCredential => {
                tracing::debug!("Rejecting mutating request without a well-formed credential");
            }
            AuthError::VerificationFailed(err) => {
                tracing::debug!(error = %err, "Rejecting request after failed verification");
            }
            AuthError::InvalidIdentity(detail) => {
                tracing::warn!(detail = %detail, "Rejecting request: identity cannot be propagated");
            }
        }

        let body = Json(json!({
            "error": {
                "code": "UNAUTHORIZED",
                "message": "Authentication required",
            }
        }));

        (StatusCode::UNAUTHORIZED, body).into_response()
    }
}
