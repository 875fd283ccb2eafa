//! Request validation middleware
//!
//! The gateway's single decision point: every request passes through
//! `validate`, which runs the bypass policy, calls the verifier when a
//! credential is present, rewrites the identity headers, and fails
//! closed on anything it cannot vouch for.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::{self, Next},
    response::Response,
    Router,
};
use edgegate_verify::VerifyService;

use crate::{
    bearer_credential, impersonation_target, propagate_guest, propagate_identity, AuthConfig,
    AuthError, BypassPolicy, RouteAction,
};

/// State carried by the validation middleware.
#[derive(Clone)]
pub struct ValidationState {
    verifier: Arc<dyn VerifyService>,
    policy: BypassPolicy,
    config: Arc<AuthConfig>,
}

impl ValidationState {
    pub fn new(verifier: Arc<dyn VerifyService>, config: AuthConfig) -> Self {
        let policy = BypassPolicy::new(config.bypass_methods.clone());
        Self {
            verifier,
            policy,
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> &AuthConfig {
        &self.config
    }
}

/// Apply the validation middleware to a router.
///
/// ```ignore
/// let guarded = edgegate_auth::apply(router, ValidationState::new(verifier, config));
/// ```
pub fn apply(router: Router, state: ValidationState) -> Router {
    router.layer(middleware::from_fn_with_state(state, validate))
}

/// Decide, for one request, between guest forwarding, verified
/// forwarding, and rejection.
pub async fn validate(
    State(state): State<ValidationState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let credential = bearer_credential(req.headers().get(AUTHORIZATION)).map(str::to_string);

    match state.policy.evaluate(req.method(), credential.is_some()) {
        RouteAction::ProceedAsGuest => {
            tracing::debug!(method = %req.method(), path = %req.uri().path(), "Forwarding as guest");
            propagate_guest(req.headers_mut(), &state.config);
            Ok(next.run(req).await)
        }
        RouteAction::RejectImmediately => Err(AuthError::MissingCredential),
        RouteAction::RequireVerification => {
            // evaluate returns RequireVerification only when a credential exists
            let Some(credential) = credential else {
                return Err(AuthError::MissingCredential);
            };
            let target = impersonation_target(req.uri(), &state.config.target_param);
            if let Some(target) = target.as_deref() {
                tracing::debug!(impersonation_target = %target, "Impersonation target requested");
            }

            let identity = state
                .verifier
                .verify(&credential, target.as_deref())
                .await
                .map_err(AuthError::VerificationFailed)?;

            tracing::debug!(
                subject_id = %identity.subject_id,
                role = %identity.role,
                "Forwarding verified request"
            );
            propagate_identity(req.headers_mut(), &state.config, &identity)?;
            Ok(next.run(req).await)
        }
    }
}
