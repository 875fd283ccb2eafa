//! Bypass policy
//!
//! Decides from the HTTP method and credential presence whether a
//! request must be verified before forwarding, may proceed as guest, or
//! is rejected outright. Guests can read but never write.

use axum::http::Method;

/// What to do with a request before forwarding it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteAction {
    /// Forward with the synthetic guest identity, no verification call
    ProceedAsGuest,
    /// Verify the credential before forwarding
    RequireVerification,
    /// Reject with 401: no forwarding, no verification call
    RejectImmediately,
}

/// Method-based bypass policy.
#[derive(Debug, Clone)]
pub struct BypassPolicy {
    bypass_methods: Vec<Method>,
}

impl BypassPolicy {
    pub fn new(bypass_methods: Vec<Method>) -> Self {
        Self { bypass_methods }
    }

    /// Decide the route action for a request.
    ///
    /// A present credential always goes to the verifier, whatever the
    /// method. Without one, bypass methods proceed as guest and
    /// everything else is rejected.
    pub fn evaluate(&self, method: &Method, has_credential: bool) -> RouteAction {
        if has_credential {
            RouteAction::RequireVerification
        } else if self.bypass_methods.contains(method) {
            RouteAction::ProceedAsGuest
        } else {
            RouteAction::RejectImmediately
        }
    }
}
