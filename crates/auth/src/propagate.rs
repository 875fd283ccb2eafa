//! Identity propagation
//!
//! Rewrites the forwarded request's headers so the upstream always sees
//! an identity minted by the gateway and never one supplied by the
//! caller.

use axum::http::{HeaderMap, HeaderValue};
use edgegate_verify::{IdentityContext, Role};

use crate::{AuthConfig, AuthError};

/// Remove caller-supplied copies of the identity headers.
///
/// Downstream consumers trust these headers implicitly, so values
/// arriving from the outside must never survive past the gateway.
pub fn strip_identity_headers(headers: &mut HeaderMap, config: &AuthConfig) {
    headers.remove(&config.role_header);
    headers.remove(&config.subject_header);
    headers.remove(&config.username_header);
    headers.remove(&config.target_uuid_header);
}

/// Mark the request as guest: role header only, no subject attributes.
pub fn propagate_guest(headers: &mut HeaderMap, config: &AuthConfig) {
    strip_identity_headers(headers, config);
    headers.insert(&config.role_header, HeaderValue::from_static(Role::GUEST));
}

/// Attach a verified identity to the request.
///
/// The impersonation target id travels only when the verifier resolved
/// one. Empty attributes still travel as empty header values.
pub fn propagate_identity(
    headers: &mut HeaderMap,
    config: &AuthConfig,
    identity: &IdentityContext,
) -> Result<(), AuthError> {
    strip_identity_headers(headers, config);

    headers.insert(&config.role_header, identity_value(identity.role.as_str())?);
    headers.insert(&config.subject_header, identity_value(&identity.subject_id)?);
    headers.insert(
        &config.username_header,
        identity_value(&identity.display_name)?,
    );
    if let Some(target) = &identity.impersonation_target_id {
        headers.insert(&config.target_uuid_header, identity_value(target)?);
    }

    Ok(())
}

fn identity_value(value: &str) -> Result<HeaderValue, AuthError> {
    HeaderValue::from_str(value)
        .map_err(|_| AuthError::InvalidIdentity(format!("not a valid header value: {value:?}")))
}
