//! Credential extraction
//!
//! Classifies the authorization header and pulls the impersonation
//! target out of the query string. Pure classification: nothing here
//! fails, a value either matches the bearer shape or the request is
//! treated as credential-less.

use axum::extract::Query;
use axum::http::{HeaderValue, Uri};

/// Scheme prefix a credential must carry.
const BEARER_PREFIX: &str = "Bearer ";

/// Extract a well-formed bearer credential from an authorization header.
///
/// Returns the full header value, which travels to the verifier
/// verbatim. A value only counts as a credential when it starts with
/// the exact `Bearer ` scheme and has residual content after it;
/// anything else classifies as "no credential".
pub fn bearer_credential(header: Option<&HeaderValue>) -> Option<&str> {
    let value = header?.to_str().ok()?;
    match value.strip_prefix(BEARER_PREFIX) {
        Some(residual) if !residual.is_empty() => Some(value),
        _ => None,
    }
}

/// Pull the impersonation target out of the query string.
///
/// First occurrence wins when the parameter repeats. An empty value
/// reads the same as an absent parameter.
pub fn impersonation_target(uri: &Uri, target_param: &str) -> Option<String> {
    let Query(params) = Query::<Vec<(String, String)>>::try_from_uri(uri).ok()?;
    params
        .into_iter()
        .find(|(name, _)| name == target_param)
        .map(|(_, value)| value)
        .filter(|value| !value.is_empty())
}
