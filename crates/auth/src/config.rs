//! Edge authentication configuration

use axum::http::{HeaderName, Method};

/// Edge authentication configuration.
///
/// The bypass method set, the impersonation query parameter, and the
/// injected header names are all configurable so the gateway can sit in
/// front of API surfaces with different propagation conventions. The
/// defaults match the authentication service contract.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Methods that may proceed as guest without a credential
    pub bypass_methods: Vec<Method>,
    /// Query parameter naming the impersonation target
    pub target_param: String,
    /// Injected header carrying the caller role
    pub role_header: HeaderName,
    /// Injected header carrying the subject id
    pub subject_header: HeaderName,
    /// Injected header carrying the display name
    pub username_header: HeaderName,
    /// Injected header carrying the resolved impersonation target id
    pub target_uuid_header: HeaderName,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            bypass_methods: vec![Method::GET],
            target_param: "targetUsername".to_string(),
            role_header: HeaderName::from_static("role"),
            subject_header: HeaderName::from_static("uuid"),
            username_header: HeaderName::from_static("username"),
            target_uuid_header: HeaderName::from_static("targetuuid"),
        }
    }
}

impl AuthConfig {
    /// Create auth config from environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        let defaults = Self::default();

        let bypass_methods = match std::env::var("AUTH_BYPASS_METHODS") {
            Ok(raw) => raw
                .split(',')
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(|name| {
                    Method::from_bytes(name.to_ascii_uppercase().as_bytes()).map_err(|_| {
                        anyhow::anyhow!("AUTH_BYPASS_METHODS contains an invalid method: {name}")
                    })
                })
                .collect::<anyhow::Result<Vec<_>>>()?,
            Err(_) => defaults.bypass_methods,
        };

        let target_param =
            std::env::var("AUTH_TARGET_PARAM").unwrap_or_else(|_| defaults.target_param);

        Ok(Self {
            bypass_methods,
            target_param,
            role_header: header_from_env("AUTH_ROLE_HEADER", defaults.role_header)?,
            subject_header: header_from_env("AUTH_SUBJECT_HEADER", defaults.subject_header)?,
            username_header: header_from_env("AUTH_USERNAME_HEADER", defaults.username_header)?,
            target_uuid_header: header_from_env(
                "AUTH_TARGET_UUID_HEADER",
                defaults.target_uuid_header,
            )?,
        })
    }
}

fn header_from_env(var: &str, default: HeaderName) -> anyhow::Result<HeaderName> {
    match std::env::var(var) {
        Ok(raw) => raw
            .parse::<HeaderName>()
            .map_err(|_| anyhow::anyhow!("{var} is not a valid header name: {raw}")),
        Err(_) => Ok(default),
    }
}
