//! Edgegate verification service
//!
//! Client for the external authentication service that authoritatively
//! decides credential validity, with support for:
//! - HTTP verification client for production
//! - Mock verification service for testing and development
//! - Configurable endpoint, transport timeout, and impersonation header
//!
//! The gateway performs no local signature or expiry checking; every
//! validity decision comes from this service, once per request.

pub mod client;
pub mod mock;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum VerifyError {
    #[error("Verifier configuration error: {0}")]
    Configuration(String),

    #[error("Verifier request error: {0}")]
    Request(String),

    #[error("Verifier rejected credential with status {0}")]
    Rejected(u16),

    #[error("Verifier response error: {0}")]
    Response(String),
}

/// Role attribute of a caller.
///
/// The set is open: the gateway forwards whatever role string the
/// authentication service returns and only ever synthesizes the guest
/// role itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Role(String);

impl Role {
    /// Role attached to unauthenticated read-only callers.
    pub const GUEST: &'static str = "GUEST";

    pub fn new(role: impl Into<String>) -> Self {
        Self(role.into())
    }

    pub fn guest() -> Self {
        Self(Self::GUEST.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_guest(&self) -> bool {
        self.0 == Self::GUEST
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Role {
    fn from(role: &str) -> Self {
        Self::new(role)
    }
}

impl From<String> for Role {
    fn from(role: String) -> Self {
        Self(role)
    }
}

/// Identity attributes attached to a request before it reaches the next
/// stage.
///
/// Built either synthetically (guest path) or from the authentication
/// service's response. Request-scoped: created per verification call,
/// never cached, never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityContext {
    /// Stable subject identifier, empty for guests
    pub subject_id: String,
    /// Caller role, always present
    pub role: Role,
    /// Human-readable display name, empty for guests
    pub display_name: String,
    /// Resolved impersonation target, when one was requested and confirmed
    pub impersonation_target_id: Option<String>,
}

impl IdentityContext {
    /// Synthetic context for unauthenticated read-only callers.
    pub fn guest() -> Self {
        Self {
            subject_id: String::new(),
            role: Role::guest(),
            display_name: String::new(),
            impersonation_target_id: None,
        }
    }
}

/// Verification service configuration.
#[derive(Debug, Clone)]
pub struct VerifyConfig {
    /// Verifier provider (http, mock)
    pub provider: String,
    /// Base URL of the authentication service
    pub base_url: String,
    /// Transport timeout for the verification call, in seconds
    pub timeout_secs: u64,
    /// Outbound header carrying the impersonation target
    pub target_header: String,
}

const DEFAULT_TIMEOUT_SECS: u64 = 5;

impl VerifyConfig {
    /// Create verification config from environment variables.
    pub fn from_env() -> Result<Self, VerifyError> {
        let provider = std::env::var("VERIFY_PROVIDER").unwrap_or_else(|_| "http".to_string());

        let base_url = std::env::var("VERIFY_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:8082".to_string());

        let timeout_secs = match std::env::var("VERIFY_TIMEOUT_SECS") {
            Ok(raw) => raw.parse().map_err(|_| {
                VerifyError::Configuration(format!(
                    "VERIFY_TIMEOUT_SECS must be a number of seconds, got: {raw}"
                ))
            })?,
            Err(_) => DEFAULT_TIMEOUT_SECS,
        };

        let target_header = std::env::var("VERIFY_TARGET_HEADER")
            .unwrap_or_else(|_| "targetUsername".to_string());

        if provider != "mock" && base_url.is_empty() {
            return Err(VerifyError::Configuration(
                "VERIFY_BASE_URL is required for the http provider".to_string(),
            ));
        }

        Ok(Self {
            provider,
            base_url,
            timeout_secs,
            target_header,
        })
    }
}

/// Verification service trait for different implementations.
///
/// One call per inbound request that requires verification; results are
/// never reused across requests.
#[async_trait::async_trait]
pub trait VerifyService: Send + Sync {
    /// Verify a bearer credential with the authentication service.
    ///
    /// `credential` is the full `Authorization` value as received from the
    /// caller; `target` is the impersonation target to resolve, when one
    /// was requested.
    async fn verify(
        &self,
        credential: &str,
        target: Option<&str>,
    ) -> Result<IdentityContext, VerifyError>;
}

/// Factory for creating VerifyService implementations.
pub struct VerifyServiceFactory;

impl VerifyServiceFactory {
    /// Create a VerifyService based on configuration.
    pub fn create(config: VerifyConfig) -> Result<Box<dyn VerifyService>, VerifyError> {
        match config.provider.as_str() {
            "http" => {
                tracing::info!(base_url = %config.base_url, "Creating HTTP verification client");
                Ok(Box::new(client::HttpVerifyClient::new(config)?))
            }
            "mock" => {
                tracing::info!("Creating mock verification service");
                Ok(Box::new(mock::MockVerifyService::new()))
            }
            provider => Err(VerifyError::Configuration(format!(
                "Unknown verifier provider: {}. Supported providers: http, mock",
                provider
            ))),
        }
    }
}
