//! HTTP Verification Client Implementation
//!
//! Real HTTP client that calls the authentication service's
//! `GET {base_url}/validate` endpoint, forwarding the caller's
//! credential verbatim and parsing the identity payload it returns.

use std::time::Duration;

use serde::Deserialize;

use crate::{IdentityContext, Role, VerifyConfig, VerifyError, VerifyService};

/// Identity payload returned by the authentication service.
///
/// Parsing is lenient: the service owns this shape, and fields it omits
/// degrade to empty attributes instead of failing the request. Unknown
/// fields are ignored.
#[derive(Debug, Deserialize)]
struct ValidatePayload {
    #[serde(default)]
    uuid: String,
    #[serde(default)]
    role: String,
    #[serde(default)]
    username: String,
    #[serde(rename = "targetUUID")]
    target_uuid: Option<String>,
}

/// Real HTTP client for the external authentication service.
///
/// Cheap to clone via the inner `reqwest::Client`; one instance is
/// shared by all in-flight requests.
pub struct HttpVerifyClient {
    http: reqwest::Client,
    validate_url: String,
    target_header: String,
}

impl HttpVerifyClient {
    /// Create a new verification client from configuration.
    pub fn new(config: VerifyConfig) -> Result<Self, VerifyError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| {
                VerifyError::Configuration(format!("Failed to build HTTP client: {}", e))
            })?;

        let validate_url = format!("{}/validate", config.base_url.trim_end_matches('/'));

        Ok(Self {
            http,
            validate_url,
            target_header: config.target_header,
        })
    }
}

#[async_trait::async_trait]
impl VerifyService for HttpVerifyClient {
    async fn verify(
        &self,
        credential: &str,
        target: Option<&str>,
    ) -> Result<IdentityContext, VerifyError> {
        let mut request = self
            .http
            .get(&self.validate_url)
            .header(reqwest::header::AUTHORIZATION, credential);

        if let Some(target) = target {
            request = request.header(self.target_header.as_str(), target);
        }

        let response = request
            .send()
            .await
            .map_err(|e| VerifyError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            tracing::debug!(status = %status, "Verifier rejected credential");
            return Err(VerifyError::Rejected(status.as_u16()));
        }

        let payload: ValidatePayload = response
            .json()
            .await
            .map_err(|e| VerifyError::Response(e.to_string()))?;

        tracing::debug!(subject_id = %payload.uuid, role = %payload.role, "Credential verified");

        Ok(IdentityContext {
            subject_id: payload.uuid,
            role: Role::new(payload.role),
            display_name: payload.username,
            impersonation_target_id: payload.target_uuid,
        })
    }
}
