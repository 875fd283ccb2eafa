//! Mock Verification Service Implementation
//!
//! Programmable mock for testing the gateway without a running
//! authentication service:
//! - `MockVerifyService`: per-credential outcomes with call recording
//! - `MockVerifyOutcome`: Accept, Reject, Unreachable, or MalformedResponse
//!
//! Credentials with no programmed outcome are rejected, so the mock is
//! fail-closed like the real collaborator.

use crate::{IdentityContext, VerifyError, VerifyService};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// What outcome the mock should produce for a credential
#[derive(Debug, Clone, PartialEq)]
pub enum MockVerifyOutcome {
    /// Resolve the credential to this identity
    Accept(IdentityContext),
    /// Report the credential invalid with this status
    Reject(u16),
    /// Simulate a transport-level failure
    Unreachable,
    /// Simulate an unparseable response body
    MalformedResponse,
}

/// A recorded verification call for test assertions
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub credential: String,
    pub target: Option<String>,
}

/// Mock verification service with programmable per-credential outcomes.
#[derive(Debug, Clone)]
pub struct MockVerifyService {
    outcomes: Arc<Mutex<HashMap<String, MockVerifyOutcome>>>,
    history: Arc<Mutex<Vec<RecordedCall>>>,
}

impl MockVerifyService {
    /// Create a new mock verification service.
    pub fn new() -> Self {
        Self {
            outcomes: Arc::new(Mutex::new(HashMap::new())),
            history: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Program an outcome for a credential.
    pub fn program(&self, credential: impl Into<String>, outcome: MockVerifyOutcome) {
        self.outcomes
            .lock()
            .expect("outcomes lock poisoned: prior test panicked")
            .insert(credential.into(), outcome);
    }

    /// Program a credential to resolve to the given identity.
    pub fn accept(&self, credential: impl Into<String>, identity: IdentityContext) {
        self.program(credential, MockVerifyOutcome::Accept(identity));
    }

    /// Return all recorded verification calls.
    pub fn recorded_calls(&self) -> Vec<RecordedCall> {
        self.history
            .lock()
            .expect("history lock poisoned: prior test panicked")
            .clone()
    }

    /// Clear programmed outcomes and recorded calls.
    pub fn reset(&self) {
        self.outcomes
            .lock()
            .expect("outcomes lock poisoned: prior test panicked")
            .clear();
        self.history
            .lock()
            .expect("history lock poisoned: prior test panicked")
            .clear();
    }
}

impl Default for MockVerifyService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl VerifyService for MockVerifyService {
    async fn verify(
        &self,
        credential: &str,
        target: Option<&str>,
    ) -> Result<IdentityContext, VerifyError> {
        tracing::debug!(impersonation_target = ?target, "Mock verifier: recording call");
        self.history
            .lock()
            .map_err(|e| VerifyError::Request(format!("history lock poisoned: {e}")))?
            .push(RecordedCall {
                credential: credential.to_string(),
                target: target.map(str::to_string),
            });

        let outcome = self
            .outcomes
            .lock()
            .map_err(|e| VerifyError::Request(format!("outcomes lock poisoned: {e}")))?
            .get(credential)
            .cloned();

        match outcome {
            Some(MockVerifyOutcome::Accept(mut identity)) => {
                // The real collaborator resolves a target id only when a
                // target was requested; mirror that here.
                if target.is_none() {
                    identity.impersonation_target_id = None;
                }
                Ok(identity)
            }
            Some(MockVerifyOutcome::Reject(status)) => Err(VerifyError::Rejected(status)),
            Some(MockVerifyOutcome::Unreachable) => {
                Err(VerifyError::Request("simulated transport failure".to_string()))
            }
            Some(MockVerifyOutcome::MalformedResponse) => {
                Err(VerifyError::Response("simulated unparseable body".to_string()))
            }
            None => Err(VerifyError::Rejected(401)),
        }
    }
}
