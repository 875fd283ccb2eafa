//! Edgegate application composition root
//!
//! Composes the validation middleware and the upstream forwarder into a
//! single gateway application.

pub mod proxy;

use std::sync::Arc;

use axum::Router;
use edgegate_auth::{AuthConfig, ValidationState};
use edgegate_common::Config;
use edgegate_verify::{VerifyConfig, VerifyService, VerifyServiceFactory};

/// Create the gateway router, wiring collaborators from the environment
pub fn create_app(config: &Config) -> Result<Router, anyhow::Error> {
    // Create the verification service from environment
    let verify_config = VerifyConfig::from_env()?;
    let verifier = VerifyServiceFactory::create(verify_config)?;

    // Create validation middleware config from environment
    let auth_config = AuthConfig::from_env()?;

    compose(&config.upstream_base_url, Arc::from(verifier), auth_config)
}

/// Compose the gateway router from explicit collaborators
pub fn compose(
    upstream_base_url: &str,
    verifier: Arc<dyn VerifyService>,
    auth_config: AuthConfig,
) -> Result<Router, anyhow::Error> {
    let proxy_state = proxy::ProxyState::new(upstream_base_url)?;

    // Every request not matched by an infrastructure route falls through to
    // the guarded relay
    let guarded = edgegate_auth::apply(
        proxy::routes().with_state(proxy_state),
        ValidationState::new(verifier, auth_config),
    );

    let app = Router::new()
        .route("/health", axum::routing::get(health_check))
        .route("/", axum::routing::get(|| async { "Edgegate v0.1.0" }))
        .merge(guarded);

    Ok(app)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
