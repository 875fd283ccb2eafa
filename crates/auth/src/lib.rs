//! Edge authentication middleware for the Edgegate gateway
//!
//! Decides, for every inbound request, whether the caller is a guest,
//! authenticated, or carrying an invalid credential, and attaches the
//! resulting identity context as headers before the request reaches the
//! upstream. Credential validity is delegated to the external
//! authentication service; on any doubt the request is rejected.

mod config;
mod credential;
mod error;
mod middleware;
mod policy;
mod propagate;

pub use config::AuthConfig;
pub use credential::{bearer_credential, impersonation_target};
pub use error::AuthError;
pub use middleware::{apply, validate, ValidationState};
pub use policy::{BypassPolicy, RouteAction};
pub use propagate::{propagate_guest, propagate_identity, strip_identity_headers};
