//! End-to-end gateway scenarios
//!
//! Each test walks one complete request flow through the composed gateway:
//! bypass decision, verification call, identity propagation, and relay.

use serde_json::json;

use crate::common::assertions::{assert_no_header, assert_single_header, assert_unauthorized};
use crate::common::{authed, get, request, TestGateway};

mod test_guest_access {
    use super::*;

    #[tokio::test]
    async fn test_anonymous_read_passes_as_guest() {
        let gateway = TestGateway::new().await.unwrap();
        gateway.stub_upstream_ok().await;

        let response = gateway.send(get("/v1/articles")).await;
        assert_eq!(response.status(), 200);

        let relayed = gateway.relayed().await;
        assert_eq!(relayed.len(), 1);
        assert_single_header(&relayed[0], "role", "GUEST");
        assert_no_header(&relayed[0], "uuid");
        assert_no_header(&relayed[0], "username");
        assert_no_header(&relayed[0], "targetuuid");

        assert!(
            gateway.verification_calls().await.is_empty(),
            "Anonymous reads must not contact the authentication service"
        );
    }

    #[tokio::test]
    async fn test_anonymous_mutation_is_rejected() {
        let gateway = TestGateway::new().await.unwrap();
        gateway.stub_upstream_ok().await;

        let response = gateway.send(request("POST", "/v1/articles")).await;
        assert_unauthorized(response).await;

        assert!(gateway.relayed().await.is_empty());
        assert!(gateway.verification_calls().await.is_empty());
    }
}

mod test_credentialed_access {
    use super::*;

    #[tokio::test]
    async fn test_valid_credential_propagates_identity() {
        let gateway = TestGateway::new().await.unwrap();
        gateway
            .stub_identity(
                "Bearer abc123",
                json!({"role": "USER", "username": "alice", "uuid": "u-1"}),
            )
            .await;
        gateway.stub_upstream_ok().await;

        let response = gateway
            .send(authed("GET", "/v1/articles", "Bearer abc123"))
            .await;
        assert_eq!(response.status(), 200);

        // Exactly one verification call, carrying the credential verbatim
        let calls = gateway.verification_calls().await;
        assert_eq!(calls.len(), 1);
        assert_single_header(&calls[0], "authorization", "Bearer abc123");
        assert_no_header(&calls[0], "targetUsername");

        let relayed = gateway.relayed().await;
        assert_eq!(relayed.len(), 1);
        assert_single_header(&relayed[0], "role", "USER");
        assert_single_header(&relayed[0], "username", "alice");
        assert_single_header(&relayed[0], "uuid", "u-1");
        assert_no_header(&relayed[0], "targetuuid");
    }

    #[tokio::test]
    async fn test_rejected_credential_is_denied() {
        let gateway = TestGateway::new().await.unwrap();
        gateway.stub_rejection("Bearer expired", 401).await;
        gateway.stub_upstream_ok().await;

        let response = gateway
            .send(authed("GET", "/v1/articles", "Bearer expired"))
            .await;
        assert_unauthorized(response).await;

        assert_eq!(gateway.verification_calls().await.len(), 1);
        assert!(
            gateway.relayed().await.is_empty(),
            "Rejected requests must never reach the upstream"
        );
    }

    #[tokio::test]
    async fn test_impersonation_target_rides_along() {
        let gateway = TestGateway::new().await.unwrap();
        gateway
            .stub_identity(
                "Bearer admintoken",
                json!({"role": "USER", "uuid": "u-1", "targetUUID": "u-2"}),
            )
            .await;
        gateway.stub_upstream_ok().await;

        let response = gateway
            .send(authed(
                "GET",
                "/v1/articles?targetUsername=bob",
                "Bearer admintoken",
            ))
            .await;
        assert_eq!(response.status(), 200);

        // The target username from the query string travels to the verifier
        let calls = gateway.verification_calls().await;
        assert_eq!(calls.len(), 1);
        assert_single_header(&calls[0], "targetUsername", "bob");

        // The resolved target identity travels to the upstream
        let relayed = gateway.relayed().await;
        assert_eq!(relayed.len(), 1);
        assert_single_header(&relayed[0], "uuid", "u-1");
        assert_single_header(&relayed[0], "targetuuid", "u-2");
    }
}

mod test_malformed_credentials {
    use super::*;

    const NOT_BEARER: [&str; 3] = ["Basic abc123", "Bearer ", "abc123"];

    /// Header values without a usable bearer credential are treated exactly
    /// like an absent header.
    #[tokio::test]
    async fn test_malformed_credential_reads_pass_as_guest() {
        let gateway = TestGateway::new().await.unwrap();
        gateway.stub_upstream_ok().await;

        for value in NOT_BEARER {
            let response = gateway.send(authed("GET", "/v1/articles", value)).await;
            assert_eq!(response.status(), 200, "GET with '{}' should pass", value);
        }

        let relayed = gateway.relayed().await;
        assert_eq!(relayed.len(), NOT_BEARER.len());
        for req in &relayed {
            assert_single_header(req, "role", "GUEST");
        }
        assert!(gateway.verification_calls().await.is_empty());
    }

    #[tokio::test]
    async fn test_malformed_credential_mutations_are_rejected() {
        let gateway = TestGateway::new().await.unwrap();
        gateway.stub_upstream_ok().await;

        for value in NOT_BEARER {
            let response = gateway.send(authed("DELETE", "/v1/articles/1", value)).await;
            assert_unauthorized(response).await;
        }

        assert!(gateway.relayed().await.is_empty());
        assert!(gateway.verification_calls().await.is_empty());
    }
}
