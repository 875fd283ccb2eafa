//! Failure handling integration tests
//!
//! The gateway fails closed: any verification problem, whatever its
//! cause, turns into the same opaque 401 and the upstream is never
//! reached. Upstream trouble, by contrast, surfaces as a 502.

use serde_json::json;
use uuid::Uuid;
use wiremock::matchers::{any, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::common::assertions::{assert_single_header, assert_unauthorized};
use crate::common::{
    authed, body_json, compose_router, dead_endpoint, read_body, request, TestGateway,
};
use edgegate_auth::AuthConfig;

mod test_fail_closed {
    use super::*;
    use tower::ServiceExt;

    #[test_log::test(tokio::test)]
    async fn test_unreachable_verifier_rejects_request() {
        let verifier_url = dead_endpoint();

        let upstream = MockServer::start().await;
        Mock::given(any())
            .respond_with(ResponseTemplate::new(200))
            .mount(&upstream)
            .await;

        let router = compose_router(&verifier_url, &upstream.uri(), AuthConfig::default()).unwrap();
        let response = router
            .oneshot(authed("GET", "/v1/articles", "Bearer abc123"))
            .await
            .unwrap();
        assert_unauthorized(response).await;

        assert!(
            upstream.received_requests().await.unwrap_or_default().is_empty(),
            "Nothing may reach the upstream when verification cannot complete"
        );
    }

    #[test_log::test(tokio::test)]
    async fn test_malformed_verifier_response_rejects_request() {
        let gateway = TestGateway::new().await.unwrap();
        Mock::given(method("GET"))
            .and(path("/validate"))
            .respond_with(ResponseTemplate::new(200).set_body_string("surprise!"))
            .mount(&gateway.verifier)
            .await;
        gateway.stub_upstream_ok().await;

        let response = gateway
            .send(authed("GET", "/v1/articles", "Bearer abc123"))
            .await;
        assert_unauthorized(response).await;

        assert!(gateway.relayed().await.is_empty());
    }

    #[test_log::test(tokio::test)]
    async fn test_verifier_server_error_rejects_request() {
        let gateway = TestGateway::new().await.unwrap();
        gateway.stub_rejection("Bearer abc123", 500).await;
        gateway.stub_upstream_ok().await;

        let response = gateway
            .send(authed("GET", "/v1/articles", "Bearer abc123"))
            .await;

        // The verifier's own trouble does not surface as a gateway 5xx
        assert_unauthorized(response).await;
        assert!(gateway.relayed().await.is_empty());
    }

    /// All rejection paths produce byte-identical responses, so a caller
    /// cannot probe for why a credential failed.
    #[test_log::test(tokio::test)]
    async fn test_rejections_reveal_no_cause() {
        let gateway = TestGateway::new().await.unwrap();
        gateway.stub_rejection("Bearer expired", 401).await;
        Mock::given(method("GET"))
            .and(path("/validate"))
            .and(header("authorization", "Bearer garbled"))
            .respond_with(ResponseTemplate::new(200).set_body_string("surprise!"))
            .mount(&gateway.verifier)
            .await;

        let missing = gateway.send(request("POST", "/v1/articles")).await;
        let rejected = gateway
            .send(authed("GET", "/v1/articles", "Bearer expired"))
            .await;
        let garbled = gateway
            .send(authed("GET", "/v1/articles", "Bearer garbled"))
            .await;

        let router = compose_router(
            &dead_endpoint(),
            &gateway.upstream.uri(),
            AuthConfig::default(),
        )
        .unwrap();
        let unreachable = router
            .oneshot(authed("GET", "/v1/articles", "Bearer abc123"))
            .await
            .unwrap();

        let reference = read_body(missing).await;
        for response in [rejected, garbled, unreachable] {
            assert_eq!(response.status(), 401);
            assert_eq!(read_body(response).await, reference);
        }
    }
}

mod test_verified_traffic {
    use super::*;

    #[test_log::test(tokio::test)]
    async fn test_same_credential_verifies_on_every_request() {
        let gateway = TestGateway::new().await.unwrap();
        let credential = format!("Bearer {}", Uuid::new_v4().simple());
        gateway
            .stub_identity(
                &credential,
                json!({"role": "USER", "uuid": "u-1", "username": "alice"}),
            )
            .await;
        gateway.stub_upstream_ok().await;

        let first = gateway.send(authed("GET", "/v1/articles", &credential)).await;
        let second = gateway.send(authed("GET", "/v1/articles", &credential)).await;
        assert_eq!(first.status(), 200);
        assert_eq!(second.status(), 200);

        // No caching: one verification call per request
        assert_eq!(gateway.verification_calls().await.len(), 2);

        let relayed = gateway.relayed().await;
        assert_eq!(relayed.len(), 2);
        for req in &relayed {
            assert_single_header(req, "role", "USER");
            assert_single_header(req, "uuid", "u-1");
        }
    }

    #[test_log::test(tokio::test)]
    async fn test_credentialed_mutation_is_verified_and_relayed() {
        let gateway = TestGateway::new().await.unwrap();
        gateway
            .stub_identity("Bearer abc123", json!({"role": "USER", "uuid": "u-1"}))
            .await;
        gateway.stub_upstream_ok().await;

        let response = gateway
            .send(authed("POST", "/v1/articles", "Bearer abc123"))
            .await;
        assert_eq!(response.status(), 200);

        assert_eq!(gateway.verification_calls().await.len(), 1);
        assert_eq!(gateway.relayed().await.len(), 1);
    }
}

mod test_upstream_failures {
    use super::*;
    use tower::ServiceExt;

    #[test_log::test(tokio::test)]
    async fn test_upstream_outage_is_bad_gateway_not_unauthorized() {
        let verifier = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/validate"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "role": "USER", "uuid": "u-1"
            })))
            .mount(&verifier)
            .await;

        let upstream_url = dead_endpoint();

        let router = compose_router(&verifier.uri(), &upstream_url, AuthConfig::default()).unwrap();
        let response = router
            .oneshot(authed("GET", "/v1/articles", "Bearer abc123"))
            .await
            .unwrap();

        assert_eq!(response.status(), 502);
        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "UPSTREAM_ERROR");
    }
}
