//! Upstream forwarder
//!
//! Every request the validation middleware lets through is relayed to the
//! configured upstream service: method, path, query, headers, and body are
//! preserved. Connection-level framing headers are renegotiated per hop and
//! dropped before forwarding.

use axum::body::Body;
use axum::extract::{Request, State};
use axum::http::header;
use axum::response::Response;
use axum::Router;

use edgegate_common::Error;

/// Shared relay state: one pooled HTTP client plus the upstream base address.
#[derive(Clone)]
pub struct ProxyState {
    http: reqwest::Client,
    upstream_base_url: String,
}

impl ProxyState {
    /// Create relay state for the given upstream base address.
    ///
    /// The base URL is parsed eagerly; a malformed value fails construction
    /// instead of surfacing as a 502 on every relayed request.
    pub fn new(upstream_base_url: &str) -> Result<Self, anyhow::Error> {
        let base = upstream_base_url.trim_end_matches('/').to_string();
        reqwest::Url::parse(&base)
            .map_err(|e| anyhow::anyhow!("Invalid upstream base URL '{}': {}", base, e))?;

        Ok(Self {
            http: reqwest::Client::new(),
            upstream_base_url: base,
        })
    }
}

/// Catch-all router handing every request to the relay.
pub fn routes() -> Router<ProxyState> {
    Router::new().fallback(relay)
}

/// Relay one request to the upstream service and its response back.
async fn relay(State(state): State<ProxyState>, req: Request) -> Result<Response, Error> {
    let (parts, body) = req.into_parts();

    let mut url = format!("{}{}", state.upstream_base_url, parts.uri.path());
    if let Some(query) = parts.uri.query() {
        url.push('?');
        url.push_str(query);
    }

    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .map_err(|e| Error::Internal(format!("Failed to buffer request body: {}", e)))?;

    // The upstream host comes from the URL; framing is recomputed for the
    // buffered body.
    let mut headers = parts.headers;
    headers.remove(header::HOST);
    headers.remove(header::CONTENT_LENGTH);
    headers.remove(header::TRANSFER_ENCODING);

    tracing::debug!(method = %parts.method, url = %url, "Relaying request upstream");

    let upstream = state
        .http
        .request(parts.method, &url)
        .headers(headers)
        .body(bytes)
        .send()
        .await
        .map_err(|e| Error::Upstream(format!("Failed to reach upstream: {}", e)))?;

    let status = upstream.status();
    let mut headers = upstream.headers().clone();
    headers.remove(header::CONTENT_LENGTH);
    headers.remove(header::TRANSFER_ENCODING);
    headers.remove(header::CONNECTION);

    let body = upstream
        .bytes()
        .await
        .map_err(|e| Error::Upstream(format!("Failed to read upstream response: {}", e)))?;

    let mut response = Response::new(Body::from(body));
    *response.status_mut() = status;
    *response.headers_mut() = headers;
    Ok(response)
}
