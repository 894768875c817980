// ABOUTME: HTTP surface for URL lookups: GET /urlInfo returns the JSON response envelope.
// ABOUTME: Maps request-shape failures to 4xx envelopes; everything after validation answers 200.

use std::sync::Arc;

use axum::extract::{RawQuery, State};
use axum::http::{Method, StatusCode};
use axum::routing::{any, get};
use axum::{Json, Router};
use tokio::net::TcpListener;
use tracing::{debug, info};
use url::form_urlencoded;

use crate::client::Client;
use crate::error::{ErrorCode, LookupError};
use crate::result::UrlInfoResponse;

/// Query parameters accepted by the lookup endpoint.
#[derive(Debug, Default)]
pub struct UrlInfoParams {
    pub url: Option<String>,
    pub target_url: Option<String>,
}

impl UrlInfoParams {
    /// Parses a raw query string. A repeated key keeps its first value; unknown keys are ignored.
    pub fn from_query(query: &str) -> Self {
        let mut params = Self::default();
        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            let slot = match key.as_ref() {
                "url" => &mut params.url,
                "targetUrl" => &mut params.target_url,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.into_owned());
            }
        }
        params
    }

    /// The requested URL; `url` wins over `targetUrl` and empty values count as absent.
    pub fn requested(&self) -> Option<&str> {
        [self.url.as_deref(), self.target_url.as_deref()]
            .into_iter()
            .flatten()
            .find(|v| !v.trim().is_empty())
    }
}

/// Build the router serving the lookup endpoints.
pub fn router(client: Arc<Client>) -> Router {
    Router::new()
        .route("/urlInfo", any(url_info))
        .route("/client/common/urlInfo", any(url_info))
        .route("/healthz", get(|| async { "ok" }))
        .with_state(client)
}

async fn url_info(
    State(client): State<Arc<Client>>,
    method: Method,
    RawQuery(query): RawQuery,
) -> (StatusCode, Json<UrlInfoResponse>) {
    if method != Method::GET {
        return (
            StatusCode::METHOD_NOT_ALLOWED,
            Json(UrlInfoResponse::error("Method not allowed")),
        );
    }

    let params = UrlInfoParams::from_query(query.as_deref().unwrap_or(""));
    let Some(raw) = params.requested() else {
        return reject(&LookupError::request(
            "UrlInfo",
            Some(anyhow::anyhow!("URL parameter is required")),
        ));
    };

    match client.lookup(raw).await {
        Ok(meta) => (StatusCode::OK, Json(UrlInfoResponse::success(meta))),
        Err(e) => {
            debug!(url = raw, error = %e, "rejected lookup");
            reject(&e)
        }
    }
}

/// Error envelope for a lookup error that reached the caller.
fn reject(err: &LookupError) -> (StatusCode, Json<UrlInfoResponse>) {
    let msg = match err.code {
        ErrorCode::Request => err.reason(),
        _ => format!("Invalid URL: {}", err.reason()),
    };
    (StatusCode::BAD_REQUEST, Json(UrlInfoResponse::error(msg)))
}

/// Serve the lookup endpoints on `addr` until Ctrl-C.
pub async fn serve(addr: &str, client: Client) -> anyhow::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    info!(addr = %listener.local_addr()?, "urlinfo server listening");
    axum::serve(listener, router(Arc::new(client)))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("urlinfo server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_param_wins() {
        let params = UrlInfoParams {
            url: Some("https://a.example/".into()),
            target_url: Some("https://b.example/".into()),
        };
        assert_eq!(params.requested(), Some("https://a.example/"));
    }

    #[test]
    fn target_url_fallback() {
        let params = UrlInfoParams {
            url: Some("  ".into()),
            target_url: Some("https://b.example/".into()),
        };
        assert_eq!(params.requested(), Some("https://b.example/"));
        assert_eq!(UrlInfoParams::default().requested(), None);
    }

    #[test]
    fn repeated_key_keeps_first_value() {
        let params = UrlInfoParams::from_query("url=localhost&url=https%3A%2F%2Fa.example%2F");
        assert_eq!(params.requested(), Some("localhost"));

        let params = UrlInfoParams::from_query("targetUrl=x.example&other=1&targetUrl=y.example");
        assert_eq!(params.requested(), Some("x.example"));
    }

    #[test]
    fn request_errors_keep_their_message() {
        let (status, Json(body)) = reject(&LookupError::request(
            "UrlInfo",
            Some(anyhow::anyhow!("URL parameter is required")),
        ));
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.msg, "URL parameter is required");
        assert!(!body.is_success());

        let (_, Json(body)) = reject(&LookupError::invalid_url(
            "x",
            "Validate",
            Some(anyhow::anyhow!("URL cannot be empty")),
        ));
        assert_eq!(body.msg, "Invalid URL: URL cannot be empty");
    }
}
