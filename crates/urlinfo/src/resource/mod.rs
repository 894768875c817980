// ABOUTME: Bounded fetcher for target pages: deadline, redirect cap, content-type gate and body ceiling.
// ABOUTME: Also owns the redirect policy and charset decoding of fetched bodies.

use std::collections::HashMap;

use bytes::Bytes;
use futures::StreamExt;
use tracing::{debug, warn};

use crate::error::LookupError;
use crate::target::{host_name, is_private_host, TargetUrl};

/// Ceiling on the number of body bytes read from a target (5 MiB).
pub const MAX_BODY_BYTES: usize = 5 * 1024 * 1024;

/// Default number of redirects followed before the fetch is abandoned.
pub const MAX_REDIRECTS: usize = 5;

/// Content-type fragments accepted as HTML.
const HTML_CONTENT_TYPES: &[&str] = &["text/html", "application/xhtml"];

/// Options for fetching a resource.
#[derive(Debug, Clone)]
pub struct FetchOptions {
    pub headers: HashMap<String, String>,
    pub max_body_bytes: usize,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            headers: HashMap::new(),
            max_body_bytes: MAX_BODY_BYTES,
        }
    }
}

/// Result of a successful fetch operation.
#[derive(Debug, Clone)]
pub struct FetchResult {
    pub status: u16,
    pub url: String,
    pub final_url: String,
    pub content_type: Option<String>,
    pub body: Bytes,
    pub truncated: bool,
}

impl FetchResult {
    /// Decode the body as UTF-8 text, using charset hints from the content-type header.
    pub fn text_utf8(&self) -> String {
        decode_body(&self.body, self.content_type.as_deref())
    }
}

/// Reasons the redirect policy refuses to follow a hop.
#[derive(Debug, thiserror::Error)]
enum RedirectRefused {
    #[error("too many redirects")]
    TooMany,
    #[error("redirect to private host {0} blocked")]
    PrivateHost(String),
}

/// Redirect policy: follow at most `max` hops.
///
/// Redirect targets are not re-validated unless `block_private` is set; a hop to a
/// private host is always logged.
pub fn redirect_policy(max: usize, block_private: bool) -> reqwest::redirect::Policy {
    reqwest::redirect::Policy::custom(move |attempt| {
        if attempt.previous().len() > max {
            return attempt.error(RedirectRefused::TooMany);
        }
        if let Some(host) = host_name(attempt.url()) {
            if is_private_host(&host) {
                if block_private {
                    return attempt.error(RedirectRefused::PrivateHost(host));
                }
                warn!(url = %attempt.url(), "redirect to private host is not re-validated");
            }
        }
        attempt.follow()
    })
}

/// Returns true when the content-type names an HTML document.
pub fn is_html_content_type(content_type: &str) -> bool {
    let lower = content_type.to_lowercase();
    HTML_CONTENT_TYPES.iter().any(|ct| lower.contains(ct))
}

/// Decode body bytes to a String using charset from content-type header or detection.
fn decode_body(body: &[u8], content_type: Option<&str>) -> String {
    if let Some(ct) = content_type {
        if let Some(charset) = extract_charset(ct) {
            if let Some(encoding) = encoding_rs::Encoding::for_label(charset.as_bytes()) {
                let (decoded, _, _) = encoding.decode(body);
                return decoded.into_owned();
            }
        }
    }

    let mut detector = chardetng::EncodingDetector::new();
    detector.feed(body, true);
    let encoding = detector.guess(None, true);
    let (decoded, _, _) = encoding.decode(body);
    decoded.into_owned()
}

/// Extract charset value from Content-Type header.
fn extract_charset(content_type: &str) -> Option<String> {
    let lower = content_type.to_lowercase();
    for part in lower.split(';') {
        let trimmed = part.trim();
        if let Some(charset) = trimmed.strip_prefix("charset=") {
            let charset = charset.trim_matches('"').trim_matches('\'');
            return Some(charset.to_string());
        }
    }
    None
}

/// Map a transport error onto the lookup taxonomy.
fn classify(url: &str, err: reqwest::Error) -> LookupError {
    if err.is_timeout() {
        return LookupError::timeout(url, "Fetch", Some(anyhow::anyhow!("timeout: {}", err)));
    }
    if err.is_redirect() {
        let mut source = std::error::Error::source(&err);
        while let Some(inner) = source {
            if let Some(refused) = inner.downcast_ref::<RedirectRefused>() {
                return match refused {
                    RedirectRefused::TooMany => LookupError::too_many_redirects(
                        url,
                        "Fetch",
                        Some(anyhow::anyhow!("too many redirects")),
                    ),
                    RedirectRefused::PrivateHost(_) => {
                        LookupError::fetch(url, "Fetch", Some(anyhow::anyhow!("{}", refused)))
                    }
                };
            }
            source = inner.source();
        }
        return LookupError::too_many_redirects(url, "Fetch", Some(anyhow::anyhow!("{}", err)));
    }
    LookupError::fetch(url, "Fetch", Some(anyhow::anyhow!("request failed: {}", err)))
}

/// Fetch a target page.
///
/// The client carries the deadline and redirect policy; this function applies the status
/// check, the HTML content-type gate and the body ceiling.
pub async fn fetch(
    client: &reqwest::Client,
    target: &TargetUrl,
    opts: &FetchOptions,
) -> Result<FetchResult, LookupError> {
    let url = target.as_str();

    let mut request = client.get(url);
    for (key, value) in &opts.headers {
        request = request.header(key, value);
    }

    debug!(url, "fetching target");
    let response = request.send().await.map_err(|e| classify(url, e))?;

    let status = response.status().as_u16();
    if status != 200 {
        return Err(LookupError::fetch(
            url,
            "Fetch",
            Some(anyhow::anyhow!("bad status {}", status)),
        ));
    }

    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_lowercase());

    let declared = content_type.as_deref().unwrap_or("");
    if !is_html_content_type(declared) {
        return Err(LookupError::fetch(
            url,
            "Fetch",
            Some(anyhow::anyhow!("unsupported content-type {:?}", declared)),
        ));
    }

    let final_url = response.url().to_string();
    let declared_len = response.content_length().map(|len| len as usize);
    let capacity = declared_len
        .map(|len| len.min(opts.max_body_bytes))
        .unwrap_or(0);

    let mut buf: Vec<u8> = Vec::with_capacity(capacity);
    let mut truncated = false;
    let mut stream = std::pin::pin!(response.bytes_stream());
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| classify(url, e))?;
        let remaining = opts.max_body_bytes - buf.len();
        if chunk.len() >= remaining {
            buf.extend_from_slice(&chunk[..remaining]);
            // Never wait on the server once the ceiling is full.
            truncated = chunk.len() > remaining
                || declared_len.is_some_and(|len| len > opts.max_body_bytes);
            break;
        }
        buf.extend_from_slice(&chunk);
    }

    if truncated {
        debug!(url, limit = opts.max_body_bytes, "body truncated at ceiling");
    }

    Ok(FetchResult {
        status,
        url: url.to_string(),
        final_url,
        content_type,
        body: Bytes::from(buf),
        truncated,
    })
}
