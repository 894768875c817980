// ABOUTME: Configuration options for URL lookups and the ClientBuilder fluent API.
// ABOUTME: Holds the fetch deadline, redirect cap, body ceiling, private-host policy and extractor choice.

use std::collections::HashMap;
use std::time::Duration;

use crate::client::Client;
use crate::error::LookupError;
use crate::extractors::ExtractorKind;
use crate::resource::{MAX_BODY_BYTES, MAX_REDIRECTS};

/// Identifying user agent sent with every fetch.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (compatible; UrlInfoBot/1.0)";

/// Accept header asking servers for HTML.
pub const DEFAULT_ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";

const DEFAULT_ACCEPT_LANGUAGE: &str = "en-US,en;q=0.5";

/// Configuration options for the lookup client.
#[derive(Debug, Clone)]
pub struct Options {
    /// Overall deadline for one fetch, redirects and body included.
    pub timeout: Duration,
    pub user_agent: String,
    /// Headers added to every fetch; Accept and Accept-Language by default.
    pub headers: HashMap<String, String>,
    pub max_redirects: usize,
    pub max_body_bytes: usize,
    pub allow_private_networks: bool,
    pub block_private_redirects: bool,
    pub extractor: ExtractorKind,
    pub http_client: Option<reqwest::Client>,
}

impl Default for Options {
    fn default() -> Self {
        let mut headers = HashMap::new();
        headers.insert("Accept".to_string(), DEFAULT_ACCEPT.to_string());
        headers.insert(
            "Accept-Language".to_string(),
            DEFAULT_ACCEPT_LANGUAGE.to_string(),
        );
        Self {
            timeout: Duration::from_secs(10),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            headers,
            max_redirects: MAX_REDIRECTS,
            max_body_bytes: MAX_BODY_BYTES,
            allow_private_networks: false,
            block_private_redirects: false,
            extractor: ExtractorKind::Structural,
            http_client: None,
        }
    }
}

/// Builder for constructing Client instances with custom configuration.
#[derive(Debug, Clone)]
pub struct ClientBuilder {
    opts: Options,
}

impl ClientBuilder {
    /// Create a new ClientBuilder with default options.
    pub fn new() -> Self {
        Self {
            opts: Options::default(),
        }
    }

    /// Set the overall fetch deadline.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.opts.timeout = timeout;
        self
    }

    /// Set the User-Agent header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.opts.user_agent = user_agent.into();
        self
    }

    /// Set the Accept header.
    pub fn accept(self, accept: impl Into<String>) -> Self {
        self.header("Accept", accept)
    }

    /// Add or replace a header sent with every fetch.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.opts.headers.insert(key.into(), value.into());
        self
    }

    /// Set how many redirects are followed before the fetch fails.
    pub fn max_redirects(mut self, max: usize) -> Self {
        self.opts.max_redirects = max;
        self
    }

    /// Set the body ceiling in bytes; anything past it is discarded.
    pub fn max_body_bytes(mut self, max: usize) -> Self {
        self.opts.max_body_bytes = max;
        self
    }

    /// Allow or disallow targets on loopback/private networks.
    pub fn allow_private_networks(mut self, allow: bool) -> Self {
        self.opts.allow_private_networks = allow;
        self
    }

    /// Fail fetches whose redirects land on a private host instead of only logging them.
    pub fn block_private_redirects(mut self, block: bool) -> Self {
        self.opts.block_private_redirects = block;
        self
    }

    /// Choose the extraction strategy.
    pub fn extractor(mut self, kind: ExtractorKind) -> Self {
        self.opts.extractor = kind;
        self
    }

    /// Use a custom HTTP client. Its own timeout and redirect policy then apply.
    pub fn http_client(mut self, client: reqwest::Client) -> Self {
        self.opts.http_client = Some(client);
        self
    }

    /// Build the Client with the configured options.
    pub fn build(self) -> Result<Client, LookupError> {
        Client::new(self.opts)
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
