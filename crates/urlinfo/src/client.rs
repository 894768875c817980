// ABOUTME: The Client that runs the lookup pipeline: validate, fetch, extract, resolve.
// ABOUTME: lookup() absorbs fetch failures into empty metadata; only request-shape errors escape.

use tracing::{debug, warn};
use url::Url;

use crate::error::LookupError;
use crate::extractors::Extractor;
use crate::options::{ClientBuilder, Options};
use crate::resource::{fetch, redirect_policy, FetchOptions};
use crate::result::PageMetadata;
use crate::target::{validate_target, TargetUrl};

/// Looks up preview metadata for caller-supplied URLs.
pub struct Client {
    opts: Options,
    http_client: reqwest::Client,
    extractor: Box<dyn Extractor>,
}

impl Client {
    /// Create a new ClientBuilder for configuring the client.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Create a new Client with the given options.
    pub fn new(opts: Options) -> Result<Self, LookupError> {
        let http_client = match opts.http_client.clone() {
            Some(client) => client,
            None => reqwest::Client::builder()
                .redirect(redirect_policy(
                    opts.max_redirects,
                    opts.block_private_redirects,
                ))
                .user_agent(&opts.user_agent)
                .timeout(opts.timeout)
                .gzip(true)
                .brotli(true)
                .deflate(true)
                .build()
                .map_err(|e| {
                    LookupError::fetch(
                        "",
                        "Client",
                        Some(anyhow::anyhow!("failed to build HTTP client: {}", e)),
                    )
                })?,
        };

        let extractor = opts.extractor.build();

        Ok(Self {
            opts,
            http_client,
            extractor,
        })
    }

    /// The options this client was built with.
    pub fn options(&self) -> &Options {
        &self.opts
    }

    /// Validate and normalize a raw URL under this client's private-host policy.
    pub fn validate(&self, raw: &str) -> Result<TargetUrl, LookupError> {
        validate_target(raw, self.opts.allow_private_networks)
    }

    /// Look up metadata for a raw, caller-supplied URL.
    ///
    /// Invalid or private URLs are returned as errors. Any failure after validation is
    /// logged and yields empty metadata, so callers treat "nothing found" and "fetch
    /// failed" the same way.
    pub async fn lookup(&self, raw: &str) -> Result<PageMetadata, LookupError> {
        let target = self.validate(raw)?;
        match self.fetch_metadata(&target).await {
            Ok(meta) => Ok(meta),
            Err(e) if e.is_fatal() => Err(e),
            Err(e) => {
                warn!(url = %target, error = %e, "failed to fetch metadata");
                Ok(PageMetadata::default())
            }
        }
    }

    /// Fetch, extract and resolve metadata for a validated target without degrading errors.
    pub async fn fetch_metadata(&self, target: &TargetUrl) -> Result<PageMetadata, LookupError> {
        let fetch_opts = FetchOptions {
            headers: self.opts.headers.clone(),
            max_body_bytes: self.opts.max_body_bytes,
        };
        let fetched = fetch(&self.http_client, target, &fetch_opts).await?;

        let base = Url::parse(&fetched.final_url).unwrap_or_else(|_| target.as_url().clone());
        let html = fetched.text_utf8();
        let meta = self.extractor.extract(&html, &base);

        debug!(
            url = %target,
            final_url = %base,
            extractor = %self.opts.extractor,
            bytes = fetched.body.len(),
            found_image = meta.has_image(),
            "extracted metadata"
        );
        Ok(meta)
    }

    /// Extract metadata from caller-supplied HTML, resolving links against `url`.
    pub fn extract_html(&self, html: &str, url: &str) -> Result<PageMetadata, LookupError> {
        let base = Url::parse(url).map_err(|e| {
            LookupError::invalid_url(
                url,
                "ExtractHtml",
                Some(anyhow::anyhow!("invalid URL: {}", e)),
            )
        })?;
        Ok(self.extractor.extract(html, &base))
    }
}
