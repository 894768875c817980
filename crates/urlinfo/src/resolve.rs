// ABOUTME: Link resolution for extracted image and favicon references.
// ABOUTME: Turns relative and protocol-relative links into absolute URLs and synthesizes /favicon.ico.

use url::Url;

use crate::result::PageMetadata;

/// Resolves a possibly-relative reference against the page's base URL.
///
/// Absolute http(s) references are returned unchanged, protocol-relative references take
/// the base scheme, and anything else goes through RFC 3986 resolution. If resolution
/// fails the reference is returned as-is.
pub fn resolve_url(raw: &str, base: &Url) -> String {
    if raw.is_empty() {
        return String::new();
    }

    if raw.starts_with("http://") || raw.starts_with("https://") {
        return raw.to_string();
    }

    if raw.starts_with("//") {
        return format!("{}:{}", base.scheme(), raw);
    }

    match base.join(raw) {
        Ok(resolved) => resolved.to_string(),
        Err(_) => raw.to_string(),
    }
}

/// The conventional favicon location for the base URL's origin.
pub fn default_favicon(base: &Url) -> Option<String> {
    let host = base.host_str()?;
    match base.port() {
        Some(port) => Some(format!("{}://{}:{}/favicon.ico", base.scheme(), host, port)),
        None => Some(format!("{}://{}/favicon.ico", base.scheme(), host)),
    }
}

/// Resolves the link fields of extracted metadata and fills in the default favicon.
pub fn resolve_metadata(mut meta: PageMetadata, base: &Url) -> PageMetadata {
    meta.preview_image = meta
        .preview_image
        .map(|img| resolve_url(&img, base))
        .filter(|s| !s.is_empty());
    meta.favicon = meta
        .favicon
        .map(|icon| resolve_url(&icon, base))
        .filter(|s| !s.is_empty())
        .or_else(|| default_favicon(base));
    meta
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn base() -> Url {
        Url::parse("https://example.com/page/").unwrap()
    }

    #[test]
    fn empty_stays_empty() {
        assert_eq!(resolve_url("", &base()), "");
    }

    #[test]
    fn absolute_unchanged() {
        assert_eq!(
            resolve_url("https://cdn.example.com/image.jpg", &base()),
            "https://cdn.example.com/image.jpg"
        );
        assert_eq!(
            resolve_url("http://other.org/a b.png", &base()),
            "http://other.org/a b.png"
        );
    }

    #[test]
    fn protocol_relative_takes_base_scheme() {
        assert_eq!(
            resolve_url("//cdn.x.com/i.jpg", &base()),
            "https://cdn.x.com/i.jpg"
        );
        let http_base = Url::parse("http://example.com/").unwrap();
        assert_eq!(
            resolve_url("//cdn.x.com/i.jpg", &http_base),
            "http://cdn.x.com/i.jpg"
        );
    }

    #[test]
    fn relative_references() {
        assert_eq!(
            resolve_url("image.jpg", &base()),
            "https://example.com/page/image.jpg"
        );
        assert_eq!(
            resolve_url("../image.jpg", &base()),
            "https://example.com/image.jpg"
        );
        assert_eq!(
            resolve_url("/images/photo.jpg", &base()),
            "https://example.com/images/photo.jpg"
        );
        assert_eq!(
            resolve_url("?v=2", &base()),
            "https://example.com/page/?v=2"
        );
    }

    #[test]
    fn default_favicon_keeps_port() {
        assert_eq!(
            default_favicon(&base()),
            Some("https://example.com/favicon.ico".to_string())
        );
        let with_port = Url::parse("http://127.0.0.1:8080/a/b").unwrap();
        assert_eq!(
            default_favicon(&with_port),
            Some("http://127.0.0.1:8080/favicon.ico".to_string())
        );
    }

    #[test]
    fn resolve_metadata_fills_favicon() {
        let meta = PageMetadata {
            preview_image: Some("img/cover.png".to_string()),
            title: Some("Title".to_string()),
            description: None,
            favicon: None,
        };
        let resolved = resolve_metadata(meta, &base());
        assert_eq!(
            resolved,
            PageMetadata {
                preview_image: Some("https://example.com/page/img/cover.png".to_string()),
                title: Some("Title".to_string()),
                description: None,
                favicon: Some("https://example.com/favicon.ico".to_string()),
            }
        );
    }

    #[test]
    fn resolve_metadata_resolves_favicon() {
        let meta = PageMetadata {
            favicon: Some("/static/icon.svg".to_string()),
            ..Default::default()
        };
        let resolved = resolve_metadata(meta, &base());
        assert_eq!(
            resolved.favicon.as_deref(),
            Some("https://example.com/static/icon.svg")
        );
        assert_eq!(resolved.preview_image, None);
    }
}
