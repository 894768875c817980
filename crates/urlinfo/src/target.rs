// ABOUTME: Host validation for caller-supplied URLs: normalization plus loopback/private host rejection.
// ABOUTME: Produces TargetUrl, the only URL type the fetcher accepts.

use std::fmt;
use std::net::IpAddr;

use ipnet::{Ipv4Net, Ipv6Net};
use once_cell::sync::Lazy;
use regex::Regex;
use url::{Host, Url};

use crate::error::LookupError;

/// Hostnames that are always rejected, compared after lower-casing.
const BLOCKED_HOSTS: &[&str] = &["localhost", "127.0.0.1", "0.0.0.0", "::1"];

/// 10.x, 172.16-31.x, 192.168.x, 169.254.x written literally at the start of the hostname.
static PRIVATE_HOST_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:10\.|172\.(?:1[6-9]|2[0-9]|3[0-1])\.|192\.168\.|169\.254\.)").unwrap()
});

static LOOPBACK_V4: Lazy<Ipv4Net> = Lazy::new(|| "127.0.0.0/8".parse().unwrap());
static UNIQUE_LOCAL_V6: Lazy<Ipv6Net> = Lazy::new(|| "fc00::/7".parse().unwrap());
static LINK_LOCAL_V6: Lazy<Ipv6Net> = Lazy::new(|| "fe80::/10".parse().unwrap());

/// A validated, absolute http(s) URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetUrl(Url);

impl TargetUrl {
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn as_url(&self) -> &Url {
        &self.0
    }

    /// Lower-cased hostname, IPv6 literals without brackets.
    pub fn host(&self) -> String {
        host_name(&self.0).unwrap_or_default()
    }
}

impl fmt::Display for TargetUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.as_str())
    }
}

/// Validate and normalize a raw URL string.
///
/// A missing scheme defaults to `https://`. Unless `allow_private` is set, hosts that are
/// loopback or private-network literals are rejected. Hostnames are not resolved here.
pub fn validate_target(raw: &str, allow_private: bool) -> Result<TargetUrl, LookupError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(LookupError::invalid_url(
            raw,
            "Validate",
            Some(anyhow::anyhow!("URL cannot be empty")),
        ));
    }

    let with_scheme = if has_http_prefix(trimmed) {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    };

    let parsed = Url::parse(&with_scheme).map_err(|e| {
        LookupError::invalid_url(
            trimmed,
            "Validate",
            Some(anyhow::anyhow!("failed to parse URL: {}", e)),
        )
    })?;

    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(LookupError::invalid_url(
            trimmed,
            "Validate",
            Some(anyhow::anyhow!("scheme must be http or https")),
        ));
    }

    let host = match host_name(&parsed) {
        Some(h) if !h.is_empty() => h,
        _ => {
            return Err(LookupError::invalid_url(
                trimmed,
                "Validate",
                Some(anyhow::anyhow!("URL must have a valid host")),
            ))
        }
    };

    if !allow_private && is_private_host(&host) {
        return Err(LookupError::private_host(
            trimmed,
            "Validate",
            Some(anyhow::anyhow!("private/local URLs are not allowed")),
        ));
    }

    Ok(TargetUrl(parsed))
}

fn has_http_prefix(s: &str) -> bool {
    let lower = s.get(..8).unwrap_or(s).to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// Lower-cased host of a URL; IPv6 addresses are rendered without brackets.
pub(crate) fn host_name(url: &Url) -> Option<String> {
    match url.host()? {
        Host::Domain(d) => Some(d.to_lowercase()),
        Host::Ipv4(addr) => Some(addr.to_string()),
        Host::Ipv6(addr) => Some(addr.to_string()),
    }
}

/// Syntactic private-host check on a lower-cased hostname.
pub fn is_private_host(host: &str) -> bool {
    let host = host.trim_start_matches('[').trim_end_matches(']');
    if BLOCKED_HOSTS.contains(&host) || PRIVATE_HOST_RE.is_match(host) {
        return true;
    }
    match host.parse::<IpAddr>() {
        Ok(ip) => is_private_ip(&ip),
        Err(_) => false,
    }
}

/// Check if an IP literal is loopback, unspecified, or in a private/link-local range.
fn is_private_ip(addr: &IpAddr) -> bool {
    if addr.is_unspecified() || addr.is_loopback() {
        return true;
    }
    match addr {
        IpAddr::V4(ip) => ip.is_private() || ip.is_link_local() || LOOPBACK_V4.contains(ip),
        IpAddr::V6(ip) => match ip.to_ipv4_mapped() {
            Some(v4) => is_private_ip(&IpAddr::V4(v4)),
            None => UNIQUE_LOCAL_V6.contains(ip) || LINK_LOCAL_V6.contains(ip),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prepends_https_when_scheme_missing() {
        let t = validate_target("example.com", false).unwrap();
        assert_eq!(t.as_str(), "https://example.com/");
        assert_eq!(t.as_url().scheme(), "https");

        let t = validate_target("example.com/path?query=1", false).unwrap();
        assert_eq!(t.as_str(), "https://example.com/path?query=1");
    }

    #[test]
    fn keeps_existing_scheme() {
        assert_eq!(
            validate_target("http://example.com/a", false).unwrap().as_str(),
            "http://example.com/a"
        );
        assert_eq!(
            validate_target("  https://Example.COM/A  ", false).unwrap().as_str(),
            "https://example.com/A"
        );
        assert_eq!(
            validate_target("HTTPS://example.com", false).unwrap().as_str(),
            "https://example.com/"
        );
    }

    #[test]
    fn rejects_empty_and_whitespace() {
        assert!(validate_target("", false).unwrap_err().is_invalid_url());
        assert!(validate_target("   \t", false).unwrap_err().is_invalid_url());
    }

    #[test]
    fn rejects_unparseable_and_hostless() {
        assert!(validate_target("https://", false).unwrap_err().is_invalid_url());
        assert!(validate_target("http://exa mple.com", false)
            .unwrap_err()
            .is_invalid_url());
    }

    #[test]
    fn rejects_blocklisted_hosts_regardless_of_path() {
        for raw in [
            "localhost",
            "http://localhost/test",
            "LOCALHOST:8080/x?y=1",
            "127.0.0.1",
            "http://127.0.0.1/test",
            "0.0.0.0/admin",
            "http://[::1]/",
            "https://[::1]:8443/a?b",
        ] {
            let err = validate_target(raw, false).unwrap_err();
            assert!(err.is_private_host(), "expected {} to be blocked", raw);
        }
    }

    #[test]
    fn rejects_private_ranges() {
        for raw in [
            "http://10.0.0.1/test",
            "10.255.255.255",
            "http://172.16.0.1/",
            "172.31.255.255/path",
            "http://192.168.1.1/test",
            "192.168.0.1?q=1",
            "http://169.254.169.254/latest/meta-data",
        ] {
            let err = validate_target(raw, false).unwrap_err();
            assert!(err.is_private_host(), "expected {} to be blocked", raw);
        }
    }

    #[test]
    fn rejects_other_loopback_and_v6_private_literals() {
        for raw in [
            "http://127.0.0.2/",
            "http://[fe80::1]/",
            "http://[fd00::1]/",
            "http://[::]/",
            "http://[::ffff:127.0.0.1]/",
            "http://[::ffff:10.0.0.1]/",
            "http://[::ffff:c0a8:101]/",
        ] {
            let err = validate_target(raw, false).unwrap_err();
            assert!(err.is_private_host(), "expected {} to be blocked", raw);
        }
    }

    #[test]
    fn allows_public_hosts() {
        for raw in [
            "https://8.8.8.8/",
            "http://172.32.0.1/",
            "http://172.15.0.1/",
            "https://[2001:4860:4860::8888]/",
            "http://[::ffff:8.8.8.8]/",
            "https://sub.example.org/x",
        ] {
            assert!(validate_target(raw, false).is_ok(), "{} should pass", raw);
        }
    }

    #[test]
    fn allow_private_skips_host_check() {
        let t = validate_target("http://127.0.0.1:8080/page", true).unwrap();
        assert_eq!(t.host(), "127.0.0.1");
    }

    #[test]
    fn host_strips_ipv6_brackets() {
        let t = validate_target("https://[2001:db8::1]/", false).unwrap();
        assert_eq!(t.host(), "2001:db8::1");
    }

    #[test]
    fn is_private_host_is_syntactic() {
        assert!(is_private_host("10.example.com"));
        assert!(!is_private_host("example.com"));
        assert!(!is_private_host("internal.corp"));
    }
}
