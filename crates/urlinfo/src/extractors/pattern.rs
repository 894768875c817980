// ABOUTME: Pattern-based metadata extractor that scans raw HTML text with precompiled regexes.
// ABOUTME: Parser-free fallback; matches content-before and content-after attribute orders.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::extractors::{Extractor, MetaCandidates};
use crate::result::PageMetadata;

/// Text-scanning extractor. Cheaper than the structural one, but blind to nesting and
/// comments; a tag inside an HTML comment still matches.
#[derive(Debug, Clone, Copy, Default)]
pub struct PatternExtractor;

/// Quoted attribute value; double and single quotes are captured in separate groups.
const QUOTED: &str = r#"(?:"([^"]*)"|'([^']*)')"#;

/// Builds a meta-tag pattern for `<meta {attr}="{value}" content="...">` in either order.
fn meta_pattern(attr: &str, value: &str) -> Regex {
    let key = format!(r#"\s{}\s*=\s*["']{}["']"#, attr, regex::escape(value));
    let content = format!(r"\scontent\s*=\s*{}", QUOTED);
    let pattern = format!(
        r"(?i)<meta[^>]*{key}[^>]*{content}[^>]*>|<meta[^>]*{content}[^>]*{key}[^>]*>",
        key = key,
        content = content,
    );
    Regex::new(&pattern).unwrap()
}

static OG_IMAGE_RE: Lazy<Regex> = Lazy::new(|| meta_pattern("property", "og:image"));
static OG_TITLE_RE: Lazy<Regex> = Lazy::new(|| meta_pattern("property", "og:title"));
static OG_DESCRIPTION_RE: Lazy<Regex> =
    Lazy::new(|| meta_pattern("property", "og:description"));
static TWITTER_IMAGE_RE: Lazy<Regex> = Lazy::new(|| meta_pattern("name", "twitter:image"));
static TWITTER_DESCRIPTION_RE: Lazy<Regex> =
    Lazy::new(|| meta_pattern("name", "twitter:description"));
static DESCRIPTION_RE: Lazy<Regex> = Lazy::new(|| meta_pattern("name", "description"));

static TITLE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<title(?:\s[^>]*)?>(.*?)</title\s*>").unwrap());

static ICON_RE: Lazy<Regex> = Lazy::new(|| {
    let rel = r#"\srel\s*=\s*["'][^"']*icon[^"']*["']"#;
    let href = format!(r"\shref\s*=\s*{}", QUOTED);
    Regex::new(&format!(
        r"(?i)<link[^>]*{rel}[^>]*{href}[^>]*>|<link[^>]*{href}[^>]*{rel}[^>]*>",
        rel = rel,
        href = href,
    ))
    .unwrap()
});

static NUMERIC_ENTITY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)&#(x[0-9a-f]{1,6}|[0-9]{1,7});").unwrap());

/// Named entities decoded in attribute values and titles. `&amp;` goes last so that
/// `&amp;lt;` stays `&lt;`.
const NAMED_ENTITIES: &[(&str, &str)] = &[
    ("&lt;", "<"),
    ("&gt;", ">"),
    ("&quot;", "\""),
    ("&apos;", "'"),
    ("&nbsp;", "\u{a0}"),
    ("&ndash;", "\u{2013}"),
    ("&mdash;", "\u{2014}"),
    ("&lsquo;", "\u{2018}"),
    ("&rsquo;", "\u{2019}"),
    ("&ldquo;", "\u{201C}"),
    ("&rdquo;", "\u{201D}"),
    ("&hellip;", "\u{2026}"),
    ("&copy;", "\u{a9}"),
    ("&reg;", "\u{ae}"),
    ("&trade;", "\u{2122}"),
    ("&middot;", "\u{b7}"),
    ("&bull;", "\u{2022}"),
    ("&euro;", "\u{20ac}"),
    ("&amp;", "&"),
];

/// Decodes numeric and common named HTML entities.
fn decode_entities(s: &str) -> String {
    if !s.contains('&') {
        return s.to_string();
    }
    let numeric = NUMERIC_ENTITY_RE.replace_all(s, |caps: &Captures| {
        let body = &caps[1];
        let code = if body.starts_with('x') || body.starts_with('X') {
            u32::from_str_radix(&body[1..], 16).ok()
        } else {
            body.parse::<u32>().ok()
        };
        code.and_then(char::from_u32)
            .map(String::from)
            .unwrap_or_else(|| caps[0].to_string())
    });
    let mut out = numeric.into_owned();
    for (entity, replacement) in NAMED_ENTITIES {
        if out.contains(entity) {
            out = out.replace(entity, replacement);
        }
    }
    out
}

/// First non-empty captured value across all matches of `re`.
fn first_capture(re: &Regex, html: &str) -> Option<String> {
    re.captures_iter(html).find_map(|caps| {
        caps.iter()
            .skip(1)
            .flatten()
            .map(|m| m.as_str())
            .find(|v| !v.trim().is_empty())
            .map(decode_entities)
    })
}

impl Extractor for PatternExtractor {
    fn scan(&self, html: &str) -> PageMetadata {
        let mut candidates = MetaCandidates::default();

        let properties: [(&str, &Lazy<Regex>); 3] = [
            ("og:image", &OG_IMAGE_RE),
            ("og:title", &OG_TITLE_RE),
            ("og:description", &OG_DESCRIPTION_RE),
        ];
        for (property, re) in properties {
            if let Some(value) = first_capture(re, html) {
                candidates.offer_property(property, &value);
            }
        }

        let names: [(&str, &Lazy<Regex>); 3] = [
            ("twitter:image", &TWITTER_IMAGE_RE),
            ("twitter:description", &TWITTER_DESCRIPTION_RE),
            ("description", &DESCRIPTION_RE),
        ];
        for (name, re) in names {
            if let Some(value) = first_capture(re, html) {
                candidates.offer_name(name, &value);
            }
        }

        if let Some(title) = first_capture(&TITLE_RE, html) {
            candidates.offer_title(&title);
        }

        if let Some(href) = first_capture(&ICON_RE, html) {
            candidates.offer_link("icon", &href);
        }

        candidates.finish()
    }
}
