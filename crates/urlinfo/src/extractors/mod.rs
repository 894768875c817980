// ABOUTME: Metadata extraction strategies and the precedence rules they share.
// ABOUTME: Defines the Extractor trait, ExtractorKind selection, and the MetaCandidates accumulator.

//! Metadata extraction module.
//!
//! Two interchangeable strategies pull preview metadata out of an HTML page:
//! - `structural`: parses the page into a tree and walks every element once.
//! - `pattern`: scans the raw text with precompiled regular expressions.
//!
//! Both report what they see to [`MetaCandidates`], which owns the field precedence, so the
//! strategies cannot disagree on which source wins.

use std::fmt;

use url::Url;

use crate::resolve::resolve_metadata;
use crate::result::PageMetadata;

pub mod pattern;
pub mod structural;

pub use pattern::PatternExtractor;
pub use structural::StructuralExtractor;

/// A metadata extraction strategy.
pub trait Extractor: Send + Sync {
    /// Scans an HTML document and returns the raw, unresolved metadata.
    fn scan(&self, html: &str) -> PageMetadata;

    /// Scans an HTML document and resolves its links against `base`. Never fails.
    fn extract(&self, html: &str, base: &Url) -> PageMetadata {
        resolve_metadata(self.scan(html), base)
    }
}

/// Which extraction strategy a client uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExtractorKind {
    #[default]
    Structural,
    Pattern,
}

impl ExtractorKind {
    /// Instantiate the strategy.
    pub fn build(self) -> Box<dyn Extractor> {
        match self {
            ExtractorKind::Structural => Box::new(StructuralExtractor),
            ExtractorKind::Pattern => Box::new(PatternExtractor),
        }
    }
}

impl fmt::Display for ExtractorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ExtractorKind::Structural => "structural",
            ExtractorKind::Pattern => "pattern",
        };
        write!(f, "{}", s)
    }
}

impl From<&str> for ExtractorKind {
    fn from(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "pattern" | "regex" | "scan" => ExtractorKind::Pattern,
            _ => ExtractorKind::Structural,
        }
    }
}

/// Collects candidate values per source; the first non-empty value of each source is kept.
#[derive(Debug, Default)]
pub struct MetaCandidates {
    og_image: Option<String>,
    twitter_image: Option<String>,
    og_title: Option<String>,
    title_tag: Option<String>,
    og_description: Option<String>,
    twitter_description: Option<String>,
    meta_description: Option<String>,
    favicon: Option<String>,
}

fn offer(slot: &mut Option<String>, value: &str) {
    if slot.is_some() {
        return;
    }
    let trimmed = value.trim();
    if !trimmed.is_empty() {
        *slot = Some(trimmed.to_string());
    }
}

impl MetaCandidates {
    /// Records a `<meta property=...>` tag. `property` must already be lower-cased.
    pub fn offer_property(&mut self, property: &str, content: &str) {
        match property {
            "og:image" => offer(&mut self.og_image, content),
            "og:title" => offer(&mut self.og_title, content),
            "og:description" => offer(&mut self.og_description, content),
            _ => {}
        }
    }

    /// Records a `<meta name=...>` tag. `name` must already be lower-cased.
    pub fn offer_name(&mut self, name: &str, content: &str) {
        match name {
            "twitter:image" => offer(&mut self.twitter_image, content),
            "twitter:description" => offer(&mut self.twitter_description, content),
            "description" => offer(&mut self.meta_description, content),
            _ => {}
        }
    }

    /// Records `<title>` text; runs of whitespace collapse to one space.
    pub fn offer_title(&mut self, text: &str) {
        let normalized = text.split_whitespace().collect::<Vec<_>>().join(" ");
        offer(&mut self.title_tag, &normalized);
    }

    /// Records a `<link>` tag; only counts when `rel` contains "icon".
    pub fn offer_link(&mut self, rel: &str, href: &str) {
        if rel.to_lowercase().contains("icon") {
            offer(&mut self.favicon, href);
        }
    }

    /// True once the highest-precedence source of every field is filled.
    pub fn is_settled(&self) -> bool {
        self.og_image.is_some()
            && self.og_title.is_some()
            && self.og_description.is_some()
            && self.favicon.is_some()
    }

    /// Applies field precedence and produces the metadata.
    pub fn finish(self) -> PageMetadata {
        PageMetadata {
            preview_image: self.og_image.or(self.twitter_image),
            title: self.og_title.or(self.title_tag),
            description: self
                .og_description
                .or(self.twitter_description)
                .or(self.meta_description),
            favicon: self.favicon,
        }
    }
}
