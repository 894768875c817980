// ABOUTME: Structural metadata extractor that parses the page into a tree and walks it once.
// ABOUTME: Inspects meta, title and link elements in document order; tolerant of malformed markup.

use scraper::{ElementRef, Html};

use crate::extractors::{Extractor, MetaCandidates};
use crate::result::PageMetadata;

/// Tree-walking extractor backed by html5ever via `scraper`.
#[derive(Debug, Clone, Copy, Default)]
pub struct StructuralExtractor;

impl Extractor for StructuralExtractor {
    fn scan(&self, html: &str) -> PageMetadata {
        let doc = Html::parse_document(html);
        let mut candidates = MetaCandidates::default();

        // descendants() is a depth-first pre-order walk, i.e. document order.
        for el in doc.tree.root().descendants().filter_map(ElementRef::wrap) {
            match el.value().name() {
                "meta" => visit_meta(&el, &mut candidates),
                "title" => candidates.offer_title(&el.text().collect::<String>()),
                "link" => visit_link(&el, &mut candidates),
                _ => {}
            }
            if candidates.is_settled() {
                break;
            }
        }

        candidates.finish()
    }
}

/// Case-insensitive attribute lookup; html5ever already lower-cases names in HTML content,
/// foreign (SVG/MathML) content keeps its original case.
fn attr<'a>(el: &'a ElementRef<'_>, name: &str) -> Option<&'a str> {
    el.value()
        .attrs()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, value)| value)
}

fn visit_meta(el: &ElementRef<'_>, candidates: &mut MetaCandidates) {
    let content = attr(el, "content").unwrap_or("");
    if let Some(property) = attr(el, "property") {
        candidates.offer_property(&property.trim().to_lowercase(), content);
    }
    if let Some(name) = attr(el, "name") {
        candidates.offer_name(&name.trim().to_lowercase(), content);
    }
}

fn visit_link(el: &ElementRef<'_>, candidates: &mut MetaCandidates) {
    if let (Some(rel), Some(href)) = (attr(el, "rel"), attr(el, "href")) {
        candidates.offer_link(rel, href);
    }
}
