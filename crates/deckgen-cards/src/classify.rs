//! Paragraph content classification.

use crate::html;
use crate::resolver::{TitleResolver, link_text};

/// Substring that marks a paragraph as cloze content.
pub const CLOZE_MARKER: &str = "{{";

/// Prefix that marks a paragraph as a bare URL.
const URL_PREFIX: &str = "http";

/// What a paragraph's text represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Content<'a> {
    /// Whole paragraph is a URL to render as a titled link.
    Link(&'a str),
    /// Text rendered verbatim.
    Text(&'a str),
}

/// Classify paragraph text.
///
/// Only paragraphs that start with `http` are links; text with an embedded
/// URL stays plain text.
pub fn classify(text: &str) -> Content<'_> {
    if text.starts_with(URL_PREFIX) {
        Content::Link(text)
    } else {
        Content::Text(text)
    }
}

/// Whether the text contains a cloze marker.
pub fn has_cloze_marker(text: &str) -> bool {
    text.contains(CLOZE_MARKER)
}

/// Render a paragraph as an HTML fragment, resolving link titles as needed.
pub fn render_paragraph(text: &str, resolver: &dyn TitleResolver) -> String {
    match classify(text) {
        Content::Link(url) => html::link(url, &link_text(resolver, url)),
        Content::Text(text) => html::paragraph(text),
    }
}
