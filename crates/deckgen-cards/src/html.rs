//! HTML fragments placed into note fields.
//!
//! Text is inserted verbatim: source paragraphs may carry inline HTML or
//! cloze markup that the flashcard application interprets.

use std::fmt::Write;

use deckgen_rst::List;

/// Separator between fragments of one field.
pub(crate) const FRAGMENT_SEPARATOR: &str = "\n\n";

/// Separator between `<img>` tags in the Image field.
pub(crate) const MEDIA_SEPARATOR: &str = "<br>";

pub(crate) fn paragraph(text: &str) -> String {
    format!("<p>{text}</p>")
}

pub(crate) fn link(url: &str, text: &str) -> String {
    format!(r#"<p><a href="{url}">{text}</a></p>"#)
}

pub(crate) fn image(src: &str, alt: &str) -> String {
    format!(r#"<img src="{src}" alt="{alt}">"#)
}

/// Render a list as `<ul>` or `<ol>` with one `<li>` per item.
pub(crate) fn list(tag: &str, list: &List) -> String {
    let mut out = format!("<{tag}>");
    for item in &list.items {
        write!(out, "<li>{}</li>", item.text).unwrap();
    }
    write!(out, "</{tag}>").unwrap();
    out
}
