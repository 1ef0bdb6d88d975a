//! Note rows derived from finalized cards.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use deckgen_cards::{Card, Template};
use regex::Regex;
use sha1::{Digest, Sha1};

/// Separator between note fields in `notes.flds`.
pub(crate) const FIELD_SEPARATOR: &str = "\x1f";

static HTML_TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").unwrap());

static CLOZE_NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{c(\d+)::").unwrap());

/// Column values of one `notes` row plus the card ordinals it generates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct NoteRow {
    pub guid: String,
    pub tags: String,
    pub flds: String,
    pub sfld: String,
    pub csum: i64,
    pub ords: Vec<u32>,
}

impl NoteRow {
    pub fn new(deck_id: i64, card: &Card) -> Self {
        let fields = card.fields();
        let sfld = strip_html(&card.question);
        let ords = match card.template {
            Template::Basic => vec![0],
            Template::Cloze => cloze_ordinals(&card.question),
        };

        Self {
            guid: guid(deck_id, &fields),
            tags: format_tags(&card.tags),
            flds: fields.join(FIELD_SEPARATOR),
            csum: checksum(&sfld),
            sfld,
            ords,
        }
    }
}

/// Stable note id: hex SHA-1 of the deck id and fields.
fn guid(deck_id: i64, fields: &[&str]) -> String {
    let mut hasher = Sha1::new();
    hasher.update(deck_id.to_string().as_bytes());
    for field in fields {
        hasher.update(FIELD_SEPARATOR.as_bytes());
        hasher.update(field.as_bytes());
    }
    let digest = hex::encode(hasher.finalize());
    digest[..16].to_owned()
}

/// First 32 bits of the SHA-1 of the sort field.
fn checksum(sort_field: &str) -> i64 {
    let digest = Sha1::digest(sort_field.as_bytes());
    i64::from(u32::from_be_bytes([digest[0], digest[1], digest[2], digest[3]]))
}

/// Anki tag column: space separated with a leading and trailing space.
///
/// Tags parsed from titles carry no whitespace; any left in a hand-built
/// card becomes `_` because Anki splits tags on spaces.
fn format_tags(tags: &[String]) -> String {
    if tags.is_empty() {
        return String::new();
    }
    let joined = tags
        .iter()
        .map(|tag| tag.split_whitespace().collect::<Vec<_>>().join("_"))
        .collect::<Vec<_>>()
        .join(" ");
    format!(" {joined} ")
}

fn strip_html(text: &str) -> String {
    HTML_TAG_RE.replace_all(text, "").into_owned()
}

/// Zero-based card ordinals for the distinct `{{cN::` deletions in `text`.
///
/// Text without numbered deletions still produces one card.
fn cloze_ordinals(text: &str) -> Vec<u32> {
    let ords: BTreeSet<u32> = CLOZE_NUMBER_RE
        .captures_iter(text)
        .filter_map(|caps| caps[1].parse::<u32>().ok())
        .filter_map(|n| n.checked_sub(1))
        .collect();
    if ords.is_empty() {
        vec![0]
    } else {
        ords.into_iter().collect()
    }
}
