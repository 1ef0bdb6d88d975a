//! Deck assembly.

use std::collections::BTreeSet;
use std::path::Path;

use deckgen_config::MediaConfig;
use deckgen_rst::Document;
use sha2::{Digest, Sha256};

use crate::builder::CardBuilder;
use crate::draft::Card;
use crate::error::BuildError;
use crate::resolver::TitleResolver;

/// Lower bound of generated deck ids (2^30).
const DECK_ID_BASE: u32 = 1 << 30;

/// Deck built from one source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deck {
    /// Stable id derived from the file's base name.
    pub id: i64,
    /// Display name derived from the file's base name.
    pub name: String,
    /// Cards in section order.
    pub cards: Vec<Card>,
    /// Deduplicated media references of all cards.
    pub media: BTreeSet<String>,
}

impl Deck {
    /// Empty deck whose identity derives from the source base name.
    #[must_use]
    pub fn new(stem: &str) -> Self {
        Self {
            id: deck_id(stem),
            name: deck_name(stem),
            cards: Vec::new(),
            media: BTreeSet::new(),
        }
    }

    /// Append a card and merge its media references.
    pub fn push(&mut self, card: Card) {
        self.media.extend(card.media.iter().cloned());
        self.cards.push(card);
    }
}

/// Turns parsed documents into decks.
pub struct DeckAssembler<'a> {
    resolver: &'a dyn TitleResolver,
    media: &'a MediaConfig,
}

impl<'a> DeckAssembler<'a> {
    pub fn new(resolver: &'a dyn TitleResolver, media: &'a MediaConfig) -> Self {
        Self { resolver, media }
    }

    /// Build one card per top-level section of `document`.
    ///
    /// `source` names the input file; its base name determines the deck id
    /// and display name.
    pub fn assemble(&self, source: &Path, document: &Document) -> Result<Deck, BuildError> {
        let file = source
            .file_name()
            .map_or_else(|| source.display().to_string(), |n| n.to_string_lossy().into_owned());
        let stem = source
            .file_stem()
            .map_or_else(|| file.clone(), |s| s.to_string_lossy().into_owned());

        let builder = CardBuilder::new(&file, self.resolver, self.media);
        let mut deck = Deck::new(&stem);
        for (index, section) in document.sections().enumerate() {
            deck.push(builder.build(index, section)?);
        }

        tracing::debug!(
            file = %file,
            cards = deck.cards.len(),
            media = deck.media.len(),
            "Assembled deck"
        );
        Ok(deck)
    }
}

/// Deterministic deck id in `[2^30, 2^31)` derived from the base name.
pub fn deck_id(stem: &str) -> i64 {
    let mut hasher = Sha256::new();
    hasher.update(stem.as_bytes());
    let digest = hex::encode(hasher.finalize());
    // 8 hex digits always fit in u32.
    let prefix = u32::from_str_radix(&digest[..8], 16).unwrap_or_default();
    i64::from(DECK_ID_BASE | (prefix % DECK_ID_BASE))
}

/// Title-case the base name: the first letter of each alphabetic run is
/// upper-cased and the rest lower-cased.
pub fn deck_name(stem: &str) -> String {
    let mut out = String::with_capacity(stem.len());
    let mut previous_alphabetic = false;
    for c in stem.chars() {
        if c.is_alphabetic() {
            if previous_alphabetic {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            previous_alphabetic = true;
        } else {
            out.push(c);
            previous_alphabetic = false;
        }
    }
    out
}
