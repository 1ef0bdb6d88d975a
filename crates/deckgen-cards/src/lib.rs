//! Document-to-flashcard transformation.
//!
//! Each top-level section of a parsed document becomes one [`Card`]:
//!
//! - The section title supplies the card's tags (comma separated).
//! - Content goes to the Question field until a `.. answer` comment, then to
//!   the Answer field.
//! - Images are collected into the Image field and the deck's media set.
//! - A paragraph containing `{{` switches the card to the cloze template.
//! - A paragraph that is a bare URL becomes a link titled with the page's
//!   `<title>`, resolved through a [`TitleResolver`].
//!
//! [`DeckAssembler`] drives the per-section [`CardBuilder`] and produces a
//! [`Deck`] ready for packaging.
//!
//! # Example
//!
//! ```
//! use std::path::Path;
//! use deckgen_cards::{DeckAssembler, OfflineResolver, Template};
//! use deckgen_config::MediaConfig;
//!
//! let doc = deckgen_rst::parse("rust\n====\n\n{{c1::Ferris}} is the mascot.\n").unwrap();
//! let media = MediaConfig::default();
//! let deck = DeckAssembler::new(&OfflineResolver, &media)
//!     .assemble(Path::new("mascots.rst"), &doc)
//!     .unwrap();
//! assert_eq!(deck.name, "Mascots");
//! assert_eq!(deck.cards[0].template, Template::Cloze);
//! ```

mod builder;
pub mod classify;
mod deck;
mod draft;
mod error;
mod html;
mod resolver;

pub use builder::CardBuilder;
pub use deck::{Deck, DeckAssembler, deck_id, deck_name};
pub use draft::{ANSWER_MARKER, Card, CardDraft, CardKind, Side, Template, parse_tags};
pub use error::{BuildError, BuildErrorKind};
pub use resolver::{HttpTitleResolver, OfflineResolver, TitleResolver, extract_title, link_text};
