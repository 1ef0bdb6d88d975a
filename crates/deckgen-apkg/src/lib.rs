//! Anki package (`.apkg`) writer.
//!
//! A package is a zip archive holding:
//!
//! - `collection.anki2`: an SQLite collection (schema 11) with the deck, the
//!   plain and cloze note models, and one note per card.
//! - `media`: a JSON object mapping archive entry names (`"0"`, `"1"`, ...) to
//!   media file names.
//! - The numbered media payloads themselves.
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use deckgen_apkg::PackageWriter;
//! use deckgen_cards::Deck;
//! use deckgen_config::ModelsConfig;
//!
//! let models = ModelsConfig::default();
//! let deck = Deck::new("rust");
//! PackageWriter::new(&models, ".").write(&deck, Path::new("rust.apkg"))?;
//! # Ok::<(), deckgen_apkg::PackageError>(())
//! ```

mod collection;
mod error;
mod note;
mod schema;
mod writer;

pub use error::PackageError;
pub use writer::{COLLECTION_ENTRY, MEDIA_ENTRY, PackageWriter};
