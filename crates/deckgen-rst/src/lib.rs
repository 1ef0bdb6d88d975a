//! reStructuredText subset parser.
//!
//! Converts source text into a [`Document`]: an ordered tree of typed
//! [`Node`]s. Only the constructs that flashcard sources use are modelled
//! individually:
//!
//! - Section titles (underline and overline styles) with nesting
//! - Comments (`.. text`)
//! - The `image` directive and its `:alt:` option
//! - Bullet and enumerated lists
//! - Paragraphs
//!
//! Everything else (other directives, targets, literal blocks, block quotes,
//! transitions) is kept as [`Node::Other`] so consumers can skip it.
//!
//! Title, paragraph and list-item text is stored without inline markup, so
//! `` `text <url>`_ `` becomes `text` and `**bold**` becomes `bold`.
//!
//! # Example
//!
//! ```
//! use deckgen_rst::{Node, parse};
//!
//! let doc = parse("Rust, lang\n==========\n\nWhat is it?\n\n.. answer\n\nA language.\n").unwrap();
//! let section = doc.sections().next().unwrap();
//! assert!(matches!(section.children[0], Node::Title(_)));
//! ```

mod error;
mod inline;
mod lines;
mod node;
mod parser;

pub use error::ParseError;
pub use node::{Comment, Document, Image, List, ListItem, Node, Other, Paragraph, Section, Title};
pub use parser::parse;
