//! Per-section card accumulator and the finalized card it produces.

use crate::classify::has_cloze_marker;
use crate::html::{FRAGMENT_SEPARATOR, MEDIA_SEPARATOR};

/// Comment text that switches a draft to the answer side.
pub const ANSWER_MARKER: &str = "answer";

/// Field receiving new fragments.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Side {
    #[default]
    Question,
    Answer,
}

impl Side {
    /// Side after seeing a comment. Only the answer marker moves the cursor,
    /// and it never moves back.
    #[must_use]
    pub fn after_comment(self, comment: &str) -> Self {
        if comment == ANSWER_MARKER {
            Side::Answer
        } else {
            self
        }
    }
}

/// Card content kind, upgraded from plain to cloze by paragraph text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CardKind {
    #[default]
    Plain,
    Cloze,
}

impl CardKind {
    /// Kind after seeing a paragraph. Cloze is sticky.
    #[must_use]
    pub fn absorb(self, paragraph: &str) -> Self {
        if self == CardKind::Cloze || has_cloze_marker(paragraph) {
            CardKind::Cloze
        } else {
            CardKind::Plain
        }
    }
}

/// Note model used for a finalized card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Template {
    Basic,
    Cloze,
}

impl From<CardKind> for Template {
    fn from(kind: CardKind) -> Self {
        match kind {
            CardKind::Plain => Template::Basic,
            CardKind::Cloze => Template::Cloze,
        }
    }
}

/// Mutable accumulator for one section.
#[derive(Debug, Default)]
pub struct CardDraft {
    tags: Vec<String>,
    kind: CardKind,
    side: Side,
    question: Vec<String>,
    answer: Vec<String>,
    media_refs: Vec<String>,
    media_tags: Vec<String>,
}

impl CardDraft {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn kind(&self) -> CardKind {
        self.kind
    }

    /// Replace tags with the comma-separated entries of a section title.
    pub fn set_tags(&mut self, title: &str) {
        self.tags = parse_tags(title);
    }

    pub fn observe_comment(&mut self, comment: &str) {
        self.side = self.side.after_comment(comment);
    }

    pub fn observe_paragraph(&mut self, paragraph: &str) {
        self.kind = self.kind.absorb(paragraph);
    }

    /// Append an HTML fragment to the active side.
    pub fn push_fragment(&mut self, fragment: String) {
        match self.side {
            Side::Question => self.question.push(fragment),
            Side::Answer => self.answer.push(fragment),
        }
    }

    /// Record a media reference and its rendered `<img>` tag.
    pub fn push_media(&mut self, reference: &str, tag: String) {
        self.media_refs.push(reference.to_owned());
        self.media_tags.push(tag);
    }

    /// Join the accumulated fragments into a finalized card.
    #[must_use]
    pub fn finish(self, name: String) -> Card {
        Card {
            name,
            tags: self.tags,
            question: self.question.join(FRAGMENT_SEPARATOR),
            answer: self.answer.join(FRAGMENT_SEPARATOR),
            image: self.media_tags.join(MEDIA_SEPARATOR),
            media: self.media_refs,
            template: self.kind.into(),
        }
    }
}

/// Split a title on commas, removing all whitespace from each entry and
/// dropping empty ones.
pub fn parse_tags(title: &str) -> Vec<String> {
    title
        .split(',')
        .map(|tag| tag.split_whitespace().collect::<String>())
        .filter(|tag| !tag.is_empty())
        .collect()
}

/// Finalized card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    /// Display name (`Card 0`, `Card 1`, ...).
    pub name: String,
    pub tags: Vec<String>,
    /// Question field HTML.
    pub question: String,
    /// Answer field HTML.
    pub answer: String,
    /// Image field HTML (`<img>` tags joined with `<br>`).
    pub image: String,
    /// Media references in document order.
    pub media: Vec<String>,
    pub template: Template,
}

impl Card {
    /// Note fields in model order: Question, Answer, Image.
    pub fn fields(&self) -> [&str; 3] {
        [&self.question, &self.answer, &self.image]
    }
}
