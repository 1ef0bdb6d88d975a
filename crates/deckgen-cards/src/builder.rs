//! Section-to-card conversion.

use deckgen_config::MediaConfig;
use deckgen_rst::{Image, Node, Section};

use crate::classify::render_paragraph;
use crate::draft::{Card, CardDraft};
use crate::error::{BuildError, BuildErrorKind};
use crate::html;
use crate::resolver::TitleResolver;

/// Builds one card per section of a source file.
pub struct CardBuilder<'a> {
    file: &'a str,
    resolver: &'a dyn TitleResolver,
    media: &'a MediaConfig,
}

impl<'a> CardBuilder<'a> {
    /// Create a builder for sections of `file` (used in error messages).
    pub fn new(file: &'a str, resolver: &'a dyn TitleResolver, media: &'a MediaConfig) -> Self {
        Self {
            file,
            resolver,
            media,
        }
    }

    /// Walk the section's children once and finalize the card as `Card {index}`.
    ///
    /// Nested sections and unmodelled constructs are skipped.
    pub fn build(&self, index: usize, section: &Section) -> Result<Card, BuildError> {
        let mut draft = CardDraft::new();

        for node in &section.children {
            match node {
                Node::Title(title) => draft.set_tags(&title.text),
                Node::Comment(comment) => draft.observe_comment(&comment.text),
                Node::Image(image) => self.add_image(&mut draft, index, image)?,
                Node::BulletList(list) => draft.push_fragment(html::list("ul", list)),
                Node::EnumeratedList(list) => draft.push_fragment(html::list("ol", list)),
                Node::Paragraph(paragraph) => {
                    draft.observe_paragraph(&paragraph.text);
                    draft.push_fragment(render_paragraph(&paragraph.text, self.resolver));
                }
                Node::Section(_) | Node::Other(_) => {}
            }
        }

        Ok(draft.finish(format!("Card {index}")))
    }

    fn add_image(
        &self,
        draft: &mut CardDraft,
        index: usize,
        image: &Image,
    ) -> Result<(), BuildError> {
        let uri = image
            .uri
            .as_deref()
            .ok_or_else(|| self.error(index, image.line, BuildErrorKind::MissingImageUri))?;
        let alt = image.alt().ok_or_else(|| {
            self.error(
                index,
                image.line,
                BuildErrorKind::MissingImageAlt {
                    uri: uri.to_owned(),
                },
            )
        })?;

        let src = uri.strip_prefix(&self.media.strip_prefix).unwrap_or(uri);
        draft.push_media(uri, html::image(src, alt));
        Ok(())
    }

    fn error(&self, section: usize, line: usize, kind: BuildErrorKind) -> BuildError {
        BuildError {
            file: self.file.to_owned(),
            section,
            line,
            kind,
        }
    }
}
