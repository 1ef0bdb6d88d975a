//! Block-level parser.
//!
//! Parsing runs in two passes. The first walks the lines and produces a flat
//! sequence of blocks, where section titles are markers carrying their
//! adornment style. The second folds that sequence into nested sections,
//! assigning levels to adornment styles in order of first appearance.

use std::collections::BTreeMap;
use std::ops::Range;

use crate::error::ParseError;
use crate::inline::plain_text;
use crate::lines::{Line, MIN_ADORNMENT_LEN, dedent, join_block, min_indent, split_lines};
use crate::node::{Comment, Document, Image, List, ListItem, Node, Other, Paragraph, Section, Title};

const BULLETS: [char; 6] = ['-', '*', '+', '•', '‣', '⁃'];

/// Parse reStructuredText source into a document tree.
///
/// The parser is lenient: malformed constructs degrade to paragraphs or
/// [`Node::Other`]. The only error is a section title whose adornment style
/// would skip a nesting level.
pub fn parse(text: &str) -> Result<Document, ParseError> {
    let lines = split_lines(text);
    let blocks = BlockParser::new(&lines).run();
    build_tree(blocks)
}

/// Section title adornment style.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Style {
    ch: char,
    overline: bool,
}

#[derive(Debug)]
enum Block {
    Title {
        text: String,
        line: usize,
        style: Style,
    },
    Node(Node),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ListKind {
    Bullet(char),
    Enumerated(EnumFormat),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EnumFormat {
    /// `1.`
    Period,
    /// `1)`
    RParen,
    /// `(1)`
    Parens,
}

struct BlockParser<'a> {
    lines: &'a [Line],
    pos: usize,
    blocks: Vec<Block>,
    /// Set after a paragraph ending in `::`.
    literal_pending: bool,
}

impl<'a> BlockParser<'a> {
    fn new(lines: &'a [Line]) -> Self {
        Self {
            lines,
            pos: 0,
            blocks: Vec::new(),
            literal_pending: false,
        }
    }

    fn run(mut self) -> Vec<Block> {
        let lines = self.lines;
        while self.pos < lines.len() {
            let line = &lines[self.pos];
            if line.is_blank() {
                self.pos += 1;
                continue;
            }

            let literal = std::mem::take(&mut self.literal_pending);
            if line.indent > 0 {
                let node = self.indented_block(literal);
                self.blocks.push(Block::Node(node));
                continue;
            }

            if let Some(title) = self.overline_title().or_else(|| self.underline_title()) {
                self.blocks.push(title);
                continue;
            }

            if self.is_transition() {
                self.blocks.push(Block::Node(Node::Other(Other {
                    kind: "transition".to_owned(),
                    line: line.number,
                })));
                self.pos += 1;
                continue;
            }

            let node = if line.text == ".." || line.text.starts_with(".. ") {
                Some(self.explicit_markup())
            } else if let Some(kind) = list_kind(&line.text) {
                Some(self.list(kind))
            } else {
                self.paragraph()
            };
            if let Some(node) = node {
                self.blocks.push(Block::Node(node));
            }
        }
        self.blocks
    }

    fn line_at(&self, idx: usize) -> Option<&'a Line> {
        self.lines.get(idx)
    }

    /// Title framed by an overline and an underline of the same character.
    fn overline_title(&mut self) -> Option<Block> {
        let over = self.line_at(self.pos)?;
        let ch = over.adornment()?;
        let text = self.line_at(self.pos + 1).filter(|l| !l.is_blank())?;
        let under = self.line_at(self.pos + 2)?;
        if under.adornment() != Some(ch) || text.adornment().is_some() {
            return None;
        }
        self.pos += 3;
        Some(Block::Title {
            text: plain_text(text.text.trim()),
            line: text.number,
            style: Style { ch, overline: true },
        })
    }

    /// Title text followed by an underline.
    fn underline_title(&mut self) -> Option<Block> {
        if !self.is_underline_title_at(self.pos) {
            return None;
        }
        let lines = self.lines;
        let text = &lines[self.pos];
        let ch = lines[self.pos + 1].adornment()?;
        self.pos += 2;
        Some(Block::Title {
            text: plain_text(&text.text),
            line: text.number,
            style: Style {
                ch,
                overline: false,
            },
        })
    }

    fn is_underline_title_at(&self, idx: usize) -> bool {
        let (Some(text), Some(under)) = (self.line_at(idx), self.line_at(idx + 1)) else {
            return false;
        };
        if text.is_blank() || text.indent > 0 || text.adornment().is_some() {
            return false;
        }
        under.adornment().is_some()
            && (under.width() >= text.width() || under.width() >= MIN_ADORNMENT_LEN)
    }

    /// Adornment line standing alone between blank lines.
    fn is_transition(&self) -> bool {
        let line = &self.lines[self.pos];
        if line.adornment().is_none() || line.width() < MIN_ADORNMENT_LEN {
            return false;
        }
        let before_blank = self.pos == 0 || self.lines[self.pos - 1].is_blank();
        let after_blank = self.line_at(self.pos + 1).is_none_or(Line::is_blank);
        before_blank && after_blank
    }

    /// Consume blank and indented lines, returning the range without trailing blanks.
    fn take_indented(&mut self) -> Range<usize> {
        let start = self.pos;
        let mut end = start;
        while let Some(line) = self.line_at(self.pos) {
            if !line.is_blank() && line.indent == 0 {
                break;
            }
            self.pos += 1;
            if !line.is_blank() {
                end = self.pos;
            }
        }
        self.pos = end;
        start..end
    }

    fn indented_block(&mut self, literal: bool) -> Node {
        let line = self.lines[self.pos].number;
        self.take_indented();
        let kind = if literal { "literal_block" } else { "block_quote" };
        Node::Other(Other {
            kind: kind.to_owned(),
            line,
        })
    }

    /// Comment, directive, target, footnote or substitution definition.
    fn explicit_markup(&mut self) -> Node {
        let lines = self.lines;
        let first = &lines[self.pos];
        let line = first.number;
        let rest = first.text[2..].trim_start();
        self.pos += 1;
        let body = &lines[self.take_indented()];

        if rest.starts_with('_') {
            return other("target", line);
        }
        if rest.starts_with('[') && rest.contains(']') {
            return other("footnote", line);
        }
        if rest.starts_with('|') {
            return other("substitution_definition", line);
        }

        if let Some((name, argument)) = directive_head(rest) {
            return if name == "image" {
                Node::Image(image_directive(argument, body, line))
            } else {
                other(name, line)
            };
        }

        let mut text_lines = Vec::with_capacity(body.len() + 1);
        if !rest.is_empty() {
            text_lines.push(rest.to_owned());
        }
        text_lines.extend(dedent(body, min_indent(body)));
        Node::Comment(Comment {
            text: join_block(&text_lines),
            line,
        })
    }

    fn list(&mut self, kind: ListKind) -> Node {
        let lines = self.lines;
        let line = lines[self.pos].number;
        let mut items = Vec::new();

        while let Some(current) = self.line_at(self.pos) {
            if current.is_blank() {
                self.pos += 1;
                continue;
            }
            if current.indent > 0 || list_kind(&current.text) != Some(kind) {
                break;
            }
            let marker_len = match kind {
                ListKind::Bullet(ch) => ch.len_utf8(),
                ListKind::Enumerated(_) => enumerator(&current.text).map_or(0, |(_, len)| len),
            };
            let after_marker = &current.text[marker_len..];
            let first_text = after_marker.trim_start();
            let body_indent = current.width() - first_text.chars().count();

            self.pos += 1;
            let continuation = &lines[self.take_indented()];
            let base = if first_text.is_empty() {
                min_indent(continuation)
            } else {
                body_indent
            };

            let mut text_lines = Vec::with_capacity(continuation.len() + 1);
            text_lines.push(first_text.to_owned());
            text_lines.extend(dedent(continuation, base));
            items.push(ListItem {
                text: plain_text(&join_block(&text_lines)),
                line: current.number,
            });
        }

        let list = List { items, line };
        match kind {
            ListKind::Bullet(_) => Node::BulletList(list),
            ListKind::Enumerated(_) => Node::EnumeratedList(list),
        }
    }

    /// Paragraph of consecutive unindented lines.
    ///
    /// Returns `None` for a lone `::` literal marker.
    fn paragraph(&mut self) -> Option<Node> {
        let start = self.pos;
        let line = self.lines[start].number;
        let mut texts: Vec<&str> = Vec::new();

        while let Some(current) = self.line_at(self.pos) {
            if current.is_blank() || current.indent > 0 {
                break;
            }
            if self.pos > start && self.is_underline_title_at(self.pos) {
                break;
            }
            texts.push(&current.text);
            self.pos += 1;
        }

        let mut text = texts.join("\n");
        if text.ends_with("::") {
            self.literal_pending = true;
            if text == "::" {
                return None;
            }
            let head = &text[..text.len() - 2];
            text = if head.ends_with(char::is_whitespace) {
                head.trim_end().to_owned()
            } else {
                text[..text.len() - 1].to_owned()
            };
        }

        Some(Node::Paragraph(Paragraph {
            text: plain_text(&text),
            line,
        }))
    }
}

fn other(kind: &str, line: usize) -> Node {
    Node::Other(Other {
        kind: kind.to_owned(),
        line,
    })
}

/// Split `name:: argument` into its parts.
fn directive_head(rest: &str) -> Option<(&str, &str)> {
    let idx = rest.find("::")?;
    let name = &rest[..idx];
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_alphanumeric() || matches!(c, '-' | '_' | '.' | '+'));
    valid.then(|| (name, rest[idx + 2..].trim()))
}

fn image_directive(argument: &str, body: &[Line], line: usize) -> Image {
    let mut uri = argument.to_owned();
    let mut options = BTreeMap::new();
    let mut last_option: Option<String> = None;
    let mut in_options = false;

    for body_line in body {
        if body_line.is_blank() {
            if in_options {
                break;
            }
            continue;
        }
        if let Some((name, value)) = field(&body_line.text) {
            in_options = true;
            options.insert(name.to_owned(), value.to_owned());
            last_option = Some(name.to_owned());
        } else if in_options {
            // Continuation of the previous option value.
            if let Some(value) = last_option.as_ref().and_then(|name| options.get_mut(name)) {
                if !value.is_empty() {
                    value.push(' ');
                }
                value.push_str(&body_line.text);
            }
        } else {
            uri.push_str(&body_line.text);
        }
    }

    Image {
        uri: (!uri.is_empty()).then_some(uri),
        options,
        line,
    }
}

/// Parse a `:name: value` field line.
fn field(text: &str) -> Option<(&str, &str)> {
    let inner = text.strip_prefix(':')?;
    let end = inner.find(':')?;
    let name = &inner[..end];
    let value = &inner[end + 1..];
    if name.is_empty() || !(value.is_empty() || value.starts_with(' ')) {
        return None;
    }
    Some((name, value.trim()))
}

fn list_kind(text: &str) -> Option<ListKind> {
    if let Some(ch) = text.chars().next().filter(|c| BULLETS.contains(c)) {
        let after = &text[ch.len_utf8()..];
        if after.is_empty() || after.starts_with(' ') {
            return Some(ListKind::Bullet(ch));
        }
        return None;
    }
    enumerator(text).map(|(format, _)| ListKind::Enumerated(format))
}

/// Parse an enumerated list marker, returning its format and byte length.
fn enumerator(text: &str) -> Option<(EnumFormat, usize)> {
    let (format, inner, len) = if let Some(stripped) = text.strip_prefix('(') {
        let close = stripped.find(')')?;
        (EnumFormat::Parens, &stripped[..close], close + 2)
    } else {
        let end = text.find(['.', ')'])?;
        let format = if text[end..].starts_with('.') {
            EnumFormat::Period
        } else {
            EnumFormat::RParen
        };
        (format, &text[..end], end + 1)
    };

    let after = &text[len..];
    if !(after.is_empty() || after.starts_with(' ')) || !is_enumerator(inner) {
        return None;
    }
    Some((format, len))
}

fn is_enumerator(s: &str) -> bool {
    if s.is_empty() {
        return false;
    }
    s == "#"
        || s.chars().all(|c| c.is_ascii_digit())
        || (s.len() == 1 && s.chars().all(|c| c.is_ascii_alphabetic()))
        || s.chars().all(|c| "ivxlcdm".contains(c))
        || s.chars().all(|c| "IVXLCDM".contains(c))
}

fn build_tree(blocks: Vec<Block>) -> Result<Document, ParseError> {
    let mut styles: Vec<Style> = Vec::new();
    let mut root: Vec<Node> = Vec::new();
    let mut stack: Vec<Section> = Vec::new();

    for block in blocks {
        match block {
            Block::Title { text, line, style } => {
                let known = styles.iter().position(|s| *s == style);
                let level = known.map_or(styles.len() + 1, |idx| idx + 1);
                if level > stack.len() + 1 {
                    return Err(ParseError::InconsistentTitleLevel { line, title: text });
                }
                if known.is_none() {
                    styles.push(style);
                }
                while stack.len() >= level {
                    close_section(&mut stack, &mut root);
                }
                stack.push(Section {
                    level,
                    line,
                    children: vec![Node::Title(Title { text, line })],
                });
            }
            Block::Node(node) => match stack.last_mut() {
                Some(section) => section.children.push(node),
                None => root.push(node),
            },
        }
    }

    while !stack.is_empty() {
        close_section(&mut stack, &mut root);
    }
    Ok(Document { nodes: root })
}

fn close_section(stack: &mut Vec<Section>, root: &mut Vec<Node>) {
    if let Some(section) = stack.pop() {
        match stack.last_mut() {
            Some(parent) => parent.children.push(Node::Section(section)),
            None => root.push(Node::Section(section)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn first_section(source: &str) -> Section {
        let doc = parse(source).unwrap();
        doc.sections().next().cloned().expect("expected a section")
    }

    #[test]
    fn test_sections_in_order() {
        let doc = parse("One\n===\n\nfirst\n\nTwo\n===\n\nsecond\n").unwrap();
        let titles: Vec<_> = doc.sections().filter_map(Section::title).collect();
        assert_eq!(titles, vec!["One", "Two"]);
    }

    #[test]
    fn test_section_children() {
        let section = first_section("Tags, here\n==========\n\nQuestion text\non two lines.\n");
        assert_eq!(section.level, 1);
        assert_eq!(section.line, 1);
        assert_eq!(
            section.children,
            vec![
                Node::Title(Title {
                    text: "Tags, here".to_owned(),
                    line: 1
                }),
                Node::Paragraph(Paragraph {
                    text: "Question text\non two lines.".to_owned(),
                    line: 4
                }),
            ]
        );
    }

    #[test]
    fn test_overline_title() {
        let section = first_section("=====\n Title\n=====\n\nbody\n");
        assert_eq!(section.title(), Some("Title"));
        assert_eq!(section.line, 2);
    }

    #[test]
    fn test_short_underline_still_title_when_long_enough() {
        let section = first_section("A rather long title\n----\n\nbody\n");
        assert_eq!(section.title(), Some("A rather long title"));
    }

    #[test]
    fn test_too_short_underline_is_paragraph() {
        let doc = parse("Long title\n--\n").unwrap();
        assert_eq!(doc.sections().count(), 0);
    }

    #[test]
    fn test_nested_sections() {
        let doc = parse("Top\n===\n\nSub\n---\n\ntext\n\nNext\n====\n").unwrap();
        let sections: Vec<_> = doc.sections().collect();
        assert_eq!(sections.len(), 2);
        let nested = sections[0]
            .children
            .iter()
            .find_map(|n| match n {
                Node::Section(s) => Some(s),
                _ => None,
            })
            .unwrap();
        assert_eq!(nested.level, 2);
        assert_eq!(nested.title(), Some("Sub"));
    }

    #[test]
    fn test_inconsistent_title_level() {
        // `~` is a new style while only one section is open.
        let err = parse("A\n=\n\nB\n-\n\nC\n=\n\nD\n~\n").unwrap_err();
        assert_eq!(
            err,
            ParseError::InconsistentTitleLevel {
                line: 10,
                title: "D".to_owned()
            }
        );
    }

    #[test]
    fn test_preamble_is_not_a_section() {
        let doc = parse("intro paragraph\n\nTitle\n=====\n").unwrap();
        assert_eq!(doc.nodes.len(), 2);
        assert!(matches!(doc.nodes[0], Node::Paragraph(_)));
        assert_eq!(doc.sections().count(), 1);
    }

    #[test]
    fn test_comment() {
        let section = first_section("T\n=\n\n.. answer\n\nafter\n");
        assert_eq!(
            section.children[1],
            Node::Comment(Comment {
                text: "answer".to_owned(),
                line: 4
            })
        );
    }

    #[test]
    fn test_multiline_comment() {
        let section = first_section("T\n=\n\n.. note to self\n   second line\n");
        assert_eq!(
            section.children[1],
            Node::Comment(Comment {
                text: "note to self\nsecond line".to_owned(),
                line: 4
            })
        );
    }

    #[test]
    fn test_empty_comment() {
        let section = first_section("T\n=\n\n..\n\ntext\n");
        assert_eq!(
            section.children[1],
            Node::Comment(Comment {
                text: String::new(),
                line: 4
            })
        );
    }

    #[test]
    fn test_image_directive() {
        let section = first_section("T\n=\n\n.. image:: img/cat.png\n   :alt: A cat\n   :width: 200\n");
        let Node::Image(image) = &section.children[1] else {
            panic!("expected image");
        };
        assert_eq!(image.uri.as_deref(), Some("img/cat.png"));
        assert_eq!(image.alt(), Some("A cat"));
        assert_eq!(image.options.get("width").map(String::as_str), Some("200"));
        assert_eq!(image.line, 4);
    }

    #[test]
    fn test_image_without_uri() {
        let section = first_section("T\n=\n\n.. image::\n   :alt: nothing\n");
        let Node::Image(image) = &section.children[1] else {
            panic!("expected image");
        };
        assert_eq!(image.uri, None);
    }

    #[test]
    fn test_image_without_alt() {
        let section = first_section("T\n=\n\n.. image:: a.png\n");
        let Node::Image(image) = &section.children[1] else {
            panic!("expected image");
        };
        assert_eq!(image.alt(), None);
    }

    #[test]
    fn test_other_explicit_markup() {
        let section = first_section(
            "T\n=\n\n.. note:: careful\n   body\n\n.. _target: http://x\n\n.. [1] footnote\n\n.. |sub| replace:: x\n",
        );
        let kinds: Vec<_> = section.children[1..]
            .iter()
            .map(|n| match n {
                Node::Other(o) => o.kind.as_str(),
                _ => "unexpected",
            })
            .collect();
        assert_eq!(
            kinds,
            vec!["note", "target", "footnote", "substitution_definition"]
        );
    }

    #[test]
    fn test_bullet_list() {
        let section = first_section("T\n=\n\n- one\n- two\n  continued\n\n- three\n");
        assert_eq!(
            section.children[1],
            Node::BulletList(List {
                items: vec![
                    ListItem {
                        text: "one".to_owned(),
                        line: 4
                    },
                    ListItem {
                        text: "two\ncontinued".to_owned(),
                        line: 5
                    },
                    ListItem {
                        text: "three".to_owned(),
                        line: 8
                    },
                ],
                line: 4,
            })
        );
    }

    #[test]
    fn test_different_bullets_start_new_list() {
        let section = first_section("T\n=\n\n- one\n\n* two\n");
        assert_eq!(section.children.len(), 3);
        assert!(matches!(section.children[1], Node::BulletList(_)));
        assert!(matches!(section.children[2], Node::BulletList(_)));
    }

    #[test]
    fn test_enumerated_list() {
        let section = first_section("T\n=\n\n1. first\n2. second\n#. auto\n");
        let Node::EnumeratedList(list) = &section.children[1] else {
            panic!("expected enumerated list");
        };
        let texts: Vec<_> = list.items.iter().map(|i| i.text.as_str()).collect();
        assert_eq!(texts, vec!["first", "second", "auto"]);
    }

    #[test]
    fn test_enumerator_formats() {
        assert_eq!(enumerator("1. x"), Some((EnumFormat::Period, 2)));
        assert_eq!(enumerator("12) x"), Some((EnumFormat::RParen, 3)));
        assert_eq!(enumerator("(a) x"), Some((EnumFormat::Parens, 3)));
        assert_eq!(enumerator("iv. x"), Some((EnumFormat::Period, 3)));
        assert_eq!(enumerator("1.5 is a number"), None);
        assert_eq!(enumerator("word. more"), None);
    }

    #[test]
    fn test_nested_list_text_kept_verbatim() {
        let section = first_section("T\n=\n\n- outer\n\n  - inner\n");
        let Node::BulletList(list) = &section.children[1] else {
            panic!("expected bullet list");
        };
        assert_eq!(list.items.len(), 1);
        assert_eq!(list.items[0].text, "outer\n\n- inner");
    }

    #[test]
    fn test_literal_block() {
        let section = first_section("T\n=\n\nExample::\n\n    code here\n\nafter\n");
        assert_eq!(
            section.children[1],
            Node::Paragraph(Paragraph {
                text: "Example:".to_owned(),
                line: 4
            })
        );
        assert!(matches!(&section.children[2], Node::Other(o) if o.kind == "literal_block"));
        assert!(matches!(&section.children[3], Node::Paragraph(p) if p.text == "after"));
    }

    #[test]
    fn test_expanded_literal_marker() {
        let section = first_section("T\n=\n\nExample ::\n\n    code\n");
        assert!(matches!(&section.children[1], Node::Paragraph(p) if p.text == "Example"));
    }

    #[test]
    fn test_lone_literal_marker() {
        let section = first_section("T\n=\n\n::\n\n    code\n");
        assert_eq!(section.children.len(), 2);
        assert!(matches!(&section.children[1], Node::Other(o) if o.kind == "literal_block"));
    }

    #[test]
    fn test_block_quote() {
        let section = first_section("T\n=\n\npara\n\n    quoted\n");
        assert!(matches!(&section.children[2], Node::Other(o) if o.kind == "block_quote"));
    }

    #[test]
    fn test_transition() {
        let section = first_section("T\n=\n\nbefore\n\n----------\n\nafter\n");
        assert!(matches!(&section.children[2], Node::Other(o) if o.kind == "transition"));
        assert_eq!(section.children.len(), 4);
    }

    #[test]
    fn test_inline_markup_stripped_from_text() {
        let section = first_section(
            "``Box`` *type*\n==============\n\nWhat does ``Box<T>`` do? **bold** \\*x\n\n- *item*\n",
        );
        assert_eq!(section.title(), Some("Box type"));
        assert_eq!(
            section.children[1],
            Node::Paragraph(Paragraph {
                text: "What does Box<T> do? bold *x".to_owned(),
                line: 4
            })
        );
        let Node::BulletList(list) = &section.children[2] else {
            panic!("expected bullet list");
        };
        assert_eq!(list.items[0].text, "item");
    }

    #[test]
    fn test_overline_title_markup_stripped() {
        let section = first_section("==========\n ``Rc`` Pointers\n==========\n");
        assert_eq!(section.title(), Some("Rc Pointers"));
    }

    #[test]
    fn test_url_paragraph_is_plain_paragraph() {
        let section = first_section("T\n=\n\nhttps://example.com/page\n");
        assert_eq!(
            section.children[1],
            Node::Paragraph(Paragraph {
                text: "https://example.com/page".to_owned(),
                line: 4
            })
        );
    }
}
