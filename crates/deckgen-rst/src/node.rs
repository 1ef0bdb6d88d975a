//! Document tree types.

use std::collections::BTreeMap;

/// Parsed document: the top-level nodes in source order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    pub nodes: Vec<Node>,
}

impl Document {
    /// Iterate over top-level sections in document order.
    ///
    /// Nodes that appear before the first title are not part of any section
    /// and are skipped.
    pub fn sections(&self) -> impl Iterator<Item = &Section> {
        self.nodes.iter().filter_map(|node| match node {
            Node::Section(section) => Some(section),
            _ => None,
        })
    }
}

/// Node of the document tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Section(Section),
    Title(Title),
    Comment(Comment),
    Image(Image),
    BulletList(List),
    EnumeratedList(List),
    Paragraph(Paragraph),
    Other(Other),
}

impl Node {
    /// 1-based source line where the node starts.
    pub fn line(&self) -> usize {
        match self {
            Node::Section(n) => n.line,
            Node::Title(n) => n.line,
            Node::Comment(n) => n.line,
            Node::Image(n) => n.line,
            Node::BulletList(n) | Node::EnumeratedList(n) => n.line,
            Node::Paragraph(n) => n.line,
            Node::Other(n) => n.line,
        }
    }
}

/// Section: a title followed by body nodes and nested sections.
///
/// The first child is always the section's [`Title`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    /// Nesting level, starting at 1 for top-level sections.
    pub level: usize,
    pub line: usize,
    pub children: Vec<Node>,
}

impl Section {
    /// Title text of the section.
    pub fn title(&self) -> Option<&str> {
        self.children.iter().find_map(|node| match node {
            Node::Title(title) => Some(title.text.as_str()),
            _ => None,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Title {
    pub text: String,
    pub line: usize,
}

/// Comment text with the `..` marker removed and the body dedented.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub text: String,
    pub line: usize,
}

/// `image` directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    /// Image URI; `None` when the directive has no argument.
    pub uri: Option<String>,
    /// Directive options (`:alt:`, `:width:`, ...).
    pub options: BTreeMap<String, String>,
    pub line: usize,
}

impl Image {
    /// Alternate text from the `:alt:` option.
    pub fn alt(&self) -> Option<&str> {
        self.options.get("alt").map(String::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct List {
    pub items: Vec<ListItem>,
    pub line: usize,
}

/// List item with its body text taken verbatim (dedented, not parsed further).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListItem {
    pub text: String,
    pub line: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paragraph {
    pub text: String,
    pub line: usize,
}

/// Construct that is recognized but not modelled (directive, target, ...).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Other {
    /// Construct name, e.g. `literal_block` or the directive name.
    pub kind: String,
    pub line: usize,
}
