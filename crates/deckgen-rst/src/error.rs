//! Parse error types.

/// Error produced while building the document tree.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum ParseError {
    /// A section title uses an adornment style that would skip a nesting level.
    #[error("line {line}: title level inconsistent for \"{title}\"")]
    InconsistentTitleLevel {
        /// 1-based line of the title text.
        line: usize,
        /// Title text.
        title: String,
    },
}
