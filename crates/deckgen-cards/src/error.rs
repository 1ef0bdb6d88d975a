//! Card building errors.

/// Structural error that aborts conversion of one source file.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("{file}: card {section} (line {line}): {kind}")]
pub struct BuildError {
    /// Source file name.
    pub file: String,
    /// Index of the top-level section being built.
    pub section: usize,
    /// 1-based source line of the offending node.
    pub line: usize,
    pub kind: BuildErrorKind,
}

/// Kind of structural error.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum BuildErrorKind {
    #[error("image directive has no URI")]
    MissingImageUri,
    #[error("image \"{uri}\" has no alt text")]
    MissingImageAlt { uri: String },
}
