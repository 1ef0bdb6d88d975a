//! CLI error types.

use std::path::PathBuf;

use deckgen_apkg::PackageError;
use deckgen_cards::BuildError;
use deckgen_config::ConfigError;
use deckgen_rst::ParseError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("{file}: {source}")]
    Parse { file: String, source: ParseError },

    #[error("{0}")]
    Build(#[from] BuildError),

    #[error("Failed to write {}: {source}", path.display())]
    Package {
        path: PathBuf,
        source: PackageError,
    },
}

impl CliError {
    /// Whether the error only invalidates the current source file.
    ///
    /// Structural errors are reported and conversion continues with the next
    /// file; all other errors abort the run.
    pub(crate) fn is_structural(&self) -> bool {
        matches!(self, CliError::Parse { .. } | CliError::Build(_))
    }
}
