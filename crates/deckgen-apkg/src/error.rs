//! Package writer errors.

use std::io;

/// Error writing an Anki package.
#[derive(Debug, thiserror::Error)]
pub enum PackageError {
    /// Filesystem I/O failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The SQLite collection could not be written.
    #[error("Collection database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// The zip archive could not be written.
    #[error("Archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// Collection metadata could not be serialized.
    #[error("Collection metadata error: {0}")]
    Json(#[from] serde_json::Error),

    /// The finished package could not be moved into place.
    #[error("Failed to persist package: {0}")]
    Persist(#[from] tempfile::PersistError),
}
