//! Source file discovery.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use deckgen_config::InputConfig;

/// Lists convertible source files in one directory.
///
/// Subdirectories are not descended into.
pub(crate) struct Scanner<'a> {
    dir: &'a Path,
    input: &'a InputConfig,
}

impl<'a> Scanner<'a> {
    pub(crate) fn new(dir: &'a Path, input: &'a InputConfig) -> Self {
        Self { dir, input }
    }

    /// Source files in sorted path order.
    ///
    /// The directory listing is read up front so it can be sorted; callers
    /// consume the paths one at a time.
    pub(crate) fn scan(&self) -> io::Result<impl Iterator<Item = PathBuf> + use<>> {
        let mut sources = Vec::new();
        for entry in fs::read_dir(self.dir)? {
            let path = entry?.path();
            if path.is_file() && self.input.is_source(&path) {
                sources.push(path);
            }
        }
        sources.sort();
        Ok(sources.into_iter())
    }
}
