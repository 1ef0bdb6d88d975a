//! Per-file conversion pipeline: read, parse, assemble, package.

use std::fs;
use std::path::{Path, PathBuf};

use deckgen_apkg::PackageWriter;
use deckgen_cards::{DeckAssembler, TitleResolver};
use deckgen_config::Config;

use crate::discover::Scanner;
use crate::error::CliError;
use crate::output::Output;

/// Outcome counts of one run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Summary {
    /// Packages written.
    pub written: usize,
    /// Source files rejected with a structural error.
    pub failed: usize,
}

/// Converts every source file of a directory into a package beside it.
pub(crate) struct Converter<'a> {
    config: &'a Config,
    resolver: &'a dyn TitleResolver,
    dir: &'a Path,
}

impl<'a> Converter<'a> {
    pub(crate) fn new(config: &'a Config, resolver: &'a dyn TitleResolver, dir: &'a Path) -> Self {
        Self {
            config,
            resolver,
            dir,
        }
    }

    /// Convert all source files in sorted order.
    ///
    /// A structural error is reported and skips the offending file; any other
    /// error stops the run.
    pub(crate) fn run(&self, output: &Output) -> Result<Summary, CliError> {
        let mut summary = Summary::default();
        for source in Scanner::new(self.dir, &self.config.input).scan()? {
            match self.convert(&source) {
                Ok((package, cards)) => {
                    summary.written += 1;
                    output.package_written(&package, cards);
                }
                Err(err) if err.is_structural() => {
                    summary.failed += 1;
                    tracing::debug!(path = %source.display(), error = %err, "Skipping source file");
                    output.error(&format!("Error: {err}"));
                }
                Err(err) => return Err(err),
            }
        }
        if summary == Summary::default() {
            output.warning(&format!("No source files found in {}", self.dir.display()));
        }
        Ok(summary)
    }

    /// Convert one source file, returning the written package path and its
    /// card count.
    pub(crate) fn convert(&self, source: &Path) -> Result<(PathBuf, usize), CliError> {
        tracing::info!(path = %source.display(), "Converting");

        let text = fs::read_to_string(source).map_err(|e| CliError::Read {
            path: source.to_path_buf(),
            source: e,
        })?;
        let document = deckgen_rst::parse(&text).map_err(|e| CliError::Parse {
            file: display_name(source),
            source: e,
        })?;
        let deck = DeckAssembler::new(self.resolver, &self.config.media).assemble(source, &document)?;

        let stem = source
            .file_stem()
            .map_or_else(|| display_name(source), |s| s.to_string_lossy().into_owned());
        let package = self.config.input.package_path(self.dir, &stem);
        PackageWriter::new(&self.config.models, self.dir)
            .write(&deck, &package)
            .map_err(|e| CliError::Package {
                path: package.clone(),
                source: e,
            })?;

        tracing::info!(
            path = %package.display(),
            cards = deck.cards.len(),
            "Package written"
        );
        Ok((package, deck.cards.len()))
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned())
}
