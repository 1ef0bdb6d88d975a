//! Colored terminal output utilities.

use std::path::Path;

use console::{Style, Term};

use crate::convert::Summary;

/// Terminal output formatter writing to stderr.
pub(crate) struct Output {
    term: Term,
    green: Style,
    yellow: Style,
    red: Style,
}

impl Output {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self {
            term: Term::stderr(),
            green: Style::new().green(),
            yellow: Style::new().yellow(),
            red: Style::new().red(),
        }
    }

    /// Print a success message (green).
    pub(crate) fn success(&self, msg: &str) {
        let _ = self.term.write_line(&self.green.apply_to(msg).to_string());
    }

    /// Print a warning message (yellow).
    pub(crate) fn warning(&self, msg: &str) {
        let _ = self.term.write_line(&self.yellow.apply_to(msg).to_string());
    }

    /// Print an error message (red).
    pub(crate) fn error(&self, msg: &str) {
        let _ = self.term.write_line(&self.red.apply_to(msg).to_string());
    }

    /// Report a package written for one source file.
    pub(crate) fn package_written(&self, package: &Path, cards: usize) {
        self.success(&written_line(package, cards));
    }

    /// Report the failed files of a run, if any.
    pub(crate) fn summary(&self, summary: &Summary) {
        if let Some(line) = failure_line(summary) {
            self.warning(&line);
        }
    }
}

fn written_line(package: &Path, cards: usize) -> String {
    let noun = if cards == 1 { "card" } else { "cards" };
    format!("Wrote {} ({cards} {noun})", package.display())
}

fn failure_line(summary: &Summary) -> Option<String> {
    (summary.failed > 0).then(|| {
        format!(
            "{} of {} files failed",
            summary.failed,
            summary.failed + summary.written
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_written_line_counts_cards() {
        assert_eq!(
            written_line(Path::new("decks/rust.apkg"), 3),
            "Wrote decks/rust.apkg (3 cards)"
        );
        assert_eq!(
            written_line(Path::new("one.apkg"), 1),
            "Wrote one.apkg (1 card)"
        );
    }

    #[test]
    fn test_failure_line() {
        assert_eq!(failure_line(&Summary { written: 4, failed: 0 }), None);
        assert_eq!(
            failure_line(&Summary { written: 1, failed: 2 }),
            Some("2 of 3 files failed".to_owned())
        );
    }
}
