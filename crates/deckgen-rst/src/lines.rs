//! Line-level helpers: tab expansion, indentation and adornment detection.

/// Tab stop width used by reStructuredText.
const TAB_WIDTH: usize = 8;

/// Minimum length of an adornment that is shorter than its title, and of a
/// transition line.
pub(crate) const MIN_ADORNMENT_LEN: usize = 4;

/// Source line with indentation split off.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Line {
    /// 1-based line number.
    pub number: usize,
    /// Leading spaces after tab expansion.
    pub indent: usize,
    /// Content after the indentation, right-trimmed.
    pub text: String,
}

impl Line {
    pub fn is_blank(&self) -> bool {
        self.text.is_empty()
    }

    /// Adornment character if the line is a run of one punctuation character.
    pub fn adornment(&self) -> Option<char> {
        if self.indent > 0 {
            return None;
        }
        adornment_char(&self.text)
    }

    /// Length of the line content in characters.
    pub fn width(&self) -> usize {
        self.text.chars().count()
    }
}

/// Split source text into lines with tabs expanded.
pub(crate) fn split_lines(text: &str) -> Vec<Line> {
    text.lines()
        .enumerate()
        .map(|(idx, raw)| {
            let expanded = expand_tabs(raw);
            let trimmed = expanded.trim_end();
            let content = trimmed.trim_start();
            Line {
                number: idx + 1,
                indent: trimmed.len() - content.len(),
                text: content.to_owned(),
            }
        })
        .collect()
}

fn expand_tabs(raw: &str) -> String {
    if !raw.contains('\t') {
        return raw.to_owned();
    }
    let mut out = String::with_capacity(raw.len() + TAB_WIDTH);
    let mut column = 0;
    for c in raw.chars() {
        if c == '\t' {
            let spaces = TAB_WIDTH - column % TAB_WIDTH;
            out.extend(std::iter::repeat_n(' ', spaces));
            column += spaces;
        } else {
            out.push(c);
            column += 1;
        }
    }
    out
}

fn adornment_char(text: &str) -> Option<char> {
    let mut chars = text.chars();
    let first = chars.next()?;
    if !first.is_ascii_punctuation() {
        return None;
    }
    chars.all(|c| c == first).then_some(first)
}

/// Re-indent lines relative to `base`, mapping blank lines to empty strings.
pub(crate) fn dedent(lines: &[Line], base: usize) -> Vec<String> {
    lines
        .iter()
        .map(|line| {
            if line.is_blank() {
                String::new()
            } else {
                let extra = line.indent.saturating_sub(base);
                format!("{}{}", " ".repeat(extra), line.text)
            }
        })
        .collect()
}

/// Smallest indentation among non-blank lines.
pub(crate) fn min_indent(lines: &[Line]) -> usize {
    lines
        .iter()
        .filter(|line| !line.is_blank())
        .map(|line| line.indent)
        .min()
        .unwrap_or(0)
}

/// Join dedented lines, collapsing blank runs to a single blank line and
/// trimming leading and trailing blank lines.
pub(crate) fn join_block(lines: &[String]) -> String {
    let mut out: Vec<&str> = Vec::with_capacity(lines.len());
    for line in lines {
        if line.is_empty() && out.last().is_none_or(|last| last.is_empty()) {
            continue;
        }
        out.push(line);
    }
    while out.last().is_some_and(|last| last.is_empty()) {
        out.pop();
    }
    out.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_split_lines_indent() {
        let lines = split_lines("top\n   indented  \n\n\tTabbed");
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0].indent, 0);
        assert_eq!(lines[1].indent, 3);
        assert_eq!(lines[1].text, "indented");
        assert!(lines[2].is_blank());
        assert_eq!(lines[3].indent, 8);
        assert_eq!(lines[3].number, 4);
    }

    #[test]
    fn test_expand_tabs_aligns_to_stop() {
        assert_eq!(expand_tabs("ab\tc"), "ab      c");
        assert_eq!(expand_tabs("no tabs"), "no tabs");
    }

    #[test]
    fn test_adornment() {
        let lines = split_lines("=====\n-\nab\n  ====\n=-=");
        assert_eq!(lines[0].adornment(), Some('='));
        assert_eq!(lines[1].adornment(), Some('-'));
        assert_eq!(lines[2].adornment(), None);
        assert_eq!(lines[3].adornment(), None);
        assert_eq!(lines[4].adornment(), None);
    }

    #[test]
    fn test_dedent_keeps_relative_indent() {
        let lines = split_lines("    a\n      b\n\n    c");
        let base = min_indent(&lines);
        assert_eq!(base, 4);
        assert_eq!(dedent(&lines, base), vec!["a", "  b", "", "c"]);
    }

    #[test]
    fn test_join_block_collapses_blank_runs() {
        let lines: Vec<String> = ["", "a", "", "", "b", ""]
            .iter()
            .map(|s| (*s).to_owned())
            .collect();
        assert_eq!(join_block(&lines), "a\n\nb");
    }
}
