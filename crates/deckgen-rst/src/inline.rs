//! Inline markup reduced to plain text.
//!
//! Inline literals, strong and emphasis, interpreted text (with or without a
//! leading role) and phrase references lose their delimiters. A reference
//! with an embedded target (`` `text <url>`_ ``) keeps only its text.
//! Backslash escapes are resolved, and an escaped whitespace character is
//! dropped. Delimiters that fail the start or end rules stay as written, so
//! `2 * 3` and `{{c1::x}}` pass through unchanged.

/// Characters allowed directly before an inline start-string.
const START_PRECEDERS: &str = "'\"([{<-/:‘“’«¡¿";

/// Characters allowed directly after an inline end-string.
const END_FOLLOWERS: &str = "'\")]}>-/:.,;!?\\’”»";

/// Render `text` the way a reader sees it, without inline markup.
pub(crate) fn plain_text(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut pos = 0;
    while pos < chars.len() {
        if chars[pos] == '\\' {
            pos = unescape_at(&chars, pos, &mut out);
        } else if let Some((inner, next)) = markup_at(&chars, pos) {
            out.push_str(&inner);
            pos = next;
        } else {
            out.push(chars[pos]);
            pos += 1;
        }
    }
    out
}

fn markup_at(chars: &[char], pos: usize) -> Option<(String, usize)> {
    if !can_start(chars, pos) {
        return None;
    }
    let rest = &chars[pos..];
    if starts_with(rest, "``") {
        let (inner, next) = enclosed(chars, pos + 2, "``")?;
        return Some((inner.iter().collect(), next));
    }
    if starts_with(rest, "**") {
        let (inner, next) = enclosed(chars, pos + 2, "**")?;
        return Some((unescape(inner), next));
    }
    match chars[pos] {
        '*' => enclosed(chars, pos + 1, "*").map(|(inner, next)| (unescape(inner), next)),
        '`' => interpreted(chars, pos + 1),
        ':' => interpreted(chars, role_end(chars, pos)? + 1),
        _ => None,
    }
}

/// Body of a construct closed by `end`, and the index after the end-string.
fn enclosed<'c>(chars: &'c [char], body_start: usize, end: &str) -> Option<(&'c [char], usize)> {
    if chars.get(body_start)?.is_whitespace() {
        return None;
    }
    let end_len = end.chars().count();
    (body_start + 1..chars.len()).find_map(|idx| {
        let closes = starts_with(&chars[idx..], end)
            && !chars[idx - 1].is_whitespace()
            && chars[idx - 1] != '\\'
            && ends_at(chars, idx + end_len);
        closes.then(|| (&chars[body_start..idx], idx + end_len))
    })
}

/// Interpreted text or a phrase reference (`` `x`_ `` and `` `x`__ ``).
fn interpreted(chars: &[char], body_start: usize) -> Option<(String, usize)> {
    let first = *chars.get(body_start)?;
    if first.is_whitespace() || first == '`' {
        return None;
    }
    (body_start + 1..chars.len()).find_map(|idx| {
        if chars[idx] != '`' || chars[idx - 1].is_whitespace() || chars[idx - 1] == '\\' {
            return None;
        }
        let suffix = chars[idx + 1..].iter().take(2).take_while(|&&c| c == '_').count();
        let next = idx + 1 + suffix;
        ends_at(chars, next).then(|| {
            let inner = &chars[body_start..idx];
            let text = if suffix > 0 {
                reference_text(inner)
            } else {
                unescape(inner)
            };
            (text, next)
        })
    })
}

/// Link text of a reference, dropping an embedded `<target>`.
fn reference_text(inner: &[char]) -> String {
    let text = unescape(inner);
    if !text.ends_with('>') {
        return text;
    }
    let Some(open) = text.rfind('<') else {
        return text;
    };
    let label = &text[..open];
    if !label.is_empty() && !label.ends_with(char::is_whitespace) {
        return text;
    }
    let label = label.trim();
    if label.is_empty() {
        text[open + 1..text.len() - 1].to_owned()
    } else {
        label.to_owned()
    }
}

/// Index of the backtick after a `:role:` prefix starting at `pos`.
fn role_end(chars: &[char], pos: usize) -> Option<usize> {
    let name_len = chars[pos + 1..]
        .iter()
        .take_while(|&&c| c.is_alphanumeric() || matches!(c, '-' | '_' | '.' | '+'))
        .count();
    let close = pos + 1 + name_len;
    let valid = name_len > 0 && chars.get(close) == Some(&':') && chars.get(close + 1) == Some(&'`');
    valid.then_some(close + 1)
}

fn unescape(chars: &[char]) -> String {
    let mut out = String::with_capacity(chars.len());
    let mut pos = 0;
    while pos < chars.len() {
        if chars[pos] == '\\' {
            pos = unescape_at(chars, pos, &mut out);
        } else {
            out.push(chars[pos]);
            pos += 1;
        }
    }
    out
}

/// Resolve the escape at `pos`, returning the index after it.
fn unescape_at(chars: &[char], pos: usize, out: &mut String) -> usize {
    match chars.get(pos + 1) {
        Some(c) if c.is_whitespace() => pos + 2,
        Some(&c) => {
            out.push(c);
            pos + 2
        }
        None => {
            out.push('\\');
            pos + 1
        }
    }
}

fn can_start(chars: &[char], pos: usize) -> bool {
    pos == 0 || chars[pos - 1].is_whitespace() || START_PRECEDERS.contains(chars[pos - 1])
}

fn ends_at(chars: &[char], idx: usize) -> bool {
    chars
        .get(idx)
        .is_none_or(|c| c.is_whitespace() || END_FOLLOWERS.contains(*c))
}

fn starts_with(chars: &[char], pattern: &str) -> bool {
    pattern
        .chars()
        .enumerate()
        .all(|(i, c)| chars.get(i) == Some(&c))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_plain_text_unchanged() {
        assert_eq!(plain_text("What owns a value?"), "What owns a value?");
    }

    #[test]
    fn test_inline_literal() {
        assert_eq!(plain_text("What does ``Box<T>`` do?"), "What does Box<T> do?");
    }

    #[test]
    fn test_inline_literal_keeps_backslashes() {
        assert_eq!(plain_text(r"``C:\path\*``"), r"C:\path\*");
    }

    #[test]
    fn test_strong() {
        assert_eq!(plain_text("a **bold** word"), "a bold word");
    }

    #[test]
    fn test_emphasis() {
        assert_eq!(plain_text("*item*"), "item");
        assert_eq!(plain_text("an (*aside*)."), "an (aside).");
    }

    #[test]
    fn test_interpreted_text_and_role() {
        assert_eq!(plain_text("call `len` now"), "call len now");
        assert_eq!(plain_text("see :code:`Vec::new`."), "see Vec::new.");
    }

    #[test]
    fn test_reference_with_embedded_target() {
        assert_eq!(
            plain_text("Read `the book <https://doc.rust-lang.org/book/>`_ first."),
            "Read the book first."
        );
        assert_eq!(plain_text("`anonymous <https://x.invalid>`__"), "anonymous");
    }

    #[test]
    fn test_reference_without_text() {
        assert_eq!(plain_text("`<https://x.invalid>`_"), "https://x.invalid");
        assert_eq!(plain_text("`Named target`_"), "Named target");
    }

    #[test]
    fn test_backslash_escapes() {
        assert_eq!(plain_text(r"**bold** \*x"), "bold *x");
        assert_eq!(plain_text(r"\`not code\`"), "`not code`");
        assert_eq!(plain_text(r"word\ s"), "words");
        assert_eq!(plain_text("trailing\\"), "trailing\\");
    }

    #[test]
    fn test_unmatched_delimiters_kept() {
        assert_eq!(plain_text("2 * 3 * 4"), "2 * 3 * 4");
        assert_eq!(plain_text("a*b*c"), "a*b*c");
        assert_eq!(plain_text("**open only"), "**open only");
        assert_eq!(plain_text("a ``tick"), "a ``tick");
    }

    #[test]
    fn test_cloze_and_urls_unchanged() {
        assert_eq!(
            plain_text("Rust 1.0 shipped in {{c1::2015}}."),
            "Rust 1.0 shipped in {{c1::2015}}."
        );
        assert_eq!(
            plain_text("https://example.com/a_b_c"),
            "https://example.com/a_b_c"
        );
    }

    #[test]
    fn test_markup_across_lines() {
        assert_eq!(plain_text("**two\nlines** end"), "two\nlines end");
    }
}
