//! Leading first-level heading detection.

use std::sync::LazyLock;

use regex::Regex;

/// Blank lines, an ATX `#` heading line, then any blank lines after it.
static LEADING_TITLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\A(?:[ \t]*\r?\n)*[ \t]{0,3}#[ \t]+([^\r\n]+?)[ \t]*(?:\r?\n|\z)(?:[ \t]*\r?\n)*")
        .unwrap()
});

/// A leading `# Title` found at the start of a document.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct LeadingTitle {
    /// Heading text without the optional closing `#` sequence.
    pub(crate) text: String,
    /// Byte offset where the rest of the document starts.
    pub(crate) end: usize,
}

/// Find a first-level heading that is the first non-blank content.
pub(crate) fn find(markdown: &str) -> Option<LeadingTitle> {
    let caps = LEADING_TITLE_RE.captures(markdown)?;
    let end = caps.get(0)?.end();
    let text = strip_closing_sequence(caps.get(1)?.as_str());
    Some(LeadingTitle {
        text: text.to_owned(),
        end,
    })
}

/// Remove the leading title heading. No-op when the document doesn't open with one.
pub(crate) fn strip(markdown: &str) -> &str {
    match find(markdown) {
        Some(title) => &markdown[title.end..],
        None => markdown,
    }
}

/// Drop an ATX closing sequence (`# Title ##`). It only counts when preceded
/// by whitespace.
fn strip_closing_sequence(text: &str) -> &str {
    let without = text.trim_end_matches('#');
    if without.len() == text.len() {
        return text;
    }
    if without.is_empty() || without.ends_with([' ', '\t']) {
        without.trim_end()
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_strip_leading_title() {
        assert_eq!(strip("# Title\n\nHello  world."), "Hello  world.");
    }

    #[test]
    fn test_strip_with_leading_blank_lines() {
        assert_eq!(strip("\n\n  \n# Title\nBody"), "Body");
    }

    #[test]
    fn test_title_only_document() {
        assert_eq!(strip("# Title"), "");
    }

    #[test]
    fn test_not_first_content_is_noop() {
        let input = "Intro\n\n# Title\n";
        assert_eq!(strip(input), input);
    }

    #[test]
    fn test_second_level_heading_is_noop() {
        let input = "## Section\n\nBody";
        assert_eq!(strip(input), input);
    }

    #[test]
    fn test_hashtag_is_not_heading() {
        let input = "#tag\n\nBody";
        assert_eq!(strip(input), input);
    }

    #[test]
    fn test_find_title_text() {
        let title = find("# My Article ##\n\nBody").unwrap();
        assert_eq!(title.text, "My Article");

        let title = find("# C#\n").unwrap();
        assert_eq!(title.text, "C#");
    }
}
