//! Paragraph spacing insertion.
//!
//! Target editors disagree on what a single newline inside a paragraph means.
//! A blank line between two plain text lines turns each line into its own
//! paragraph so the break survives pasting.

use std::sync::LazyLock;

use regex::Regex;

use super::fence::FenceTracker;

/// Line prefixes that start a block construct (checked on the trimmed line).
static BLOCK_PREFIX_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:#{1,6}(?:[ \t]|$)|[-*+](?:[ \t]|$)|\d{1,9}[.)](?:[ \t]|$)|>|```|~~~|\||=+$|-+$)")
        .unwrap()
});

/// Delimiter row under a table header: `--|--`, `| :-- | --: |`, ...
static DELIMITER_ROW_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*\|?\s*:?-+:?\s*(?:\|\s*:?-+:?\s*)*\|?\s*$").unwrap()
});

/// Start of a raw HTML block: a comment or a block-level tag.
static HTML_BLOCK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^ {0,3}<(?:!--|/?(?:address|article|aside|blockquote|center|details|dialog|div|dl|dt|dd|figcaption|figure|footer|form|h[1-6]|header|hr|iframe|li|main|nav|ol|p|pre|section|summary|table|tbody|td|tfoot|th|thead|tr|ul)(?:[\s/>]|$))",
    )
    .unwrap()
});

/// Insert a blank line between consecutive plain lines.
pub(crate) fn add_paragraph_spacing(markdown: &str) -> String {
    let lines: Vec<&str> = markdown
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .collect();
    let in_block = multi_line_blocks(&lines);
    let mut result: Vec<&str> = Vec::with_capacity(lines.len() * 2);
    let mut fence = FenceTracker::new();

    for (idx, &line) in lines.iter().enumerate() {
        result.push(line);

        if fence.update(line) || fence.in_fence() {
            continue;
        }

        let Some(&next) = lines.get(idx + 1) else {
            continue;
        };
        let next_in_block = in_block.get(idx + 1).copied().unwrap_or(false);
        if !in_block[idx] && !next_in_block && should_insert_blank_line(line, next) {
            result.push("");
        }
    }

    result.join("\n")
}

/// Marks lines of GFM tables and raw HTML blocks. Both run until the next
/// blank line, and a blank line inside either would end it early.
fn multi_line_blocks(lines: &[&str]) -> Vec<bool> {
    let mut fence = FenceTracker::new();
    let mut in_block = false;
    lines
        .iter()
        .enumerate()
        .map(|(idx, &line)| {
            if fence.update(line) || fence.in_fence() || line.trim().is_empty() {
                in_block = false;
            } else if !in_block {
                in_block = HTML_BLOCK_RE.is_match(line)
                    || (has_unescaped_pipe(line)
                        && lines
                            .get(idx + 1)
                            .is_some_and(|next| DELIMITER_ROW_RE.is_match(next)));
            }
            in_block
        })
        .collect()
}

fn has_unescaped_pipe(line: &str) -> bool {
    let mut escaped = false;
    for c in line.chars() {
        match c {
            '|' if !escaped => return true,
            '\\' if !escaped => escaped = true,
            _ => escaped = false,
        }
    }
    false
}

fn should_insert_blank_line(current: &str, next: &str) -> bool {
    if current.trim().is_empty() || next.trim().is_empty() {
        return false;
    }
    !is_block_syntax_line(current) && !is_block_syntax_line(next)
}

/// Headings, list items, blockquotes, fences, pipe-led table rows, thematic
/// breaks and setext underlines.
fn is_block_syntax_line(line: &str) -> bool {
    let trimmed = line.trim();
    !trimmed.is_empty() && (BLOCK_PREFIX_RE.is_match(trimmed) || is_thematic_break(trimmed))
}

/// Three or more of the same `-`, `*` or `_`, optionally separated by spaces.
fn is_thematic_break(trimmed: &str) -> bool {
    let Some(marker) = trimmed.chars().next() else {
        return false;
    };
    if !matches!(marker, '-' | '*' | '_') {
        return false;
    }

    let mut count = 0;
    for c in trimmed.chars() {
        if c == marker {
            count += 1;
        } else if c != ' ' && c != '\t' {
            return false;
        }
    }
    count >= 3
}
