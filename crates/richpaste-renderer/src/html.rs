//! HTML output for elements whose markup differs from plain HTML5.
//!
//! Rich-text editors drop `<br>` and collapse whitespace inside `<pre>`, so
//! code blocks are emitted one `<div>` per line with spaces pinned as
//! `&nbsp;`. Tables and code blocks get wrapper sections for styling.

use std::fmt::Write;

use pulldown_cmark::BlockQuoteKind;

use crate::state::escape_html;

const TAB_WIDTH: usize = 4;

/// GitHub-style alert kinds (`> [!NOTE]`).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AlertKind {
    Note,
    Tip,
    Important,
    Warning,
    Caution,
}

impl AlertKind {
    fn class(self) -> &'static str {
        match self {
            Self::Note => "note",
            Self::Tip => "tip",
            Self::Important => "important",
            Self::Warning => "warning",
            Self::Caution => "caution",
        }
    }

    fn title(self) -> &'static str {
        match self {
            Self::Note => "Note",
            Self::Tip => "Tip",
            Self::Important => "Important",
            Self::Warning => "Warning",
            Self::Caution => "Caution",
        }
    }
}

impl From<BlockQuoteKind> for AlertKind {
    fn from(kind: BlockQuoteKind) -> Self {
        match kind {
            BlockQuoteKind::Note => Self::Note,
            BlockQuoteKind::Tip => Self::Tip,
            BlockQuoteKind::Important => Self::Important,
            BlockQuoteKind::Warning => Self::Warning,
            BlockQuoteKind::Caution => Self::Caution,
        }
    }
}

/// Render a fenced or indented code block.
pub(crate) fn code_block(lang: Option<&str>, content: &str, out: &mut String) {
    out.push_str(r#"<section class="code-wrapper"><pre>"#);
    match lang {
        Some(lang) => write!(out, r#"<code class="language-{}">"#, escape_html(lang)).unwrap(),
        None => out.push_str("<code>"),
    }

    let mut lines: Vec<&str> = content.split('\n').collect();
    if lines.last().is_some_and(|last| last.trim().is_empty()) {
        lines.pop();
    }

    for line in lines {
        out.push_str(r#"<div class="code-line">"#);
        out.push_str(&code_line(line));
        out.push_str("</div>");
    }

    out.push_str("</code></pre></section>");
}

/// Escape one code line and pin its significant spaces.
///
/// Blank lines become a single `&nbsp;` so the empty `<div>` keeps its height.
fn code_line(line: &str) -> String {
    let line = line.strip_suffix('\r').unwrap_or(line);
    if line.trim().is_empty() {
        return "&nbsp;".to_owned();
    }

    let expanded = line.replace('\t', &" ".repeat(TAB_WIDTH));
    let escaped = escape_html(&expanded);

    let indent = escaped.len() - escaped.trim_start_matches(' ').len();
    let mut result = "&nbsp;".repeat(indent);

    let mut run = 0;
    for c in escaped[indent..].chars() {
        if c == ' ' {
            run += 1;
            continue;
        }
        push_spaces(&mut result, run);
        run = 0;
        result.push(c);
    }
    push_spaces(&mut result, run);

    result
}

/// A single space stays a space; runs of two or more become `&nbsp;`.
fn push_spaces(out: &mut String, run: usize) {
    match run {
        0 => {}
        1 => out.push(' '),
        n => out.push_str(&"&nbsp;".repeat(n)),
    }
}

pub(crate) fn table_start(out: &mut String) {
    out.push_str(r#"<section class="table-wrapper"><table>"#);
}

pub(crate) fn table_end(out: &mut String) {
    out.push_str("</tbody></table></section>");
}

pub(crate) fn image(src: &str, alt: &str, title: &str, out: &mut String) {
    write!(
        out,
        r#"<img src="{}" alt="{}""#,
        escape_html(src),
        escape_html(alt)
    )
    .unwrap();
    if !title.is_empty() {
        write!(out, r#" title="{}""#, escape_html(title)).unwrap();
    }
    out.push('>');
}

pub(crate) fn link_start(href: &str, title: &str) -> String {
    let mut tag = format!(r#"<a href="{}""#, escape_html(href));
    if !title.is_empty() {
        write!(tag, r#" title="{}""#, escape_html(title)).unwrap();
    }
    tag.push('>');
    tag
}

pub(crate) fn alert_start(kind: AlertKind, out: &mut String) {
    write!(
        out,
        r#"<blockquote class="alert alert-{}"><p class="alert-title">{}</p>"#,
        kind.class(),
        kind.title()
    )
    .unwrap();
}

pub(crate) fn task_list_marker(checked: bool, out: &mut String) {
    if checked {
        out.push_str(r#"<input type="checkbox" checked disabled> "#);
    } else {
        out.push_str(r#"<input type="checkbox" disabled> "#);
    }
}
