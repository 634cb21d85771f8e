//! Per-document rendering state.
//!
//! pulldown-cmark reports elements as start/end event pairs; these structs
//! collect what arrives in between until the end event lets the renderer
//! write the element out.

use std::collections::{HashMap, HashSet};

use pulldown_cmark::Alignment;

/// A code block being collected. Its lines are only known once the block
/// ends, since each one gets its own wrapper.
#[derive(Debug, Default)]
pub(crate) struct CodeBlock {
    pub(crate) language: Option<String>,
    pub(crate) content: String,
}

impl CodeBlock {
    pub(crate) fn new(language: Option<String>) -> Self {
        Self {
            language,
            content: String::new(),
        }
    }
}

/// Position inside the current table.
#[derive(Debug, Default)]
pub(crate) struct TableState {
    alignments: Vec<Alignment>,
    in_head: bool,
    column: usize,
}

impl TableState {
    pub(crate) fn start(&mut self, alignments: Vec<Alignment>) {
        *self = Self {
            alignments,
            ..Self::default()
        };
    }

    pub(crate) fn start_head(&mut self) {
        self.in_head = true;
        self.column = 0;
    }

    pub(crate) fn end_head(&mut self) {
        self.in_head = false;
    }

    pub(crate) fn start_row(&mut self) {
        self.column = 0;
    }

    pub(crate) fn next_cell(&mut self) {
        self.column += 1;
    }

    /// `th` in the header row, `td` elsewhere.
    pub(crate) fn cell_tag(&self) -> &'static str {
        if self.in_head { "th" } else { "td" }
    }

    /// `text-align` value for the current column, if the delimiter row set one.
    pub(crate) fn cell_align(&self) -> Option<&'static str> {
        match self.alignments.get(self.column)? {
            Alignment::Left => Some("left"),
            Alignment::Center => Some("center"),
            Alignment::Right => Some("right"),
            Alignment::None => None,
        }
    }
}

#[derive(Debug)]
struct PendingImage {
    src: String,
    title: String,
}

/// Alt text capture for images.
///
/// Alt text may itself contain an image; only the outermost one is emitted
/// and the inner ones contribute their alt text to it.
#[derive(Debug, Default)]
pub(crate) struct ImageState {
    open: Vec<PendingImage>,
    alt: String,
}

impl ImageState {
    pub(crate) fn start(&mut self, src: String, title: String) {
        if self.open.is_empty() {
            self.alt.clear();
        }
        self.open.push(PendingImage { src, title });
    }

    /// Close the innermost image; returns `(src, alt, title)` once the
    /// outermost one closes.
    pub(crate) fn end(&mut self) -> Option<(String, String, String)> {
        let image = self.open.pop()?;
        if !self.open.is_empty() {
            return None;
        }
        Some((image.src, std::mem::take(&mut self.alt), image.title))
    }

    pub(crate) fn is_active(&self) -> bool {
        !self.open.is_empty()
    }

    pub(crate) fn push_str(&mut self, text: &str) {
        self.alt.push_str(text);
    }
}

#[derive(Debug)]
struct OpenHeading {
    level: u8,
    /// Plain text, for the slug.
    text: String,
    /// Inner HTML with inline formatting.
    html: String,
}

/// Heading collection and unique anchor ids.
#[derive(Debug, Default)]
pub(crate) struct HeadingState {
    open: Option<OpenHeading>,
    /// Every id handed out so far.
    used_ids: HashSet<String>,
    /// Last suffix tried per slug.
    suffixes: HashMap<String, usize>,
}

impl HeadingState {
    pub(crate) fn is_active(&self) -> bool {
        self.open.is_some()
    }

    pub(crate) fn start_heading(&mut self, level: u8) {
        self.open = Some(OpenHeading {
            level,
            text: String::new(),
            html: String::new(),
        });
    }

    /// Finish the open heading and return `(level, id, html)`.
    pub(crate) fn complete_heading(&mut self) -> Option<(u8, String, String)> {
        let heading = self.open.take()?;
        let id = self.unique_id(&heading.text);
        Some((heading.level, id, heading.html))
    }

    /// Slug of `text`, suffixed `-1`, `-2`, ... until it differs from every
    /// id already issued, including ones that came from a heading's own text.
    fn unique_id(&mut self, text: &str) -> String {
        let mut slug = slugify(text);
        if slug.is_empty() {
            "section".clone_into(&mut slug);
        }
        let suffix = self.suffixes.entry(slug.clone()).or_default();
        let mut id = slug.clone();
        while self.used_ids.contains(&id) {
            *suffix += 1;
            id = format!("{slug}-{suffix}");
        }
        self.used_ids.insert(id.clone());
        id
    }

    pub(crate) fn push_text(&mut self, text: &str) {
        if let Some(heading) = &mut self.open {
            heading.text.push_str(text);
        }
    }

    pub(crate) fn push_html(&mut self, html: &str) {
        if let Some(heading) = &mut self.open {
            heading.html.push_str(html);
        }
    }
}

/// Anchor slug for a heading.
///
/// Punctuation is dropped, runs of whitespace, `-` and `_` become one `-`,
/// and letters are lowercased. Non-ASCII letters are kept, so Chinese
/// headings get readable anchors.
#[must_use]
pub fn slugify(text: &str) -> String {
    let is_separator = |c: char| c.is_whitespace() || c == '-' || c == '_';
    let kept: String = text
        .chars()
        .filter(|&c| c.is_alphanumeric() || is_separator(c))
        .flat_map(char::to_lowercase)
        .collect();
    kept.split(is_separator)
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

/// Escape `&`, `<`, `>`, `"` and `'` for text and attribute values.
#[must_use]
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut copied = 0;
    for (i, c) in s.char_indices() {
        let entity = match c {
            '&' => "&amp;",
            '<' => "&lt;",
            '>' => "&gt;",
            '"' => "&quot;",
            '\'' => "&#x27;",
            _ => continue,
        };
        out.push_str(&s[copied..i]);
        out.push_str(entity);
        copied = i + 1;
    }
    out.push_str(&s[copied..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Getting Started"), "getting-started");
        assert_eq!(slugify("Why Rust?"), "why-rust");
        assert_eq!(slugify("  padded  "), "padded");
        assert_eq!(slugify("a  -  b"), "a-b");
        assert_eq!(slugify("file_name"), "file-name");
        assert_eq!(slugify("写作 技巧"), "写作-技巧");
        assert_eq!(slugify("?!"), "");
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("<b>x</b>"), "&lt;b&gt;x&lt;/b&gt;");
        assert_eq!(escape_html("Tom & Jerry's \"show\""), "Tom &amp; Jerry&#x27;s &quot;show&quot;");
        assert_eq!(escape_html("中文 plain"), "中文 plain");
    }

    #[test]
    fn test_table_cells() {
        let mut table = TableState::default();
        table.start(vec![Alignment::Center, Alignment::None]);
        table.start_head();
        assert_eq!(table.cell_tag(), "th");
        assert_eq!(table.cell_align(), Some("center"));
        table.next_cell();
        assert_eq!(table.cell_align(), None);
        table.end_head();

        table.start_row();
        assert_eq!(table.cell_tag(), "td");
        assert_eq!(table.cell_align(), Some("center"));
        table.next_cell();
        table.next_cell();
        assert_eq!(table.cell_align(), None);
    }

    #[test]
    fn test_nested_image_alt() {
        let mut image = ImageState::default();
        image.start("outer.png".to_owned(), "T".to_owned());
        image.push_str("see ");
        image.start("inner.png".to_owned(), String::new());
        image.push_str("inner");
        assert_eq!(image.end(), None);
        assert!(image.is_active());
        assert_eq!(
            image.end(),
            Some(("outer.png".to_owned(), "see inner".to_owned(), "T".to_owned()))
        );
        assert!(!image.is_active());
    }

    #[test]
    fn test_duplicate_heading_ids() {
        let mut headings = HeadingState::default();
        let mut ids = Vec::new();
        for text in ["Notes", "Notes", "Other", "Notes", "..."] {
            headings.start_heading(2);
            headings.push_text(text);
            ids.push(headings.complete_heading().unwrap().1);
        }
        assert_eq!(ids, ["notes", "notes-1", "other", "notes-2", "section"]);
    }

    #[test]
    fn test_suffixed_ids_do_not_collide_with_literal_slugs() {
        let mut headings = HeadingState::default();
        let mut ids = Vec::new();
        for text in ["Notes", "Notes", "Notes 1", "Notes 2", "Notes", "Notes"] {
            headings.start_heading(2);
            headings.push_text(text);
            ids.push(headings.complete_heading().unwrap().1);
        }
        assert_eq!(
            ids,
            ["notes", "notes-1", "notes-1-1", "notes-2", "notes-3", "notes-4"]
        );
    }

    #[test]
    fn test_heading_text_outside_heading_ignored() {
        let mut headings = HeadingState::default();
        headings.push_text("stray");
        assert!(!headings.is_active());
        assert_eq!(headings.complete_heading(), None);
    }
}
