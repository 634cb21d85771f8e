//! Leading YAML frontmatter detection.

use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;

/// Opening `---` line, optional body, closing `---` line, trailing blank lines.
///
/// The body group is lazy-optional so `---\n---` is an empty block instead of
/// reaching forward to a later `---` line.
static FRONTMATTER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)\A---[ \t]*\r?\n(?:(.*?)\r?\n)??---[ \t]*(?:\r?\n|\z)(?:[ \t]*\r?\n)*")
        .unwrap()
});

/// Fields of interest in the frontmatter block.
#[derive(Debug, Default, Deserialize)]
struct FrontmatterMeta {
    title: Option<String>,
}

/// A frontmatter block found at the start of a document.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct Frontmatter<'a> {
    /// Raw YAML between the delimiters.
    pub(crate) yaml: &'a str,
    /// Byte offset where the document body starts.
    pub(crate) end: usize,
}

impl Frontmatter<'_> {
    /// Value of the `title` key, if the block is a YAML mapping that has one.
    pub(crate) fn title(&self) -> Option<String> {
        if self.yaml.trim().is_empty() {
            return None;
        }
        match serde_yaml::from_str::<FrontmatterMeta>(self.yaml) {
            Ok(meta) => meta
                .title
                .map(|t| t.trim().to_owned())
                .filter(|t| !t.is_empty()),
            Err(e) => {
                tracing::debug!(error = %e, "frontmatter is not a YAML mapping, ignoring");
                None
            }
        }
    }
}

/// Find a frontmatter block at the very start of `markdown`.
pub(crate) fn find(markdown: &str) -> Option<Frontmatter<'_>> {
    let caps = FRONTMATTER_RE.captures(markdown)?;
    let end = caps.get(0)?.end();
    let yaml = caps.get(1).map_or("", |m| m.as_str());
    Some(Frontmatter { yaml, end })
}

/// Remove a leading frontmatter block. No-op when there is none.
pub(crate) fn strip(markdown: &str) -> &str {
    match find(markdown) {
        Some(frontmatter) => &markdown[frontmatter.end..],
        None => markdown,
    }
}
