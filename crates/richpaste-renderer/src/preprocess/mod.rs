//! Obsidian source normalization.
//!
//! Rewrites Obsidian-flavored Markdown into standard Markdown before it is
//! handed to the renderer. Passes run in a fixed order:
//!
//! 1. Frontmatter stripping
//! 2. Leading title stripping
//! 3. Image embed conversion (`![[photo.png]]` → `![photo](attachments/photo.png)`)
//! 4. Paragraph spacing
//!
//! # Usage
//!
//! ```
//! use richpaste_renderer::{PreprocessOptions, Preprocessor};
//!
//! let mut preprocessor = Preprocessor::new(PreprocessOptions::default());
//! let markdown = preprocessor.process("---\ntitle: Trip\n---\n# Day one\n\n![[beach.jpg]]\n");
//!
//! assert_eq!(markdown, "![beach](attachments/beach.jpg)\n");
//! assert_eq!(preprocessor.frontmatter_title(), Some("Trip"));
//! assert_eq!(preprocessor.title(), Some("Day one"));
//! ```

mod fence;
mod frontmatter;
mod spacing;
mod title;
mod wikilink;

/// Default attachments directory, relative to the source document.
pub const DEFAULT_ATTACHMENTS_DIR: &str = "attachments";

/// Options controlling which preprocessing passes run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PreprocessOptions {
    /// Remove a leading `---` delimited frontmatter block.
    pub strip_frontmatter: bool,
    /// Remove a leading `# Title` heading.
    pub strip_title: bool,
    /// Insert blank lines between consecutive plain text lines.
    pub paragraph_spacing: bool,
    /// Directory that bare image embeds are resolved against.
    pub attachments_dir: String,
}

impl Default for PreprocessOptions {
    fn default() -> Self {
        Self {
            strip_frontmatter: true,
            strip_title: true,
            paragraph_spacing: true,
            attachments_dir: DEFAULT_ATTACHMENTS_DIR.to_owned(),
        }
    }
}

/// Preprocessor that normalizes Obsidian syntax.
///
/// Besides the rewritten text it records the document title sources it saw,
/// which callers use for the HTML `<title>`.
#[derive(Debug)]
pub struct Preprocessor {
    options: PreprocessOptions,
    title: Option<String>,
    frontmatter_title: Option<String>,
    warnings: Vec<String>,
}

impl Preprocessor {
    #[must_use]
    pub fn new(options: PreprocessOptions) -> Self {
        Self {
            options,
            title: None,
            frontmatter_title: None,
            warnings: Vec::new(),
        }
    }

    /// Process markdown text and return standard markdown.
    #[must_use]
    pub fn process(&mut self, source: &str) -> String {
        let mut text = source.strip_prefix('\u{feff}').unwrap_or(source);

        if let Some(frontmatter) = frontmatter::find(text) {
            self.frontmatter_title = frontmatter.title();
            if self.options.strip_frontmatter {
                text = frontmatter::strip(text);
            }
        }

        // Only the very first content of the emitted text is a strippable
        // title. Behind a kept frontmatter block it is recorded but stays.
        if let Some(leading) = title::find(text) {
            self.title = Some(leading.text);
            if self.options.strip_title {
                text = title::strip(text);
            }
        } else if let Some(leading) = title::find(frontmatter::strip(text)) {
            self.title = Some(leading.text);
        }

        self.finish(text)
    }

    fn finish(&mut self, text: &str) -> String {
        let converted = wikilink::convert_image_embeds(
            text,
            &self.options.attachments_dir,
            &mut self.warnings,
        );
        if self.options.paragraph_spacing {
            spacing::add_paragraph_spacing(&converted)
        } else {
            converted
        }
    }

    /// Text of the leading `# Title` heading, whether or not it was stripped.
    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Value of the frontmatter `title` key, whether or not it was stripped.
    #[must_use]
    pub fn frontmatter_title(&self) -> Option<&str> {
        self.frontmatter_title.as_deref()
    }

    /// Warnings collected while processing (e.g. embeds left unchanged).
    #[must_use]
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }
}

/// Preprocess `source` with `options`.
///
/// Convenience wrapper around [`Preprocessor`] when the recorded titles are
/// not needed.
#[must_use]
pub fn preprocess(source: &str, options: &PreprocessOptions) -> String {
    Preprocessor::new(options.clone()).process(source)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn options(strip_frontmatter: bool, strip_title: bool, paragraph_spacing: bool) -> PreprocessOptions {
        PreprocessOptions {
            strip_frontmatter,
            strip_title,
            paragraph_spacing,
            ..PreprocessOptions::default()
        }
    }

    #[test]
    fn test_defaults() {
        let opts = PreprocessOptions::default();
        assert!(opts.strip_frontmatter);
        assert!(opts.strip_title);
        assert!(opts.paragraph_spacing);
        assert_eq!(opts.attachments_dir, "attachments");
    }

    #[test]
    fn test_full_pipeline_order() {
        let source = "---\nkey: v\n---\n\n# Title\n\nline one\nline two\n![[a.png]]\n";
        assert_eq!(
            preprocess(source, &PreprocessOptions::default()),
            "line one\n\nline two\n\n![a](attachments/a.png)\n"
        );
    }

    #[test]
    fn test_no_frontmatter_strip_is_noop() {
        let source = "plain text\n\nmore";
        assert_eq!(preprocess(source, &options(true, false, false)), source);
    }

    #[test]
    fn test_title_behind_kept_frontmatter_is_not_stripped() {
        let source = "---\na: 1\n---\n# Title\n\nBody";
        let mut preprocessor = Preprocessor::new(options(false, true, false));
        assert_eq!(preprocessor.process(source), source);
        assert_eq!(preprocessor.title(), Some("Title"));
    }

    #[test]
    fn test_title_after_stripped_frontmatter_is_stripped() {
        let source = "---\na: 1\n---\n\n# Title\n\nBody";
        assert_eq!(preprocess(source, &options(true, true, false)), "Body");
    }

    #[test]
    fn test_keep_title() {
        let source = "# Title\n\nBody";
        assert_eq!(preprocess(source, &options(true, false, false)), source);
    }

    #[test]
    fn test_spacing_disabled() {
        assert_eq!(preprocess("a\nb", &options(true, true, false)), "a\nb");
    }

    #[test]
    fn test_bom_removed() {
        assert_eq!(
            preprocess("\u{feff}# T\n\nBody", &options(true, true, false)),
            "Body"
        );
    }

    #[test]
    fn test_titles_recorded_even_when_kept() {
        let mut preprocessor = Preprocessor::new(options(false, false, false));
        let _ = preprocessor.process("---\ntitle: From YAML\n---\n# From Heading\n");
        assert_eq!(preprocessor.frontmatter_title(), Some("From YAML"));
        assert_eq!(preprocessor.title(), Some("From Heading"));
    }

    #[test]
    fn test_no_titles() {
        let mut preprocessor = Preprocessor::new(PreprocessOptions::default());
        let _ = preprocessor.process("Just text");
        assert_eq!(preprocessor.title(), None);
        assert_eq!(preprocessor.frontmatter_title(), None);
        assert!(preprocessor.warnings().is_empty());
    }

    #[test]
    fn test_warnings_for_note_embeds() {
        let mut preprocessor = Preprocessor::new(PreprocessOptions::default());
        let out = preprocessor.process("See ![[Other Note]]");
        assert_eq!(out, "See ![[Other Note]]");
        assert_eq!(preprocessor.warnings().len(), 1);
    }
}
