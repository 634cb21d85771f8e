//! Stage orchestration.

use richpaste_assets::AssetInliner;
use richpaste_renderer::{
    DEFAULT_ATTACHMENTS_DIR, MarkdownRenderer, PreprocessOptions, Preprocessor,
};
use richpaste_style::{DEFAULT_THEME, StyleMode, StyleOptions};

use crate::{Document, PipelineError};

/// Options for one conversion.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProcessingOptions {
    /// Remove a leading YAML frontmatter block.
    pub strip_frontmatter: bool,
    /// Remove a leading `# Title` heading.
    pub strip_title: bool,
    /// Insert blank lines between consecutive plain text lines.
    pub paragraph_spacing: bool,
    /// Directory for bare image embeds, relative to the document.
    pub attachments_dir: String,
    /// Theme name from the catalog.
    pub theme: String,
    /// Emit only the inline-styled fragment instead of a full document.
    pub inline_only: bool,
    /// Strip markup paste targets reject, as the last stage.
    pub sanitize: bool,
}

impl Default for ProcessingOptions {
    fn default() -> Self {
        Self {
            strip_frontmatter: true,
            strip_title: true,
            paragraph_spacing: true,
            attachments_dir: DEFAULT_ATTACHMENTS_DIR.to_owned(),
            theme: DEFAULT_THEME.to_owned(),
            inline_only: false,
            sanitize: false,
        }
    }
}

impl ProcessingOptions {
    fn preprocess_options(&self) -> PreprocessOptions {
        PreprocessOptions {
            strip_frontmatter: self.strip_frontmatter,
            strip_title: self.strip_title,
            paragraph_spacing: self.paragraph_spacing,
            attachments_dir: self.attachments_dir.clone(),
        }
    }

    fn style_mode(&self) -> StyleMode {
        if self.inline_only {
            StyleMode::Inline
        } else {
            StyleMode::Document
        }
    }
}

/// Result of converting one document.
#[derive(Clone, Debug)]
pub struct ConvertResult {
    /// Final HTML.
    pub html: String,
    /// Frontmatter `title`, else the leading `# Title`, else the document name.
    pub title: Option<String>,
    /// Number of local images embedded as data URIs.
    pub images_inlined: usize,
    /// Non-fatal problems: embeds left unchanged, images that could not be read.
    pub warnings: Vec<String>,
}

/// Converts documents with a fixed set of options.
#[derive(Clone, Debug, Default)]
pub struct Pipeline {
    options: ProcessingOptions,
}

impl Pipeline {
    #[must_use]
    pub fn new(options: ProcessingOptions) -> Self {
        Self { options }
    }

    #[must_use]
    pub fn options(&self) -> &ProcessingOptions {
        &self.options
    }

    /// Run every stage over `document`.
    ///
    /// # Errors
    ///
    /// Returns `PipelineError::Style` for an unknown theme. The theme is
    /// looked up by the styling stage, after images have been inlined and
    /// their warnings logged.
    pub fn convert(&self, document: &Document) -> Result<ConvertResult, PipelineError> {
        let options = &self.options;

        let mut preprocessor = Preprocessor::new(options.preprocess_options());
        let markdown = preprocessor.process(document.source());
        let title = preprocessor
            .frontmatter_title()
            .or_else(|| preprocessor.title())
            .or_else(|| document.name())
            .map(ToOwned::to_owned);

        let fragment = MarkdownRenderer::new().render_markdown(&markdown);

        let mut inliner = AssetInliner::new(document.base_dir())
            .with_attachments_dir(options.attachments_dir.as_str());
        let fragment = inliner.inline(&fragment);

        let mode = options.style_mode();
        tracing::debug!(theme = %options.theme, ?mode, "Applying theme");
        let style_options = StyleOptions {
            mode,
            title: title.clone(),
        };
        let mut html = richpaste_style::apply_theme_with(&fragment, &options.theme, &style_options)?;

        if options.sanitize {
            html = richpaste_style::sanitize(&html);
        }

        let warnings = preprocessor
            .warnings()
            .iter()
            .chain(inliner.warnings())
            .cloned()
            .collect();

        Ok(ConvertResult {
            html,
            title,
            images_inlined: inliner.inlined(),
            warnings,
        })
    }
}

/// Convert `document` with `options`.
///
/// # Errors
///
/// See [`Pipeline::convert`].
pub fn convert(
    document: &Document,
    options: &ProcessingOptions,
) -> Result<ConvertResult, PipelineError> {
    Pipeline::new(options.clone()).convert(document)
}
