//! Obsidian Markdown to paste-ready HTML.
//!
//! Runs the conversion stages in order, each consuming the previous stage's
//! string:
//!
//! 1. preprocessing of Obsidian syntax ([`richpaste_renderer::Preprocessor`]),
//! 2. Markdown rendering ([`richpaste_renderer::MarkdownRenderer`]),
//! 3. local image inlining ([`richpaste_assets::AssetInliner`]),
//! 4. theme styling ([`richpaste_style::apply_theme_with`]),
//! 5. optional sanitizing ([`richpaste_style::sanitize`]).
//!
//! # Example
//!
//! ```
//! use richpaste_pipeline::{Document, ProcessingOptions, convert};
//!
//! let options = ProcessingOptions {
//!     inline_only: true,
//!     ..ProcessingOptions::default()
//! };
//! let document = Document::new("# Notes\n\nHello  world.", ".");
//! let result = convert(&document, &options)?;
//!
//! assert_eq!(result.title.as_deref(), Some("Notes"));
//! assert!(result.html.contains("Hello  world."));
//! assert!(!result.html.contains("<style>"));
//! # Ok::<(), richpaste_pipeline::PipelineError>(())
//! ```

mod document;
mod error;
mod pipeline;

pub use document::Document;
pub use error::PipelineError;
pub use pipeline::{ConvertResult, Pipeline, ProcessingOptions, convert};
pub use richpaste_style::{DEFAULT_THEME, available_themes};
