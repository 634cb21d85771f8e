//! Obsidian Markdown preprocessing and paste-friendly HTML rendering.
//!
//! Two stages of the richpaste pipeline live here:
//!
//! - [`preprocess`] rewrites Obsidian syntax (frontmatter, leading title,
//!   `![[image]]` embeds, single-newline paragraphs) into standard Markdown.
//! - [`MarkdownRenderer`] turns standard Markdown into an HTML fragment whose
//!   code blocks and tables survive pasting into rich text editors.
//!
//! # Example
//!
//! ```
//! use richpaste_renderer::{PreprocessOptions, preprocess, render};
//!
//! let markdown = preprocess("# Title\n\nfirst line\nsecond line", &PreprocessOptions::default());
//! let html = render(&markdown);
//!
//! assert_eq!(
//!     html,
//!     r#"<div class="markdown-body"><p>first line</p><p>second line</p></div>"#
//! );
//! ```

mod html;
pub mod preprocess;
mod renderer;
mod state;

pub use html::AlertKind;
pub use preprocess::{DEFAULT_ATTACHMENTS_DIR, PreprocessOptions, Preprocessor, preprocess};
pub use renderer::{MarkdownRenderer, render};
pub use state::{escape_html, slugify};
