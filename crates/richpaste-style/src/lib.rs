//! Theme styling and sanitizing for paste-ready HTML.
//!
//! Rich text editors such as WeChat's drop `<style>` blocks on paste, so the
//! theme has to travel as `style` attributes on each element. [`apply_theme`]
//! resolves a built-in theme's rules against the rendered fragment and either
//! returns the inline-styled fragment or wraps it in a full document.
//! [`sanitize`] is an optional final pass that strips content paste targets
//! reject.
//!
//! # Example
//!
//! ```
//! use richpaste_style::{StyleMode, apply_theme, available_themes};
//!
//! assert!(available_themes().contains(&"github"));
//!
//! let html = apply_theme(r#"<div class="markdown-body"><p>Hi</p></div>"#, "github", StyleMode::Inline)?;
//! assert!(html.starts_with(r#"<div class="markdown-body" style=""#));
//! # Ok::<(), richpaste_style::StyleError>(())
//! ```

mod css;
mod error;
mod sanitize;
mod styler;
mod theme;

pub use css::{Declaration, Rule, Stylesheet};
pub use error::StyleError;
pub use sanitize::sanitize;
pub use styler::{StyleMode, StyleOptions, apply_theme, apply_theme_with};
pub use theme::{DEFAULT_THEME, Theme, available_themes, theme};
