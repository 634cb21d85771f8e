//! Error types for theme styling.

/// Error applying a theme.
#[derive(Debug, thiserror::Error)]
pub enum StyleError {
    /// No theme with this name is in the catalog.
    #[error("unknown theme `{name}` (available: {})", .available.join(", "))]
    UnknownTheme {
        name: String,
        available: Vec<&'static str>,
    },

    #[error("failed to rewrite HTML: {0}")]
    Rewrite(#[from] lol_html::errors::RewritingError),
}
