//! Built-in theme catalog.

use std::sync::LazyLock;

use crate::css::Stylesheet;
use crate::error::StyleError;

/// Theme used when none is configured.
pub const DEFAULT_THEME: &str = "wechat-default";

const THEME_SOURCES: &[(&str, &str)] = &[
    ("wechat-default", include_str!("../themes/wechat-default.css")),
    ("github", include_str!("../themes/github.css")),
    ("elegant", include_str!("../themes/elegant.css")),
    ("dark", include_str!("../themes/dark.css")),
];

static THEMES: LazyLock<Vec<Theme>> = LazyLock::new(|| {
    THEME_SOURCES
        .iter()
        .map(|&(name, css)| Theme {
            name,
            css,
            stylesheet: Stylesheet::parse(css),
        })
        .collect()
});

/// A named stylesheet.
#[derive(Debug)]
pub struct Theme {
    name: &'static str,
    css: &'static str,
    stylesheet: Stylesheet,
}

impl Theme {
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Full CSS source, as embedded in document output.
    #[must_use]
    pub fn css(&self) -> &'static str {
        self.css
    }

    /// Rules usable for inline styling.
    #[must_use]
    pub fn stylesheet(&self) -> &Stylesheet {
        &self.stylesheet
    }
}

/// Names of all built-in themes, in catalog order.
#[must_use]
pub fn available_themes() -> Vec<&'static str> {
    THEME_SOURCES.iter().map(|&(name, _)| name).collect()
}

/// Look up a theme by name.
pub fn theme(name: &str) -> Result<&'static Theme, StyleError> {
    THEMES
        .iter()
        .find(|theme| theme.name == name)
        .ok_or_else(|| StyleError::UnknownTheme {
            name: name.to_owned(),
            available: available_themes(),
        })
}
