//! Theme application: inline `style` attributes and document wrapping.

use std::cell::RefCell;
use std::fmt::Write;

use lol_html::{RewriteStrSettings, element, rewrite_str};

use crate::css::{self, Declaration, Rule, Stylesheet};
use crate::error::StyleError;
use crate::theme;

const DEFAULT_TITLE: &str = "Document";

/// Output shape of [`apply_theme`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StyleMode {
    /// Standalone page with the theme in a `<style>` block; the body is
    /// inline-styled as well so copying from a browser keeps the look.
    #[default]
    Document,
    /// Only the fragment, every matched element carrying a `style` attribute.
    Inline,
}

/// Options for [`apply_theme_with`].
#[derive(Debug, Clone, Default)]
pub struct StyleOptions {
    pub mode: StyleMode,
    /// Document `<title>`; ignored in inline mode.
    pub title: Option<String>,
}

/// Style `html` with the named theme.
pub fn apply_theme(html: &str, theme_name: &str, mode: StyleMode) -> Result<String, StyleError> {
    apply_theme_with(
        html,
        theme_name,
        &StyleOptions {
            mode,
            title: None,
        },
    )
}

/// Style `html` with the named theme and explicit options.
pub fn apply_theme_with(
    html: &str,
    theme_name: &str,
    options: &StyleOptions,
) -> Result<String, StyleError> {
    let theme = theme::theme(theme_name)?;
    let styled = inline_styles(html, theme.stylesheet())?;

    Ok(match options.mode {
        StyleMode::Inline => styled,
        StyleMode::Document => {
            let title = options.title.as_deref().unwrap_or(DEFAULT_TITLE);
            wrap_document(&styled, title, theme.css())
        }
    })
}

fn wrap_document(body: &str, title: &str, css: &str) -> String {
    let mut out = String::with_capacity(body.len() + css.len() + 256);
    out.push_str("<!DOCTYPE html>\n<html>\n<head>\n");
    out.push_str("<meta charset=\"UTF-8\">\n");
    out.push_str(
        "<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n",
    );
    writeln!(out, "<title>{}</title>", escape_text(title)).unwrap();
    writeln!(out, "<style>\n{}\n</style>", css.trim()).unwrap();
    out.push_str("</head>\n<body>\n");
    out.push_str(body);
    out.push_str("\n</body>\n</html>\n");
    out
}

fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Add theme declarations to the `style` attribute of every matched element.
///
/// Declarations already present in an element's `style` attribute win over
/// the theme's.
pub(crate) fn inline_styles(html: &str, stylesheet: &Stylesheet) -> Result<String, StyleError> {
    // Rules matched by the element currently being rewritten.
    let matched: RefCell<Vec<&Rule>> = RefCell::new(Vec::new());

    let mut handlers = Vec::with_capacity(stylesheet.len() + 1);
    for rule in stylesheet.rules() {
        let matched = &matched;
        handlers.push(element!(rule.selector(), move |_el| {
            matched.borrow_mut().push(rule);
            Ok(())
        }));
    }
    // Handlers for one element run in registration order, so this sees every
    // rule that matched it.
    handlers.push(element!("*", |el| {
        let rules = std::mem::take(&mut *matched.borrow_mut());
        if rules.is_empty() {
            return Ok(());
        }
        let mut declarations = Vec::new();
        for rule in rules {
            for declaration in rule.declarations() {
                css::merge(&mut declarations, declaration.clone());
            }
        }
        let style = style_value(declarations, el.get_attribute("style").as_deref());
        el.set_attribute("style", &style)?;
        Ok(())
    }));

    let styled = rewrite_str(
        html,
        RewriteStrSettings {
            element_content_handlers: handlers,
            ..RewriteStrSettings::new()
        },
    )?;
    Ok(styled)
}

/// Theme declarations followed by the element's own, minus the theme
/// properties the element already sets.
fn style_value(mut theme: Vec<Declaration>, existing: Option<&str>) -> String {
    let existing = existing.map_or("", |s| s.trim().trim_end_matches(';'));
    if existing.is_empty() {
        return css::to_style(&theme).replace('"', "'");
    }

    let own: Vec<String> = existing
        .split(';')
        .filter_map(|item| item.split_once(':'))
        .map(|(property, _)| property.trim().to_ascii_lowercase())
        .collect();
    theme.retain(|d| !own.contains(&d.property));

    let mut style = css::to_style(&theme);
    if !style.is_empty() {
        style.push_str("; ");
    }
    style.push_str(existing);
    style.replace('"', "'")
}
