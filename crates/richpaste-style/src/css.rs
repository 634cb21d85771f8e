//! Theme stylesheets.
//!
//! Parsed with lightningcss. Only top-level style rules whose selectors can be
//! matched while streaming the fragment are kept for inlining. At-rules
//! (`@media`, `@import`, `@font-face`, ...), pseudo-classes, attribute tests
//! and sibling combinators only take effect through the document `<style>`
//! block.

use lightningcss::declaration::DeclarationBlock;
use lightningcss::rules::CssRule;
use lightningcss::stylesheet::{ParserOptions, PrinterOptions, StyleSheet};
use lightningcss::traits::ToCss;

/// One `property: value` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    /// Lowercased property name.
    pub property: String,
    pub value: String,
}

impl Declaration {
    #[must_use]
    pub fn new(property: &str, value: &str) -> Self {
        Self {
            property: property.trim().to_ascii_lowercase(),
            value: value.trim().to_owned(),
        }
    }
}

/// A single selector and the declarations of the rule it came from.
#[derive(Debug, Clone)]
pub struct Rule {
    selector: String,
    declarations: Vec<Declaration>,
}

impl Rule {
    /// Selector text, accepted by `lol_html`.
    #[must_use]
    pub fn selector(&self) -> &str {
        &self.selector
    }

    #[must_use]
    pub fn declarations(&self) -> &[Declaration] {
        &self.declarations
    }
}

/// Parsed stylesheet: inlinable rules in source order.
///
/// Selector lists are split, so `h1, h2 { ... }` yields two rules.
#[derive(Debug, Clone, Default)]
pub struct Stylesheet {
    rules: Vec<Rule>,
}

impl Stylesheet {
    /// Parse CSS text. Malformed input never fails; unparseable parts are
    /// skipped.
    #[must_use]
    pub fn parse(css: &str) -> Self {
        let options = ParserOptions {
            error_recovery: true,
            ..ParserOptions::default()
        };
        let sheet = match StyleSheet::parse(css, options) {
            Ok(sheet) => sheet,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to parse stylesheet");
                return Self::default();
            }
        };

        let mut rules = Vec::new();
        for rule in &sheet.rules.0 {
            let CssRule::Style(style) = rule else {
                tracing::debug!("skipping at-rule for inlining");
                continue;
            };
            let declarations = declarations(&style.declarations);
            if declarations.is_empty() {
                continue;
            }
            let selectors = match style.selectors.to_css_string(PrinterOptions::default()) {
                Ok(selectors) => selectors,
                Err(e) => {
                    tracing::debug!(error = %e, "skipping unprintable selector");
                    continue;
                }
            };
            for selector in split_selector_list(&selectors) {
                match check_inlinable(selector) {
                    Ok(()) => rules.push(Rule {
                        selector: selector.to_owned(),
                        declarations: declarations.clone(),
                    }),
                    Err(reason) => {
                        tracing::debug!(selector, reason = %reason, "skipping selector for inlining");
                    }
                }
            }
        }

        Self { rules }
    }

    #[must_use]
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Number of rules usable for inlining.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Declarations of a block, `!important` ones last.
fn declarations(block: &DeclarationBlock<'_>) -> Vec<Declaration> {
    let normal = block.declarations.iter().map(|property| (property, false));
    let important = block
        .important_declarations
        .iter()
        .map(|property| (property, true));

    let mut result = Vec::new();
    for (property, important) in normal.chain(important) {
        match property.to_css_string(important, PrinterOptions::default()) {
            Ok(text) => {
                if let Some((name, value)) = text.split_once(':') {
                    merge(&mut result, Declaration::new(name, value));
                }
            }
            Err(e) => tracing::debug!(error = %e, "skipping unprintable declaration"),
        }
    }
    result
}

/// Whether `selector` can be matched against a streamed element.
fn check_inlinable(selector: &str) -> Result<(), String> {
    if selector.contains(':') {
        return Err("pseudo-class".to_owned());
    }
    if selector.contains('[') {
        return Err("attribute selector".to_owned());
    }
    if selector.contains(['+', '~']) {
        return Err("sibling combinator".to_owned());
    }
    selector
        .parse::<lol_html::Selector>()
        .map(drop)
        .map_err(|e| e.to_string())
}

/// Split a printed selector list on commas outside parentheses.
fn split_selector_list(list: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, c) in list.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                parts.push(list[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(list[start..].trim());
    parts.retain(|part| !part.is_empty());
    parts
}

/// Set a declaration, replacing any earlier one for the same property.
pub(crate) fn merge(declarations: &mut Vec<Declaration>, declaration: Declaration) {
    declarations.retain(|d| d.property != declaration.property);
    declarations.push(declaration);
}

/// Serialize declarations as a `style` attribute value.
pub(crate) fn to_style(declarations: &[Declaration]) -> String {
    declarations
        .iter()
        .map(|d| format!("{}: {}", d.property, d.value))
        .collect::<Vec<_>>()
        .join("; ")
}
