//! Paste-target cleanup.
//!
//! Rich text editors reject or silently mangle active content, identifiers and
//! form controls. This pass strips them with a fixed deny table; anything it
//! does not recognize is passed through unchanged.

use std::sync::LazyLock;

use lol_html::errors::RewritingError;
use lol_html::html_content::{ContentType, Element};
use lol_html::{HandlerResult, RewriteStrSettings, doc_comments, element, rewrite_str};
use regex::{Captures, Regex};

/// Elements removed together with their content.
const REMOVE_WITH_CONTENT: &[&str] = &[
    "script", "style", "iframe", "object", "embed", "noscript", "template", "frame", "frameset",
    "applet",
];

/// Elements removed on their own (they have no content).
const REMOVE_TAG: &[&str] = &["link", "meta", "base"];

/// Elements whose tags are dropped but whose content is kept.
const UNWRAP: &[&str] = &["form"];

/// Attributes removed by exact name.
const REMOVE_ATTRS: &[&str] = &["id", "contenteditable", "draggable", "tabindex"];

/// Attributes whose value is a URL.
const URL_ATTRS: &[&str] = &["href", "src"];

const CHECKED_BOX: &str = "☑";
const UNCHECKED_BOX: &str = "☐";

/// Character references that can hide a `javascript:` scheme.
static CHAR_REF_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)&#x([0-9a-f]+);?|&#([0-9]+);?|&(colon|tab|newline);").unwrap()
});

/// Sanitize `html` for pasting.
///
/// Removes comments, active and embedded content, metadata tags, event
/// handlers, `id`/`data-*`/editing attributes and `javascript:` URLs;
/// replaces task-list checkboxes with ☑/☐ and unwraps forms. If the HTML
/// cannot be rewritten it is returned unchanged.
#[must_use]
pub fn sanitize(html: &str) -> String {
    match rewrite(html) {
        Ok(clean) => clean,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to sanitize HTML, keeping it unchanged");
            html.to_owned()
        }
    }
}

fn rewrite(html: &str) -> Result<String, RewritingError> {
    let mut handlers = vec![element!("*", clean_attributes)];
    for &name in REMOVE_WITH_CONTENT.iter().chain(REMOVE_TAG) {
        handlers.push(element!(name, |el| {
            el.remove();
            Ok(())
        }));
    }
    for &name in UNWRAP {
        handlers.push(element!(name, |el| {
            el.remove_and_keep_content();
            Ok(())
        }));
    }
    handlers.push(element!("input[type=checkbox]", |el| {
        let marker = if el.has_attribute("checked") {
            CHECKED_BOX
        } else {
            UNCHECKED_BOX
        };
        el.replace(marker, ContentType::Text);
        Ok(())
    }));

    rewrite_str(
        html,
        RewriteStrSettings {
            element_content_handlers: handlers,
            document_content_handlers: vec![doc_comments!(|comment| {
                comment.remove();
                Ok(())
            })],
            ..RewriteStrSettings::new()
        },
    )
}

/// Drop denied attributes and neutralize `javascript:` URLs. Elements with
/// nothing to clean are left byte for byte.
fn clean_attributes(el: &mut Element<'_, '_>) -> HandlerResult {
    let denied: Vec<String> = el
        .attributes()
        .iter()
        .map(|attr| attr.name())
        .filter(|name| is_denied_attribute(name))
        .collect();
    for name in denied {
        el.remove_attribute(&name);
    }
    for &name in URL_ATTRS {
        if el.get_attribute(name).is_some_and(|value| is_javascript_url(&value)) {
            el.set_attribute(name, "#")?;
        }
    }
    Ok(())
}

fn is_denied_attribute(name: &str) -> bool {
    name.starts_with("on") || name.starts_with("data-") || REMOVE_ATTRS.contains(&name)
}

/// `javascript:` after character reference decoding, ignoring case,
/// whitespace and control characters browsers skip.
fn is_javascript_url(value: &str) -> bool {
    let decoded = CHAR_REF_RE.replace_all(value, |caps: &Captures| {
        let code = if let Some(hex) = caps.get(1) {
            u32::from_str_radix(hex.as_str(), 16).ok()
        } else if let Some(dec) = caps.get(2) {
            dec.as_str().parse().ok()
        } else {
            match caps[3].to_ascii_lowercase().as_str() {
                "colon" => Some(u32::from(b':')),
                "tab" => Some(u32::from(b'\t')),
                _ => Some(u32::from(b'\n')),
            }
        };
        code.and_then(char::from_u32).map_or_else(String::new, String::from)
    });
    let compact: String = decoded
        .chars()
        .filter(|c| !c.is_whitespace() && !c.is_control())
        .take("javascript:".len())
        .collect();
    compact.eq_ignore_ascii_case("javascript:")
}
