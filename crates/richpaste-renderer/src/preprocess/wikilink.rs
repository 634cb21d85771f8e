//! Obsidian image embed conversion.
//!
//! Rewrites `![[photo.png]]` and `![[photo.png|alias]]` into standard
//! Markdown image syntax. Embeds of notes and other non-image files are left
//! untouched.

use std::sync::LazyLock;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use regex::Regex;

use super::fence::FenceTracker;

static EMBED_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"!\[\[([^\[\]]+)\]\]").unwrap());

static IMAGE_EXTENSION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\.(?:png|jpe?g|gif|svg|webp|bmp|ico|avif)$").unwrap());

static EXTERNAL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(?:https?://|data:|/)").unwrap());

/// Obsidian resize syntax: `![[img.png|400]]` or `![[img.png|400x300]]`.
static SIZE_ALIAS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)^\d+(?:x\d+)?$").unwrap());

/// Characters escaped in emitted image paths.
///
/// Keeps URL structure (`/`, `:`, `;`, `,`, `=`, `&`) readable and escapes
/// spaces, parentheses, `%`, `#`, backslashes and all non-ASCII bytes, which
/// would otherwise break or change the meaning of a Markdown link destination.
const PATH_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~')
    .remove(b'/')
    .remove(b':')
    .remove(b'@')
    .remove(b'!')
    .remove(b'$')
    .remove(b'&')
    .remove(b'\'')
    .remove(b'*')
    .remove(b'+')
    .remove(b',')
    .remove(b';')
    .remove(b'=');

/// Convert image embeds outside fenced code blocks.
///
/// Embeds that are kept verbatim (notes, PDFs) are reported in `warnings`.
pub(crate) fn convert_image_embeds(
    markdown: &str,
    attachments_dir: &str,
    warnings: &mut Vec<String>,
) -> String {
    let mut output = String::with_capacity(markdown.len());
    let mut fence = FenceTracker::new();

    for line in markdown.split_inclusive('\n') {
        let inside_fence = fence.in_fence();
        let is_fence_line = fence.update(line);

        if inside_fence || is_fence_line || !line.contains("![[") {
            output.push_str(line);
            continue;
        }

        let converted = EMBED_RE.replace_all(line, |caps: &regex::Captures| {
            convert_embed(&caps[1], attachments_dir).unwrap_or_else(|| {
                warnings.push(format!("embed `{}` is not an image, left unchanged", &caps[1]));
                caps[0].to_owned()
            })
        });
        output.push_str(&converted);
    }

    output
}

/// Convert the inner text of one `![[...]]` embed.
///
/// Returns `None` when the embed is not an image and must be kept verbatim.
fn convert_embed(inner: &str, attachments_dir: &str) -> Option<String> {
    let mut parts = inner.split('|');
    let target = parts.next().unwrap_or_default().trim();
    let alias = parts.next().unwrap_or_default().trim();

    if target.is_empty() || !IMAGE_EXTENSION_RE.is_match(target) {
        return None;
    }

    let src = resolve_target(target, attachments_dir);
    let encoded = utf8_percent_encode(&src, PATH_ENCODE_SET);

    let alt = if alias.is_empty() || SIZE_ALIAS_RE.is_match(alias) {
        file_stem(target)
    } else {
        alias
    };

    Some(format!("![{}]({encoded})", escape_alt(alt)))
}

/// Bare filenames live in the attachments directory; anything with a path
/// separator or an external scheme is used as written.
fn resolve_target(target: &str, attachments_dir: &str) -> String {
    let has_separator = target.contains(['/', '\\']);
    if EXTERNAL_RE.is_match(target) || has_separator {
        return target.to_owned();
    }

    let dir = attachments_dir.trim_end_matches(['/', '\\']);
    if dir.is_empty() {
        target.to_owned()
    } else {
        format!("{dir}/{target}")
    }
}

/// Filename without directories and without its final extension.
fn file_stem(target: &str) -> &str {
    let name = target.rsplit(['/', '\\']).next().unwrap_or(target);
    match name.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => name,
    }
}

/// Escape `]` so alt text cannot close the image syntax early.
fn escape_alt(alt: &str) -> String {
    alt.replace(']', "\\]")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn convert(markdown: &str) -> String {
        convert_image_embeds(markdown, "attachments", &mut Vec::new())
    }

    #[test]
    fn test_bare_image() {
        assert_eq!(convert("![[photo.png]]"), "![photo](attachments/photo.png)");
    }

    #[test]
    fn test_size_alias_ignored() {
        assert_eq!(
            convert("![[photo.png|200]]"),
            "![photo](attachments/photo.png)"
        );
        assert_eq!(
            convert("![[photo.png|400x300]]"),
            "![photo](attachments/photo.png)"
        );
    }

    #[test]
    fn test_text_alias_used_as_alt() {
        assert_eq!(
            convert("![[photo.png|My Photo]]"),
            "![My Photo](attachments/photo.png)"
        );
    }

    #[test]
    fn test_non_image_embed_untouched() {
        assert_eq!(convert("![[Note Title]]"), "![[Note Title]]");
        assert_eq!(convert("![[report.pdf]]"), "![[report.pdf]]");
    }

    #[test]
    fn test_non_image_embed_warns() {
        let mut warnings = Vec::new();
        let _ = convert_image_embeds("![[Note Title]] ![[a.png]]", "attachments", &mut warnings);
        assert_eq!(
            warnings,
            vec!["embed `Note Title` is not an image, left unchanged".to_owned()]
        );
    }

    #[test]
    fn test_spaces_are_percent_encoded() {
        assert_eq!(
            convert("![[Pasted image 20240101.png]]"),
            "![Pasted image 20240101](attachments/Pasted%20image%2020240101.png)"
        );
    }

    #[test]
    fn test_parentheses_and_unicode_encoded() {
        assert_eq!(
            convert("![[图 (1).jpg]]"),
            "![图 (1)](attachments/%E5%9B%BE%20%281%29.jpg)"
        );
    }

    #[test]
    fn test_target_with_separator_not_moved() {
        assert_eq!(
            convert("![[images/diagram.svg]]"),
            "![diagram](images/diagram.svg)"
        );
    }

    #[test]
    fn test_external_target_not_moved() {
        assert_eq!(
            convert("![[https://example.com/a b.png]]"),
            "![a b](https://example.com/a%20b.png)"
        );
        assert_eq!(convert("![[/abs/pic.gif]]"), "![pic](/abs/pic.gif)");
    }

    #[test]
    fn test_bracketed_text_is_not_an_embed() {
        assert_eq!(
            convert("![[photo.png|see [1] ]]"),
            "![[photo.png|see [1] ]]"
        );
        assert_eq!(convert("![[a]b.png]]"), "![[a]b.png]]");
    }

    #[test]
    fn test_escape_alt() {
        assert_eq!(escape_alt("x]y"), "x\\]y");
        assert_eq!(escape_alt("plain"), "plain");
    }

    #[test]
    fn test_uppercase_extension() {
        assert_eq!(convert("![[SCAN.JPEG]]"), "![SCAN](attachments/SCAN.JPEG)");
    }

    #[test]
    fn test_custom_attachments_dir() {
        assert_eq!(
            convert_image_embeds("![[a.png]]", "assets/img/", &mut Vec::new()),
            "![a](assets/img/a.png)"
        );
        assert_eq!(
            convert_image_embeds("![[a.png]]", "", &mut Vec::new()),
            "![a](a.png)"
        );
    }

    #[test]
    fn test_multiple_embeds_on_one_line() {
        assert_eq!(
            convert("![[a.png]] and ![[b.gif|B]]"),
            "![a](attachments/a.png) and ![B](attachments/b.gif)"
        );
    }

    #[test]
    fn test_embeds_in_code_fence_untouched() {
        let input = "```\n![[a.png]]\n```\n![[a.png]]\n";
        assert_eq!(
            convert(input),
            "```\n![[a.png]]\n```\n![a](attachments/a.png)\n"
        );
    }
}
