//! End-to-end conversion of a vault note.

use std::fs;
use std::path::Path;

use base64::Engine;
use base64::prelude::BASE64_STANDARD;
use pretty_assertions::assert_eq;
use richpaste_pipeline::{Document, PipelineError, ProcessingOptions, available_themes, convert};

const PNG_BYTES: &[u8] = &[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a, 1, 2, 3];

const NOTE: &str = "---
title: Weekly Notes
tags: [rust]
---
# Weekly Notes

Hello  world.
Second line of the same paragraph.

![[photo one.png|300]]

![remote](https://example.com/cat.png)

```rust
fn main() {
    let  x = 1;

}
```

| Name | Value |
| ---- | ----: |
| a    | 1     |
";

fn write_vault(dir: &Path) -> std::path::PathBuf {
    fs::create_dir_all(dir.join("attachments")).unwrap();
    fs::write(dir.join("attachments/photo one.png"), PNG_BYTES).unwrap();
    let note = dir.join("weekly.md");
    fs::write(&note, NOTE).unwrap();
    note
}

fn inline_options() -> ProcessingOptions {
    ProcessingOptions {
        inline_only: true,
        ..ProcessingOptions::default()
    }
}

#[test]
fn test_inline_fragment_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let note = write_vault(dir.path());

    let document = Document::from_path(&note).unwrap();
    let result = convert(&document, &inline_options()).unwrap();
    let html = &result.html;

    assert_eq!(result.title.as_deref(), Some("Weekly Notes"));
    assert_eq!(result.images_inlined, 1);
    assert!(result.warnings.is_empty(), "{:?}", result.warnings);

    // Fragment only.
    assert!(html.starts_with(r#"<div class="markdown-body" style=""#));
    assert!(!html.contains("<style"));
    assert!(!html.contains("<html"));
    assert!(!html.contains("tags:"));
    assert!(!html.contains("<h1"));

    // Double spaces in prose are left alone; single newlines became paragraphs.
    assert!(html.contains("Hello  world.</p>"));
    assert!(!html.contains("Hello&nbsp;"));
    assert!(html.contains(">Second line of the same paragraph.</p>"));

    let data_uri = format!("data:image/png;base64,{}", BASE64_STANDARD.encode(PNG_BYTES));
    assert!(html.contains(&format!(r#"src="{data_uri}""#)));
    assert!(html.contains(r#"alt="photo one""#));
    assert!(html.contains(r#"src="https://example.com/cat.png""#));

    // Code lines keep indentation and interior spacing as entities.
    assert!(html.contains(r#"<section class="code-wrapper""#));
    assert!(html.contains("&nbsp;&nbsp;&nbsp;&nbsp;let&nbsp;&nbsp;x = 1;"));
    assert!(html.contains(">&nbsp;</div>"));

    assert!(html.contains(r#"<section class="table-wrapper""#));
    assert!(html.contains("<td"));
}

#[test]
fn test_document_mode_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let note = write_vault(dir.path());

    let document = Document::from_path(&note).unwrap();
    let result = convert(&document, &ProcessingOptions::default()).unwrap();
    let html = &result.html;

    assert_eq!(html.matches("<!DOCTYPE html>").count(), 1);
    assert_eq!(html.matches("<style>").count(), 1);
    assert!(html.contains("<title>Weekly Notes</title>"));
    assert!(html.contains(r#"<div class="markdown-body" style=""#));
    assert!(html.contains("data:image/png;base64,"));
}

const STYLED_NOTE: &str = "# Title

A paragraph with a [link](https://example.com).

```
line one
line two
```

| Name | Value |
| ---- | ----- |
| a    | 1     |

> Quoted text.
";

/// Opening tags named `name`, attributes included.
fn opening_tags<'a>(html: &'a str, name: &str) -> Vec<&'a str> {
    let prefix = format!("<{name}");
    html.match_indices(&prefix)
        .map(|(start, _)| &html[start..])
        .filter(|rest| rest[prefix.len()..].starts_with([' ', '>']))
        .map(|rest| &rest[..=rest.find('>').unwrap()])
        .collect()
}

#[test]
fn test_every_theme_styles_every_block() {
    let document = Document::new(STYLED_NOTE, ".");
    for theme in available_themes() {
        let options = ProcessingOptions {
            theme: theme.to_owned(),
            strip_title: false,
            ..inline_options()
        };
        let html = convert(&document, &options).unwrap().html;

        for name in ["h1", "p", "a", "table", "th", "td", "blockquote"] {
            let tags = opening_tags(&html, name);
            assert!(!tags.is_empty(), "theme {theme}: no <{name}> in {html}");
            for tag in tags {
                assert!(tag.contains(r#" style=""#), "theme {theme}: unstyled {tag}");
            }
        }
        let code_lines = html.matches(r#"<div class="code-line" style=""#).count();
        assert_eq!(code_lines, 2, "theme {theme}");
    }
}

#[test]
fn test_hover_rules_are_not_inlined() {
    let document = Document::new("[link](https://example.com)", ".");
    let options = ProcessingOptions {
        theme: "wechat-default".to_owned(),
        ..inline_options()
    };
    let html = convert(&document, &options).unwrap().html;
    let link = opening_tags(&html, "a")[0];
    assert!(link.contains("color: #576b95"), "{link}");
    assert!(!link.contains("#07c160"), "{link}");
}

#[test]
fn test_missing_image_keeps_reference() {
    let dir = tempfile::tempdir().unwrap();
    let note = dir.path().join("note.md");
    fs::write(&note, "![[gone.png]]\n").unwrap();

    let result = convert(&Document::from_path(&note).unwrap(), &inline_options()).unwrap();
    assert_eq!(result.images_inlined, 0);
    assert!(result.html.contains(r#"src="attachments/gone.png""#));
    assert_eq!(result.warnings.len(), 1);
}

#[test]
fn test_missing_source_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let err = Document::from_path(&dir.path().join("absent.md")).unwrap_err();
    assert!(matches!(err, PipelineError::SourceNotFound(_)));
}
