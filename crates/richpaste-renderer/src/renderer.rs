//! Markdown to HTML renderer.

use std::fmt::Write;

use pulldown_cmark::{CodeBlockKind, Event, Options, Parser, Tag, TagEnd};

use crate::html::{self, AlertKind};
use crate::state::{CodeBlock, HeadingState, ImageState, TableState, escape_html};

/// Markdown renderer producing paste-friendly HTML.
///
/// Walks pulldown-cmark events and writes HTML directly. Elements that rich
/// text editors mangle (code blocks, tables) get dedicated markup from the
/// [`html`](crate::html) module; everything else is plain HTML5.
///
/// A renderer holds per-document state (heading ids, open lists), so build a
/// fresh one for every document, or use [`render`].
pub struct MarkdownRenderer {
    output: String,
    code: Option<CodeBlock>,
    table: TableState,
    image: ImageState,
    heading: HeadingState,
}

impl MarkdownRenderer {
    #[must_use]
    pub fn new() -> Self {
        Self {
            output: String::with_capacity(4096),
            code: None,
            table: TableState::default(),
            image: ImageState::default(),
            heading: HeadingState::default(),
        }
    }

    /// GitHub Flavored Markdown parser options.
    #[must_use]
    pub fn parser_options() -> Options {
        Options::ENABLE_TABLES
            | Options::ENABLE_STRIKETHROUGH
            | Options::ENABLE_TASKLISTS
            | Options::ENABLE_GFM
    }

    /// Render markdown text to an HTML fragment wrapped in
    /// `<div class="markdown-body">`.
    pub fn render_markdown(&mut self, markdown: &str) -> String {
        self.render(Parser::new_ext(markdown, Self::parser_options()))
    }

    /// Render markdown events.
    pub fn render<'a, I>(&mut self, events: I) -> String
    where
        I: Iterator<Item = Event<'a>>,
    {
        self.output.push_str(r#"<div class="markdown-body">"#);
        for event in events {
            self.process_event(event);
        }
        self.output.push_str("</div>");
        std::mem::take(&mut self.output)
    }

    /// Push inline markup to the heading buffer or the output.
    ///
    /// Markup inside image alt text is dropped; only its text survives.
    fn push_inline(&mut self, content: &str) {
        if self.image.is_active() {
            return;
        }
        if self.heading.is_active() {
            self.heading.push_html(content);
        } else {
            self.output.push_str(content);
        }
    }

    fn process_event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start_tag(tag),
            Event::End(tag) => self.end_tag(tag),
            Event::Text(text) => self.text(&text),
            Event::Code(code) => self.inline_code(&code),
            Event::Html(html) | Event::InlineHtml(html) => self.raw_html(&html),
            Event::SoftBreak => self.soft_break(),
            Event::HardBreak => self.push_inline("<br>"),
            Event::Rule => self.output.push_str("<hr>"),
            Event::TaskListMarker(checked) => html::task_list_marker(checked, &mut self.output),
            Event::FootnoteReference(_) | Event::InlineMath(_) | Event::DisplayMath(_) => {
                // Not supported
            }
        }
    }

    fn start_tag(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Paragraph => self.output.push_str("<p>"),
            Tag::Heading { level, .. } => {
                // Opening tag is written in end_tag once the id is known.
                self.heading.start_heading(level as u8);
            }
            Tag::BlockQuote(kind) => match kind {
                Some(kind) => html::alert_start(AlertKind::from(kind), &mut self.output),
                None => self.output.push_str("<blockquote>"),
            },
            Tag::CodeBlock(kind) => {
                let lang = match kind {
                    CodeBlockKind::Fenced(info) => info
                        .split_whitespace()
                        .next()
                        .filter(|lang| !lang.is_empty())
                        .map(ToOwned::to_owned),
                    CodeBlockKind::Indented => None,
                };
                self.code = Some(CodeBlock::new(lang));
            }
            Tag::List(start) => match start {
                Some(1) => self.output.push_str("<ol>"),
                Some(n) => write!(self.output, r#"<ol start="{n}">"#).unwrap(),
                None => self.output.push_str("<ul>"),
            },
            Tag::Item => self.output.push_str("<li>"),
            Tag::FootnoteDefinition(_) | Tag::HtmlBlock | Tag::MetadataBlock(_) => {}
            Tag::DefinitionList => self.output.push_str("<dl>"),
            Tag::DefinitionListTitle => self.output.push_str("<dt>"),
            Tag::DefinitionListDefinition => self.output.push_str("<dd>"),
            Tag::Table(alignments) => {
                self.table.start(alignments);
                html::table_start(&mut self.output);
            }
            Tag::TableHead => {
                self.table.start_head();
                self.output.push_str("<thead><tr>");
            }
            Tag::TableRow => {
                self.table.start_row();
                self.output.push_str("<tr>");
            }
            Tag::TableCell => {
                let tag = self.table.cell_tag();
                match self.table.cell_align() {
                    Some(align) => {
                        write!(self.output, r#"<{tag} style="text-align:{align}">"#).unwrap();
                    }
                    None => write!(self.output, "<{tag}>").unwrap(),
                }
            }
            Tag::Emphasis => self.push_inline("<em>"),
            Tag::Strong => self.push_inline("<strong>"),
            Tag::Strikethrough => self.push_inline("<del>"),
            Tag::Superscript => self.push_inline("<sup>"),
            Tag::Subscript => self.push_inline("<sub>"),
            Tag::Link {
                dest_url, title, ..
            } => {
                let tag = html::link_start(&dest_url, &title);
                self.push_inline(&tag);
            }
            Tag::Image {
                dest_url, title, ..
            } => {
                // Alt text is collected until the matching end tag.
                self.image.start(dest_url.into_string(), title.into_string());
            }
        }
    }

    fn end_tag(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Paragraph => self.output.push_str("</p>"),
            TagEnd::Heading(_) => {
                if let Some((level, id, html)) = self.heading.complete_heading() {
                    write!(
                        self.output,
                        r#"<h{level} id="{id}">{}</h{level}>"#,
                        html.trim()
                    )
                    .unwrap();
                }
            }
            TagEnd::BlockQuote(_) => self.output.push_str("</blockquote>"),
            TagEnd::CodeBlock => {
                if let Some(block) = self.code.take() {
                    html::code_block(block.language.as_deref(), &block.content, &mut self.output);
                }
            }
            TagEnd::List(ordered) => {
                self.output
                    .push_str(if ordered { "</ol>" } else { "</ul>" });
            }
            TagEnd::Item => self.output.push_str("</li>"),
            TagEnd::FootnoteDefinition | TagEnd::HtmlBlock | TagEnd::MetadataBlock(_) => {}
            TagEnd::DefinitionList => self.output.push_str("</dl>"),
            TagEnd::DefinitionListTitle => self.output.push_str("</dt>"),
            TagEnd::DefinitionListDefinition => self.output.push_str("</dd>"),
            TagEnd::Table => html::table_end(&mut self.output),
            TagEnd::TableHead => {
                self.output.push_str("</tr></thead><tbody>");
                self.table.end_head();
            }
            TagEnd::TableRow => self.output.push_str("</tr>"),
            TagEnd::TableCell => {
                write!(self.output, "</{}>", self.table.cell_tag()).unwrap();
                self.table.next_cell();
            }
            TagEnd::Emphasis => self.push_inline("</em>"),
            TagEnd::Strong => self.push_inline("</strong>"),
            TagEnd::Strikethrough => self.push_inline("</del>"),
            TagEnd::Superscript => self.push_inline("</sup>"),
            TagEnd::Subscript => self.push_inline("</sub>"),
            TagEnd::Link => self.push_inline("</a>"),
            TagEnd::Image => {
                if let Some((src, alt, title)) = self.image.end() {
                    let mut tag = String::new();
                    html::image(&src, &alt, &title, &mut tag);
                    self.push_inline(&tag);
                }
            }
        }
    }

    fn text(&mut self, text: &str) {
        if let Some(block) = &mut self.code {
            block.content.push_str(text);
        } else if self.image.is_active() {
            self.image.push_str(text);
        } else if self.heading.is_active() {
            self.heading.push_text(text);
            self.heading.push_html(&escape_html(text));
        } else {
            self.output.push_str(&escape_html(text));
        }
    }

    fn inline_code(&mut self, code: &str) {
        if self.image.is_active() {
            self.image.push_str(code);
            return;
        }
        if self.heading.is_active() {
            self.heading.push_text(code);
        }
        self.push_inline(&format!("<code>{}</code>", escape_html(code)));
    }

    fn raw_html(&mut self, html: &str) {
        self.push_inline(html);
    }

    fn soft_break(&mut self) {
        if self.image.is_active() {
            self.image.push_str(" ");
        } else {
            self.push_inline("\n");
        }
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Render preprocessed markdown with a fresh [`MarkdownRenderer`].
#[must_use]
pub fn render(markdown: &str) -> String {
    MarkdownRenderer::new().render_markdown(markdown)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn body(html: &str) -> &str {
        html.strip_prefix(r#"<div class="markdown-body">"#)
            .and_then(|rest| rest.strip_suffix("</div>"))
            .unwrap()
    }

    #[test]
    fn test_root_container() {
        assert_eq!(render(""), r#"<div class="markdown-body"></div>"#);
        assert_eq!(
            render("Hello, world!"),
            r#"<div class="markdown-body"><p>Hello, world!</p></div>"#
        );
    }

    #[test]
    fn test_double_space_in_paragraph_kept() {
        let html = render("Hello  world.");
        assert_eq!(body(&html), "<p>Hello  world.</p>");
        assert!(!html.contains("&nbsp;"));
    }

    #[test]
    fn test_soft_break_is_newline() {
        assert_eq!(body(&render("one\ntwo")), "<p>one\ntwo</p>");
    }

    #[test]
    fn test_hard_break() {
        assert_eq!(body(&render("one  \ntwo")), "<p>one<br>two</p>");
    }

    #[test]
    fn test_heading_with_id() {
        assert_eq!(
            body(&render("## Section Title")),
            r#"<h2 id="section-title">Section Title</h2>"#
        );
    }

    #[test]
    fn test_heading_inline_formatting() {
        assert_eq!(
            body(&render("### Use `cargo` **now**")),
            r#"<h3 id="use-cargo-now">Use <code>cargo</code> <strong>now</strong></h3>"#
        );
    }

    #[test]
    fn test_duplicate_headings() {
        let html = render("## A\n\n## A");
        assert!(html.contains(r#"<h2 id="a">A</h2>"#));
        assert!(html.contains(r#"<h2 id="a-1">A</h2>"#));
    }

    #[test]
    fn test_code_block_override() {
        assert_eq!(
            body(&render("```python\ndef f():\n    return 1\n\nf()\n```")),
            concat!(
                r#"<section class="code-wrapper"><pre><code class="language-python">"#,
                r#"<div class="code-line">def f():</div>"#,
                r#"<div class="code-line">&nbsp;&nbsp;&nbsp;&nbsp;return 1</div>"#,
                r#"<div class="code-line">&nbsp;</div>"#,
                r#"<div class="code-line">f()</div>"#,
                "</code></pre></section>"
            )
        );
    }

    #[test]
    fn test_fence_info_attributes_ignored() {
        let html = render("```rust title=\"main.rs\"\nfn main() {}\n```");
        assert!(html.contains(r#"<code class="language-rust">"#));
    }

    #[test]
    fn test_indented_code_block() {
        let html = render("    let x = 1;\n");
        assert!(html.contains(r#"<pre><code><div class="code-line">let x = 1;</div></code></pre>"#));
    }

    #[test]
    fn test_table_override() {
        let html = render("| A | B |\n|:--|--:|\n| 1 | 2 |");
        assert_eq!(
            body(&html),
            concat!(
                r#"<section class="table-wrapper"><table><thead><tr>"#,
                r#"<th style="text-align:left">A</th><th style="text-align:right">B</th>"#,
                r#"</tr></thead><tbody><tr>"#,
                r#"<td style="text-align:left">1</td><td style="text-align:right">2</td>"#,
                "</tr></tbody></table></section>"
            )
        );
    }

    #[test]
    fn test_image_with_title() {
        assert_eq!(
            body(&render(r#"![A *cat*](cat.png "Kitty")"#)),
            r#"<p><img src="cat.png" alt="A cat" title="Kitty"></p>"#
        );
    }

    #[test]
    fn test_image_in_link() {
        assert_eq!(
            body(&render("[![logo](l.png)](https://x.io)")),
            r#"<p><a href="https://x.io"><img src="l.png" alt="logo"></a></p>"#
        );
    }

    #[test]
    fn test_link_with_title() {
        assert_eq!(
            body(&render(r#"[docs](https://x.io "The docs")"#)),
            r#"<p><a href="https://x.io" title="The docs">docs</a></p>"#
        );
    }

    #[test]
    fn test_lists() {
        assert_eq!(body(&render("- a\n- b")), "<ul><li>a</li><li>b</li></ul>");
        assert_eq!(
            body(&render("3. x\n4. y")),
            r#"<ol start="3"><li>x</li><li>y</li></ol>"#
        );
    }

    #[test]
    fn test_task_list() {
        let html = render("- [x] done\n- [ ] todo");
        assert!(html.contains(r#"<li><input type="checkbox" checked disabled> done</li>"#));
        assert!(html.contains(r#"<li><input type="checkbox" disabled> todo</li>"#));
    }

    #[test]
    fn test_strikethrough() {
        assert_eq!(body(&render("~~gone~~")), "<p><del>gone</del></p>");
    }

    #[test]
    fn test_blockquote() {
        assert_eq!(
            body(&render("> quoted")),
            "<blockquote><p>quoted</p></blockquote>"
        );
    }

    #[test]
    fn test_alert() {
        assert_eq!(
            body(&render("> [!TIP]\n> Use **this**.")),
            r#"<blockquote class="alert alert-tip"><p class="alert-title">Tip</p><p>Use <strong>this</strong>.</p></blockquote>"#
        );
    }

    #[test]
    fn test_rule_and_html_passthrough() {
        assert_eq!(
            body(&render("a\n\n---\n\n<span>x</span>")),
            "<p>a</p><hr><p><span>x</span></p>"
        );
    }

    #[test]
    fn test_text_is_escaped() {
        assert_eq!(body(&render("a < b & c")), "<p>a &lt; b &amp; c</p>");
    }

    #[test]
    fn test_unclosed_constructs_do_not_fail() {
        let html = render("```\nnever closed\n\n**bold\n\n[link](");
        assert!(html.starts_with(r#"<div class="markdown-body">"#));
        assert!(html.ends_with("</div>"));
    }

    #[test]
    fn test_render_is_deterministic() {
        let md = "# T\n\n## A\n\ntext";
        assert_eq!(render(md), render(md));
    }
}
