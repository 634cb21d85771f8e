//! Default command: convert one Markdown file.

use std::path::{Path, PathBuf};

use clap::Args;
use richpaste_config::{CliSettings, Config, ConvertConfig};
use richpaste_pipeline::{Document, Pipeline, ProcessingOptions};

use crate::commands::themes;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for converting a file.
#[derive(Args, Debug, Default)]
pub(crate) struct ConvertArgs {
    /// Input Obsidian Markdown file.
    input: Option<PathBuf>,

    /// Theme name (default: wechat-default).
    #[arg(short, long)]
    theme: Option<String>,

    /// Generate the inline-styled fragment only (no DOCTYPE/html/body).
    #[arg(short, long)]
    inline_only: bool,

    /// Clean the HTML for better paste target compatibility.
    #[arg(short, long)]
    sanitize: bool,

    /// Attachments directory relative to the input file (default: attachments).
    #[arg(short, long)]
    attachments_dir: Option<String>,

    /// Keep YAML frontmatter in the output.
    #[arg(long)]
    keep_frontmatter: bool,

    /// Keep the leading H1 title in the output.
    #[arg(long)]
    keep_title: bool,

    /// Do not insert blank lines between plain text lines.
    #[arg(long)]
    no_paragraph_spacing: bool,

    /// List available themes and exit.
    #[arg(short, long)]
    list_themes: bool,

    /// Output directory (default: outputs).
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Path to configuration file (default: auto-discover richpaste.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl ConvertArgs {
    /// Execute the conversion.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails, the input is missing, the
    /// theme is unknown or the output cannot be written.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let config = Config::load(self.config.as_deref(), Some(&self.cli_settings()))?;

        if self.list_themes {
            themes::list(&output, Some(&config.convert.theme));
            return Ok(());
        }

        let input = self.input.ok_or(CliError::MissingInput)?;
        let options = processing_options(&config.convert);

        output.step(&format!("Reading {}...", input.display()));
        let document = Document::from_path(&input)?;

        output.step(&format!("Converting with theme: {}...", options.theme));
        let result = Pipeline::new(options).convert(&document)?;
        for warning in &result.warnings {
            output.warning(&format!("Warning: {warning}"));
        }
        if result.images_inlined > 0 {
            output.step(&format!("Inlined {} image(s)", result.images_inlined));
        }

        let output_path = output_path(&config.output_resolved.dir, &input);
        write_output(&output_path, &result.html)?;
        output.success(&format!("✓ HTML saved to: {}", output_path.display()));

        print_usage_hints(&output, &output_path, config.convert.inline_only);
        output.success("Done!");
        Ok(())
    }

    /// Flags only ever switch behavior on, so an unset flag leaves the config
    /// value alone.
    fn cli_settings(&self) -> CliSettings {
        CliSettings {
            theme: self.theme.clone(),
            inline_only: self.inline_only.then_some(true),
            sanitize: self.sanitize.then_some(true),
            attachments_dir: self.attachments_dir.clone(),
            keep_frontmatter: self.keep_frontmatter.then_some(true),
            keep_title: self.keep_title.then_some(true),
            paragraph_spacing: self.no_paragraph_spacing.then_some(false),
            output_dir: self.output_dir.clone(),
        }
    }
}

fn processing_options(convert: &ConvertConfig) -> ProcessingOptions {
    ProcessingOptions {
        strip_frontmatter: !convert.keep_frontmatter,
        strip_title: !convert.keep_title,
        paragraph_spacing: convert.paragraph_spacing,
        attachments_dir: convert.attachments_dir.clone(),
        theme: convert.theme.clone(),
        inline_only: convert.inline_only,
        sanitize: convert.sanitize,
    }
}

/// `<dir>/<input stem>.html`.
fn output_path(dir: &Path, input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map_or_else(|| "output".into(), |s| s.to_string_lossy());
    dir.join(format!("{stem}.html"))
}

fn write_output(path: &Path, html: &str) -> Result<(), CliError> {
    let write_error = |source: std::io::Error| CliError::Write {
        path: path.to_path_buf(),
        source,
    };
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(write_error)?;
    }
    std::fs::write(path, html).map_err(write_error)
}

fn print_usage_hints(output: &Output, path: &Path, inline_only: bool) {
    output.heading("How to use:");
    if inline_only {
        output.hint(&format!("  1. Copy the contents of {}", path.display()));
        output.hint("  2. Paste into the editor's HTML source view");
    } else {
        output.hint(&format!("  1. Open {} in your browser", path.display()));
        output.hint("  2. Select all content (Cmd+A / Ctrl+A)");
        output.hint("  3. Copy (Cmd+C / Ctrl+C)");
        output.hint("  4. Paste into WeChat Editor or other rich text editors");
    }
}
