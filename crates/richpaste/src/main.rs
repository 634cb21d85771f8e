//! richpaste CLI - Obsidian Markdown to paste-ready HTML.
//!
//! - `richpaste <input.md>`: convert a note into `<output_dir>/<stem>.html`
//! - `richpaste themes`: list the built-in themes

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::ConvertArgs;
use output::Output;

/// Convert Obsidian Markdown into rich text HTML for pasting into editors.
#[derive(Parser)]
#[command(name = "richpaste", version, about, args_conflicts_with_subcommands = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    convert: ConvertArgs,

    /// Enable verbose output (image inlining and styling logs).
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List all available themes.
    Themes,
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG (warnings by default)
    let filter = if cli.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Some(Commands::Themes) => {
            commands::themes::list(&output, None);
            Ok(())
        }
        None => cli.convert.execute(),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
