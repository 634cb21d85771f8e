//! CLI error types.

use std::path::PathBuf;

use richpaste_config::ConfigError;
use richpaste_pipeline::PipelineError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Pipeline(#[from] PipelineError),

    #[error("Failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Input file path is required (example: richpaste article.md)")]
    MissingInput,
}
