use std::path::PathBuf;

use richpaste_style::StyleError;

/// Fatal conversion error. Nothing should be written when one occurs.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Source file not found: {}", .0.display())]
    SourceNotFound(PathBuf),
    #[error(transparent)]
    Style(#[from] StyleError),
    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
