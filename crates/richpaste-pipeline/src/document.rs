use std::path::{Path, PathBuf};

use crate::PipelineError;

/// A Markdown source and the directory its relative image paths resolve
/// against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    source: String,
    base_dir: PathBuf,
    name: Option<String>,
}

impl Document {
    #[must_use]
    pub fn new(source: impl Into<String>, base_dir: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            base_dir: base_dir.into(),
            name: None,
        }
    }

    /// Name used as the title when the document declares none.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Read a UTF-8 Markdown file. The name is the file stem and the base
    /// directory is the file's parent.
    pub fn from_path(path: &Path) -> Result<Self, PipelineError> {
        if !path.is_file() {
            return Err(PipelineError::SourceNotFound(path.to_path_buf()));
        }
        let source = std::fs::read_to_string(path).map_err(|source| PipelineError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let base_dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let mut document = Self::new(source, base_dir);
        if let Some(stem) = path.file_stem() {
            document.name = Some(stem.to_string_lossy().into_owned());
        }
        Ok(document)
    }

    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    #[must_use]
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}
