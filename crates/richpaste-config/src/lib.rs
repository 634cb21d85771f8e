//! Configuration management for richpaste.
//!
//! Parses `richpaste.toml` with serde and discovers it in the current
//! directory or its parents. CLI values are applied on top via
//! [`CliSettings`].
//!
//! ```toml
//! [convert]
//! theme = "github"
//! inline_only = false
//! sanitize = false
//! attachments_dir = "${VAULT_ATTACHMENTS:-attachments}"
//! keep_frontmatter = false
//! keep_title = false
//! paragraph_spacing = true
//!
//! [output]
//! dir = "outputs"
//! ```
//!
//! ## Environment Variable Expansion
//!
//! `convert.attachments_dir` and `output.dir` support `${VAR}` and
//! `${VAR:-default}`.

mod expand;

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "richpaste.toml";

const DEFAULT_THEME: &str = "wechat-default";
const DEFAULT_ATTACHMENTS_DIR: &str = "attachments";
const DEFAULT_OUTPUT_DIR: &str = "outputs";

/// CLI settings that override configuration file values.
///
/// Only `Some` values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    pub theme: Option<String>,
    pub inline_only: Option<bool>,
    pub sanitize: Option<bool>,
    pub attachments_dir: Option<String>,
    pub keep_frontmatter: Option<bool>,
    pub keep_title: Option<bool>,
    pub paragraph_spacing: Option<bool>,
    /// Used as given, not resolved against the config directory.
    pub output_dir: Option<PathBuf>,
}

/// Application configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Conversion settings.
    pub convert: ConvertConfig,
    /// Output settings as written in TOML.
    output: OutputConfigRaw,

    /// Resolved output settings (set after loading).
    #[serde(skip)]
    pub output_resolved: OutputConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// `[convert]` section.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ConvertConfig {
    /// Theme name from the catalog.
    pub theme: String,
    /// Emit only the inline-styled fragment.
    pub inline_only: bool,
    /// Run the paste-target sanitizer last.
    pub sanitize: bool,
    /// Directory for bare wikilink image names, relative to the source file.
    pub attachments_dir: String,
    /// Keep a leading YAML frontmatter block.
    pub keep_frontmatter: bool,
    /// Keep a leading `# Title` heading.
    pub keep_title: bool,
    /// Insert blank lines between adjacent text lines.
    pub paragraph_spacing: bool,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            theme: DEFAULT_THEME.to_owned(),
            inline_only: false,
            sanitize: false,
            attachments_dir: DEFAULT_ATTACHMENTS_DIR.to_owned(),
            keep_frontmatter: false,
            keep_title: false,
            paragraph_spacing: true,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct OutputConfigRaw {
    dir: Option<String>,
}

/// Resolved `[output]` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputConfig {
    /// Directory HTML files are written to.
    pub dir: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
        }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Explicit config file does not exist.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`output.dir`").
        field: String,
        /// Error message (e.g., "${`VAULT`} not set").
        message: String,
    },
}

fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

impl Config {
    /// Load configuration with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file. Otherwise searches
    /// for `richpaste.toml` in the current directory and its parents, falling
    /// back to defaults. CLI settings are applied last and the result is
    /// validated.
    ///
    /// # Errors
    ///
    /// Returns error if an explicit `config_path` doesn't exist, the file
    /// fails to parse, an environment variable is missing or validation fails.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        config.validate()?;
        Ok(config)
    }

    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        let convert = &mut self.convert;
        if let Some(theme) = &settings.theme {
            convert.theme.clone_from(theme);
        }
        if let Some(inline_only) = settings.inline_only {
            convert.inline_only = inline_only;
        }
        if let Some(sanitize) = settings.sanitize {
            convert.sanitize = sanitize;
        }
        if let Some(dir) = &settings.attachments_dir {
            convert.attachments_dir.clone_from(dir);
        }
        if let Some(keep) = settings.keep_frontmatter {
            convert.keep_frontmatter = keep;
        }
        if let Some(keep) = settings.keep_title {
            convert.keep_title = keep;
        }
        if let Some(spacing) = settings.paragraph_spacing {
            convert.paragraph_spacing = spacing;
        }
        if let Some(dir) = &settings.output_dir {
            self.output_resolved.dir.clone_from(dir);
        }
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any check fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.convert.theme, "convert.theme")?;
        require_non_empty(&self.convert.attachments_dir, "convert.attachments_dir")?;
        if Path::new(&self.convert.attachments_dir).is_absolute() {
            return Err(ConfigError::Validation(
                "convert.attachments_dir must be relative to the source file".to_owned(),
            ));
        }
        if self.output_resolved.dir.as_os_str().is_empty() {
            return Err(ConfigError::Validation(
                "output.dir cannot be empty".to_owned(),
            ));
        }
        Ok(())
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let current = std::env::current_dir().ok()?;
        Self::discover_from(&current)
    }

    fn discover_from(start: &Path) -> Option<PathBuf> {
        let mut current = start.to_path_buf();
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        config.expand_paths()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        Ok(config)
    }

    fn expand_paths(&mut self) -> Result<(), ConfigError> {
        self.convert.attachments_dir =
            expand::expand_path(&self.convert.attachments_dir, "convert.attachments_dir")?;
        if let Some(ref dir) = self.output.dir {
            self.output.dir = Some(expand::expand_path(dir, "output.dir")?);
        }
        Ok(())
    }

    /// Resolve the output directory against the config file's directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        let dir = self.output.dir.as_deref().unwrap_or(DEFAULT_OUTPUT_DIR);
        self.output_resolved = OutputConfig {
            dir: config_dir.join(dir),
        };
    }
}
