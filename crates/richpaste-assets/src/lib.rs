//! Local image inlining.
//!
//! Pasted HTML cannot reference files on the author's disk, so every local
//! `<img src>` is replaced with a base64 `data:` URI. Remote (`http://`,
//! `https://`) and already-inlined (`data:`) images are left alone, as is any
//! image that cannot be read: a broken reference is better than a failed
//! conversion.
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use richpaste_assets::AssetInliner;
//!
//! let mut inliner = AssetInliner::new(Path::new("notes"));
//! let html = inliner.inline(r#"<img src="attachments/cat.png" alt="cat">"#);
//! println!("{} image(s) inlined", inliner.inlined());
//! ```

mod entities;
mod mime;

use std::borrow::Cow;
use std::fmt::Write;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use base64::Engine;
use base64::prelude::BASE64_STANDARD;
use percent_encoding::percent_decode_str;
use regex::{Captures, Regex};

pub use mime::mime_for;

static IMG_TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?is)<img\b[^>]*>").unwrap());

/// `src` attribute inside an `<img>` tag, either quote style.
static SRC_ATTR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)(\ssrc\s*=\s*)(?:"([^"]*)"|'([^']*)')"#).unwrap()
});

/// Classification of an `<img src>` value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ImageReference {
    /// File on disk, resolved against the document directory.
    Local,
    /// `http://`, `https://` or `data:` URI; never touched.
    Remote,
}

impl ImageReference {
    #[must_use]
    pub fn classify(src: &str) -> Self {
        let lower = src.trim_start().to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") || lower.starts_with("data:")
        {
            Self::Remote
        } else {
            Self::Local
        }
    }
}

/// Replaces local image references with `data:` URIs.
#[derive(Debug)]
pub struct AssetInliner {
    base_dir: PathBuf,
    attachments_dir: Option<PathBuf>,
    inlined: usize,
    warnings: Vec<String>,
}

impl AssetInliner {
    /// Create an inliner resolving relative paths against `base_dir`
    /// (normally the directory of the source document).
    #[must_use]
    pub fn new(base_dir: &Path) -> Self {
        Self {
            base_dir: base_dir.to_path_buf(),
            attachments_dir: None,
            inlined: 0,
            warnings: Vec::new(),
        }
    }

    /// Also look for bare filenames in `base_dir/<dir>` when the direct path
    /// does not exist.
    #[must_use]
    pub fn with_attachments_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.attachments_dir = Some(dir.into());
        self
    }

    /// Number of images inlined so far.
    #[must_use]
    pub fn inlined(&self) -> usize {
        self.inlined
    }

    /// Images that could not be inlined.
    #[must_use]
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Inline every local image in `html`.
    pub fn inline(&mut self, html: &str) -> String {
        let before = self.inlined;
        let result = IMG_TAG_RE.replace_all(html, |caps: &Captures| {
            self.inline_tag(&caps[0]).into_owned()
        });

        let count = self.inlined - before;
        if count > 0 {
            tracing::info!(count, "Inlined local images");
        }
        result.into_owned()
    }

    fn inline_tag<'t>(&mut self, tag: &'t str) -> Cow<'t, str> {
        let Some(caps) = SRC_ATTR_RE.captures(tag) else {
            return Cow::Borrowed(tag);
        };
        let Some(value) = caps.get(2).or_else(|| caps.get(3)) else {
            return Cow::Borrowed(tag);
        };
        let src = value.as_str();
        if ImageReference::classify(src) == ImageReference::Remote || src.trim().is_empty() {
            return Cow::Borrowed(tag);
        }

        let Some(data_uri) = self.data_uri(src) else {
            return Cow::Borrowed(tag);
        };

        let Some(attr) = caps.get(0) else {
            return Cow::Borrowed(tag);
        };
        let mut out = String::with_capacity(tag.len() + data_uri.len());
        out.push_str(&tag[..attr.start()]);
        write!(out, r#"{}"{data_uri}""#, &caps[1]).unwrap();
        out.push_str(&tag[attr.end()..]);
        Cow::Owned(out)
    }

    /// Read the referenced file and encode it. `None` when it can't be read.
    fn data_uri(&mut self, src: &str) -> Option<String> {
        let Some(path) = self.resolve(src) else {
            tracing::warn!(src, base_dir = %self.base_dir.display(), "Image file not found");
            self.warnings.push(format!("image not found: {src}"));
            return None;
        };

        match std::fs::read(&path) {
            Ok(bytes) => {
                self.inlined += 1;
                tracing::info!(src, count = self.inlined, "Inlined image");
                let mime = mime_for(&path);
                Some(format!("data:{mime};base64,{}", BASE64_STANDARD.encode(bytes)))
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to read image");
                self.warnings.push(format!("failed to read image {src}: {e}"));
                None
            }
        }
    }

    /// Map a `src` value to an existing file.
    fn resolve(&self, src: &str) -> Option<PathBuf> {
        let decoded = decode_src(src);
        let path = Path::new(&*decoded);
        let direct = if decoded.starts_with('/') || path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        };
        if direct.is_file() {
            return Some(direct);
        }

        let is_bare_name = !decoded.contains(['/', '\\']);
        if is_bare_name && let Some(dir) = &self.attachments_dir {
            let fallback = self.base_dir.join(dir).join(&*decoded);
            if fallback.is_file() {
                return Some(fallback);
            }
        }
        None
    }
}

/// Undo HTML attribute escaping and URL percent-encoding.
fn decode_src(src: &str) -> Cow<'_, str> {
    let unescaped = entities::decode(src.trim());
    let decoded = match percent_decode_str(&unescaped).decode_utf8() {
        Ok(Cow::Owned(decoded)) => Some(decoded),
        Ok(Cow::Borrowed(_)) | Err(_) => None,
    };
    match decoded {
        Some(decoded) => Cow::Owned(decoded),
        None => unescaped,
    }
}

/// Inline all local images in `html`, resolving relative paths against
/// `base_dir`.
#[must_use]
pub fn inline_local_images(html: &str, base_dir: &Path) -> String {
    AssetInliner::new(base_dir).inline(html)
}
