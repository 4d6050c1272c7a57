//! File-name context
//!
//! Remembers where a decoded name came from so that the encoded attributes
//! can be written back as a path with the same directory and extension.

use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileContext {
    original: Option<PathBuf>,
    dir: PathBuf,
    suffix: String,
}

impl FileContext {
    /// Split `path` into context and the stem to decode.
    pub fn from_path(path: impl AsRef<Path>) -> (Self, String) {
        let path = path.as_ref();
        let dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let suffix = path
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy()))
            .unwrap_or_default();
        let context = FileContext {
            original: Some(path.to_path_buf()),
            dir,
            suffix,
        };
        (context, stem)
    }

    pub fn original(&self) -> Option<&Path> {
        self.original.as_deref()
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn set_dir(&mut self, dir: impl Into<PathBuf>) {
        self.dir = dir.into();
    }

    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    /// Set the extension; a leading `.` is optional.
    pub fn set_suffix(&mut self, suffix: &str) {
        self.suffix = if suffix.is_empty() || suffix.starts_with('.') {
            suffix.to_string()
        } else {
            format!(".{suffix}")
        };
    }

    /// The path for an encoded name.
    pub fn path(&self, encoded: &str) -> PathBuf {
        self.dir.join(format!("{encoded}{}", self.suffix))
    }
}
