// src/config/options.rs
use std::path::PathBuf;
use super::consts::*;

/// Everything a reconcile run needs to know about where to look.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Options {
    /// Status page holding the output cassette tables.
    pub url: String,
    /// Directory containing `msk.lut` and `masks.lut`.
    pub files_dir: PathBuf,
    /// Format and report additions without backing up or appending.
    pub dry_run: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            url: s!(STATUS_URL),
            files_dir: PathBuf::from(DEFAULT_FILES_DIR),
            dry_run: false,
        }
    }
}

impl Options {
    pub fn with_files_dir(dir: impl Into<PathBuf>) -> Self {
        Self { files_dir: dir.into(), ..Self::default() }
    }

    pub fn installed_path(&self) -> PathBuf {
        self.files_dir.join(INSTALLED_FILE)
    }

    pub fn known_path(&self) -> PathBuf {
        self.files_dir.join(KNOWN_FILE)
    }
}
