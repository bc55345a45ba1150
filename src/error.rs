// src/error.rs
use std::{io, path::PathBuf};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SyncError {
    #[error("failed to fetch {url}: {reason}")]
    Fetch { url: String, reason: String },

    #[error("no cassette tables found in the output cassette section; the page format may have changed")]
    PageFormatChanged,

    #[error("file {name} doesn't exist ({})", path.display())]
    MissingFile { name: String, path: PathBuf },

    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("the name `{name}` (barcode {barcode}) is too long to be written in {file}: {len} chars, at most {max} fit")]
    NameTooLong {
        name: String,
        barcode: String,
        file: String,
        len: usize,
        max: usize,
    },

    #[error("there was an error copying {} to {}: {source}", from.display(), to.display())]
    Backup {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to append to {}: {source}", path.display())]
    Append {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

pub type Result<T> = std::result::Result<T, SyncError>;
