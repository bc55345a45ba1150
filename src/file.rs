// src/file.rs

use std::{
    ffi::OsString,
    fs::{self, OpenOptions},
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
};

use chrono::NaiveDate;

use crate::config::consts::BACKUP_DATE_FMT;
use crate::error::{Result, SyncError};

/// `<path>.<YYYYMMDD>`
pub fn backup_path(path: &Path, date: NaiveDate) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".");
    name.push(date.format(BACKUP_DATE_FMT).to_string());
    PathBuf::from(name)
}

/// Copy `path` to its dated backup, overwriting one taken earlier the same day.
pub fn backup_file(path: &Path, date: NaiveDate) -> Result<PathBuf> {
    let to = backup_path(path, date);
    fs::copy(path, &to).map_err(|source| SyncError::Backup {
        from: path.to_path_buf(),
        to: to.clone(),
        source,
    })?;
    Ok(to)
}

/// Append preformatted lines to an existing file.
/// `on_written` runs after each line is handed to the writer.
pub fn append_lines<'a, I, F>(path: &Path, lines: I, mut on_written: F) -> Result<()>
where
    I: IntoIterator<Item = &'a str>,
    F: FnMut(usize),
{
    let append_err = |source: io::Error| SyncError::Append { path: path.to_path_buf(), source };

    let file = OpenOptions::new().append(true).open(path).map_err(append_err)?;
    let mut out = BufWriter::new(file);
    for (i, line) in lines.into_iter().enumerate() {
        out.write_all(line.as_bytes()).map_err(append_err)?;
        on_written(i);
    }
    out.flush().map_err(append_err)?;
    Ok(())
}
