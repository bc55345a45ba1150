// src/store.rs
//! Readers for the two local lookup files.
//!
//! - `msk.lut`: installed masks, tab-delimited `location \t <unused> \t barcode`.
//! - `masks.lut`: every mask ever registered; any 8+ digit run on a line is a barcode.

use std::{
    collections::{BTreeMap, BTreeSet},
    fs, io,
    path::Path,
    sync::LazyLock,
};

use regex::Regex;
use tracing::warn;

use crate::error::{Result, SyncError};
use crate::lut;

static BARCODE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b[0-9]{8,}\b").unwrap());

/// Installed barcode → location number (as written in `msk.lut`, e.g. `"1"`).
pub type InstalledIndex = BTreeMap<String, String>;

/// Barcodes already present in `masks.lut`.
pub type KnownSet = BTreeSet<String>;

/// Read a lookup file, turning "not found" into [`SyncError::MissingFile`].
pub fn read_lut(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => SyncError::MissingFile {
            name: path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string()),
            path: path.to_path_buf(),
        },
        _ => SyncError::Read { path: path.to_path_buf(), source: e },
    })
}

pub fn parse_installed(text: &str) -> InstalledIndex {
    let mut out = InstalledIndex::new();
    for (no, line) in text.lines().enumerate() {
        if line.trim().is_empty() { continue; }
        let fields: Vec<&str> = line.split('\t').collect();
        let (Some(location), Some(barcode)) = (fields.first(), fields.get(2)) else {
            warn!(line = no + 1, "msk.lut: fewer than 3 fields, skipped");
            continue;
        };
        let barcode = barcode.trim();
        if barcode.is_empty() {
            warn!(line = no + 1, "msk.lut: empty barcode, skipped");
            continue;
        }
        out.insert(s!(barcode), s!(location.trim()));
    }
    out
}

/// First barcode-looking run on a line, if any.
/// Falls back to the fixed columns for lines whose name touches the barcode.
pub fn find_barcode(line: &str) -> Option<&str> {
    BARCODE
        .find(line)
        .map(|m| m.as_str())
        .or_else(|| lut::glued_barcode(line))
}

pub fn parse_known(text: &str) -> KnownSet {
    text.lines().filter_map(find_barcode).map(String::from).collect()
}

pub fn load_installed(path: &Path) -> Result<InstalledIndex> {
    Ok(parse_installed(&read_lut(path)?))
}

pub fn load_known(path: &Path) -> Result<KnownSet> {
    Ok(parse_known(&read_lut(path)?))
}

/// Installed barcodes not yet registered, in ascending order.
pub fn unknown_masks(installed: &InstalledIndex, known: &KnownSet) -> Vec<String> {
    installed
        .keys()
        .filter(|bc| !known.contains(*bc))
        .cloned()
        .collect()
}
