// src/lut.rs
//! Fixed-width line format of `masks.lut`.
//!
//! ```text
//! TESTMASK               12345678         0
//! |<------------ 31 ----------->||<-- 9 >|
//! ```
//! Name and barcode share a 31-character field, padded in between with spaces;
//! a 9-space gap and the status flag `0` follow.

use crate::config::consts::KNOWN_FILE;
use crate::error::{Result, SyncError};

/// Width shared by the name, its padding and the barcode.
pub const NAME_BARCODE_WIDTH: usize = 31;
/// Barcode width the registry was laid out for.
pub const BARCODE_LEN: usize = 8;
/// Spaces between the barcode and the status flag.
pub const STATUS_GAP: usize = 9;
pub const STATUS_FLAG: char = '0';
/// Longest name that fits beside a nominal barcode (the gap is then empty).
pub const MAX_NAME_LEN: usize = NAME_BARCODE_WIDTH - BARCODE_LEN;
/// Length of every formatted line, newline included.
pub const LINE_LEN: usize = NAME_BARCODE_WIDTH + STATUS_GAP + 1 + 1;

/// Longest name that fits beside `barcode`.
pub fn max_name_len(barcode: &str) -> usize {
    NAME_BARCODE_WIDTH.saturating_sub(barcode.chars().count())
}

/// Format one registry line, newline included.
pub fn format_line(name: &str, barcode: &str) -> Result<String> {
    let len = name.chars().count();
    let max = max_name_len(barcode);
    if len > max {
        return Err(SyncError::NameTooLong {
            name: s!(name),
            barcode: s!(barcode),
            file: s!(KNOWN_FILE),
            len,
            max,
        });
    }
    let name_w = NAME_BARCODE_WIDTH.saturating_sub(barcode.chars().count());
    Ok(format!(
        "{name:<name_w$}{barcode}{gap:STATUS_GAP$}{STATUS_FLAG}\n",
        gap = ""
    ))
}

/// Barcode of a line written with an empty gap, where the name runs straight
/// into the barcode and no word boundary separates them.
///
/// Only the nominal [`BARCODE_LEN`] is recognised: a glued name that ends in
/// digits cannot be told apart from a longer barcode.
pub fn glued_barcode(line: &str) -> Option<&str> {
    let line = line.trim_end_matches(['\r', '\n']);
    let at = |n: usize| {
        line.char_indices()
            .map(|(i, _)| i)
            .chain(std::iter::once(line.len()))
            .nth(n)
    };
    let start = at(NAME_BARCODE_WIDTH - BARCODE_LEN)?;
    let end = at(NAME_BARCODE_WIDTH)?;
    let (field, tail) = (&line[start..end], &line[end..]);

    let trailer = format!("{:STATUS_GAP$}{STATUS_FLAG}", "");
    let digits = field.bytes().all(|b| b.is_ascii_digit());
    (digits && tail.trim_end() == trailer).then_some(field)
}
