// src/specs/cassettes.rs
//! Scraping *spec* for the GMOS cassette change-request page.
//!
//! Purpose:
//! - Read the **output cassettes** section of the page and build a
//!   [`CassetteTable`]: one table per cassette (`c1`, `c2`, …), each mapping
//!   barcode → mask name.
//!
//! Page shape this relies on (uppercase markup, one fragment per line):
//! ```text
//! <H2>OUTPUT CASSETTES</H2>
//! <TABLE BORDER=1>
//! <TR>
//! <TD ALIGN=CENTER>1</TD>                      <- slot number
//! <TD>GN2024AQ101-01</TD><TD>11300101</TD>     <- name, barcode
//! </TR>
//! </TABLE>
//! ...
//! END OUTPUT CASSETTES
//! ```
//!
//! Responsibilities:
//! - Line-by-line scanning with an explicit [`ScanState`] so every transition is
//!   visible in one place.
//! - Failing loudly ([`SyncError::PageFormatChanged`]) when no table is found.
//!
//! Non-Responsibilities:
//! - **No networking**. [`fetch`] is a thin wrapper over `core::net`.
//! - **No registry logic**.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, info};

use crate::core::{net, sanitize::cell_text};
use crate::error::{Result, SyncError};

const SECTION_START: &str = "OUTPUT CASSETTES";
const SECTION_END: &str = "END OUTPUT";
const TABLE_CLOSE: &str = "/TABLE";

static TABLE_OPEN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^/]TABLE").unwrap());
static SLOT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r">([0-9])<").unwrap());
static CELL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<TD>([^<]+)</TD>").unwrap());

/// Entries missing from the page that must always resolve: (location, barcode, name).
pub const OVERRIDES: &[(&str, &str, &str)] = &[
    ("c1", "42069666", "The beast"),
    ("c3", "99999999", "Que wa te paso a ti"),
];

/// Cassette location → (barcode → mask name).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CassetteTable {
    tables: BTreeMap<String, BTreeMap<String, String>>,
}

impl CassetteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Location id of the n-th table (1-based) or of an `msk.lut` location number.
    pub fn location_id(n: impl std::fmt::Display) -> String {
        format!("c{n}")
    }

    /// Create an empty table for `location` if it does not exist yet.
    pub fn open(&mut self, location: &str) {
        self.tables.entry(s!(location)).or_default();
    }

    pub fn insert(&mut self, location: &str, barcode: &str, name: &str) {
        self.tables
            .entry(s!(location))
            .or_default()
            .insert(s!(barcode), s!(name));
    }

    pub fn name_for(&self, location: &str, barcode: &str) -> Option<&str> {
        self.tables.get(location)?.get(barcode).map(String::as_str)
    }

    pub fn table(&self, location: &str) -> Option<&BTreeMap<String, String>> {
        self.tables.get(location)
    }

    /// Number of cassette tables (not masks).
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Total number of masks across all cassettes.
    pub fn mask_count(&self) -> usize {
        self.tables.values().map(BTreeMap::len).sum()
    }

    /// `(location, barcode, name)` in location then barcode order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str, &str)> {
        self.tables.iter().flat_map(|(loc, masks)| {
            masks.iter().map(move |(bc, name)| (loc.as_str(), bc.as_str(), name.as_str()))
        })
    }

    pub fn apply_overrides(&mut self) {
        for (location, barcode, name) in OVERRIDES {
            self.insert(location, barcode, name);
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScanState {
    /// Before the `OUTPUT CASSETTES` heading.
    SeekingSection,
    /// Inside the section, between tables.
    SeekingTable,
    /// Inside a table, waiting for a slot-number line.
    SeekingRow,
    /// Slot seen; waiting for the name/barcode cells.
    SeekingCells,
    /// `END OUTPUT` seen.
    Done,
}

/// Line scanner for the output cassette section.
#[derive(Debug)]
pub struct Scanner {
    state: ScanState,
    table_no: usize,
    slot: Option<u8>,
    tables_seen: usize,
    out: CassetteTable,
}

impl Default for Scanner {
    fn default() -> Self {
        Self {
            state: ScanState::SeekingSection,
            table_no: 1,
            slot: None,
            tables_seen: 0,
            out: CassetteTable::new(),
        }
    }
}

impl Scanner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> ScanState {
        self.state
    }

    pub fn is_done(&self) -> bool {
        self.state == ScanState::Done
    }

    pub fn feed(&mut self, line: &str) {
        match self.state {
            ScanState::Done => return,
            ScanState::SeekingSection => {
                if !line.contains(SECTION_START) {
                    return;
                }
                debug!("output cassette section found");
                self.state = ScanState::SeekingTable;
            }
            _ => {}
        }

        if line.contains(SECTION_END) {
            debug!("end of output cassette section");
            self.state = ScanState::Done;
            return;
        }

        if self.state == ScanState::SeekingTable {
            if !TABLE_OPEN.is_match(line) {
                return;
            }
            self.open_table();
        }

        // The opening line may carry row markup too, so it falls through.
        self.scan_table_line(line);
    }

    fn open_table(&mut self) {
        let location = CassetteTable::location_id(self.table_no);
        debug!(%location, "cassette table opened");
        self.out.open(&location);
        self.tables_seen += 1;
        self.state = ScanState::SeekingRow;
    }

    fn scan_table_line(&mut self, line: &str) {
        if line.contains(TABLE_CLOSE) {
            self.table_no += 1;
            self.slot = None;
            self.state = ScanState::SeekingTable;
            return;
        }

        match self.state {
            ScanState::SeekingRow => {
                if let Some(c) = SLOT.captures(line) {
                    self.slot = c[1].parse().ok();
                    self.state = ScanState::SeekingCells;
                }
            }
            ScanState::SeekingCells => {
                let mut cells = CELL.captures_iter(line).filter_map(|c| c.get(1));
                let (Some(name), Some(barcode)) = (cells.next(), cells.next()) else {
                    return;
                };
                self.record(&cell_text(name.as_str()), &cell_text(barcode.as_str()));
                self.state = ScanState::SeekingRow;
            }
            _ => {}
        }
    }

    fn record(&mut self, name: &str, barcode: &str) {
        let location = CassetteTable::location_id(self.table_no);
        if barcode.is_empty() {
            debug!(%location, slot = ?self.slot, "empty slot");
            return;
        }
        debug!(%location, slot = ?self.slot, barcode, name, "mask");
        self.out.insert(&location, barcode, name);
    }

    /// Finish scanning. Fails when the section held no table at all.
    pub fn finish(self) -> Result<CassetteTable> {
        if self.tables_seen == 0 {
            return Err(SyncError::PageFormatChanged);
        }
        let mut table = self.out;
        table.apply_overrides();
        Ok(table)
    }
}

/// Run the scanner over `lines` (empty lines are ignored).
pub fn extract_lines<'a, I>(lines: I) -> Result<CassetteTable>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut scanner = Scanner::new();
    for line in lines.into_iter().filter(|l| !l.is_empty()) {
        scanner.feed(line);
        if scanner.is_done() {
            break;
        }
    }
    scanner.finish()
}

/// Parse a whole page body.
pub fn parse_doc(doc: &str) -> Result<CassetteTable> {
    extract_lines(doc.lines())
}

pub fn fetch(url: &str) -> Result<CassetteTable> {
    let doc = net::http_get(url)?;
    let table = parse_doc(&doc)?;
    info!(cassettes = table.len(), masks = table.mask_count(), "cassette tables extracted");
    Ok(table)
}
