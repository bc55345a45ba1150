// tests/reconcile_e2e.rs
//
// Whole runs against scratch msk.lut / masks.lut files, offline.
//
use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use masksync::SyncError;
use masksync::config::Options;
use masksync::progress::Progress;
use masksync::reconcile::{self, Outcome};
use masksync::specs::cassettes::{self, CassetteTable};
use pretty_assertions::assert_eq;
use tempfile::{TempDir, tempdir};

const PAGE: &str = include_str!("fixtures/cassette_page.html");
const KNOWN: &str = "\
GN2026BQ101-01                 11300101         0
OLDMASK                  10000001         0
";

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 14).unwrap()
}

fn workspace(installed: &str, known: &str) -> (TempDir, Options) {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("msk.lut"), installed).unwrap();
    fs::write(dir.path().join("masks.lut"), known).unwrap();
    let opts = Options::with_files_dir(dir.path());
    (dir, opts)
}

fn read(p: &Path) -> String {
    fs::read_to_string(p).unwrap()
}

fn testmask_table() -> CassetteTable {
    let mut t = CassetteTable::new();
    t.insert("c1", "12345678", "TESTMASK");
    t
}

#[derive(Default)]
struct Recorder {
    files: Vec<(String, usize)>,
    added: Vec<String>,
    skipped: Vec<String>,
    finished: bool,
}

impl Progress for Recorder {
    fn file_loaded(&mut self, name: &str, records: usize) {
        self.files.push((name.to_string(), records));
    }
    fn mask_added(&mut self, _name: &str, barcode: &str) {
        self.added.push(barcode.to_string());
    }
    fn mask_skipped(&mut self, barcode: &str, _reason: &str) {
        self.skipped.push(barcode.to_string());
    }
    fn finish(&mut self) {
        self.finished = true;
    }
}

#[test]
fn new_mask_is_appended_with_backup() {
    let (_dir, opts) = workspace("1\tslot\t12345678\n", KNOWN);
    let out = reconcile::reconcile(&opts, &testmask_table(), today(), None).unwrap();

    let Outcome::Updated(summary) = out else { panic!("expected an update") };
    assert_eq!(summary.added.len(), 1);
    assert!(summary.skipped.is_empty());

    let expected_line = format!("TESTMASK{}12345678{}0\n", " ".repeat(15), " ".repeat(9));
    assert_eq!(read(&opts.known_path()), format!("{KNOWN}{expected_line}"));

    let backup = summary.backup.unwrap();
    assert_eq!(backup, opts.files_dir.join("masks.lut.20261014"));
    assert_eq!(read(&backup), KNOWN);
}

#[test]
fn second_run_changes_nothing() {
    let (_dir, opts) = workspace("1\tslot\t12345678\n", KNOWN);
    let table = testmask_table();
    reconcile::reconcile(&opts, &table, today(), None).unwrap();
    let after_first = read(&opts.known_path());

    let out = reconcile::reconcile(&opts, &table, today(), None).unwrap();
    assert_eq!(out, Outcome::NothingToDo);
    assert_eq!(read(&opts.known_path()), after_first);
}

#[test]
fn nothing_to_do_leaves_files_alone() {
    let (dir, opts) = workspace("1\tx\t11300101\n2\tx\t10000001\n", KNOWN);
    let mut rec = Recorder::default();
    let out = reconcile::reconcile(&opts, &testmask_table(), today(), Some(&mut rec)).unwrap();

    assert_eq!(out, Outcome::NothingToDo);
    assert_eq!(read(&opts.known_path()), KNOWN);
    assert!(!dir.path().join("masks.lut.20261014").exists());
    assert_eq!(rec.files, vec![("msk.lut".to_string(), 2), ("masks.lut".to_string(), 2)]);
}

#[test]
fn fixture_page_drives_a_full_update() {
    let table = cassettes::parse_doc(PAGE).unwrap();
    let installed = "\
1\tx\t11300101
1\tx\t11300102
2\tx\t10000075
3\tx\t99999999
";
    let (_dir, opts) = workspace(installed, KNOWN);
    let mut rec = Recorder::default();
    let out = reconcile::reconcile(&opts, &table, today(), Some(&mut rec)).unwrap();

    let Outcome::Updated(summary) = out else { panic!("expected an update") };
    let added: Vec<&str> = summary.added.iter().map(|a| a.barcode.as_str()).collect();
    assert_eq!(added, vec!["10000075", "11300102", "99999999"]);
    assert_eq!(rec.added, vec!["10000075", "11300102", "99999999"]);
    assert!(rec.finished);

    let text = read(&opts.known_path());
    assert!(text.contains("0.75arcsec"));
    assert!(text.contains("GN2026BQ101-02"));
    assert!(text.contains("Que wa te paso a ti"));
    // already known, not written twice
    assert_eq!(text.matches("11300101").count(), 1);
}

#[test]
fn unresolvable_barcodes_are_skipped() {
    let installed = "\
1\tx\t12345678
1\tx\t87654321
5\tx\t55555555
";
    let (_dir, opts) = workspace(installed, KNOWN);
    let mut rec = Recorder::default();
    let out = reconcile::reconcile(&opts, &testmask_table(), today(), Some(&mut rec)).unwrap();

    let Outcome::Updated(summary) = out else { panic!("expected an update") };
    assert_eq!(summary.added.len(), 1);
    let skipped: Vec<&str> = summary.skipped.iter().map(|s| s.barcode.as_str()).collect();
    assert_eq!(skipped, vec!["55555555", "87654321"]);
    assert!(summary.skipped[0].reason.contains("c5"));
    assert_eq!(rec.skipped, vec!["55555555", "87654321"]);

    let text = read(&opts.known_path());
    assert!(text.ends_with("TESTMASK               12345678         0\n"));
    assert!(!text.contains("87654321"));
}

#[test]
fn all_skipped_means_no_backup_and_no_write() {
    let (dir, opts) = workspace("4\tx\t44444444\n", KNOWN);
    let out = reconcile::reconcile(&opts, &testmask_table(), today(), None).unwrap();

    let Outcome::Updated(summary) = out else { panic!("expected an update") };
    assert!(summary.added.is_empty());
    assert_eq!(summary.backup, None);
    assert_eq!(read(&opts.known_path()), KNOWN);
    assert!(!dir.path().join("masks.lut.20261014").exists());
}

#[test]
fn name_too_long_writes_nothing() {
    let mut table = testmask_table();
    table.insert("c1", "23456789", &"L".repeat(25));
    let (dir, opts) = workspace("1\tx\t12345678\n1\tx\t23456789\n", KNOWN);

    let err = reconcile::reconcile(&opts, &table, today(), None).unwrap_err();
    assert!(matches!(err, SyncError::NameTooLong { ref barcode, .. } if barcode == "23456789"));

    // TESTMASK was valid, but nothing from this run is committed
    assert_eq!(read(&opts.known_path()), KNOWN);
    assert!(!dir.path().join("masks.lut.20261014").exists());
}

#[test]
fn dry_run_reports_without_writing() {
    let (dir, mut opts) = workspace("1\tx\t12345678\n", KNOWN);
    opts.dry_run = true;
    let mut rec = Recorder::default();
    let out = reconcile::reconcile(&opts, &testmask_table(), today(), Some(&mut rec)).unwrap();

    let Outcome::DryRun(summary) = out else { panic!("expected a dry run") };
    assert_eq!(summary.added[0].line, "TESTMASK               12345678         0\n");
    assert_eq!(rec.added, vec!["12345678"]);
    assert_eq!(read(&opts.known_path()), KNOWN);
    assert!(!dir.path().join("masks.lut.20261014").exists());
}

#[test]
fn missing_installed_file_aborts() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("masks.lut"), KNOWN).unwrap();
    let opts = Options::with_files_dir(dir.path());

    let err = reconcile::reconcile(&opts, &testmask_table(), today(), None).unwrap_err();
    assert!(matches!(err, SyncError::MissingFile { ref name, .. } if name == "msk.lut"));
    assert_eq!(read(&opts.known_path()), KNOWN);
}

#[test]
fn missing_known_file_aborts() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("msk.lut"), "1\tx\t12345678\n").unwrap();
    let opts = Options::with_files_dir(dir.path());

    let err = reconcile::reconcile(&opts, &testmask_table(), today(), None).unwrap_err();
    assert!(matches!(err, SyncError::MissingFile { ref name, .. } if name == "masks.lut"));
    assert!(!opts.known_path().exists());
}

#[test]
fn same_day_backup_is_overwritten() {
    let (_dir, opts) = workspace("1\tx\t12345678\n", KNOWN);
    let backup = opts.files_dir.join("masks.lut.20261014");
    fs::write(&backup, "stale\n").unwrap();

    reconcile::reconcile(&opts, &testmask_table(), today(), None).unwrap();
    assert_eq!(read(&backup), KNOWN);
}

#[test]
fn full_width_name_is_written_and_recognised_next_run() {
    let name = "N".repeat(23);
    let mut table = CassetteTable::new();
    table.insert("c2", "24242424", &name);
    let (_dir, opts) = workspace("2\tx\t24242424\n", KNOWN);

    let out = reconcile::reconcile(&opts, &table, today(), None).unwrap();
    assert!(matches!(out, Outcome::Updated(ref s) if s.added.len() == 1));
    assert!(read(&opts.known_path()).ends_with(&format!("{name}24242424         0\n")));

    let out = reconcile::reconcile(&opts, &table, today(), None).unwrap();
    assert_eq!(out, Outcome::NothingToDo);
}

#[test]
fn backup_failure_aborts_before_writing() {
    let (dir, opts) = workspace("1\tx\t12345678\n", KNOWN);
    // a directory where the backup file should go makes the copy fail
    fs::create_dir(dir.path().join("masks.lut.20261014")).unwrap();

    let err = reconcile::reconcile(&opts, &testmask_table(), today(), None).unwrap_err();
    assert!(matches!(err, SyncError::Backup { .. }), "{err}");
    assert_eq!(read(&opts.known_path()), KNOWN);
}

#[test]
fn fetch_failure_touches_no_file() {
    let installed = "1\tx\t12345678\n";
    let (_dir, mut opts) = workspace(installed, KNOWN);
    opts.url = "http://127.0.0.1:1/".into();

    let err = reconcile::run(&opts, None).unwrap_err();
    assert!(matches!(err, SyncError::Fetch { ref url, .. } if url == "http://127.0.0.1:1/"), "{err}");
    assert_eq!(read(&opts.installed_path()), installed);
    assert_eq!(read(&opts.known_path()), KNOWN);
}
