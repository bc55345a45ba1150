// src/progress.rs
/// Progress reporting for a reconcile run.
/// Frontends implement this to surface status to users; every method is optional.
pub trait Progress {
    /// A lookup file was read; `records` is the number of barcodes it yielded.
    fn file_loaded(&mut self, _name: &str, _records: usize) {}

    /// Free-form status line for human eyes.
    fn log(&mut self, _msg: &str) {}

    /// A registry line for this mask was written (or, in a dry run, would be).
    fn mask_added(&mut self, _name: &str, _barcode: &str) {}

    /// An unknown barcode could not be resolved to a name and was left out.
    fn mask_skipped(&mut self, _barcode: &str, _reason: &str) {}

    /// Called at the end of a run that got as far as the diff.
    fn finish(&mut self) {}
}

/// A no-op progress sink.
pub struct NullProgress;
impl Progress for NullProgress {}
