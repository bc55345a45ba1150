// src/specs/mod.rs
//! # Scraping “specs” module
//!
//! Page-specific scraping lives here. Each spec encodes *where the ground truth
//! lives in the HTML* of one remote page and *how to extract it*.
//!
//! ## What lives here
//! - **Pure parsing** of the fetched page into typed data (`CassetteTable`).
//! - **Marker choice** for a page whose markup is matched line by line.
//!
//! ## What does **not** live here
//! - Reading or writing the local `.lut` files (`store`, `file`).
//! - Deciding which masks are new (`reconcile`).
//!
//! ## Testing notes
//! - Specs are tested **offline** against the saved page under `tests/fixtures/`.
//!   A markup change on the live page should show up as a fixture refresh plus a
//!   failing test, not as a silent empty result.
pub mod cassettes;
