//! Avatar image bookkeeping.
//!
//! # Responsibility
//! - Track which avatar filenames are referenced by records.
//! - Read the images directory listing.
//!
//! # Invariants
//! - Usage is derived from records and never persisted.
//! - The images directory is only read, never written.

pub mod images;
pub mod usage;
