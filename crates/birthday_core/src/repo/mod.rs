//! Repository layer for persisted birthday records.
//!
//! # Responsibility
//! - Define the load/save contract for the record document.
//! - Isolate file and JSON details from the record store service.
//!
//! # Invariants
//! - The document is always read and written whole.
//! - A missing document reads as an empty record list.

pub mod record_file;
