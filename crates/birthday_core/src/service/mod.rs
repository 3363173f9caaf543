//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate model validation, avatar bookkeeping and persistence.
//! - Keep the interactive front end free of invariant enforcement.

pub mod record_store;
