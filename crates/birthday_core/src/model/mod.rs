//! Domain model for birthday records.
//!
//! # Responsibility
//! - Define the canonical record shape persisted in the JSON document.
//! - Own date parsing and input validation rules.
//!
//! # Invariants
//! - Records created through validated constructors always carry a
//!   non-empty name and a `YYYY-MM-DD` birthday.
//! - An empty `avatar` means "no avatar".

pub mod record;
