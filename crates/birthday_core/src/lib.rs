//! Core domain logic for the birthday keeper data tool.
//! This crate is the single source of truth for record and avatar invariants.

pub mod assets;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use assets::images::{is_image_file_name, scan_image_files, ImageListing};
pub use assets::usage::AvatarUsage;
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::record::{parse_birthday, BirthdayRecord, RecordValidationError, BIRTHDAY_FORMAT};
pub use repo::record_file::{JsonFileRecordRepository, RecordRepository, RepoError, RepoResult};
pub use service::record_store::{
    EditOutcome, RecordField, RecordStore, StoreError, StoreResult, UnusedAssets,
};

/// Default record document path.
pub const DEFAULT_RECORDS_FILE: &str = "birthdays.json";
/// Default images directory.
pub const DEFAULT_IMAGES_DIR: &str = "images";

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
