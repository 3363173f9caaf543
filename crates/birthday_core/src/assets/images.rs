//! Images directory scanning.
//!
//! # Invariants
//! - Extension matching is case-insensitive.
//! - Listing order is whatever the filesystem returns.

use log::warn;
use once_cell::sync::Lazy;
use regex::Regex;
use std::io;
use std::path::Path;

static IMAGE_NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\.(png|jpe?g|gif|bmp)$").expect("valid image name regex"));

/// Result of listing an images directory.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ImageListing {
    /// Image filenames in directory-listing order.
    pub files: Vec<String>,
    /// Set when the directory does not exist; `files` is then empty.
    pub directory_missing: bool,
}

/// Returns whether `name` carries an image-like extension.
pub fn is_image_file_name(name: &str) -> bool {
    IMAGE_NAME_RE.is_match(name)
}

/// Lists image files directly inside `dir`.
///
/// A missing directory is reported through `directory_missing` rather than an
/// error. Non-UTF-8 names and subdirectories are skipped.
///
/// # Errors
/// Returns I/O errors other than "not found" from reading the directory.
pub fn scan_image_files(dir: &Path) -> io::Result<ImageListing> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            warn!(
                "event=assets_scan module=assets status=warn reason=missing_dir dir={}",
                dir.display()
            );
            return Ok(ImageListing {
                files: Vec::new(),
                directory_missing: true,
            });
        }
        Err(err) => return Err(err),
    };

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            continue;
        }
        let Ok(name) = entry.file_name().into_string() else {
            continue;
        };
        if is_image_file_name(&name) {
            files.push(name);
        }
    }

    Ok(ImageListing {
        files,
        directory_missing: false,
    })
}

/// Returns whether `avatar` exists as a file inside `dir`.
pub fn avatar_file_exists(dir: &Path, avatar: &str) -> bool {
    !avatar.is_empty() && dir.join(avatar).is_file()
}
