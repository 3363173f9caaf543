//! Birthday record store.
//!
//! # Responsibility
//! - Own the ordered record list and the derived avatar usage.
//! - Provide add/edit/delete/list entry points that keep both consistent.
//! - Load from and save to a record repository.
//!
//! # Invariants
//! - `usage` always equals the reference counts of non-empty avatars in
//!   `records`.
//! - A failed operation leaves records, usage and the dirty flag untouched.
//! - Indices are positions in storage order; deleting shifts later records
//!   down by one.

use crate::assets::images::{avatar_file_exists, scan_image_files};
use crate::assets::usage::AvatarUsage;
use crate::model::record::{
    normalize_birthday, normalize_name, BirthdayRecord, RecordValidationError,
};
use crate::repo::record_file::{JsonFileRecordRepository, RecordRepository, RepoError};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io;
use std::path::{Path, PathBuf};

pub type StoreResult<T> = Result<T, StoreError>;

/// Error surface of record store operations.
#[derive(Debug)]
pub enum StoreError {
    /// Rejected input; nothing changed.
    Validation(RecordValidationError),
    /// Selection index outside `0..len`.
    IndexOutOfRange { index: usize, len: usize },
    /// Document load/save failure.
    Repo(RepoError),
    /// Images directory could not be read.
    Io { path: PathBuf, source: io::Error },
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::IndexOutOfRange { index, len } => {
                write!(f, "record index {index} out of range (have {len})")
            }
            Self::Repo(err) => write!(f, "{err}"),
            Self::Io { path, source } => {
                write!(f, "failed to read `{}`: {source}", path.display())
            }
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::IndexOutOfRange { .. } => None,
            Self::Repo(err) => Some(err),
            Self::Io { source, .. } => Some(source),
        }
    }
}

impl From<RecordValidationError> for StoreError {
    fn from(value: RecordValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for StoreError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Field assignment accepted by [`RecordStore::edit_field`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordField {
    /// Empty input keeps the current name.
    Name(String),
    /// Empty input keeps the current birthday.
    Birthday(String),
    IsLunar(bool),
    /// Empty input clears the avatar.
    Avatar(String),
}

/// Whether an edit changed the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOutcome {
    Updated,
    Unchanged,
}

/// Image files in the images directory not referenced by any record.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UnusedAssets {
    /// Filenames in directory-listing order.
    pub files: Vec<String>,
    /// Advisory flag: the images directory does not exist.
    pub directory_missing: bool,
}

/// In-memory birthday records plus avatar usage.
#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    records: Vec<BirthdayRecord>,
    usage: AvatarUsage,
    dirty: bool,
}

impl RecordStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store from existing records, deriving avatar usage.
    pub fn from_records(records: Vec<BirthdayRecord>) -> Self {
        let usage = AvatarUsage::from_records(&records);
        Self {
            records,
            usage,
            dirty: false,
        }
    }

    /// Loads the JSON document at `path`; a missing file yields an empty store.
    ///
    /// # Errors
    /// - `Repo(Parse)` when the file is not an array of record objects.
    /// - `Repo(Io)` when the file exists but cannot be read.
    pub fn load(path: impl AsRef<Path>) -> StoreResult<Self> {
        Self::load_from(&JsonFileRecordRepository::new(path.as_ref()))
    }

    /// Loads records through an arbitrary repository.
    ///
    /// Stored birthdays that do not parse are kept verbatim and logged.
    pub fn load_from(repo: &impl RecordRepository) -> StoreResult<Self> {
        let records = repo.load_records()?;
        for (index, record) in records.iter().enumerate() {
            if record.validate().is_err() {
                warn!(
                    "event=store_load module=store status=warn reason=invalid_record index={}",
                    index
                );
            }
        }
        Ok(Self::from_records(records))
    }

    /// Rewrites the JSON document at `path` with all records.
    ///
    /// # Errors
    /// Returns `Repo(Io)` when the write fails; the store is unchanged.
    pub fn save(&mut self, path: impl AsRef<Path>) -> StoreResult<()> {
        self.save_to(&JsonFileRecordRepository::new(path.as_ref()))
    }

    /// Persists records through an arbitrary repository.
    pub fn save_to(&mut self, repo: &impl RecordRepository) -> StoreResult<()> {
        repo.save_records(&self.records)?;
        self.dirty = false;
        Ok(())
    }

    /// Lists images in `images_dir` that no record references.
    ///
    /// A missing directory is advisory: the result is empty with
    /// `directory_missing` set.
    pub fn list_unused_assets(&self, images_dir: impl AsRef<Path>) -> StoreResult<UnusedAssets> {
        let images_dir = images_dir.as_ref();
        let listing = scan_image_files(images_dir).map_err(|source| StoreError::Io {
            path: images_dir.to_path_buf(),
            source,
        })?;

        let files: Vec<String> = listing
            .files
            .into_iter()
            .filter(|name| !self.usage.contains(name))
            .collect();
        info!(
            "event=assets_scan module=store status=ok unused={} used={}",
            files.len(),
            self.usage.len()
        );

        Ok(UnusedAssets {
            files,
            directory_missing: listing.directory_missing,
        })
    }

    /// Appends a validated record and returns a copy of it.
    ///
    /// The avatar does not need to exist on disk.
    pub fn add_record(
        &mut self,
        name: &str,
        birthday: &str,
        is_lunar: bool,
        avatar: &str,
    ) -> StoreResult<BirthdayRecord> {
        let record = BirthdayRecord::new(name, birthday, is_lunar, avatar)?;
        self.usage.acquire(&record.avatar);
        self.records.push(record.clone());
        self.dirty = true;

        info!(
            "event=record_add module=store status=ok index={} avatar={}",
            self.records.len() - 1,
            record.avatar
        );
        Ok(record)
    }

    /// Removes and returns the record at `index`.
    ///
    /// The avatar stops counting as used only when no remaining record
    /// references it.
    pub fn delete_record(&mut self, index: usize) -> StoreResult<BirthdayRecord> {
        self.check_index(index)?;
        let removed = self.records.remove(index);
        let released = self.usage.release(&removed.avatar);
        self.dirty = true;

        info!(
            "event=record_delete module=store status=ok index={} avatar_released={}",
            index, released
        );
        Ok(removed)
    }

    /// Assigns one field of the record at `index`.
    ///
    /// # Errors
    /// - `IndexOutOfRange` before any other check.
    /// - `Validation` for an unparseable birthday; the record is unchanged.
    pub fn edit_field(&mut self, index: usize, field: RecordField) -> StoreResult<EditOutcome> {
        self.check_index(index)?;
        let record = &mut self.records[index];

        let outcome = match field {
            RecordField::Name(value) => {
                if value.trim().is_empty() {
                    EditOutcome::Unchanged
                } else {
                    let name = normalize_name(&value)?;
                    replace_if_changed(&mut record.name, name)
                }
            }
            RecordField::Birthday(value) => {
                if value.trim().is_empty() {
                    EditOutcome::Unchanged
                } else {
                    let birthday = normalize_birthday(&value)?;
                    replace_if_changed(&mut record.birthday, birthday)
                }
            }
            RecordField::IsLunar(value) => replace_if_changed(&mut record.is_lunar, value),
            RecordField::Avatar(value) => {
                let avatar = value.trim().to_string();
                if avatar == record.avatar {
                    EditOutcome::Unchanged
                } else {
                    self.usage.release(&record.avatar);
                    self.usage.acquire(&avatar);
                    record.avatar = avatar;
                    EditOutcome::Updated
                }
            }
        };

        if outcome == EditOutcome::Updated {
            self.dirty = true;
        }
        info!(
            "event=record_edit module=store status=ok index={} updated={}",
            index,
            outcome == EditOutcome::Updated
        );
        Ok(outcome)
    }

    /// Removes every record, as when the document is rewritten from scratch.
    pub fn clear(&mut self) {
        if !self.records.is_empty() {
            self.dirty = true;
        }
        self.records.clear();
        self.usage.clear();
    }

    /// Records in storage order.
    pub fn records(&self) -> &[BirthdayRecord] {
        &self.records
    }

    pub fn get(&self, index: usize) -> Option<&BirthdayRecord> {
        self.records.get(index)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Avatar filenames referenced by at least one record, sorted.
    pub fn used_avatars(&self) -> impl Iterator<Item = &str> {
        self.usage.names()
    }

    /// Reference counts backing [`Self::used_avatars`].
    pub fn avatar_usage(&self) -> &AvatarUsage {
        &self.usage
    }

    /// Whether records changed since the last load or save.
    pub fn has_unsaved_changes(&self) -> bool {
        self.dirty
    }

    /// Advisory check that `avatar` is present in `images_dir`.
    pub fn avatar_file_exists(images_dir: impl AsRef<Path>, avatar: &str) -> bool {
        avatar_file_exists(images_dir.as_ref(), avatar)
    }

    fn check_index(&self, index: usize) -> StoreResult<()> {
        if index >= self.records.len() {
            return Err(StoreError::IndexOutOfRange {
                index,
                len: self.records.len(),
            });
        }
        Ok(())
    }
}

fn replace_if_changed<T: PartialEq>(slot: &mut T, value: T) -> EditOutcome {
    if *slot == value {
        return EditOutcome::Unchanged;
    }
    *slot = value;
    EditOutcome::Updated
}
