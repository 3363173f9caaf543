//! Record repository contract and JSON file implementation.
//!
//! # Responsibility
//! - Read the JSON array document into records.
//! - Rewrite the whole document from records.
//!
//! # Invariants
//! - Malformed documents are rejected, never repaired.
//! - Output is pretty-printed UTF-8 with non-ASCII text kept verbatim.
//! - Writes are not atomic; an interrupted write can leave a truncated file.

use crate::model::record::BirthdayRecord;
use log::{error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io;
use std::path::PathBuf;
use std::time::Instant;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for the record document.
#[derive(Debug)]
pub enum RepoError {
    /// Filesystem read/write failure.
    Io { path: PathBuf, source: io::Error },
    /// Document exists but is not an array of record objects.
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to access `{}`: {source}", path.display())
            }
            Self::Parse { path, source } => {
                write!(f, "invalid birthday document `{}`: {source}", path.display())
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse { source, .. } => Some(source),
        }
    }
}

/// Repository interface for whole-document record persistence.
pub trait RecordRepository {
    /// Reads all records in stored order.
    fn load_records(&self) -> RepoResult<Vec<BirthdayRecord>>;
    /// Replaces the stored document with `records`.
    fn save_records(&self, records: &[BirthdayRecord]) -> RepoResult<()>;
}

/// Record repository backed by a single JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileRecordRepository {
    path: PathBuf,
}

impl JsonFileRecordRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl RecordRepository for JsonFileRecordRepository {
    fn load_records(&self) -> RepoResult<Vec<BirthdayRecord>> {
        let started_at = Instant::now();

        let text = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                info!(
                    "event=store_load module=repo status=ok source=missing_file count=0 duration_ms={}",
                    started_at.elapsed().as_millis()
                );
                return Ok(Vec::new());
            }
            Err(err) => {
                error!(
                    "event=store_load module=repo status=error error_code=read_failed path={} error={}",
                    self.path.display(),
                    err
                );
                return Err(RepoError::Io {
                    path: self.path.clone(),
                    source: err,
                });
            }
        };

        let records = decode_records(&text).map_err(|err| {
            error!(
                "event=store_load module=repo status=error error_code=parse_failed path={} error={}",
                self.path.display(),
                err
            );
            RepoError::Parse {
                path: self.path.clone(),
                source: err,
            }
        })?;

        info!(
            "event=store_load module=repo status=ok source=file count={} duration_ms={}",
            records.len(),
            started_at.elapsed().as_millis()
        );
        Ok(records)
    }

    fn save_records(&self, records: &[BirthdayRecord]) -> RepoResult<()> {
        let started_at = Instant::now();
        let text = encode_records(records).map_err(|err| RepoError::Parse {
            path: self.path.clone(),
            source: err,
        })?;

        if let Err(err) = std::fs::write(&self.path, text) {
            error!(
                "event=store_save module=repo status=error error_code=write_failed path={} error={}",
                self.path.display(),
                err
            );
            return Err(RepoError::Io {
                path: self.path.clone(),
                source: err,
            });
        }

        info!(
            "event=store_save module=repo status=ok count={} duration_ms={}",
            records.len(),
            started_at.elapsed().as_millis()
        );
        Ok(())
    }
}

/// Decodes a JSON array document into records.
pub fn decode_records(text: &str) -> Result<Vec<BirthdayRecord>, serde_json::Error> {
    serde_json::from_str(text)
}

/// Encodes records as a pretty-printed JSON array with a trailing newline.
pub fn encode_records(records: &[BirthdayRecord]) -> Result<String, serde_json::Error> {
    let mut text = serde_json::to_string_pretty(records)?;
    text.push('\n');
    Ok(text)
}
