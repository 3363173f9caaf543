//! Reference-counted avatar usage.
//!
//! # Invariants
//! - Every tracked filename has a count >= 1.
//! - Empty filenames are never tracked.

use crate::model::record::BirthdayRecord;
use std::collections::BTreeMap;

/// Maps avatar filename to the number of records referencing it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AvatarUsage {
    counts: BTreeMap<String, usize>,
}

impl AvatarUsage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds usage from a full record list.
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a BirthdayRecord>) -> Self {
        let mut usage = Self::new();
        for record in records {
            usage.acquire(&record.avatar);
        }
        usage
    }

    /// Adds one reference. Empty names are ignored.
    pub fn acquire(&mut self, avatar: &str) {
        if avatar.is_empty() {
            return;
        }
        *self.counts.entry(avatar.to_string()).or_insert(0) += 1;
    }

    /// Drops one reference, forgetting the filename at zero.
    ///
    /// Returns `true` when the filename is no longer in use.
    pub fn release(&mut self, avatar: &str) -> bool {
        let Some(count) = self.counts.get_mut(avatar) else {
            return false;
        };
        *count -= 1;
        if *count == 0 {
            self.counts.remove(avatar);
            return true;
        }
        false
    }

    pub fn contains(&self, avatar: &str) -> bool {
        self.counts.contains_key(avatar)
    }

    /// Number of records referencing `avatar`.
    pub fn count(&self, avatar: &str) -> usize {
        self.counts.get(avatar).copied().unwrap_or(0)
    }

    /// In-use filenames in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.counts.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn clear(&mut self) {
        self.counts.clear();
    }
}
