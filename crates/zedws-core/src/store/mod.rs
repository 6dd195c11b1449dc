//! Workspace records read from Zed's metadata store.

mod discovery;
mod reader;

pub use discovery::{find_in_db_dir, locate_store, zed_db_dir};
pub use reader::{LoadReport, WorkspaceStore};

use crate::Result;
use crate::location::{Location, NormalizeOptions, normalize_with};
use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// One discovered workspace
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkspaceRecord {
    /// Location exactly as Zed stored it
    pub raw_location: String,

    /// Derived from `raw_location`, never stored
    pub location: Location,

    pub last_accessed: Option<DateTime<Utc>>,

    /// Zed's `workspace_id`, when the table has one
    pub workspace_id: Option<i64>,
}

impl WorkspaceRecord {
    /// Normalize `raw_location` and build a record.
    ///
    /// # Errors
    ///
    /// Returns `MalformedLocation` when the location has no recognized shape.
    pub fn from_raw(
        raw_location: &str,
        last_accessed: Option<DateTime<Utc>>,
        workspace_id: Option<i64>,
        options: NormalizeOptions,
    ) -> Result<Self> {
        Ok(Self {
            location: normalize_with(raw_location, options)?,
            raw_location: raw_location.to_string(),
            last_accessed,
            workspace_id,
        })
    }

    #[must_use]
    pub fn normalized_path(&self) -> &str {
        &self.location.normalized_path
    }

    #[must_use]
    pub fn display_path(&self) -> &str {
        &self.location.display_path
    }

    #[must_use]
    pub fn leaf(&self) -> &str {
        &self.location.leaf
    }

    #[must_use]
    pub fn is_wsl(&self) -> bool {
        self.location.is_wsl
    }

    #[must_use]
    pub fn distro_name(&self) -> Option<&str> {
        self.location.distro.as_deref()
    }

    /// Whether `self` should replace `other` when both share a normalized path:
    /// newer access wins, then the shorter raw location, otherwise the earlier row stays.
    fn supersedes(&self, other: &Self) -> bool {
        match (self.last_accessed, other.last_accessed) {
            (Some(a), Some(b)) if a != b => a > b,
            (Some(_), None) => true,
            (None, Some(_)) => false,
            _ => self.raw_location.len() < other.raw_location.len(),
        }
    }
}

/// Collapse records sharing a normalized path.
///
/// Keeps the position of the first occurrence. Returns the surviving records
/// and the number dropped.
#[must_use]
pub fn dedup_records(records: Vec<WorkspaceRecord>) -> (Vec<WorkspaceRecord>, usize) {
    let mut kept: Vec<WorkspaceRecord> = Vec::with_capacity(records.len());
    let mut positions: HashMap<String, usize> = HashMap::with_capacity(records.len());
    let mut dropped = 0;

    for record in records {
        match positions.get(record.normalized_path()) {
            Some(&idx) => {
                dropped += 1;
                if record.supersedes(&kept[idx]) {
                    kept[idx] = record;
                }
            }
            None => {
                positions.insert(record.normalized_path().to_string(), kept.len());
                kept.push(record);
            }
        }
    }

    (kept, dropped)
}
