use super::{WorkspaceRecord, dedup_records};
use crate::location::NormalizeOptions;
use crate::{Error, Result};
use chrono::{DateTime, NaiveDateTime, Utc};
use rusqlite::types::ValueRef;
use rusqlite::{Connection, OpenFlags, Row};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, warn};

const WORKSPACES_TABLE: &str = "workspaces";

/// Candidate location columns, newest Zed schema first
const LOCATION_COLUMNS: &[&str] = &["paths", "local_paths", "location"];

const TIMESTAMP_COLUMNS: &[&str] = &["timestamp", "last_accessed"];

const ID_COLUMN: &str = "workspace_id";

/// Integer timestamps above this are milliseconds, not seconds
const MILLIS_THRESHOLD: i64 = 100_000_000_000;

/// Result of one read of the store
#[derive(Debug, Clone, Default)]
pub struct LoadReport {
    /// Deduplicated records, sorted by leaf name
    pub records: Vec<WorkspaceRecord>,

    /// Rows returned by the extraction query
    pub rows: usize,

    /// Rows skipped because their location was unreadable or unrecognized
    pub malformed: usize,

    /// Rows folded into another row with the same normalized path
    pub duplicates: usize,
}

/// Read-only view of Zed's `db.sqlite`.
///
/// Holds no connection between calls: every load opens the file, extracts
/// the workspace rows and closes it again.
#[derive(Debug, Clone)]
pub struct WorkspaceStore {
    path: PathBuf,
    options: NormalizeOptions,
    busy_timeout: Duration,
}

/// Which columns the extraction query reads
struct Extraction {
    location: &'static str,
    timestamp: Option<&'static str>,
    id: Option<&'static str>,
}

impl Extraction {
    fn sql(&self) -> String {
        format!(
            "SELECT {}, {}, {} FROM {WORKSPACES_TABLE}",
            self.location,
            self.timestamp.unwrap_or("NULL"),
            self.id.unwrap_or("NULL"),
        )
    }
}

/// Raw values pulled from one row before normalization
struct RawRow {
    location: Option<String>,
    last_accessed: Option<DateTime<Utc>>,
    workspace_id: Option<i64>,
}

impl WorkspaceStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            options: NormalizeOptions::default(),
            busy_timeout: Duration::from_secs(5),
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: NormalizeOptions) -> Self {
        self.options = options;
        self
    }

    #[must_use]
    pub fn with_busy_timeout(mut self, busy_timeout: Duration) -> Self {
        self.busy_timeout = busy_timeout;
        self
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the current set of workspace records.
    ///
    /// # Errors
    ///
    /// Returns `StoreUnavailable` if the store cannot be opened or has no
    /// readable workspaces table.
    pub fn load_records(&self) -> Result<Vec<WorkspaceRecord>> {
        Ok(self.load()?.records)
    }

    /// Load records along with row-level counters.
    ///
    /// # Errors
    ///
    /// Returns `StoreUnavailable` if the store cannot be opened or has no
    /// readable workspaces table. Individual bad rows are counted, not raised.
    pub fn load(&self) -> Result<LoadReport> {
        let conn = self.open()?;
        let extraction = self.plan_extraction(&conn)?;
        let raw_rows = self.read_rows(&conn, &extraction)?;
        drop(conn);

        let rows = raw_rows.len();
        let mut malformed = 0;
        let mut records = Vec::with_capacity(rows);

        for raw in raw_rows {
            let Some(location) = raw.location.as_deref().and_then(first_root) else {
                malformed += 1;
                continue;
            };

            match WorkspaceRecord::from_raw(
                location,
                raw.last_accessed,
                raw.workspace_id,
                self.options,
            ) {
                Ok(record) => records.push(record),
                Err(e) => {
                    debug!("Skipping workspace row: {e}");
                    malformed += 1;
                }
            }
        }

        let (mut records, duplicates) = dedup_records(records);
        records.sort_by(|a, b| {
            a.leaf()
                .to_lowercase()
                .cmp(&b.leaf().to_lowercase())
                .then_with(|| a.normalized_path().cmp(b.normalized_path()))
        });

        if malformed > 0 {
            warn!("Skipped {malformed} malformed workspace rows");
        }
        info!(
            "Loaded {} workspaces from {} ({} rows, {} duplicates)",
            records.len(),
            self.path.display(),
            rows,
            duplicates
        );

        Ok(LoadReport {
            records,
            rows,
            malformed,
            duplicates,
        })
    }

    fn unavailable(&self, reason: impl ToString) -> Error {
        Error::store_unavailable(&self.path, reason)
    }

    fn open(&self) -> Result<Connection> {
        if !self.path.is_file() {
            return Err(self.unavailable("file not found"));
        }

        // Zed keeps the database open; never take a write lock on it
        let conn = Connection::open_with_flags(
            &self.path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(|e| self.unavailable(e))?;
        conn.busy_timeout(self.busy_timeout)
            .map_err(|e| self.unavailable(e))?;

        debug!("Opened {} read-only", self.path.display());
        Ok(conn)
    }

    fn plan_extraction(&self, conn: &Connection) -> Result<Extraction> {
        let columns = table_columns(conn, WORKSPACES_TABLE).map_err(|e| self.unavailable(e))?;

        if columns.is_empty() {
            return Err(self.unavailable("no workspaces table"));
        }

        let has = |name: &str| columns.iter().any(|c| c.eq_ignore_ascii_case(name));

        let location = LOCATION_COLUMNS
            .iter()
            .copied()
            .find(|c| has(c))
            .ok_or_else(|| self.unavailable("workspaces table has no location column"))?;
        let timestamp = TIMESTAMP_COLUMNS.iter().copied().find(|c| has(c));
        let id = has(ID_COLUMN).then_some(ID_COLUMN);

        debug!(
            "Extracting workspaces via {location} (timestamp: {timestamp:?}, id: {id:?}) from {} columns",
            columns.len()
        );

        Ok(Extraction {
            location,
            timestamp,
            id,
        })
    }

    fn read_rows(&self, conn: &Connection, extraction: &Extraction) -> Result<Vec<RawRow>> {
        let mut stmt = conn
            .prepare(&extraction.sql())
            .map_err(|e| self.unavailable(e))?;
        let mut rows = stmt.query([]).map_err(|e| self.unavailable(e))?;

        let mut raw_rows = Vec::new();
        loop {
            match rows.next() {
                Ok(Some(row)) => raw_rows.push(raw_row(row)),
                Ok(None) => break,
                Err(e) => {
                    // A stepping error leaves the cursor unusable; keep what was read
                    warn!(
                        "Stopped reading workspaces after {} rows: {e}",
                        raw_rows.len()
                    );
                    break;
                }
            }
        }

        Ok(raw_rows)
    }
}

fn table_columns(conn: &Connection, table: &str) -> rusqlite::Result<Vec<String>> {
    let mut stmt = conn.prepare("SELECT name FROM pragma_table_info(?1)")?;
    let columns = stmt
        .query_map([table], |row| row.get(0))?
        .collect::<rusqlite::Result<Vec<String>>>()?;
    Ok(columns)
}

fn raw_row(row: &Row<'_>) -> RawRow {
    let location = match row.get_ref(0) {
        Ok(ValueRef::Text(bytes)) => std::str::from_utf8(bytes).ok().map(str::to_string),
        _ => None,
    };
    let last_accessed = row.get_ref(1).ok().and_then(parse_timestamp);
    let workspace_id = match row.get_ref(2) {
        Ok(ValueRef::Integer(id)) => Some(id),
        _ => None,
    };

    RawRow {
        location,
        last_accessed,
        workspace_id,
    }
}

/// First non-empty root of a possibly multi-root `paths` value
fn first_root(paths: &str) -> Option<&str> {
    paths.lines().map(str::trim).find(|line| !line.is_empty())
}

/// Parse the timestamp forms Zed and sqlite produce.
///
/// Text is `YYYY-MM-DD HH:MM:SS` (sqlite `CURRENT_TIMESTAMP`, UTC) or RFC 3339;
/// integers are epoch seconds or milliseconds.
// Epoch floats are truncated to whole seconds
#[allow(clippy::cast_possible_truncation)]
fn parse_timestamp(value: ValueRef<'_>) -> Option<DateTime<Utc>> {
    match value {
        ValueRef::Integer(n) if n >= MILLIS_THRESHOLD => DateTime::from_timestamp_millis(n),
        ValueRef::Integer(n) => DateTime::from_timestamp(n, 0),
        ValueRef::Real(f) if f.is_finite() => DateTime::from_timestamp(f as i64, 0),
        ValueRef::Text(bytes) => {
            let text = std::str::from_utf8(bytes).ok()?.trim();
            NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S%.f")
                .map(|naive| naive.and_utc())
                .or_else(|_| DateTime::parse_from_rfc3339(text).map(|dt| dt.with_timezone(&Utc)))
                .ok()
        }
        _ => None,
    }
}
