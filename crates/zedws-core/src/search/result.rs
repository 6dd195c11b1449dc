use crate::store::WorkspaceRecord;

/// One scored candidate for a single query. Never outlives the record slice.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchResult<'a> {
    pub record: &'a WorkspaceRecord,

    /// Always positive; non-matching records are never wrapped
    pub score: f64,

    /// Leaf name, suffixed with `(WSL)` for WSL workspaces
    pub display_label: String,

    /// Display path, annotated with the distro for WSL workspaces
    pub display_subtitle: String,
}

impl<'a> MatchResult<'a> {
    #[must_use]
    pub fn new(record: &'a WorkspaceRecord, score: f64) -> Self {
        Self {
            record,
            score,
            display_label: display_label(record),
            display_subtitle: display_subtitle(record),
        }
    }
}

fn display_label(record: &WorkspaceRecord) -> String {
    if record.is_wsl() {
        format!("{} (WSL)", record.leaf())
    } else {
        record.leaf().to_string()
    }
}

fn display_subtitle(record: &WorkspaceRecord) -> String {
    match (record.is_wsl(), record.distro_name()) {
        (true, Some(distro)) => format!("{} [WSL: {distro}]", record.display_path()),
        (true, None) => format!("{} [WSL]", record.display_path()),
        (false, _) => record.display_path().to_string(),
    }
}
