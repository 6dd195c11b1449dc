use crate::config::StoreConfig;
use directories::BaseDirs;
use std::path::{Path, PathBuf};
use tracing::debug;

const DB_FILE: &str = "db.sqlite";
const FALLBACK_CHANNEL_DIR: &str = "0-stable";

/// Zed's per-user database directory, e.g. `%LOCALAPPDATA%\Zed\db`
#[must_use]
pub fn zed_db_dir() -> Option<PathBuf> {
    let app_dir = if cfg!(target_os = "linux") {
        "zed"
    } else {
        "Zed"
    };
    BaseDirs::new().map(|base| base.data_local_dir().join(app_dir).join("db"))
}

/// Pick the channel database under `db_dir`.
///
/// Channel directories look like `0-stable` or `0-preview`. The first one
/// whose name contains `channel` wins, else the first in name order. With no
/// candidates the conventional `0-stable/db.sqlite` is returned even though it
/// does not exist, so the caller reports a concrete path.
#[must_use]
pub fn find_in_db_dir(db_dir: &Path, channel: &str) -> PathBuf {
    let mut candidates: Vec<PathBuf> = std::fs::read_dir(db_dir)
        .into_iter()
        .flatten()
        .filter_map(std::result::Result::ok)
        .map(|entry| entry.path().join(DB_FILE))
        .filter(|path| path.is_file())
        .collect();
    candidates.sort();

    let channel = channel.to_lowercase();
    let preferred = candidates.iter().find(|path| {
        path.parent()
            .and_then(Path::file_name)
            .is_some_and(|name| name.to_string_lossy().to_lowercase().contains(&channel))
    });

    let chosen = preferred
        .or_else(|| candidates.first())
        .cloned()
        .unwrap_or_else(|| db_dir.join(FALLBACK_CHANNEL_DIR).join(DB_FILE));

    debug!(
        "Store candidates in {}: {}, chose {}",
        db_dir.display(),
        candidates.len(),
        chosen.display()
    );
    chosen
}

/// Resolve the store path from config, discovering it when not set
#[must_use]
pub fn locate_store(config: &StoreConfig) -> Option<PathBuf> {
    if let Some(path) = &config.db_path {
        return Some(path.clone());
    }
    zed_db_dir().map(|dir| find_in_db_dir(&dir, &config.channel))
}
