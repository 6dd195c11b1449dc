use crate::Result;
use crate::assemble::assemble;
use crate::config::Config;
use crate::search::SearchEngine;
use crate::store::{LoadReport, WorkspaceStore, locate_store};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, warn};
use zedws_types::QueryResponse;

pub const NO_WORKSPACES: &str = "No Zed workspaces found";

/// One query cycle end to end: read the store, rank, assemble.
///
/// Keeps no records between queries; every call re-reads the store.
pub struct WorkspaceSearch {
    config: Config,
    store: Option<WorkspaceStore>,
    search: SearchEngine,
}

impl WorkspaceSearch {
    /// Build from config, discovering the store when `store.dbPath` is unset
    #[must_use]
    pub fn new(config: Config) -> Self {
        let store_path = locate_store(&config.store);
        if store_path.is_none() {
            warn!("Could not determine Zed's data directory");
        }
        Self::build(config, store_path)
    }

    /// Build against an explicit store file
    #[must_use]
    pub fn with_store(config: Config, path: impl Into<PathBuf>) -> Self {
        Self::build(config, Some(path.into()))
    }

    fn build(config: Config, store_path: Option<PathBuf>) -> Self {
        let store = store_path.map(|path| {
            debug!("Using workspace store {}", path.display());
            WorkspaceStore::new(path)
                .with_options(config.normalize_options())
                .with_busy_timeout(Duration::from_millis(config.store.busy_timeout_ms))
        });

        Self {
            config,
            store,
            search: SearchEngine::new(),
        }
    }

    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    #[must_use]
    pub fn store_path(&self) -> Option<&Path> {
        self.store.as_ref().map(WorkspaceStore::path)
    }

    /// Read the store once, without ranking.
    ///
    /// # Errors
    ///
    /// Returns `StoreUnavailable` when no store was located or it cannot be read.
    pub fn load(&self) -> Result<LoadReport> {
        match &self.store {
            Some(store) => store.load(),
            None => Err(crate::Error::store_unavailable(
                Path::new("<unresolved>"),
                "Zed data directory not found",
            )),
        }
    }

    /// Run one query. Never fails: an unreadable store yields no items and
    /// a diagnostic the host can show as a placeholder.
    pub fn query(&mut self, query: &str) -> QueryResponse {
        let report = match self.load() {
            Ok(report) => report,
            Err(e) => {
                warn!("{e}");
                return QueryResponse {
                    items: Vec::new(),
                    diagnostic: Some(format!("{NO_WORKSPACES}: {e}")),
                };
            }
        };

        if report.records.is_empty() {
            let location = self
                .store_path()
                .map_or_else(String::new, |p| format!(" in {}", p.display()));
            return QueryResponse {
                items: Vec::new(),
                diagnostic: Some(format!("{NO_WORKSPACES}{location}")),
            };
        }

        let mut results = self.search.rank(query, &report.records);
        let max_results = self.config.search.max_results;
        if max_results > 0 {
            results.truncate(max_results);
        }

        let items = assemble(&results);
        info!(
            "Query {:?}: {} items from {} workspaces",
            query.trim(),
            items.len(),
            report.records.len()
        );

        QueryResponse {
            items,
            diagnostic: None,
        }
    }
}
