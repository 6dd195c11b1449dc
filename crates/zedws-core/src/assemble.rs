//! Ranked matches to launcher items
//!
//! Order is taken as given; nothing here re-ranks.

use crate::search::MatchResult;
use zedws_types::{ACTION_COPY_PATH, ACTION_OPEN, Action, ResultItem};

pub const ITEM_ICON: &str = "zed";

const OPEN_ICON: &str = "open_in_new";
const COPY_ICON: &str = "content_copy";

/// Map ranked matches to result items, preserving order
#[must_use]
pub fn assemble(results: &[MatchResult<'_>]) -> Vec<ResultItem> {
    results.iter().map(result_item).collect()
}

fn result_item(result: &MatchResult<'_>) -> ResultItem {
    let record = result.record;
    let open_name = if record.is_wsl() {
        "Open in Zed (WSL)"
    } else {
        "Open in Zed"
    };

    ResultItem {
        id: record.normalized_path().to_string(),
        title: result.display_label.clone(),
        subtitle: result.display_subtitle.clone(),
        icon: Some(ITEM_ICON.to_string()),
        action: record.location.launch_target(),
        actions: vec![
            Action {
                id: ACTION_OPEN.to_string(),
                name: open_name.to_string(),
                icon: Some(OPEN_ICON.to_string()),
            },
            Action {
                id: ACTION_COPY_PATH.to_string(),
                name: "Copy Path".to_string(),
                icon: Some(COPY_ICON.to_string()),
            },
        ],
        score: result.score,
    }
}
