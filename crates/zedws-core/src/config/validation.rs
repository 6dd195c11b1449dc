//! Unknown-field warnings for config.json
//!
//! Serde ignores fields it does not know, so a typo like `maxResult` would
//! silently fall back to the default. Every section is one level deep, so a
//! flat table of section names and their keys is enough.

use serde_json::{Map, Value};
use tracing::warn;

/// Known keys per section, as they appear in JSON (camelCase)
const SECTIONS: &[(&str, &[&str])] = &[
    ("store", &["dbPath", "channel", "busyTimeoutMs"]),
    ("search", &["maxResults", "unixPathsAsWsl"]),
    ("launch", &["zedCommand", "wslCommand"]),
];

/// Warn once per unrecognized `section` or `section.field` in `content`.
/// Content that is not a JSON object is left to the deserializer to report.
pub fn warn_unknown_fields(content: &str, config_name: &str) {
    let Ok(Value::Object(root)) = serde_json::from_str::<Value>(content) else {
        return;
    };

    for path in unknown_fields(&root) {
        warn!("Unknown config field in {config_name}: {path}");
    }
}

fn section_keys(name: &str) -> Option<&'static [&'static str]> {
    SECTIONS
        .iter()
        .find_map(|&(section, keys)| (section == name).then_some(keys))
}

fn unknown_fields(root: &Map<String, Value>) -> Vec<String> {
    root.iter()
        .flat_map(|(section, body)| match section_keys(section) {
            None => vec![section.clone()],
            Some(keys) => body
                .as_object()
                .into_iter()
                .flat_map(|fields| fields.keys())
                .filter(|key| !keys.contains(&key.as_str()))
                .map(|key| format!("{section}.{key}"))
                .collect(),
        })
        .collect()
}
