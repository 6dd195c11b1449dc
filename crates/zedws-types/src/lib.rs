//! Shared types for zedws components.
//!
//! This crate provides the launcher-facing types produced by zedws-core and
//! consumed by the `zedws` binary or any other host integration. All types are
//! serializable so they can cross a process boundary as JSON.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Action id for reopening the workspace in Zed
pub const ACTION_OPEN: &str = "open";

/// Action id for copying the workspace path
pub const ACTION_COPY_PATH: &str = "copy-path";

/// Opaque payload that tells the launch collaborator which workspace to reopen.
///
/// The host hands this back unchanged when the user activates an item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LaunchTarget {
    /// A path on the host filesystem (drive letter or UNC share)
    Local { path: String },

    /// A path inside a WSL distro. `distro` is `None` for the default distro.
    Wsl {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        distro: Option<String>,
        path: String,
    },
}

impl LaunchTarget {
    /// Path as the editor should receive it
    #[must_use]
    pub fn path(&self) -> &str {
        match self {
            Self::Local { path } | Self::Wsl { path, .. } => path,
        }
    }

    #[must_use]
    pub fn distro(&self) -> Option<&str> {
        match self {
            Self::Local { .. } => None,
            Self::Wsl { distro, .. } => distro.as_deref(),
        }
    }

    #[must_use]
    pub fn is_wsl(&self) -> bool {
        matches!(self, Self::Wsl { .. })
    }

    /// Build the program invocation that reopens this workspace.
    ///
    /// - local: `<zed> <path>`
    /// - WSL: `<wsl> [-d <distro>] -- <zed> <path>`
    #[must_use]
    pub fn command(&self, zed_command: &str, wsl_command: &str) -> LaunchCommand {
        match self {
            Self::Local { path } => LaunchCommand {
                program: zed_command.to_string(),
                args: vec![path.clone()],
            },
            Self::Wsl { distro, path } => {
                let mut args = Vec::with_capacity(5);
                if let Some(distro) = distro {
                    args.push("-d".to_string());
                    args.push(distro.clone());
                }
                args.push("--".to_string());
                args.push(zed_command.to_string());
                args.push(path.clone());
                LaunchCommand {
                    program: wsl_command.to_string(),
                    args,
                }
            }
        }
    }
}

/// A resolved program invocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaunchCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl fmt::Display for LaunchCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            if arg.is_empty() || arg.contains(char::is_whitespace) {
                write!(f, " \"{arg}\"")?;
            } else {
                write!(f, " {arg}")?;
            }
        }
        Ok(())
    }
}

/// Secondary action offered on a result (context menu entry)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Action {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

/// One launcher-facing result.
///
/// `id` is the workspace's normalized path, stable across queries.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultItem {
    pub id: String,
    pub title: String,
    pub subtitle: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,

    /// Payload for the primary action
    pub action: LaunchTarget,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub actions: Vec<Action>,

    /// Ranking score (not serialized)
    #[serde(skip)]
    pub score: f64,
}

/// Everything one query cycle hands back to the host
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResponse {
    pub items: Vec<ResultItem>,

    /// Set when the store could not be read or nothing was found
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diagnostic: Option<String>,
}

impl QueryResponse {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wsl(distro: Option<&str>, path: &str) -> LaunchTarget {
        LaunchTarget::Wsl {
            distro: distro.map(String::from),
            path: path.to_string(),
        }
    }

    #[test]
    fn test_local_command() {
        let target = LaunchTarget::Local {
            path: r"C:\Users\u\code\app".to_string(),
        };
        let cmd = target.command("zed", "wsl");
        assert_eq!(cmd.program, "zed");
        assert_eq!(cmd.args, vec![r"C:\Users\u\code\app".to_string()]);
    }

    #[test]
    fn test_wsl_command_with_distro() {
        let cmd = wsl(Some("Ubuntu"), "/home/u/app").command("zed", "wsl");
        assert_eq!(cmd.program, "wsl");
        assert_eq!(cmd.args, vec!["-d", "Ubuntu", "--", "zed", "/home/u/app"]);
    }

    #[test]
    fn test_wsl_command_default_distro() {
        let cmd = wsl(None, "~/app").command("zed", "wsl.exe");
        assert_eq!(cmd.program, "wsl.exe");
        assert_eq!(cmd.args, vec!["--", "zed", "~/app"]);
    }

    #[test]
    fn test_launch_target_accessors() {
        let target = wsl(Some("Debian"), "/srv/site");
        assert!(target.is_wsl());
        assert_eq!(target.distro(), Some("Debian"));
        assert_eq!(target.path(), "/srv/site");

        let local = LaunchTarget::Local {
            path: "d:/work".to_string(),
        };
        assert!(!local.is_wsl());
        assert_eq!(local.distro(), None);
    }

    #[test]
    fn test_launch_target_json_shape() {
        let json = serde_json::to_value(wsl(Some("Ubuntu"), "/home/u/app")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"kind": "wsl", "distro": "Ubuntu", "path": "/home/u/app"})
        );

        let json = serde_json::to_value(wsl(None, "/home/u/app")).unwrap();
        assert!(json.get("distro").is_none());
    }

    #[test]
    fn test_launch_target_rejects_unknown_kind() {
        let result = serde_json::from_str::<LaunchTarget>(r#"{"kind":"ssh","path":"/x"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_launch_command_display_quotes_spaces() {
        let cmd = LaunchTarget::Local {
            path: r"C:\My Projects\app".to_string(),
        }
        .command("zed", "wsl");
        assert_eq!(cmd.to_string(), r#"zed "C:\My Projects\app""#);
    }

    #[test]
    fn test_result_item_skips_score() {
        let item = ResultItem {
            id: "/home/u/app".to_string(),
            title: "app".to_string(),
            subtitle: "/home/u/app".to_string(),
            icon: None,
            action: wsl(None, "/home/u/app"),
            actions: Vec::new(),
            score: 42.0,
        };
        let json = serde_json::to_string(&item).unwrap();
        assert!(!json.contains("score"));
        assert!(!json.contains("actions"));
        assert!(!json.contains("icon"));
    }

    #[test]
    fn test_query_response_empty() {
        let response = QueryResponse::default();
        assert!(response.is_empty());
        let json = serde_json::to_string(&response).unwrap();
        assert_eq!(json, r#"{"items":[]}"#);
    }
}
