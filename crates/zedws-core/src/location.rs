//! Location normalization
//!
//! Zed records workspace roots exactly as it saw them. On a Windows host that
//! means a mix of drive paths (`C:\Users\u\app`), UNC shares, WSL network
//! paths (`\\wsl$\Ubuntu\home\u\app`, `\\wsl.localhost\Ubuntu\...`) and bare
//! Linux paths (`/home/u/app`) for workspaces opened from inside WSL. This
//! module folds all of them into one comparable form.
//!
//! Canonical forms produced by [`normalize`]:
//!
//! | shape            | `normalized_path`                  | `display_path`       |
//! |------------------|------------------------------------|----------------------|
//! | WSL network path | `//wsl.localhost/ubuntu/home/u/app` | `/home/u/app`        |
//! | Linux path       | `/home/u/app`                      | `/home/u/app`        |
//! | drive path       | `c:/users/u/app`                   | `C:\Users\u\app`     |
//! | UNC share        | `//server/share/app`               | `\\server\share\app` |
//!
//! Windows paths are lowercased in `normalized_path` because the filesystem is
//! case-insensitive; Linux paths keep their case. A WSL distro name is a share
//! name, so only the distro part of a WSL key is lowercased.
//!
//! A Linux path is recognized from the raw text only: it must start with `/`
//! or `~` before any separator folding. `\\server` or `\code\app` is not a
//! Linux path.

use crate::{Error, Result};
use regex::Regex;
use std::sync::LazyLock;
use zedws_types::LaunchTarget;

/// Host prefix used in the canonical form of WSL paths
const WSL_CANONICAL_HOST: &str = "wsl.localhost";

static WSL_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^/{2,}wsl(?:\$|\.localhost)/+([^/]+)(?:/+(.*))?$")
        .expect("WSL prefix pattern is valid")
});

static UNC_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^/{2}([^/]+)/+([^/]+)(?:/+(.*))?$").expect("UNC pattern is valid")
});

static DRIVE_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Za-z]):(?:/+(.*))?$").expect("drive pattern is valid")
});

/// Options that change how ambiguous shapes are classified
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormalizeOptions {
    /// Treat bare Linux paths (`/...`, `~...`) as living in the default WSL
    /// distro. Defaults to true only on a Windows host.
    pub unix_paths_as_wsl: bool,
}

impl NormalizeOptions {
    pub const WINDOWS_HOST: Self = Self {
        unix_paths_as_wsl: true,
    };
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            unix_paths_as_wsl: cfg!(windows),
        }
    }
}

/// A normalized workspace location
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    /// Canonical comparison key, unique per real location
    pub normalized_path: String,

    /// Case-preserving path as the user and the editor should see it
    pub display_path: String,

    /// Final path component (or the whole path for a root)
    pub leaf: String,

    pub is_wsl: bool,

    /// Distro name, only for WSL network paths
    pub distro: Option<String>,
}

impl Location {
    /// Payload the launch collaborator needs to reopen this location
    #[must_use]
    pub fn launch_target(&self) -> LaunchTarget {
        if self.is_wsl {
            LaunchTarget::Wsl {
                distro: self.distro.clone(),
                path: self.display_path.clone(),
            }
        } else {
            LaunchTarget::Local {
                path: self.display_path.clone(),
            }
        }
    }
}

/// Normalize with default options.
///
/// # Errors
///
/// Returns [`Error::MalformedLocation`] when `raw` matches no known shape.
pub fn normalize(raw: &str) -> Result<Location> {
    normalize_with(raw, NormalizeOptions::default())
}

/// Normalize a raw location recorded by Zed.
///
/// # Errors
///
/// Returns [`Error::MalformedLocation`] when `raw` matches no known shape.
pub fn normalize_with(raw: &str, options: NormalizeOptions) -> Result<Location> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.contains('\0') {
        return Err(Error::MalformedLocation(raw.to_string()));
    }

    let slashed = strip_verbatim_prefix(&trimmed.replace('\\', "/"));

    if let Some(caps) = WSL_PREFIX.captures(&slashed) {
        let distro = caps[1].to_string();
        let inner = caps.get(2).map_or("", |m| m.as_str());
        return Ok(wsl_network_location(distro, inner));
    }

    if let Some(caps) = UNC_PREFIX.captures(&slashed) {
        let rest = caps.get(3).map_or("", |m| m.as_str());
        return Ok(unc_location(&caps[1], &caps[2], rest));
    }

    // `//` that is neither a WSL nor a complete UNC path
    if slashed.starts_with("//") {
        return Err(Error::MalformedLocation(raw.to_string()));
    }

    if trimmed.starts_with(['/', '~']) {
        return Ok(unix_location(&slashed, options.unix_paths_as_wsl));
    }

    if let Some(caps) = DRIVE_PREFIX.captures(&slashed) {
        let rest = caps.get(2).map_or("", |m| m.as_str());
        return Ok(drive_location(&caps[1], rest));
    }

    Err(Error::MalformedLocation(raw.to_string()))
}

/// `//?/C:/x` -> `C:/x`, `//?/UNC/server/share` -> `//server/share`
fn strip_verbatim_prefix(path: &str) -> String {
    match path.strip_prefix("//?/") {
        Some(rest) => match rest.strip_prefix("UNC/") {
            Some(unc) => format!("//{unc}"),
            None => rest.to_string(),
        },
        None => path.to_string(),
    }
}

/// Path components without empty or `.` segments
fn segments(path: &str) -> Vec<&str> {
    path.split('/')
        .filter(|s| !s.is_empty() && *s != ".")
        .collect()
}

fn wsl_network_location(distro: String, inner: &str) -> Location {
    let parts = segments(inner);
    let display_path = format!("/{}", parts.join("/"));
    let distro_key = distro.to_lowercase();
    let normalized_path = if parts.is_empty() {
        format!("//{WSL_CANONICAL_HOST}/{distro_key}")
    } else {
        format!("//{WSL_CANONICAL_HOST}/{distro_key}{display_path}")
    };
    let leaf = parts.last().map_or_else(|| distro.clone(), |s| (*s).to_string());

    Location {
        normalized_path,
        display_path,
        leaf,
        is_wsl: true,
        distro: Some(distro),
    }
}

fn unix_location(path: &str, as_wsl: bool) -> Location {
    let parts = segments(path);
    let display_path = if path.starts_with('~') {
        parts.join("/")
    } else {
        format!("/{}", parts.join("/"))
    };
    let leaf = parts
        .last()
        .map_or_else(|| display_path.clone(), |s| (*s).to_string());

    Location {
        normalized_path: display_path.clone(),
        display_path,
        leaf,
        is_wsl: as_wsl,
        distro: None,
    }
}

fn drive_location(letter: &str, rest: &str) -> Location {
    let parts = segments(rest);
    let letter = letter.to_ascii_uppercase();
    let display_path = format!("{letter}:\\{}", parts.join("\\"));
    let normalized_path = format!("{letter}:/{}", parts.join("/")).to_lowercase();
    let leaf = parts
        .last()
        .map_or_else(|| display_path.clone(), |s| (*s).to_string());

    Location {
        normalized_path,
        display_path,
        leaf,
        is_wsl: false,
        distro: None,
    }
}

fn unc_location(server: &str, share: &str, rest: &str) -> Location {
    let mut parts = vec![server, share];
    parts.extend(segments(rest));
    let display_path = format!("\\\\{}", parts.join("\\"));
    let normalized_path = format!("//{}", parts.join("/")).to_lowercase();
    let leaf = parts.last().map_or(share, |s| *s).to_string();

    Location {
        normalized_path,
        display_path,
        leaf,
        is_wsl: false,
        distro: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wsl_dollar_prefix() {
        let loc = normalize(r"\\wsl$\Ubuntu\home\u\app").unwrap();
        assert!(loc.is_wsl);
        assert_eq!(loc.distro.as_deref(), Some("Ubuntu"));
        assert_eq!(loc.display_path, "/home/u/app");
        assert_eq!(loc.normalized_path, "//wsl.localhost/ubuntu/home/u/app");
        assert_eq!(loc.leaf, "app");
    }

    #[test]
    fn test_wsl_localhost_prefix_same_canonical_form() {
        let a = normalize(r"\\wsl$\Ubuntu\home\u\app").unwrap();
        let b = normalize(r"\\wsl.localhost\Ubuntu\home\u\app\").unwrap();
        let c = normalize("//WSL.LOCALHOST/Ubuntu/home//u/app").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.normalized_path, c.normalized_path);
    }

    #[test]
    fn test_wsl_distro_case_folded_in_key_only() {
        let a = normalize(r"\\wsl$\Ubuntu\home\u\app").unwrap();
        let b = normalize(r"\\wsl.localhost\ubuntu\home\u\app").unwrap();
        assert_eq!(a.normalized_path, b.normalized_path);
        assert_eq!(a.distro.as_deref(), Some("Ubuntu"));
        assert_eq!(b.distro.as_deref(), Some("ubuntu"));
        // the path inside the distro is case-sensitive
        let c = normalize(r"\\wsl$\Ubuntu\home\u\App").unwrap();
        assert_ne!(a.normalized_path, c.normalized_path);
    }

    #[test]
    fn test_wsl_distro_root() {
        let loc = normalize(r"\\wsl$\Debian").unwrap();
        assert_eq!(loc.display_path, "/");
        assert_eq!(loc.normalized_path, "//wsl.localhost/debian");
        assert_eq!(loc.leaf, "Debian");
    }

    #[test]
    fn test_wsl_launch_target() {
        let loc = normalize(r"\\wsl.localhost\Ubuntu\home\u\app").unwrap();
        assert_eq!(
            loc.launch_target(),
            LaunchTarget::Wsl {
                distro: Some("Ubuntu".to_string()),
                path: "/home/u/app".to_string(),
            }
        );
    }

    #[test]
    fn test_unix_path_as_wsl_on_windows_host() {
        let loc = normalize_with("/home/u/Projects/Site/", NormalizeOptions::WINDOWS_HOST).unwrap();
        assert!(loc.is_wsl);
        assert!(loc.distro.is_none());
        assert_eq!(loc.normalized_path, "/home/u/Projects/Site");
        assert_eq!(loc.leaf, "Site");
    }

    #[test]
    fn test_unix_path_as_local() {
        let options = NormalizeOptions {
            unix_paths_as_wsl: false,
        };
        let loc = normalize_with("/srv//www", options).unwrap();
        assert!(!loc.is_wsl);
        assert_eq!(loc.normalized_path, "/srv/www");
        assert_eq!(
            loc.launch_target(),
            LaunchTarget::Local {
                path: "/srv/www".to_string()
            }
        );
    }

    #[test]
    fn test_home_relative_path() {
        let loc =
            normalize_with("~/code/zed-launcher-plugin/", NormalizeOptions::WINDOWS_HOST).unwrap();
        assert!(loc.is_wsl);
        assert_eq!(loc.normalized_path, "~/code/zed-launcher-plugin");
        assert_eq!(loc.leaf, "zed-launcher-plugin");
    }

    #[test]
    fn test_unix_root() {
        let loc = normalize("/").unwrap();
        assert_eq!(loc.normalized_path, "/");
        assert_eq!(loc.leaf, "/");
    }

    #[test]
    fn test_drive_path_case_folded() {
        let a = normalize(r"C:\Users\U\Code\App").unwrap();
        let b = normalize("c:/users/u/code/app/").unwrap();
        assert_eq!(a.normalized_path, "c:/users/u/code/app");
        assert_eq!(a.normalized_path, b.normalized_path);
        assert_eq!(a.display_path, r"C:\Users\U\Code\App");
        assert_eq!(a.leaf, "App");
        assert!(!a.is_wsl);
    }

    #[test]
    fn test_drive_root() {
        let loc = normalize(r"d:\").unwrap();
        assert_eq!(loc.normalized_path, "d:/");
        assert_eq!(loc.display_path, r"D:\");
        assert_eq!(loc.leaf, r"D:\");
    }

    #[test]
    fn test_verbatim_drive_prefix() {
        let loc = normalize(r"\\?\C:\work\api").unwrap();
        assert_eq!(loc.normalized_path, "c:/work/api");
    }

    #[test]
    fn test_unc_share() {
        let loc = normalize(r"\\NAS\Share\Team\Repo").unwrap();
        assert!(!loc.is_wsl);
        assert_eq!(loc.normalized_path, "//nas/share/team/repo");
        assert_eq!(loc.display_path, r"\\NAS\Share\Team\Repo");
        assert_eq!(loc.leaf, "Repo");
    }

    #[test]
    fn test_verbatim_unc_prefix() {
        let loc = normalize(r"\\?\UNC\nas\share\repo").unwrap();
        assert_eq!(loc.normalized_path, "//nas/share/repo");
    }

    #[test]
    fn test_malformed_shapes() {
        for raw in [
            "",
            "   ",
            "relative/dir",
            "ssh://host/path",
            "C:relative",
            "\0",
            r"\\wsl$",
            r"\\wsl.localhost\",
            r"\\server",
            r"\\server\",
            r"\code\app",
            r"\",
            "//server",
        ] {
            let err = normalize_with(raw, NormalizeOptions::WINDOWS_HOST).unwrap_err();
            assert!(
                matches!(err, Error::MalformedLocation(_)),
                "{raw:?} should be malformed"
            );
        }
    }

    #[test]
    fn test_normalize_is_deterministic() {
        for raw in [
            r"\\wsl$\Ubuntu\home\u\app",
            "/home/u/app",
            r"C:\Users\u\app",
            r"\\server\share\x",
        ] {
            assert_eq!(normalize(raw).unwrap(), normalize(raw).unwrap());
        }
    }
}
