use crate::{Error, Result};
use directories::ProjectDirs;
use std::path::PathBuf;

/// Application directories following platform conventions
#[derive(Debug, Clone)]
pub struct Directories {
    /// Config directory (~/.config/zedws, %APPDATA%\zedws\config)
    pub config: PathBuf,

    /// Config file path
    pub config_file: PathBuf,

    /// Directory for optional log files
    pub logs: PathBuf,
}

impl Directories {
    /// Create a new `Directories` instance with the platform's standard paths.
    ///
    /// # Errors
    ///
    /// Returns an error if no home directory can be determined.
    pub fn new() -> Result<Self> {
        let project = ProjectDirs::from("", "", "zedws")
            .ok_or_else(|| Error::Config("cannot determine home directory".to_string()))?;

        let config = project.config_dir().to_path_buf();

        Ok(Self {
            config_file: config.join("config.json"),
            logs: project.data_local_dir().join("logs"),
            config,
        })
    }

    #[must_use]
    pub fn with_base(base: PathBuf) -> Self {
        Self {
            config_file: base.join("config.json"),
            logs: base.join("logs"),
            config: base,
        }
    }
}
