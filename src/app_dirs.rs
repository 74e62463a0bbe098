use directories::ProjectDirs;
use std::path::{Path, PathBuf};

use crate::history::SESSIONS_KEY;

const APP_NAME: &str = "arquiz";

/// Centralized application directory resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppDirs {
    state_dir: PathBuf,
    config_dir: PathBuf,
}

impl AppDirs {
    /// Platform directories: history and log under `~/.local/state/arquiz`,
    /// config under the platform config dir.
    pub fn resolve() -> Option<Self> {
        let project = ProjectDirs::from("", "", APP_NAME);
        let state_dir = if let Ok(home) = std::env::var("HOME") {
            PathBuf::from(home).join(".local").join("state").join(APP_NAME)
        } else {
            project.as_ref()?.data_local_dir().to_path_buf()
        };
        let config_dir = match project {
            Some(pd) => pd.config_dir().to_path_buf(),
            None => state_dir.clone(),
        };
        Some(Self {
            state_dir,
            config_dir,
        })
    }

    /// Keep everything in one directory.
    pub fn with_root<P: AsRef<Path>>(root: P) -> Self {
        let root = root.as_ref().to_path_buf();
        Self {
            state_dir: root.clone(),
            config_dir: root,
        }
    }

    pub fn state_dir(&self) -> &Path {
        &self.state_dir
    }

    pub fn history_path(&self) -> PathBuf {
        self.state_dir.join(format!("{SESSIONS_KEY}.json"))
    }

    pub fn log_path(&self) -> PathBuf {
        self.state_dir.join(format!("{APP_NAME}.log"))
    }

    pub fn config_path(&self) -> PathBuf {
        self.config_dir.join("config.json")
    }
}
