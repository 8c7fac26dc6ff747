use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::storage::{StorageError, StorageResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ConfigPathError {
    MissingHomeDirectory,
}

const APP_DIR: &str = "api-portal";
const APP_CONFIG_FILE: &str = "config.json";
const STORAGE_DIR: &str = "storage";
const DEFAULT_WINDOW_WIDTH: i32 = 1280;
const DEFAULT_WINDOW_HEIGHT: i32 = 800;

/// Application-level settings from `config.json`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub window_width: Option<i32>,
    #[serde(default)]
    pub window_height: Option<i32>,
    #[serde(default)]
    pub storage_dir: Option<PathBuf>,
}

impl AppConfig {
    pub fn window_size(&self) -> (i32, i32) {
        (
            self.window_width
                .filter(|width| *width > 0)
                .unwrap_or(DEFAULT_WINDOW_WIDTH),
            self.window_height
                .filter(|height| *height > 0)
                .unwrap_or(DEFAULT_WINDOW_HEIGHT),
        )
    }

    /// Directory of the durable key/value entries.
    pub fn storage_dir(&self) -> StorageResult<PathBuf> {
        let (xdg_config_home, home) = config_env_dirs();
        self.storage_dir_with(xdg_config_home.as_deref(), home.as_deref())
    }

    fn storage_dir_with(
        &self,
        xdg_config_home: Option<&Path>,
        home: Option<&Path>,
    ) -> StorageResult<PathBuf> {
        if let Some(dir) = self
            .storage_dir
            .as_ref()
            .filter(|path| !path.as_os_str().is_empty())
        {
            return Ok(dir.clone());
        }
        app_config_path(APP_DIR, STORAGE_DIR, xdg_config_home, home).map_err(|error| match error {
            ConfigPathError::MissingHomeDirectory => StorageError::MissingHomeDirectory,
        })
    }
}

pub fn load_app_config() -> AppConfig {
    let (xdg_config_home, home) = config_env_dirs();
    load_app_config_with(xdg_config_home.as_deref(), home.as_deref())
}

fn load_app_config_with(xdg_config_home: Option<&Path>, home: Option<&Path>) -> AppConfig {
    let path = match app_config_path(APP_DIR, APP_CONFIG_FILE, xdg_config_home, home) {
        Ok(p) => p,
        Err(_) => return AppConfig::default(),
    };
    if !path.exists() {
        return AppConfig::default();
    }
    match std::fs::read_to_string(&path) {
        Ok(contents) => serde_json::from_str(&contents).unwrap_or_else(|err| {
            tracing::warn!(?err, ?path, "failed to parse config.json; using defaults");
            AppConfig::default()
        }),
        Err(err) => {
            tracing::warn!(?err, ?path, "failed to read config.json; using defaults");
            AppConfig::default()
        }
    }
}

pub(crate) fn config_env_dirs() -> (Option<PathBuf>, Option<PathBuf>) {
    (
        std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from),
        std::env::var_os("HOME").map(PathBuf::from),
    )
}

pub(crate) fn app_config_path(
    app_dir: &str,
    file_name: &str,
    xdg_config_home: Option<&Path>,
    home: Option<&Path>,
) -> Result<PathBuf, ConfigPathError> {
    let mut path = config_root(xdg_config_home, home)?;
    path.push(app_dir);
    path.push(file_name);
    Ok(path)
}

fn config_root(
    xdg_config_home: Option<&Path>,
    home: Option<&Path>,
) -> Result<PathBuf, ConfigPathError> {
    if let Some(xdg) = xdg_config_home.filter(|path| !path.as_os_str().is_empty()) {
        return Ok(xdg.to_path_buf());
    }

    let home = home.ok_or(ConfigPathError::MissingHomeDirectory)?;
    Ok(home.join(".config"))
}
