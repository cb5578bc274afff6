//! Configuration loading and root folder resolution

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Environment variable naming the root folder
pub const ROOT_FOLDER_ENV: &str = "FOOTPRINT_ROOT_FOLDER";

/// Database file name inside the root folder
pub const DATABASE_FILE: &str = "footprint.db";

/// Local cache directory name inside the root folder
pub const CACHE_DIR: &str = "cache";

/// Contents of `config.toml`
///
/// Every key is optional; absent keys fall through to CLI/env/defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FileConfig {
    pub root_folder: Option<PathBuf>,
    #[serde(default)]
    pub server: ServerSection,
    #[serde(default)]
    pub client: ClientSection,
}

/// `[server]` table
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServerSection {
    pub bind: Option<String>,
    pub port: Option<u16>,
    pub database: Option<PathBuf>,
    pub max_body_bytes: Option<usize>,
}

/// `[client]` table
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClientSection {
    pub api_base_url: Option<String>,
    pub autosave_secs: Option<u64>,
    pub request_timeout_secs: Option<u64>,
}

/// Load and parse a TOML config file
pub fn load_file_config(path: &Path) -> Result<FileConfig> {
    let content = std::fs::read_to_string(path)?;
    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Invalid config file {}: {}", path.display(), e)))
}

/// Load the config file from its platform location, if one exists
///
/// A missing file yields defaults; a malformed file is an error so typos
/// don't silently fall back.
pub fn load_default_file_config() -> Result<FileConfig> {
    match default_config_path() {
        Some(path) => load_file_config(&path),
        None => Ok(FileConfig::default()),
    }
}

/// Root folder resolution priority:
/// 1. Command-line argument (highest priority)
/// 2. Environment variable
/// 3. TOML config file `root_folder` key
/// 4. OS-dependent compiled default (fallback)
pub fn resolve_root_folder(
    cli_arg: Option<&Path>,
    env_var_name: &str,
    file_config: &FileConfig,
) -> PathBuf {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return path.to_path_buf();
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(env_var_name) {
        if !path.trim().is_empty() {
            return PathBuf::from(path);
        }
    }

    // Priority 3: TOML config file
    if let Some(path) = &file_config.root_folder {
        return path.clone();
    }

    // Priority 4: OS-dependent compiled default
    default_root_folder()
}

/// Platform config file path, if the file exists
///
/// Linux checks ~/.config/footprint/config.toml, then /etc/footprint/config.toml.
fn default_config_path() -> Option<PathBuf> {
    let user_config = dirs::config_dir().map(|d| d.join("footprint").join("config.toml"));
    if let Some(path) = user_config {
        if path.exists() {
            return Some(path);
        }
    }

    if cfg!(target_os = "linux") {
        let system_config = PathBuf::from("/etc/footprint/config.toml");
        if system_config.exists() {
            return Some(system_config);
        }
    }

    None
}

/// OS-dependent default root folder path
fn default_root_folder() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("footprint"))
        .unwrap_or_else(|| PathBuf::from("./footprint_data"))
}

/// Resolved root folder and the paths derived from it
#[derive(Debug, Clone)]
pub struct RootFolder {
    path: PathBuf,
}

impl RootFolder {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Create the root folder if missing
    pub fn ensure_directory_exists(&self) -> Result<()> {
        if !self.path.exists() {
            std::fs::create_dir_all(&self.path)?;
            tracing::info!("Created root folder: {}", self.path.display());
        }
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn database_path(&self) -> PathBuf {
        self.path.join(DATABASE_FILE)
    }

    pub fn cache_dir(&self) -> PathBuf {
        self.path.join(CACHE_DIR)
    }
}
