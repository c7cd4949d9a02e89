//! Store configuration: where photos live on disk.
//!
//! Loaded from TOML, e.g.
//!
//! ```toml
//! storage_root = "documents"   # or "data", or an absolute path
//! image_dir = "stored-images"
//! ```

use std::fmt;
use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Application directory name used under platform data/config roots.
pub const APP_DIR: &str = "snapshelf";

pub const DEFAULT_IMAGE_DIR: &str = "stored-images";

/// Base location the image directory is created under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum StorageRoot {
    /// The user's documents directory.
    Documents,
    /// Private application data, `<data_dir>/snapshelf`.
    Data,
    Custom(PathBuf),
}

impl StorageRoot {
    /// Resolve to a concrete directory for this platform.
    pub fn resolve(&self) -> Result<PathBuf> {
        match self {
            StorageRoot::Documents => {
                dirs::document_dir().ok_or(Error::NoPlatformDir("documents"))
            }
            StorageRoot::Data => dirs::data_dir()
                .map(|d| d.join(APP_DIR))
                .ok_or(Error::NoPlatformDir("data")),
            StorageRoot::Custom(path) => Ok(path.clone()),
        }
    }
}

impl From<String> for StorageRoot {
    fn from(value: String) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "documents" => StorageRoot::Documents,
            "data" => StorageRoot::Data,
            _ => StorageRoot::Custom(PathBuf::from(value)),
        }
    }
}

impl From<StorageRoot> for String {
    fn from(value: StorageRoot) -> Self {
        value.to_string()
    }
}

impl fmt::Display for StorageRoot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageRoot::Documents => write!(f, "documents"),
            StorageRoot::Data => write!(f, "data"),
            StorageRoot::Custom(path) => write!(f, "{}", path.display()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub storage_root: StorageRoot,
    /// Directory name under the storage root that holds the photo files.
    pub image_dir: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            storage_root: StorageRoot::Data,
            image_dir: DEFAULT_IMAGE_DIR.to_string(),
        }
    }
}

impl StoreConfig {
    /// Replace the root and/or image directory, then re-validate.
    pub fn with_overrides(mut self, root: Option<PathBuf>, image_dir: Option<String>) -> Result<Self> {
        if let Some(root) = root {
            self.storage_root = StorageRoot::Custom(root);
        }
        if let Some(dir) = image_dir {
            self.image_dir = dir;
        }
        validate_image_dir(&self.image_dir)?;
        Ok(self)
    }
}

/// The image directory must be exactly one normal path component.
pub fn validate_image_dir(dir: &str) -> Result<()> {
    let mut components = Path::new(dir).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(()),
        _ => Err(Error::InvalidImageDir(dir.to_string())),
    }
}

/// Load configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<StoreConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        Error::io(path, e, |path, source| Error::Read { path, source })
    })?;

    let config: StoreConfig = toml::from_str(&content).map_err(|e| Error::Config {
        path: path.to_path_buf(),
        message: e.message().to_string(),
    })?;

    validate_image_dir(&config.image_dir)?;
    tracing::debug!(path = %path.display(), root = %config.storage_root, "loaded config");
    Ok(config)
}

/// `<config_dir>/snapshelf/config.toml`, if the platform has a config dir.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(APP_DIR).join("config.toml"))
}

/// Load from `custom_path`, else the default location if present, else defaults.
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<StoreConfig> {
    if let Some(path) = custom_path {
        return load_config(path);
    }

    if let Some(path) = default_config_path() {
        if path.exists() {
            return load_config(&path);
        }
    }

    Ok(StoreConfig::default())
}
