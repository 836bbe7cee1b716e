//! Tool configuration loaded from TOML.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{DosError, Result};

/// Environment variable naming an explicit configuration file.
pub const CONFIG_ENV: &str = "DOSFS_CONFIG";

/// Configuration file looked up in the working directory.
pub const CONFIG_FILE: &str = "dosfs.toml";

/// Settings for the `dosfs` command-line tool.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DosfsConfig {
    /// Volume image used when no `-f` option is given.
    pub image: PathBuf,
    /// Size in bytes of a freshly formatted image.
    pub capacity: u64,
    /// Number of directory enumerations the engine allows at once.
    pub max_open_dirs: usize,
    /// Open the image write-protected.
    pub read_only: bool,
}

impl Default for DosfsConfig {
    fn default() -> Self {
        Self {
            image: PathBuf::from("floppy.img"),
            capacity: 1_474_560,
            max_open_dirs: 16,
            read_only: false,
        }
    }
}

impl DosfsConfig {
    /// Parse a configuration from TOML text.
    pub fn from_toml(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a configuration file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| DosError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml(&text)
    }

    /// Load the configuration from `$DOSFS_CONFIG`, else `./dosfs.toml`,
    /// else fall back to defaults.
    pub fn load() -> Result<Self> {
        if let Some(path) = std::env::var_os(CONFIG_ENV) {
            let path = PathBuf::from(path);
            log::debug!("loading config from {}", path.display());
            return Self::from_file(&path);
        }
        let local = Path::new(CONFIG_FILE);
        if local.exists() {
            log::debug!("loading config from {CONFIG_FILE}");
            return Self::from_file(local);
        }
        Ok(Self::default())
    }

    fn validate(&self) -> Result<()> {
        if self.max_open_dirs == 0 {
            return Err(DosError::Config(
                "max_open_dirs must be at least 1".to_string(),
            ));
        }
        if self.capacity < 64 * 1024 {
            return Err(DosError::Config(format!(
                "capacity {} is below the 64 KiB minimum",
                self.capacity
            )));
        }
        Ok(())
    }
}
