//! Persisting a [`MemoryVolume`] to a host file.
//!
//! The image is the JSON serialization of the volume tree. Runtime state
//! (open enumerations, the clock, write protection) is not stored.

use std::fs;
use std::io;
use std::path::Path;

use dosfs_types::error::{DosError, Result};

use crate::memory::MemoryVolume;

impl MemoryVolume {
    /// Load a volume image. A missing or unrecognised file reports
    /// `NoFilesystem`.
    pub fn load(path: &Path) -> Result<Self> {
        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::debug!("no image at {}", path.display());
                return Err(DosError::NoFilesystem);
            },
            Err(e) => return Err(e.into()),
        };
        let vol: Self = match serde_json::from_slice(&bytes) {
            Ok(vol) => vol,
            Err(e) => {
                log::debug!("{} is not a volume image: {e}", path.display());
                return Err(DosError::NoFilesystem);
            },
        };
        if !vol.has_valid_signature() {
            return Err(DosError::NoFilesystem);
        }
        log::info!("loaded {} volume from {}", vol.fs_kind(), path.display());
        Ok(vol)
    }

    /// Write the volume image, replacing `path` only once the new content is
    /// fully on disk.
    pub fn save(&self, path: &Path) -> Result<()> {
        let data = serde_json::to_vec(self)?;
        let tmp = path.with_extension("tmp");
        fs::write(&tmp, data)?;
        fs::rename(&tmp, path)?;
        log::debug!("saved volume to {}", path.display());
        Ok(())
    }
}
