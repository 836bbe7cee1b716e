//! `mkdir`: create a directory.

use dosfs_types::error::Result;
use dosfs_vfs::Volume;

use crate::path::{VolumePath, fix_path};

/// Create `raw`. With `parents`, missing directories along the way are
/// created too and an existing directory is accepted.
pub fn make_dir(vol: &mut dyn Volume, raw: &str, parents: bool) -> Result<()> {
    let path = fix_path(raw);
    if !parents {
        vol.mkdir(&path).map_err(|e| e.at(path.as_str()))?;
        log::debug!("mkdir {path}");
        return Ok(());
    }
    let mut prefix = String::new();
    for segment in VolumePath::directory_of(&path).segments() {
        if !prefix.is_empty() {
            prefix.push('/');
        }
        prefix.push_str(segment);
        if !vol.is_dir(&prefix) {
            vol.mkdir(&prefix).map_err(|e| e.at(prefix.as_str()))?;
            log::debug!("mkdir {prefix}");
        }
    }
    Ok(())
}
