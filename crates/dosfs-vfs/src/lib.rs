//! Volume abstraction for dosfs.
//!
//! The command engine never touches a block device directly. Everything it
//! needs from the mounted filesystem goes through the [`Volume`] trait: stat a
//! path, enumerate the entries of a directory that match a wildcard pattern,
//! and mutate entries (rename, remove, mkdir, attribute changes).
//!
//! Enumerations are a limited resource of the engine, so they are opened and
//! closed explicitly. Callers use the [`Finder`] guard, which closes its
//! enumeration when dropped on every exit path.

pub mod entry;
pub mod glob;
pub mod memory;

mod image;

use dosfs_types::error::{DosError, Result};

pub use entry::{Attributes, DirEntry, FatDate, FatTime, local_timestamp};
pub use memory::{Clock, MemoryVolume};

/// State of one open directory enumeration.
///
/// Handles are created by [`Volume::open_dir`] and must be given back to
/// [`Volume::close_dir`]. They are deliberately not `Clone`.
#[derive(Debug)]
pub struct DirHandle {
    /// Engine-assigned identifier.
    pub id: u64,
    /// Directory being enumerated.
    pub dir: String,
    /// Wildcard pattern entries are matched against.
    pub pattern: String,
    /// Engine-specific cursor into the directory.
    pub position: usize,
}

/// Free space report of a volume.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FreeSpace {
    pub free_clusters: u64,
    pub cluster_bytes: u64,
}

impl FreeSpace {
    pub fn free_bytes(&self) -> u64 {
        self.free_clusters * self.cluster_bytes
    }
}

/// Volume label and serial number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VolumeLabel {
    /// Empty when the volume has no label.
    pub label: String,
    pub serial: u32,
}

/// Filesystem flavour requested from [`Volume::format`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum FsKind {
    /// Let the engine pick from the volume size.
    #[default]
    Any,
    Fat,
    Fat32,
    ExFat,
}

impl std::str::FromStr for FsKind {
    type Err = DosError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "fat" => Ok(Self::Fat),
            "fat32" => Ok(Self::Fat32),
            "exfat" => Ok(Self::ExFat),
            _ => Err(DosError::InvalidUsage(
                "Valid arguments for option -F are: fat fat32 exfat".to_string(),
            )),
        }
    }
}

impl std::fmt::Display for FsKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Any => "any",
            Self::Fat => "FAT",
            Self::Fat32 => "FAT32",
            Self::ExFat => "exFAT",
        })
    }
}

/// Options for [`Volume::format`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormatOptions {
    pub fs: FsKind,
    /// Create the filesystem without a partition table.
    pub no_partition_table: bool,
    pub label: Option<String>,
}

/// How [`Volume::write_file`] treats an existing file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    /// Fail with `Exists` if the file is already there.
    CreateNew,
    /// Replace the content of an existing file.
    Truncate,
    /// Append to an existing file, creating it if needed.
    Append,
}

/// The operations the command engine consumes from a mounted volume.
///
/// Paths are `/`-separated and relative to the volume root; a leading `/` is
/// accepted. The empty path and `/` both name the root directory.
pub trait Volume {
    /// Metadata of a single entry. The root directory reports an entry with
    /// an empty name and the `DIRECTORY` attribute.
    fn stat(&self, path: &str) -> Result<DirEntry>;

    /// Start enumerating the entries of `dir` whose name matches `pattern`.
    fn open_dir(&mut self, dir: &str, pattern: &str) -> Result<DirHandle>;

    /// Next matching entry, or `None` once the enumeration is exhausted.
    fn read_dir(&mut self, handle: &mut DirHandle) -> Result<Option<DirEntry>>;

    /// Release an enumeration.
    fn close_dir(&mut self, handle: DirHandle);

    fn rename(&mut self, from: &str, to: &str) -> Result<()>;

    /// Remove a file or an empty directory.
    fn remove(&mut self, path: &str) -> Result<()>;

    /// Create a directory. The parent must already exist.
    fn mkdir(&mut self, path: &str) -> Result<()>;

    /// Set then clear attribute bits. Only R/H/S/A can change.
    fn set_attributes(&mut self, path: &str, set: Attributes, clear: Attributes) -> Result<()>;

    fn free_space(&self, dir: &str) -> Result<FreeSpace>;

    fn label(&self) -> Result<VolumeLabel>;

    /// Create a fresh, empty filesystem.
    fn format(&mut self, options: &FormatOptions) -> Result<()>;

    fn read_file(&self, path: &str) -> Result<Vec<u8>>;

    fn write_file(&mut self, path: &str, data: &[u8], mode: WriteMode) -> Result<()>;

    /// `true` if `path` names the root or an existing directory.
    fn is_dir(&self, path: &str) -> bool {
        is_root(path) || self.stat(path).is_ok_and(|e| e.is_dir())
    }

    /// `true` if `path` names an existing non-directory entry.
    fn is_file(&self, path: &str) -> bool {
        !is_root(path) && self.stat(path).is_ok_and(|e| !e.is_dir())
    }
}

/// `true` for the spellings of the volume root.
pub fn is_root(path: &str) -> bool {
    path.chars().all(|c| c == '/' || c == '\\')
}

// ---------------------------------------------------------------------------
// Finder
// ---------------------------------------------------------------------------

/// Scoped directory enumeration.
///
/// Holds the volume borrow for as long as the enumeration is open. Use
/// [`Finder::volume`] to mutate the volume between entries; the enumeration
/// is closed when the finder is dropped.
pub struct Finder<'v> {
    vol: &'v mut dyn Volume,
    handle: Option<DirHandle>,
}

impl<'v> Finder<'v> {
    pub fn open(vol: &'v mut dyn Volume, dir: &str, pattern: &str) -> Result<Self> {
        let handle = vol.open_dir(dir, pattern)?;
        log::debug!("open_dir #{} {dir:?} {pattern:?}", handle.id);
        Ok(Self {
            vol,
            handle: Some(handle),
        })
    }

    /// Next matching entry; `None` once exhausted.
    pub fn next_entry(&mut self) -> Result<Option<DirEntry>> {
        match self.handle.as_mut() {
            Some(handle) => self.vol.read_dir(handle),
            None => Ok(None),
        }
    }

    /// The underlying volume, for work between two entries.
    pub fn volume(&mut self) -> &mut dyn Volume {
        &mut *self.vol
    }
}

impl Drop for Finder<'_> {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            log::debug!("close_dir #{}", handle.id);
            self.vol.close_dir(handle);
        }
    }
}
