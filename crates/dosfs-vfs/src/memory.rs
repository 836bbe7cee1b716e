//! In-memory FAT-like volume engine.
//!
//! Stands in for a FAT driver in tests and in the `dosfs` tool, where the
//! whole tree is persisted as a JSON image. Every node lives in a
//! `BTreeMap<String, Node>` keyed by its lower-cased absolute path, so lookups
//! are case-insensitive while the stored name keeps the case it was created
//! with.
//!
//! Directories keep their children in slots, like the entry array of a FAT
//! directory: removing an entry frees its slot and the next creation reuses
//! the first free one. Enumeration walks the slots in order, which makes
//! removing the current entry during an open enumeration safe.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use dosfs_types::error::{DosError, Result};

use crate::entry::{Attributes, DirEntry, FatDate, FatTime, local_timestamp};
use crate::glob;
use crate::{DirHandle, FormatOptions, FreeSpace, FsKind, Volume, VolumeLabel, WriteMode};

/// 1.44 MB floppy.
pub const DEFAULT_CAPACITY: u64 = 1_474_560;

const SECTOR: u64 = 512;
const MAX_FAT16_CLUSTERS: u64 = 65_524;
const FAT32_CLUSTER: u64 = 4096;
const EXFAT_CLUSTER: u64 = 32 * 1024;
const MAX_NAME_LEN: usize = 255;
const MAX_LABEL_LEN: usize = 11;
pub(crate) const IMAGE_SIGNATURE: &str = "dosfs-image/1";

fn default_max_open_dirs() -> usize {
    16
}

fn image_signature() -> String {
    IMAGE_SIGNATURE.to_string()
}

/// Source of timestamps for new and modified entries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Clock {
    /// The host's local time.
    #[default]
    Local,
    /// A pinned timestamp, for reproducible tests.
    Fixed(FatDate, FatTime),
}

impl Clock {
    pub fn now(self) -> (FatDate, FatTime) {
        match self {
            Self::Local => local_timestamp(),
            Self::Fixed(date, time) => (date, time),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
enum Body {
    File(Vec<u8>),
    /// Child slots holding lower-cased names; `None` is a freed slot.
    Dir(Vec<Option<String>>),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Node {
    name: String,
    short_name: String,
    attributes: Attributes,
    date: FatDate,
    time: FatTime,
    body: Body,
}

impl Node {
    fn entry(&self) -> DirEntry {
        DirEntry {
            name: self.name.clone(),
            short_name: Some(self.short_name.clone()),
            attributes: self.attributes,
            size: match &self.body {
                Body::File(data) => data.len() as u64,
                Body::Dir(_) => 0,
            },
            date: self.date,
            time: self.time,
        }
    }

    fn is_dir(&self) -> bool {
        matches!(self.body, Body::Dir(_))
    }
}

/// A FAT-like volume held entirely in memory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryVolume {
    #[serde(default = "image_signature")]
    signature: String,
    fs: FsKind,
    partitioned: bool,
    label: String,
    serial: u32,
    capacity: u64,
    cluster_bytes: u64,
    total_clusters: u64,
    nodes: BTreeMap<String, Node>,
    #[serde(skip)]
    clock: Clock,
    #[serde(skip)]
    read_only: bool,
    #[serde(skip, default = "default_max_open_dirs")]
    max_open_dirs: usize,
    #[serde(skip)]
    open: HashSet<u64>,
    #[serde(skip)]
    next_handle: u64,
}

impl MemoryVolume {
    /// An empty, freshly formatted floppy-sized volume.
    pub fn new() -> Self {
        Self::blank(DEFAULT_CAPACITY, Clock::Local)
    }

    /// An empty volume of `capacity` bytes.
    pub fn with_capacity(capacity: u64) -> Self {
        Self::blank(capacity, Clock::Local)
    }

    /// An empty floppy-sized volume stamping entries from `clock`.
    pub fn with_clock(clock: Clock) -> Self {
        Self::blank(DEFAULT_CAPACITY, clock)
    }

    fn blank(capacity: u64, clock: Clock) -> Self {
        let (fs, cluster_bytes) = auto_layout(capacity);
        let (date, time) = clock.now();
        let mut vol = Self {
            signature: image_signature(),
            fs,
            partitioned: true,
            label: String::new(),
            serial: serial_from(date, time),
            capacity,
            cluster_bytes,
            total_clusters: capacity / cluster_bytes,
            nodes: BTreeMap::new(),
            clock,
            read_only: false,
            max_open_dirs: default_max_open_dirs(),
            open: HashSet::new(),
            next_handle: 0,
        };
        vol.reset_tree();
        vol
    }

    pub fn set_clock(&mut self, clock: Clock) {
        self.clock = clock;
    }

    /// Refuse every mutation with `WriteProtected`.
    pub fn set_read_only(&mut self, read_only: bool) {
        self.read_only = read_only;
    }

    pub fn set_max_open_dirs(&mut self, max: usize) {
        self.max_open_dirs = max.max(1);
    }

    /// Number of enumerations currently open.
    pub fn open_dirs(&self) -> usize {
        self.open.len()
    }

    pub fn fs_kind(&self) -> FsKind {
        self.fs
    }

    pub fn capacity(&self) -> u64 {
        self.capacity
    }

    pub fn is_partitioned(&self) -> bool {
        self.partitioned
    }

    pub(crate) fn has_valid_signature(&self) -> bool {
        self.signature == IMAGE_SIGNATURE
            && self.nodes.get("/").is_some_and(Node::is_dir)
    }

    fn reset_tree(&mut self) {
        let (date, time) = self.clock.now();
        self.nodes.clear();
        self.nodes.insert(
            "/".to_string(),
            Node {
                name: String::new(),
                short_name: String::new(),
                attributes: Attributes::DIRECTORY,
                date,
                time,
                body: Body::Dir(Vec::new()),
            },
        );
    }

    fn check_writable(&self) -> Result<()> {
        if self.read_only {
            Err(DosError::WriteProtected)
        } else {
            Ok(())
        }
    }

    /// `NotFound` when only the leaf is missing, `NoPath` when a directory
    /// along the way is missing.
    fn missing(&self, key: &str) -> DosError {
        match parent_key(key) {
            Some(parent) if self.nodes.get(&parent).is_some_and(Node::is_dir) => {
                DosError::NotFound
            },
            _ => DosError::NoPath,
        }
    }

    fn node(&self, key: &str) -> Result<&Node> {
        self.nodes.get(key).ok_or_else(|| self.missing(key))
    }

    fn require_parent_dir(&self, key: &str) -> Result<String> {
        let parent = parent_key(key).ok_or(DosError::InvalidName)?;
        match self.nodes.get(&parent) {
            Some(node) if node.is_dir() => Ok(parent),
            _ => Err(DosError::NoPath),
        }
    }

    fn short_name_taken(&self, parent: &str, candidate: &str, except: Option<&str>) -> bool {
        let Some(Node {
            body: Body::Dir(slots),
            ..
        }) = self.nodes.get(parent)
        else {
            return false;
        };
        slots.iter().flatten().any(|child| {
            let key = join_key(parent, child);
            if except == Some(key.as_str()) {
                return false;
            }
            self.nodes.get(&key).is_some_and(|n| {
                n.short_name.eq_ignore_ascii_case(candidate)
                    || n.name.eq_ignore_ascii_case(candidate)
            })
        })
    }

    fn alias_for(&self, parent: &str, name: &str, except: Option<&str>) -> String {
        short_alias(name, |candidate| {
            self.short_name_taken(parent, candidate, except)
        })
    }

    fn take_slot(&mut self, parent: &str, leaf: String) {
        if let Some(Node {
            body: Body::Dir(slots),
            ..
        }) = self.nodes.get_mut(parent)
        {
            match slots.iter_mut().find(|s| s.is_none()) {
                Some(free) => *free = Some(leaf),
                None => slots.push(Some(leaf)),
            }
        }
    }

    fn free_slot(&mut self, parent: &str, leaf: &str) {
        if let Some(Node {
            body: Body::Dir(slots),
            ..
        }) = self.nodes.get_mut(parent)
            && let Some(slot) = slots.iter_mut().find(|s| s.as_deref() == Some(leaf))
        {
            *slot = None;
        }
    }

    fn insert_child(
        &mut self,
        key: &str,
        name: &str,
        body: Body,
        attributes: Attributes,
    ) -> Result<()> {
        validate_name(name)?;
        let parent = self.require_parent_dir(key)?;
        let short_name = self.alias_for(&parent, name, None);
        let (date, time) = self.clock.now();
        self.take_slot(&parent, leaf_key(key).to_string());
        self.nodes.insert(
            key.to_string(),
            Node {
                name: name.to_string(),
                short_name,
                attributes,
                date,
                time,
                body,
            },
        );
        Ok(())
    }

    fn used_clusters(&self) -> u64 {
        self.nodes
            .iter()
            .filter(|(key, _)| key.as_str() != "/")
            .map(|(_, node)| match &node.body {
                Body::File(data) => self.clusters_for(data.len() as u64),
                Body::Dir(_) => 1,
            })
            .sum()
    }

    fn clusters_for(&self, bytes: u64) -> u64 {
        bytes.div_ceil(self.cluster_bytes)
    }
}

impl Default for MemoryVolume {
    fn default() -> Self {
        Self::new()
    }
}

impl Volume for MemoryVolume {
    fn stat(&self, path: &str) -> Result<DirEntry> {
        let key = key(path);
        self.node(&key).map(Node::entry)
    }

    fn open_dir(&mut self, dir: &str, pattern: &str) -> Result<DirHandle> {
        let key = key(dir);
        if !self.nodes.get(&key).is_some_and(Node::is_dir) {
            return Err(DosError::NoPath);
        }
        if self.open.len() >= self.max_open_dirs {
            return Err(DosError::TooManyOpenDirs);
        }
        self.next_handle += 1;
        let id = self.next_handle;
        self.open.insert(id);
        Ok(DirHandle {
            id,
            dir: key,
            pattern: pattern.to_string(),
            position: 0,
        })
    }

    fn read_dir(&mut self, handle: &mut DirHandle) -> Result<Option<DirEntry>> {
        if !self.open.contains(&handle.id) {
            return Err(DosError::InvalidParameter(format!(
                "enumeration #{} is not open",
                handle.id
            )));
        }
        // The directory itself may have been removed mid-enumeration.
        let Some(Node {
            body: Body::Dir(slots),
            ..
        }) = self.nodes.get(&handle.dir)
        else {
            return Ok(None);
        };
        while handle.position < slots.len() {
            let slot = &slots[handle.position];
            handle.position += 1;
            let Some(child) = slot else {
                continue;
            };
            let Some(node) = self.nodes.get(&join_key(&handle.dir, child)) else {
                continue;
            };
            if glob::matches(&handle.pattern, &node.name)
                || glob::matches(&handle.pattern, &node.short_name)
            {
                return Ok(Some(node.entry()));
            }
        }
        Ok(None)
    }

    fn close_dir(&mut self, handle: DirHandle) {
        self.open.remove(&handle.id);
    }

    fn rename(&mut self, from: &str, to: &str) -> Result<()> {
        self.check_writable()?;
        let from_key = key(from);
        let to_key = key(to);
        if from_key == "/" || to_key == "/" {
            return Err(DosError::InvalidName);
        }
        self.node(&from_key)?;
        let new_name = display_leaf(to);
        validate_name(new_name)?;
        let to_parent = self.require_parent_dir(&to_key)?;

        if from_key == to_key {
            // Case-only rename keeps the slot.
            let short_name = self.alias_for(&to_parent, new_name, Some(&from_key));
            if let Some(node) = self.nodes.get_mut(&from_key) {
                node.name = new_name.to_string();
                node.short_name = short_name;
            }
            return Ok(());
        }
        if self.nodes.contains_key(&to_key) {
            return Err(DosError::Exists);
        }
        let prefix = format!("{from_key}/");
        if to_key.starts_with(&prefix) {
            return Err(DosError::Denied);
        }

        let short_name = self.alias_for(&to_parent, new_name, Some(&from_key));
        let moved: Vec<String> = std::iter::once(from_key.clone())
            .chain(
                self.nodes
                    .range(prefix.clone()..)
                    .take_while(|(k, _)| k.starts_with(&prefix))
                    .map(|(k, _)| k.clone()),
            )
            .collect();
        for old in moved {
            if let Some(node) = self.nodes.remove(&old) {
                let new = format!("{to_key}{}", &old[from_key.len()..]);
                self.nodes.insert(new, node);
            }
        }
        if let Some(node) = self.nodes.get_mut(&to_key) {
            node.name = new_name.to_string();
            node.short_name = short_name;
            if !node.is_dir() {
                node.attributes.insert(Attributes::ARCHIVE);
            }
        }
        if let Some(from_parent) = parent_key(&from_key) {
            self.free_slot(&from_parent, leaf_key(&from_key));
        }
        self.take_slot(&to_parent, leaf_key(&to_key).to_string());
        log::debug!("renamed {from_key} -> {to_key}");
        Ok(())
    }

    fn remove(&mut self, path: &str) -> Result<()> {
        self.check_writable()?;
        let key = key(path);
        if key == "/" {
            return Err(DosError::InvalidName);
        }
        let node = self.node(&key)?;
        if node.attributes.contains(Attributes::READ_ONLY) {
            return Err(DosError::Denied);
        }
        if let Body::Dir(slots) = &node.body
            && slots.iter().any(Option::is_some)
        {
            return Err(DosError::Denied);
        }
        self.nodes.remove(&key);
        if let Some(parent) = parent_key(&key) {
            self.free_slot(&parent, leaf_key(&key));
        }
        log::debug!("removed {key}");
        Ok(())
    }

    fn mkdir(&mut self, path: &str) -> Result<()> {
        self.check_writable()?;
        let key = key(path);
        if self.nodes.contains_key(&key) {
            return Err(DosError::Exists);
        }
        if self.used_clusters() >= self.total_clusters {
            return Err(DosError::Full);
        }
        self.insert_child(&key, display_leaf(path), Body::Dir(Vec::new()), Attributes::DIRECTORY)
    }

    fn set_attributes(&mut self, path: &str, set: Attributes, clear: Attributes) -> Result<()> {
        self.check_writable()?;
        let key = key(path);
        if key == "/" {
            return Err(DosError::InvalidName);
        }
        self.node(&key)?;
        if let Some(node) = self.nodes.get_mut(&key) {
            node.attributes.remove(clear & Attributes::CHANGEABLE);
            node.attributes.insert(set & Attributes::CHANGEABLE);
        }
        Ok(())
    }

    fn free_space(&self, _dir: &str) -> Result<FreeSpace> {
        Ok(FreeSpace {
            free_clusters: self.total_clusters.saturating_sub(self.used_clusters()),
            cluster_bytes: self.cluster_bytes,
        })
    }

    fn label(&self) -> Result<VolumeLabel> {
        Ok(VolumeLabel {
            label: self.label.clone(),
            serial: self.serial,
        })
    }

    fn format(&mut self, options: &FormatOptions) -> Result<()> {
        self.check_writable()?;
        let (fs, cluster_bytes) = layout(options.fs, self.capacity)?;
        let label = match &options.label {
            Some(label) => validate_label(label)?,
            None => String::new(),
        };
        let (date, time) = self.clock.now();
        self.fs = fs;
        self.partitioned = !options.no_partition_table;
        self.cluster_bytes = cluster_bytes;
        self.total_clusters = self.capacity / cluster_bytes;
        self.serial = serial_from(date, time);
        self.label = label;
        self.open.clear();
        self.reset_tree();
        log::info!(
            "formatted {fs} volume: {} clusters of {cluster_bytes} bytes",
            self.total_clusters
        );
        Ok(())
    }

    fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        let key = key(path);
        match &self.node(&key)?.body {
            Body::File(data) => Ok(data.clone()),
            Body::Dir(_) => Err(DosError::NotFound),
        }
    }

    fn write_file(&mut self, path: &str, data: &[u8], mode: WriteMode) -> Result<()> {
        self.check_writable()?;
        let key = key(path);
        if key == "/" {
            return Err(DosError::InvalidName);
        }
        self.require_parent_dir(&key)?;

        let existing = match self.nodes.get(&key) {
            Some(node) => match &node.body {
                Body::Dir(_) => return Err(DosError::Denied),
                Body::File(_) if mode == WriteMode::CreateNew => return Err(DosError::Exists),
                Body::File(_) if node.attributes.contains(Attributes::READ_ONLY) => {
                    return Err(DosError::Denied);
                },
                Body::File(old) => Some(old.len() as u64),
            },
            None => None,
        };
        let old_len = existing.unwrap_or(0);
        let new_len = match mode {
            WriteMode::Append => old_len + data.len() as u64,
            _ => data.len() as u64,
        };
        let used =
            self.used_clusters() - self.clusters_for(old_len) + self.clusters_for(new_len);
        if used > self.total_clusters {
            return Err(DosError::Full);
        }

        if existing.is_none() {
            return self.insert_child(
                &key,
                display_leaf(path),
                Body::File(data.to_vec()),
                Attributes::ARCHIVE,
            );
        }
        let (date, time) = self.clock.now();
        if let Some(node) = self.nodes.get_mut(&key)
            && let Body::File(content) = &mut node.body
        {
            if mode != WriteMode::Append {
                content.clear();
            }
            content.extend_from_slice(data);
            node.date = date;
            node.time = time;
            node.attributes.insert(Attributes::ARCHIVE);
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Path keys
// ---------------------------------------------------------------------------

fn components(path: &str) -> impl Iterator<Item = &str> {
    path.split(['/', '\\']).filter(|c| !c.is_empty())
}

/// Lower-cased absolute key: leading `/`, no empty components.
fn key(path: &str) -> String {
    let mut out = String::with_capacity(path.len() + 1);
    for comp in components(path) {
        out.push('/');
        out.push_str(&comp.to_lowercase());
    }
    if out.is_empty() {
        out.push('/');
    }
    out
}

fn parent_key(key: &str) -> Option<String> {
    if key == "/" {
        return None;
    }
    match key.rfind('/') {
        Some(0) => Some("/".to_string()),
        Some(i) => Some(key[..i].to_string()),
        None => None,
    }
}

fn leaf_key(key: &str) -> &str {
    key.rsplit('/').next().unwrap_or(key)
}

fn join_key(parent: &str, leaf: &str) -> String {
    if parent == "/" {
        format!("/{leaf}")
    } else {
        format!("{parent}/{leaf}")
    }
}

/// Last component of a path as the user spelled it.
fn display_leaf(path: &str) -> &str {
    components(path).last().unwrap_or("")
}

// ---------------------------------------------------------------------------
// Names
// ---------------------------------------------------------------------------

fn validate_name(name: &str) -> Result<()> {
    let bad_char = |c: char| c.is_control() || "\"*/:<>?\\|".contains(c);
    if name.is_empty()
        || name == "."
        || name == ".."
        || name.chars().count() > MAX_NAME_LEN
        || name.chars().any(bad_char)
        || name.ends_with(' ')
    {
        return Err(DosError::InvalidName);
    }
    Ok(())
}

fn validate_label(label: &str) -> Result<String> {
    let label = label.trim().to_uppercase();
    if label.chars().count() > MAX_LABEL_LEN
        || label
            .chars()
            .any(|c| c.is_control() || "\"*+,./:;<=>?[\\]|".contains(c))
    {
        return Err(DosError::InvalidName);
    }
    Ok(label)
}

fn sfn_char(c: char) -> bool {
    c.is_ascii_uppercase() || c.is_ascii_digit() || "!#$%&'()-@^_`{}~".contains(c)
}

fn fits_8_3(name: &str) -> bool {
    let (base, ext) = name.split_once('.').unwrap_or((name, ""));
    let valid = |s: &str| s.chars().all(|c| sfn_char(c.to_ascii_uppercase()));
    (1..=8).contains(&base.len())
        && ext.len() <= 3
        && !ext.contains('.')
        && !(name.contains('.') && ext.is_empty())
        && valid(base)
        && valid(ext)
}

/// 8.3 alias for `name`: the upper-cased name when it already fits, else a
/// numbered `BASENA~N.EXT` tail that `taken` does not report as used.
fn short_alias(name: &str, taken: impl Fn(&str) -> bool) -> String {
    if fits_8_3(name) {
        return name.to_ascii_uppercase();
    }
    let (base, ext) = match name.rsplit_once('.') {
        Some((b, e)) if !b.trim_start_matches('.').is_empty() => (b, e),
        _ => (name, ""),
    };
    let clean = |s: &str| -> String {
        s.chars()
            .filter(|c| !matches!(c, ' ' | '.'))
            .map(|c| {
                let up = c.to_ascii_uppercase();
                if sfn_char(up) { up } else { '_' }
            })
            .collect()
    };
    let base = clean(base);
    let ext: String = clean(ext).chars().take(3).collect();
    let mut n = 1u32;
    loop {
        let tail = format!("~{n}");
        let stem: String = base.chars().take(8 - tail.len()).collect();
        let candidate = if ext.is_empty() {
            format!("{stem}{tail}")
        } else {
            format!("{stem}{tail}.{ext}")
        };
        if !taken(&candidate) {
            return candidate;
        }
        n += 1;
    }
}

// ---------------------------------------------------------------------------
// Layout
// ---------------------------------------------------------------------------

fn serial_from(date: FatDate, time: FatTime) -> u32 {
    (u32::from(date.0) << 16) | u32::from(time.0)
}

/// Smallest FAT12/16 cluster that keeps the cluster count in range.
fn fat_cluster(capacity: u64) -> Option<u64> {
    (0..8)
        .map(|shift| SECTOR << shift)
        .find(|cluster| capacity / cluster <= MAX_FAT16_CLUSTERS)
}

fn auto_layout(capacity: u64) -> (FsKind, u64) {
    match fat_cluster(capacity) {
        Some(cluster) => (FsKind::Fat, cluster),
        None => (FsKind::Fat32, FAT32_CLUSTER),
    }
}

fn layout(fs: FsKind, capacity: u64) -> Result<(FsKind, u64)> {
    match fs {
        FsKind::Any => Ok(auto_layout(capacity)),
        FsKind::Fat => fat_cluster(capacity)
            .map(|cluster| (FsKind::Fat, cluster))
            .ok_or_else(|| DosError::FormatFailed("volume too large for FAT".to_string())),
        FsKind::Fat32 if capacity / FAT32_CLUSTER <= MAX_FAT16_CLUSTERS => Err(
            DosError::FormatFailed("volume too small for FAT32".to_string()),
        ),
        FsKind::Fat32 => Ok((FsKind::Fat32, FAT32_CLUSTER)),
        FsKind::ExFat => Ok((FsKind::ExFat, EXFAT_CLUSTER.min(capacity / 16).max(SECTOR))),
    }
}
