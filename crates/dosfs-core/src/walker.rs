//! Recursive tree walker.
//!
//! A walk makes up to two enumeration passes per directory. The first pass
//! applies the user's pattern and hands every match to the [`Visitor`]. When
//! recursing, a second pass enumerates `*` and descends into every
//! subdirectory with the same pattern, so `*.tmp` finds files below
//! directories whose own names do not match.
//!
//! The walk is fail-fast: the first error stops every level and comes back
//! tagged with the path of the entry that caused it.

use dosfs_types::error::Result;
use dosfs_vfs::{DirEntry, Finder, Volume};

use crate::path::{VolumePath, join};

/// Per-entry callbacks of a walk.
pub trait Visitor {
    /// Fold the entry into the caller's accumulator. Runs before `visit`.
    fn accumulate(&mut self, _entry: &DirEntry) {}

    /// Act on one matching entry. `path` is the entry's full volume path.
    fn visit(&mut self, vol: &mut dyn Volume, entry: &DirEntry, path: &str) -> Result<()>;

    /// Whether a recursive walk should enter the subdirectory at `path`.
    fn descend(&mut self, _path: &str) -> bool {
        true
    }
}

/// Walk the entries selected by `path`, returning how many matched.
///
/// Matching nothing is not an error.
pub fn walk(
    vol: &mut dyn Volume,
    path: &VolumePath,
    recursive: bool,
    visitor: &mut dyn Visitor,
) -> Result<usize> {
    walk_dir(vol, &path.directory(), path.pattern(), recursive, visitor)
}

fn walk_dir(
    vol: &mut dyn Volume,
    dir: &str,
    pattern: &str,
    recursive: bool,
    visitor: &mut dyn Visitor,
) -> Result<usize> {
    let mut matched = 0;
    {
        let mut finder = Finder::open(vol, dir, pattern).map_err(|e| e.at(dir))?;
        while let Some(entry) = finder.next_entry().map_err(|e| e.at(dir))? {
            let full = join(dir, &entry.name);
            matched += 1;
            visitor.accumulate(&entry);
            visitor
                .visit(finder.volume(), &entry, &full)
                .map_err(|e| e.at(full))?;
        }
    }
    if !recursive {
        return Ok(matched);
    }

    let mut finder = Finder::open(vol, dir, "*").map_err(|e| e.at(dir))?;
    while let Some(entry) = finder.next_entry().map_err(|e| e.at(dir))? {
        if entry.is_dir() {
            let sub = join(dir, &entry.name);
            if !visitor.descend(&sub) {
                log::debug!("not descending into {sub}");
                continue;
            }
            log::debug!("descending into {sub}");
            matched += walk_dir(finder.volume(), &sub, pattern, true, visitor)?;
        }
    }
    Ok(matched)
}
