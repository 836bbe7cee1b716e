//! `attrib`: show or change attribute bits.

use std::fmt;

use dosfs_types::error::{DosError, Result};
use dosfs_vfs::{Attributes, DirEntry, Volume};

use crate::path::VolumePath;
use crate::session::Session;
use crate::walker::{Visitor, walk};

#[derive(Debug, Clone, Copy, Default)]
pub struct AttribOptions {
    /// Bits to set (`+R +H +S +A`).
    pub set: Attributes,
    /// Bits to clear (`-R -H -S -A`).
    pub clear: Attributes,
    /// `/S`
    pub recursive: bool,
    /// Act on directories too (`/D`).
    pub directories: bool,
}

impl AttribOptions {
    /// No bits to change: list instead.
    pub fn is_listing(&self) -> bool {
        self.set.is_empty() && self.clear.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
pub struct AttribReport {
    pub processed: usize,
    /// Listing lines; empty when attributes were changed.
    pub lines: Vec<String>,
}

impl fmt::Display for AttribReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.lines {
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

/// `A R S H` letters, blank where the bit is clear.
pub fn attribute_letters(attrs: Attributes) -> String {
    [
        (Attributes::ARCHIVE, 'A'),
        (Attributes::READ_ONLY, 'R'),
        (Attributes::SYSTEM, 'S'),
        (Attributes::HIDDEN, 'H'),
    ]
    .iter()
    .map(|&(bit, letter)| if attrs.contains(bit) { letter } else { ' ' })
    .collect()
}

struct AttribVisitor {
    opts: AttribOptions,
    report: AttribReport,
}

impl Visitor for AttribVisitor {
    fn visit(&mut self, vol: &mut dyn Volume, entry: &DirEntry, path: &str) -> Result<()> {
        if entry.is_dir() && !self.opts.directories {
            return Ok(());
        }
        if self.opts.is_listing() {
            self.report
                .lines
                .push(format!("{}     /{path}", attribute_letters(entry.attributes)));
        } else {
            vol.set_attributes(path, self.opts.set, self.opts.clear)?;
            log::debug!("attrib {path}");
        }
        self.report.processed += 1;
        Ok(())
    }
}

/// Apply `opts` to every entry matching `paths` (the root when empty).
///
/// Processing nothing at all is a usage error.
pub fn attrib(
    session: &mut Session<'_>,
    opts: AttribOptions,
    paths: &[&str],
) -> Result<AttribReport> {
    let mut visitor = AttribVisitor {
        opts,
        report: AttribReport::default(),
    };
    let paths = if paths.is_empty() { &[""][..] } else { paths };
    for &arg in paths {
        let target = VolumePath::literal(arg);
        walk(&mut *session.vol, &target, opts.recursive, &mut visitor)
            .map_err(|e| e.for_argument(arg))?;
    }
    if visitor.report.processed == 0 {
        return Err(DosError::InvalidUsage("File not found".to_string()));
    }
    log::info!("attrib: {} entries", visitor.report.processed);
    Ok(visitor.report)
}
