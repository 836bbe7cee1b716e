//! `dir`: list the entries matching a path.

use std::fmt;

use dosfs_types::error::Result;
use dosfs_vfs::{DirEntry, Volume};

use crate::path::VolumePath;
use crate::session::Session;
use crate::walker::{Visitor, walk};

#[derive(Debug, Clone, Copy, Default)]
pub struct ListOptions {
    /// Show hidden and system entries (`-a`). They are counted either way.
    pub all: bool,
    /// Full paths of matching files only, one per line (`-b`).
    pub bare: bool,
    /// Show short names that differ from the long name (`-x`).
    pub short_names: bool,
    /// Descend into subdirectories (`-s`).
    pub recursive: bool,
}

/// Counts gathered by a listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListTotals {
    pub files: usize,
    pub dirs: usize,
    pub bytes: u64,
}

/// Rendered listing plus the counts behind its summary.
#[derive(Debug, Clone)]
pub struct DirListing {
    pub lines: Vec<String>,
    pub totals: ListTotals,
}

impl fmt::Display for DirListing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.lines {
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

struct ListVisitor<'o> {
    opts: ListOptions,
    device: &'o str,
    /// Directory whose header was printed last.
    current: String,
    lines: Vec<String>,
    totals: ListTotals,
}

impl ListVisitor<'_> {
    fn header(&mut self, dir: &str) {
        self.lines.push(format!(" Directory of [{}]:/{dir}", self.device));
        self.lines.push(String::new());
        self.current = dir.to_string();
    }

    fn entry_line(&self, entry: &DirEntry) -> String {
        let mut line = format!(
            "{} {} {:>8} {:>8} ",
            entry.date,
            entry.time,
            if entry.is_dir() { "<DIR>" } else { "" },
            entry.size
        );
        if self.opts.short_names {
            line.push_str(&format!("{:<12} ", entry.distinct_short_name().unwrap_or("")));
        }
        line.push_str(&entry.name);
        line
    }
}

impl Visitor for ListVisitor<'_> {
    fn accumulate(&mut self, entry: &DirEntry) {
        if self.opts.bare {
            return;
        }
        if entry.is_dir() {
            self.totals.dirs += 1;
        } else {
            self.totals.files += 1;
            self.totals.bytes += entry.size;
        }
    }

    fn visit(&mut self, _vol: &mut dyn Volume, entry: &DirEntry, path: &str) -> Result<()> {
        if entry.is_hidden() && !self.opts.all {
            return Ok(());
        }
        if self.opts.bare {
            if !entry.is_dir() {
                self.lines.push(format!("/{path}"));
            }
            return Ok(());
        }
        let dir = path.rsplit_once('/').map_or("", |(dir, _)| dir);
        if !dir.eq_ignore_ascii_case(&self.current) {
            self.lines.push(String::new());
            self.header(dir);
        }
        let line = self.entry_line(entry);
        self.lines.push(line);
        Ok(())
    }
}

/// List the entries selected by `raw`.
///
/// An empty result is not an error: the listing says "File not found".
pub fn list(session: &mut Session<'_>, opts: ListOptions, raw: &str) -> Result<DirListing> {
    let target = VolumePath::split(&*session.vol, raw);
    let directory = target.directory();
    let mut visitor = ListVisitor {
        opts,
        device: &session.device,
        current: String::new(),
        lines: Vec::new(),
        totals: ListTotals::default(),
    };

    if !opts.bare {
        let label = session.vol.label()?;
        if label.label.is_empty() {
            visitor.lines.push(" Volume has no label".to_string());
        } else {
            visitor.lines.push(format!(" Volume label: {}", label.label));
        }
        visitor.lines.push(format!(
            " Volume Serial Number is {:04X}-{:04X}",
            label.serial >> 16,
            label.serial & 0xffff
        ));
        visitor.lines.push(String::new());
        visitor.header(&directory);
    }

    walk(&mut *session.vol, &target, opts.recursive, &mut visitor)?;

    let ListVisitor {
        mut lines, totals, ..
    } = visitor;
    if !opts.bare {
        if totals.files + totals.dirs == 0 {
            lines.push("File not found".to_string());
        }
        lines.push(String::new());
        let free = session.vol.free_space(&directory)?;
        lines.push(format!("    {:>8} File(s) {:>12} bytes", totals.files, totals.bytes));
        lines.push(format!(
            "    {:>8} Dir(s)  {:>12} bytes free",
            totals.dirs,
            free.free_bytes()
        ));
    }
    log::info!(
        "dir {target}: {} file(s), {} dir(s), {} bytes",
        totals.files,
        totals.dirs,
        totals.bytes
    );
    Ok(DirListing { lines, totals })
}
