//! `move`: move or rename files and subtrees.

use dosfs_types::error::{DosError, Result};
use dosfs_vfs::{DirEntry, Volume};

use crate::confirm::{ConfirmPolicy, Prompter, should_proceed};
use crate::path::{VolumePath, fix_path, has_glob, join, same_path};
use crate::session::Session;
use crate::walker::{Visitor, walk};

#[derive(Debug, Clone, Copy, Default)]
pub struct MoveOptions {
    /// Overwrite policy: `Always` for `-q`, `Prompt` for `-i`.
    pub policy: ConfirmPolicy,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MoveSummary {
    pub moved: usize,
    /// Overwrites the user declined, and moves of an entry onto itself.
    pub skipped: usize,
}

struct MoveVisitor<'a> {
    prompter: &'a mut dyn Prompter,
    device: &'a str,
    policy: ConfirmPolicy,
    dest: &'a str,
    into_dir: bool,
    summary: MoveSummary,
}

impl Visitor for MoveVisitor<'_> {
    fn visit(&mut self, vol: &mut dyn Volume, entry: &DirEntry, from: &str) -> Result<()> {
        let to = if self.into_dir {
            join(self.dest, &entry.name)
        } else {
            self.dest.to_string()
        };
        if self.into_dir && (same_path(from, self.dest) || same_path(from, &to)) {
            log::warn!("move {from}: already in place");
            self.summary.skipped += 1;
            return Ok(());
        }
        if vol.is_file(&to) && !same_path(from, &to) {
            let question = format!("[{}]:{to}, File exists. Overwrite", self.device);
            if !should_proceed(self.policy, &mut *self.prompter, &question, true) {
                self.summary.skipped += 1;
                return Ok(());
            }
            vol.remove(&to)?;
        }
        vol.rename(from, &to)?;
        log::debug!("moved {from} -> {to}");
        self.summary.moved += 1;
        Ok(())
    }
}

/// Move `sources` to `dest`.
///
/// When `dest` is an existing directory every source lands inside it under
/// its own name. Otherwise exactly one concrete source is renamed to `dest`.
pub fn move_entries(
    session: &mut Session<'_>,
    opts: MoveOptions,
    sources: &[&str],
    dest: &str,
) -> Result<MoveSummary> {
    if sources.is_empty() {
        return Err(DosError::InvalidUsage("move: no source given".to_string()));
    }
    let dest = fix_path(dest);
    let into_dir = session.vol.is_dir(&dest);
    if !into_dir && (sources.len() > 1 || has_glob(sources[0])) {
        return Err(DosError::DestinationRequiresDirectory);
    }

    let mut visitor = MoveVisitor {
        prompter: &mut *session.prompter,
        device: &session.device,
        policy: opts.policy,
        dest: &dest,
        into_dir,
        summary: MoveSummary::default(),
    };
    for &src in sources {
        let target = VolumePath::literal(src);
        if target.is_root() {
            return Err(DosError::InvalidName.for_argument(src));
        }
        let matched = walk(&mut *session.vol, &target, false, &mut visitor)
            .map_err(|e| e.for_argument(src))?;
        if matched == 0 && !target.is_glob() {
            return Err(DosError::NotFound.at(target.to_string()).for_argument(src));
        }
    }
    let summary = visitor.summary;
    log::info!("move: {} moved, {} skipped", summary.moved, summary.skipped);
    Ok(summary)
}
