//! `del`: delete files and whole subtrees.

use dosfs_types::error::{DosError, Result};
use dosfs_vfs::{DirEntry, Volume, is_root};

use crate::confirm::{ConfirmPolicy, Prompter, should_proceed};
use crate::path::{VolumePath, fix_path, same_path};
use crate::session::Session;
use crate::walker::{Visitor, walk};

#[derive(Debug, Clone, Copy, Default)]
pub struct DeleteOptions {
    /// `Always` for `-q`, `Prompt` for `-i`.
    pub policy: ConfirmPolicy,
    /// Apply the pattern in every subdirectory too (`-s`).
    pub recursive: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeleteSummary {
    pub files: usize,
    pub dirs: usize,
    /// Deletions the user declined.
    pub skipped: usize,
}

struct Deleter<'a> {
    prompter: &'a mut dyn Prompter,
    device: &'a str,
    summary: DeleteSummary,
    /// Subtrees the user declined; a recursive walk stays out of them.
    declined: Vec<String>,
}

impl Deleter<'_> {
    /// Delete one entry. A directory is a subtree: it is confirmed once,
    /// emptied depth-first without further questions, then removed.
    fn delete_one(
        &mut self,
        vol: &mut dyn Volume,
        path: &str,
        policy: ConfirmPolicy,
    ) -> Result<()> {
        if vol.is_dir(path) {
            let question = format!("[{}]:{path}, Delete entire subtree", self.device);
            if !should_proceed(policy, &mut *self.prompter, &question, true) {
                self.summary.skipped += 1;
                self.declined.push(path.to_string());
                return Ok(());
            }
            let contents = VolumePath::directory_of(path);
            walk(
                vol,
                &contents,
                false,
                &mut DeletePass {
                    deleter: &mut *self,
                    policy: ConfirmPolicy::Always,
                },
            )?;
            if is_root(path) {
                return Ok(());
            }
            vol.remove(path)?;
            self.summary.dirs += 1;
        } else {
            let question = format!("[{}]:{path}, Delete", self.device);
            if !should_proceed(policy, &mut *self.prompter, &question, false) {
                self.summary.skipped += 1;
                return Ok(());
            }
            vol.remove(path)?;
            self.summary.files += 1;
        }
        log::debug!("deleted {path}");
        Ok(())
    }
}

struct DeletePass<'d, 'a> {
    deleter: &'d mut Deleter<'a>,
    policy: ConfirmPolicy,
}

impl Visitor for DeletePass<'_, '_> {
    fn visit(&mut self, vol: &mut dyn Volume, _entry: &DirEntry, path: &str) -> Result<()> {
        self.deleter.delete_one(vol, path, self.policy)
    }

    fn descend(&mut self, path: &str) -> bool {
        !self.deleter.declined.iter().any(|d| same_path(d, path))
    }
}

/// Delete every argument in turn, stopping at the first failure.
///
/// A concrete path names one entry. A wildcard deletes every match under a
/// policy one step more cautious than requested.
pub fn delete(
    session: &mut Session<'_>,
    opts: DeleteOptions,
    paths: &[&str],
) -> Result<DeleteSummary> {
    if paths.is_empty() {
        return Err(DosError::InvalidUsage("del: no path given".to_string()));
    }
    let mut deleter = Deleter {
        prompter: &mut *session.prompter,
        device: &session.device,
        summary: DeleteSummary::default(),
        declined: Vec::new(),
    };
    for &arg in paths {
        delete_arg(&mut deleter, &mut *session.vol, opts, arg)
            .map_err(|e| e.for_argument(arg))?;
    }
    let summary = deleter.summary;
    log::info!(
        "del: {} file(s), {} dir(s), {} skipped",
        summary.files,
        summary.dirs,
        summary.skipped
    );
    Ok(summary)
}

fn delete_arg(
    deleter: &mut Deleter<'_>,
    vol: &mut dyn Volume,
    opts: DeleteOptions,
    arg: &str,
) -> Result<()> {
    let target = VolumePath::literal(arg);
    if !target.is_glob() && !opts.recursive {
        return deleter.delete_one(vol, &fix_path(arg), opts.policy);
    }
    let policy = if target.is_glob() {
        opts.policy.escalate()
    } else {
        opts.policy
    };
    let matched = walk(
        vol,
        &target,
        opts.recursive,
        &mut DeletePass { deleter, policy },
    )?;
    if matched == 0 {
        log::info!("del {target}: nothing matched");
    }
    Ok(())
}
