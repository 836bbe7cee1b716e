//! Filesystem commands: dir, del, move, attrib, mkdir, format.

use dosfs_core::commands::{self, AttribOptions, DeleteOptions, ListOptions, MoveOptions};
use dosfs_core::ConfirmPolicy;
use dosfs_types::error::{DosError, Result};
use dosfs_vfs::{Attributes, FormatOptions, FsKind};

use crate::interpreter::{Command, CommandOutput, CommandRegistry, Environment, usage_error};

// ---------------------------------------------------------------------------
// dir
// ---------------------------------------------------------------------------

struct DirCmd;
impl Command for DirCmd {
    fn name(&self) -> &str {
        "dir"
    }
    fn description(&self) -> &str {
        "List the contents of a directory"
    }
    fn usage(&self) -> &str {
        "Usage: dosdir <options> <path[/pattern]>\n\
         List the contents of a directory <path> matching the optional pattern <pattern>\n\
         Options:\n\
         \t-a  :  display all files including system and hidden ones\n\
         \t-b  :  only display the full path of each file, one per line\n\
         \t-x  :  display short file names when they're different\n\
         \t-s  :  also list matching entries in every subdirectory"
    }
    fn execute(&self, args: &[&str], env: &mut Environment<'_>) -> Result<CommandOutput> {
        let mut opts = ListOptions::default();
        let mut path: Option<&str> = None;
        for &arg in args {
            match arg {
                "-a" => opts.all = true,
                "-b" => opts.bare = true,
                "-x" => opts.short_names = true,
                "-s" => opts.recursive = true,
                _ if path.is_none() => path = Some(arg),
                _ => return Err(usage_error(self)),
            }
        }
        let listing = commands::list(&mut env.session(), opts, path.unwrap_or(""))?;
        Ok(CommandOutput::Text(listing.to_string()))
    }
}

// ---------------------------------------------------------------------------
// del
// ---------------------------------------------------------------------------

struct DelCmd;
impl Command for DelCmd {
    fn name(&self) -> &str {
        "del"
    }
    fn description(&self) -> &str {
        "Delete files or subtrees"
    }
    fn usage(&self) -> &str {
        "Usage: dosdel <options> {<paths>}\n\
         Delete files or subtrees named <paths>.\n\
         Options:\n\
         \t-i  :  always prompt before deleting\n\
         \t-q  :  silently deletes files without prompting\n\
         \t-s  :  apply wildcard patterns in every subdirectory too"
    }
    fn execute(&self, args: &[&str], env: &mut Environment<'_>) -> Result<CommandOutput> {
        let mut opts = DeleteOptions::default();
        let mut paths = Vec::new();
        for &arg in args {
            match arg {
                "-i" => opts.policy = ConfirmPolicy::Prompt,
                "-q" => opts.policy = ConfirmPolicy::Always,
                "-s" => opts.recursive = true,
                _ => paths.push(arg),
            }
        }
        if paths.is_empty() {
            return Err(usage_error(self));
        }
        commands::delete(&mut env.session(), opts, &paths)?;
        Ok(CommandOutput::None)
    }
}

// ---------------------------------------------------------------------------
// move
// ---------------------------------------------------------------------------

struct MoveCmd;
impl Command for MoveCmd {
    fn name(&self) -> &str {
        "move"
    }
    fn description(&self) -> &str {
        "Move or rename files or subtrees"
    }
    fn usage(&self) -> &str {
        "Usage: dosmove <options> {<srcpaths>} <destpath|destdir>\n\
         Move or rename files or subtrees.\n\
         Options:\n\
         \t-q  :  silently overwrites files without prompting\n\
         \t-i  :  always prompt before overwriting"
    }
    fn execute(&self, args: &[&str], env: &mut Environment<'_>) -> Result<CommandOutput> {
        let mut opts = MoveOptions::default();
        let mut paths = Vec::new();
        for &arg in args {
            match arg {
                "-q" => opts.policy = ConfirmPolicy::Always,
                "-i" => opts.policy = ConfirmPolicy::Prompt,
                _ => paths.push(arg),
            }
        }
        let Some((dest, sources)) = paths.split_last() else {
            return Err(usage_error(self));
        };
        if sources.is_empty() {
            return Err(usage_error(self));
        }
        commands::move_entries(&mut env.session(), opts, sources, dest)?;
        Ok(CommandOutput::None)
    }
}

// ---------------------------------------------------------------------------
// attrib
// ---------------------------------------------------------------------------

struct AttribCmd;

fn attribute_flag(letter: &str) -> Option<Attributes> {
    match letter.to_ascii_uppercase().as_str() {
        "R" => Some(Attributes::READ_ONLY),
        "H" => Some(Attributes::HIDDEN),
        "S" => Some(Attributes::SYSTEM),
        "A" => Some(Attributes::ARCHIVE),
        _ => None,
    }
}

impl Command for AttribCmd {
    fn name(&self) -> &str {
        "attrib"
    }
    fn description(&self) -> &str {
        "Display or change file attributes"
    }
    fn usage(&self) -> &str {
        "Usage: dosattrib {+R|-R|+H|-H|+S|-S|+A|-A} {<paths>} [/S] [/D]\n\
         Display or change the attributes of the files named <paths>.\n\
         Options:\n\
         \t+X  :  set attribute X (R read-only, H hidden, S system, A archive)\n\
         \t-X  :  clear attribute X\n\
         \t/S  :  process matching files in every subdirectory\n\
         \t/D  :  process directories too\n\
         \t--  :  treat every later argument as a path (e.g. a root file named /s)"
    }
    fn execute(&self, args: &[&str], env: &mut Environment<'_>) -> Result<CommandOutput> {
        let mut opts = AttribOptions::default();
        let mut paths = Vec::new();
        let mut flags_done = false;
        for &arg in args {
            if flags_done {
                paths.push(arg);
            } else if arg == "--" {
                flags_done = true;
            } else if arg.eq_ignore_ascii_case("/s") {
                opts.recursive = true;
            } else if arg.eq_ignore_ascii_case("/d") {
                opts.directories = true;
            } else if let Some(bit) = arg.strip_prefix('+').and_then(attribute_flag) {
                opts.set.insert(bit);
            } else if let Some(bit) = arg.strip_prefix('-').and_then(attribute_flag) {
                opts.clear.insert(bit);
            } else if arg.starts_with(['+', '-']) {
                return Err(usage_error(self));
            } else {
                paths.push(arg);
            }
        }
        let report = commands::attrib(&mut env.session(), opts, &paths)?;
        if opts.is_listing() {
            Ok(CommandOutput::Text(report.to_string()))
        } else {
            Ok(CommandOutput::None)
        }
    }
}

// ---------------------------------------------------------------------------
// mkdir
// ---------------------------------------------------------------------------

struct MkdirCmd;
impl Command for MkdirCmd {
    fn name(&self) -> &str {
        "mkdir"
    }
    fn description(&self) -> &str {
        "Create a subdirectory"
    }
    fn usage(&self) -> &str {
        "Usage: dosmkdir <options> <path>\n\
         Creates a subdirectory named <path>.\n\
         Options:\n\
         \t-q  :  silently create all subdirs"
    }
    fn execute(&self, args: &[&str], env: &mut Environment<'_>) -> Result<CommandOutput> {
        let mut parents = false;
        let mut path = None;
        for &arg in args {
            match arg {
                "-q" => parents = true,
                _ if path.is_none() => path = Some(arg),
                _ => return Err(usage_error(self)),
            }
        }
        let path = path.ok_or_else(|| usage_error(self))?;
        commands::make_dir(&mut *env.vol, path, parents)?;
        Ok(CommandOutput::None)
    }
}

// ---------------------------------------------------------------------------
// format
// ---------------------------------------------------------------------------

struct FormatCmd;
impl Command for FormatCmd {
    fn name(&self) -> &str {
        "format"
    }
    fn description(&self) -> &str {
        "Format a filesystem"
    }
    fn usage(&self) -> &str {
        "Usage: dosformat <options> [<label>]\n\
         Format the entire disk or disk image with a filesystem\n\
         with or without a partition table.\n\
         Options:\n\
         \t-s       :  creates a filesystem without a partition table.\n\
         \t-F <fs>  :  specifies a filesystem: FAT, FAT32, or EXFAT."
    }
    fn execute(&self, args: &[&str], env: &mut Environment<'_>) -> Result<CommandOutput> {
        let mut opts = FormatOptions::default();
        let mut iter = args.iter();
        while let Some(&arg) = iter.next() {
            match arg {
                "-s" => opts.no_partition_table = true,
                "-F" => {
                    let fs = iter.next().ok_or_else(|| {
                        DosError::InvalidUsage("Option -F requires an argument.".to_string())
                    })?;
                    opts.fs = fs.parse::<FsKind>()?;
                },
                _ if opts.label.is_none() => opts.label = Some(arg.to_string()),
                _ => return Err(usage_error(self)),
            }
        }
        commands::format(&mut env.session(), &opts)?;
        Ok(CommandOutput::None)
    }
}

/// Register dir, del, move, attrib, mkdir and format.
pub fn register_fs_commands(reg: &mut CommandRegistry) {
    reg.register(Box::new(DirCmd));
    reg.register(Box::new(DelCmd));
    reg.register(Box::new(MoveCmd));
    reg.register(Box::new(AttribCmd));
    reg.register(Box::new(MkdirCmd));
    reg.register(Box::new(FormatCmd));
}
