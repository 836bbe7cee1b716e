//! Global option parsing.
//!
//! The tool is reached either as `dosfs [-f image] --<command> args...` or
//! through a link named `dos<command>` (`dosdir`, `dosdel`, ...).

use std::path::{Path, PathBuf};

use anyhow::{Result, bail};

pub const USAGE: &str = "Usage: dosfs [-f <image>] --<command> <args>\n\
    \x20  or: dos<command> [-f <image>] <args>\n\
    Global options:\n\
    \t-f <image>  :  volume image (default from dosfs.toml)\n\
    \t-h          :  show help";

/// One parsed command line.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Invocation {
    pub image: Option<PathBuf>,
    pub command: Option<String>,
    pub args: Vec<String>,
    pub help: bool,
}

/// Command implied by the program name: `dosdir` runs `dir`.
pub fn command_from_program(program: &str) -> Option<String> {
    let stem = Path::new(program).file_stem()?.to_str()?;
    let command = stem.strip_prefix("dos")?;
    if command.is_empty() || command.eq_ignore_ascii_case("fs") {
        return None;
    }
    Some(command.to_ascii_lowercase())
}

/// Split `args` (without the program name) into global options, the
/// command name and the command's own arguments.
///
/// Global options are only recognised before the first command argument.
pub fn parse(program: &str, args: impl IntoIterator<Item = String>) -> Result<Invocation> {
    let mut inv = Invocation {
        command: command_from_program(program),
        ..Invocation::default()
    };
    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-f" if inv.args.is_empty() => match iter.next() {
                Some(image) => inv.image = Some(PathBuf::from(image)),
                None => bail!("Option -f requires an argument."),
            },
            "-h" | "--help" if inv.args.is_empty() => inv.help = true,
            _ if inv.command.is_none() => match arg.strip_prefix("--") {
                Some(name) if !name.is_empty() => inv.command = Some(name.to_ascii_lowercase()),
                _ => bail!("Unrecognized option {arg}"),
            },
            _ => inv.args.push(arg),
        }
    }
    Ok(inv)
}

/// Commands that leave the image changed.
pub fn mutates(command: &str) -> bool {
    matches!(
        command,
        "del" | "move" | "attrib" | "mkdir" | "format" | "write"
    )
}

/// Device name shown in prompts: the image file name.
pub fn device_name(image: &Path) -> String {
    image
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| image.display().to_string())
}
