//! File content commands: read, write.

use std::io::Read;

use dosfs_core::path::fix_path;
use dosfs_types::error::Result;
use dosfs_vfs::WriteMode;

use crate::interpreter::{Command, CommandOutput, CommandRegistry, Environment, usage_error};

// ---------------------------------------------------------------------------
// read
// ---------------------------------------------------------------------------

struct ReadCmd;
impl Command for ReadCmd {
    fn name(&self) -> &str {
        "read"
    }
    fn description(&self) -> &str {
        "Print the content of files"
    }
    fn usage(&self) -> &str {
        "Usage: dosread {<paths>}\n\
         Read the files <paths> and send their content to the standard output."
    }
    fn execute(&self, args: &[&str], env: &mut Environment<'_>) -> Result<CommandOutput> {
        if args.is_empty() {
            return Err(usage_error(self));
        }
        let mut out = Vec::new();
        for &arg in args {
            let path = fix_path(arg);
            let data = env
                .vol
                .read_file(&path)
                .map_err(|e| e.at(path.as_str()).for_argument(arg))?;
            out.extend_from_slice(&data);
        }
        Ok(CommandOutput::Bytes(out))
    }
}

// ---------------------------------------------------------------------------
// write
// ---------------------------------------------------------------------------

struct WriteCmd;
impl Command for WriteCmd {
    fn name(&self) -> &str {
        "write"
    }
    fn description(&self) -> &str {
        "Write standard input to a file"
    }
    fn usage(&self) -> &str {
        "Usage: doswrite <options> <path>\n\
         Write the content of the standard input to the file <path>.\n\
         Options:\n\
         \t-a  :  append to the file if it already exists\n\
         \t-q  :  silently overwrite the file if it already exists"
    }
    fn execute(&self, args: &[&str], env: &mut Environment<'_>) -> Result<CommandOutput> {
        let mut mode = WriteMode::CreateNew;
        let mut path = None;
        for &arg in args {
            match arg {
                "-a" => mode = WriteMode::Append,
                "-q" => mode = WriteMode::Truncate,
                _ if path.is_none() => path = Some(arg),
                _ => return Err(usage_error(self)),
            }
        }
        let raw = path.ok_or_else(|| usage_error(self))?;
        let data = match env.stdin.take() {
            Some(data) => data,
            None => {
                let mut buf = Vec::new();
                std::io::stdin().lock().read_to_end(&mut buf)?;
                buf
            },
        };
        let path = fix_path(raw);
        env.vol
            .write_file(&path, &data, mode)
            .map_err(|e| e.at(path.as_str()).for_argument(raw))?;
        log::info!("wrote {} bytes to {path}", data.len());
        Ok(CommandOutput::None)
    }
}

/// Register read and write.
pub fn register_io_commands(reg: &mut CommandRegistry) {
    reg.register(Box::new(ReadCmd));
    reg.register(Box::new(WriteCmd));
}
