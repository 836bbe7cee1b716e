//! Command trait, registry, and dispatch logic.

use std::collections::HashMap;

use dosfs_core::{Prompter, Session};
use dosfs_types::error::{DosError, Result};
use dosfs_vfs::Volume;

/// Output produced by a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutput {
    /// Text for stdout.
    Text(String),
    /// Raw file content for stdout.
    Bytes(Vec<u8>),
    /// Command produced no visible output.
    None,
}

/// Shared mutable environment passed to every command.
pub struct Environment<'a> {
    /// The mounted volume.
    pub vol: &'a mut dyn Volume,
    /// Answers confirmation questions.
    pub prompter: &'a mut dyn Prompter,
    /// Device name shown in prompts and listings.
    pub device: String,
    /// Data for `write`. `None` reads the process stdin.
    pub stdin: Option<Vec<u8>>,
}

impl Environment<'_> {
    /// Borrow the environment as an engine session.
    pub fn session(&mut self) -> Session<'_> {
        Session::new(&mut *self.vol, &mut *self.prompter, self.device.clone())
    }
}

/// A single executable command.
pub trait Command {
    /// The command name (what the user types).
    fn name(&self) -> &str;

    /// One-line description for help output.
    fn description(&self) -> &str;

    /// Usage text, including the option list.
    fn usage(&self) -> &str;

    /// Execute the command with the given arguments and environment.
    fn execute(&self, args: &[&str], env: &mut Environment<'_>) -> Result<CommandOutput>;
}

/// Usage error carrying the command's usage text.
pub(crate) fn usage_error(cmd: &dyn Command) -> DosError {
    DosError::InvalidUsage(cmd.usage().to_string())
}

/// Registry of available commands with dispatch.
pub struct CommandRegistry {
    commands: HashMap<String, Box<dyn Command>>,
}

impl CommandRegistry {
    /// Create an empty command registry.
    pub fn new() -> Self {
        Self {
            commands: HashMap::new(),
        }
    }

    /// Register a command. Replaces any existing command with the same name.
    pub fn register(&mut self, cmd: Box<dyn Command>) {
        self.commands.insert(cmd.name().to_string(), cmd);
    }

    /// Look up a command by case-insensitive name.
    pub fn get(&self, name: &str) -> Option<&dyn Command> {
        self.commands
            .get(name.to_ascii_lowercase().as_str())
            .map(|c| c.as_ref())
    }

    /// Run command `name` with already split arguments.
    pub fn run(
        &self,
        name: &str,
        args: &[&str],
        env: &mut Environment<'_>,
    ) -> Result<CommandOutput> {
        let cmd = self
            .get(name)
            .ok_or_else(|| DosError::InvalidUsage(format!("unknown command: {name}")))?;
        log::debug!("{} {args:?}", cmd.name());
        cmd.execute(args, env)
    }

    /// Tokenize and run a command line.
    pub fn execute(&self, line: &str, env: &mut Environment<'_>) -> Result<CommandOutput> {
        let tokens = tokenize(line)?;
        let Some((name, rest)) = tokens.split_first() else {
            return Ok(CommandOutput::None);
        };
        let args: Vec<&str> = rest.iter().map(String::as_str).collect();
        self.run(name, &args, env)
    }

    /// Return a sorted list of (name, description) pairs.
    pub fn list_commands(&self) -> Vec<(&str, &str)> {
        let mut cmds: Vec<(&str, &str)> = self
            .commands
            .values()
            .map(|c| (c.name(), c.description()))
            .collect();
        cmds.sort_by_key(|(name, _)| *name);
        cmds
    }

    /// Overview of every command, for `dosfs -h`.
    pub fn help(&self) -> String {
        let mut lines = vec!["Commands:".to_string()];
        for (name, description) in self.list_commands() {
            lines.push(format!("  {name:<8} {description}"));
        }
        lines.join("\n")
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Split a command line on whitespace, honouring single and double quotes.
///
/// Backslashes are kept: they are path separators here, not escapes.
pub fn tokenize(input: &str) -> Result<Vec<String>> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;
    let mut in_token = false;

    for ch in input.chars() {
        match quote {
            Some(q) if ch == q => quote = None,
            Some(_) => current.push(ch),
            None => match ch {
                '\'' | '"' => {
                    quote = Some(ch);
                    in_token = true;
                },
                c if c.is_whitespace() => {
                    if in_token {
                        tokens.push(std::mem::take(&mut current));
                        in_token = false;
                    }
                },
                _ => {
                    current.push(ch);
                    in_token = true;
                },
            },
        }
    }

    if quote.is_some() {
        return Err(DosError::InvalidUsage("unterminated quote".to_string()));
    }
    if in_token {
        tokens.push(current);
    }
    Ok(tokens)
}
