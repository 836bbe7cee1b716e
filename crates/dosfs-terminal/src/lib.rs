//! Command interpreter for dosfs.
//!
//! Commands implement the `Command` trait and are registered by name. The
//! registry resolves a command name, and the command parses its own flags
//! before handing off to the engine in `dosfs-core`.

mod commands;
pub mod fs_commands;
mod interpreter;
pub mod io_commands;
pub mod prompter;

/// Register every dosfs command into a registry.
pub use commands::register_builtins;
/// A single executable command trait.
pub use interpreter::Command;
/// Output produced by a command (text or raw bytes).
pub use interpreter::CommandOutput;
/// Registry of available commands with dispatch.
pub use interpreter::CommandRegistry;
/// Shared mutable environment passed to every command.
pub use interpreter::Environment;
/// Tokenize a command line respecting quotes.
pub use interpreter::tokenize;
/// Yes/no prompter reading answers from stdin.
pub use prompter::StdinPrompter;
