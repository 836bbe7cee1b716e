//! Built-in command registration.

use crate::interpreter::CommandRegistry;

/// Register all dosfs commands.
pub fn register_builtins(reg: &mut CommandRegistry) {
    crate::fs_commands::register_fs_commands(reg);
    crate::io_commands::register_io_commands(reg);
}
