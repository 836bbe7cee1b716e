//! dosfs command engine.
//!
//! Bulk DOS-style operations over a mounted [`Volume`]: a user path is split
//! into a directory and a wildcard pattern ([`path`]), the matching entries
//! are visited by the tree walker ([`walker`]), and destructive steps go
//! through the confirmation gate ([`confirm`]). The `dir`, `del`, `move`,
//! `attrib`, `mkdir` and `format` handlers live in [`commands`].

// Re-exports from dosfs-types and dosfs-vfs.
pub use dosfs_types::config;
pub use dosfs_types::error;
pub use dosfs_vfs as vfs;
pub use dosfs_vfs::Volume;

pub mod commands;
pub mod confirm;
pub mod path;
pub mod session;
pub mod walker;

pub use confirm::{ConfirmPolicy, Prompter};
pub use path::VolumePath;
pub use session::Session;
pub use walker::{Visitor, walk};
