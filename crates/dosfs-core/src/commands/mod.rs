//! Command handlers.
//!
//! Each handler takes a [`Session`](crate::Session), its parsed options and
//! the raw path arguments, and returns a report for display or the first
//! error. Argument parsing lives in the terminal crate.

pub mod attrib;
pub mod del;
pub mod dir;
pub mod format;
pub mod mkdir;
pub mod mv;

pub use attrib::{AttribOptions, AttribReport, attrib};
pub use del::{DeleteOptions, DeleteSummary, delete};
pub use dir::{DirListing, ListOptions, ListTotals, list};
pub use format::format;
pub use mkdir::make_dir;
pub use mv::{MoveOptions, MoveSummary, move_entries};

#[cfg(test)]
mod tests;
