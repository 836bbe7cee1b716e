//! Foundation types for dosfs.
//!
//! This crate holds what every other dosfs crate shares: the error taxonomy
//! returned by the volume engine and the command handlers, and the TOML
//! configuration of the command-line tool.

pub mod config;
pub mod error;
