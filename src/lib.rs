//! orgchart: an editable organization chart held as immutable tree snapshots.
//!
//! Layers, innermost first:
//! - [`domain`]: tree engine, view state, edit session (no I/O)
//! - [`application`]: import/export use cases and services
//! - [`infrastructure`]: filesystem, text renderer, DI container
//! - [`cli`]: argument parsing and the interactive session

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
