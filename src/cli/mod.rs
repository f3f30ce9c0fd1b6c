//! CLI layer: argument parsing and the interactive session

pub mod args;
pub mod commands;
pub mod error;
pub mod output;

pub use args::{Cli, ReplCommand, ReplLine};
pub use commands::{execute, execute_line, parse_line, run_session, Flow};
pub use error::{CliError, CliResult};
