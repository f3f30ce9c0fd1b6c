//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueEnum, ValueHint};

use crate::application::ExportKind;
use crate::domain::PointerButton;

/// Interactive organization chart editor
#[derive(Parser, Debug)]
#[command(name = "orgchart")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Debug output on stderr (-d info, -dd debug, -ddd trace)
    #[arg(short = 'd', long = "debug", action = ArgAction::Count)]
    pub debug: u8,

    /// Config file layered over the global one
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Print the effective configuration and exit
    #[arg(long)]
    pub show_config: bool,

    /// Print a config file template and exit
    #[arg(long)]
    pub config_template: bool,

    /// Print shell completions and exit
    #[arg(long, value_enum, value_name = "SHELL")]
    pub completion: Option<clap_complete::Shell>,

    /// Chart (JSON) to open
    #[arg(value_hint = ValueHint::FilePath)]
    pub chart: Option<PathBuf>,
}

/// One line of the interactive session.
#[derive(Parser, Debug)]
#[command(multicall = true)]
pub struct ReplLine {
    #[command(subcommand)]
    pub command: ReplCommand,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum ReplCommand {
    /// Draw the chart
    Show,

    /// Append a placeholder child
    Add {
        /// Parent node id
        parent: String,
    },

    /// Select a node for editing
    Select {
        /// Node id
        id: String,
    },

    /// Change a field of the selected node (uncommitted)
    Set {
        #[arg(value_enum)]
        field: EditField,
        /// New value (rest of the line, taken verbatim)
        #[arg(required = true, num_args = 1.., allow_hyphen_values = true)]
        value: Vec<String>,
    },

    /// Embed an image file into the selected node (uncommitted)
    Image {
        #[arg(value_hint = ValueHint::FilePath)]
        path: PathBuf,
    },

    /// Remove an optional field of the selected node (uncommitted)
    Clear {
        #[arg(value_enum)]
        field: OptionalField,
    },

    /// Apply pending edits to the chart
    Commit,

    /// Drop pending edits
    Cancel,

    /// Remove a node and its subtree
    Delete {
        /// Node id
        id: String,
    },

    /// Expand or collapse a node
    Toggle {
        /// Node id
        id: String,
    },

    /// Expand every node
    ExpandAll,

    /// Collapse every node
    CollapseAll,

    /// Change the zoom level
    Zoom {
        #[arg(value_enum)]
        step: ZoomStep,
    },

    /// Pointer events for panning
    Pan {
        #[command(subcommand)]
        action: PanAction,
    },

    /// Show or hide node images
    Images {
        #[arg(value_enum)]
        state: Switch,
    },

    /// Export the chart (json, picture or document)
    Export {
        kind: ExportKind,
        /// Output file (default: <export_dir>/<base_name>.<ext>)
        #[arg(value_hint = ValueHint::FilePath)]
        path: Option<PathBuf>,
    },

    /// Replace the chart with a JSON file
    Import {
        #[arg(value_hint = ValueHint::FilePath)]
        path: PathBuf,
    },

    /// Leave the session
    #[command(alias = "exit")]
    Quit,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum PanAction {
    /// Press a pointer button
    #[command(allow_negative_numbers = true)]
    Down {
        x: f64,
        y: f64,
        #[arg(value_enum, default_value_t = ButtonArg::Left)]
        button: ButtonArg,
    },
    /// Move the pointer
    #[command(allow_negative_numbers = true)]
    Move { x: f64, y: f64 },
    /// Release the pointer button
    Up,
    /// Pointer left the canvas
    Leave,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum EditField {
    Title,
    Description,
    Image,
    Stats,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OptionalField {
    Description,
    Image,
    Stats,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ZoomStep {
    In,
    Out,
    Reset,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Switch {
    On,
    Off,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ButtonArg {
    Left,
    Middle,
    Right,
}

impl From<ButtonArg> for PointerButton {
    fn from(button: ButtonArg) -> Self {
        match button {
            ButtonArg::Left => PointerButton::Left,
            ButtonArg::Middle => PointerButton::Middle,
            ButtonArg::Right => PointerButton::Right,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
        ReplLine::command().debug_assert();
    }

    #[test]
    fn given_set_with_several_words_then_collects_value() {
        let line = ReplLine::try_parse_from(["set", "title", "Sales", "Department"]).unwrap();
        assert_eq!(
            line.command,
            ReplCommand::Set {
                field: EditField::Title,
                value: vec!["Sales".into(), "Department".into()],
            }
        );
    }

    #[test]
    fn given_negative_pan_coordinates_then_parses() {
        let line = ReplLine::try_parse_from(["pan", "move", "-12", "4.5"]).unwrap();
        assert_eq!(
            line.command,
            ReplCommand::Pan {
                action: PanAction::Move { x: -12.0, y: 4.5 }
            }
        );
    }

    #[test]
    fn given_export_alias_then_maps_to_kind() {
        let line = ReplLine::try_parse_from(["export", "pdf"]).unwrap();
        assert_eq!(
            line.command,
            ReplCommand::Export {
                kind: ExportKind::Document,
                path: None
            }
        );
    }
}
