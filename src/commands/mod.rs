//! CLI command implementations
//!
//! This module contains implementations of various commands
//! supported by the CLI application using the Command pattern.

pub mod command_traits;
pub mod split_command;
pub mod merge_command;
pub mod inspect_command;
pub mod conform_command;

pub use command_traits::{Command, CommandError, CommandFactory, CommandResult};
pub use split_command::SplitCommand;
pub use merge_command::MergeCommand;
pub use inspect_command::InspectCommand;
pub use conform_command::ConformCommand;

use clap::ArgMatches;

use crate::codec::ToolsCodec;
use crate::harness::HarnessConfig;

/// Backend picked with `--backend`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendChoice {
    Container,
    Raster,
    Tools,
}

impl BackendChoice {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "container" => Some(BackendChoice::Container),
            "raster" => Some(BackendChoice::Raster),
            "tools" => Some(BackendChoice::Tools),
            _ => None,
        }
    }

    /// Key in the capability table
    pub fn name(&self) -> &'static str {
        match self {
            BackendChoice::Container => "container",
            BackendChoice::Raster => "raster",
            BackendChoice::Tools => "tools",
        }
    }

    pub fn all() -> [BackendChoice; 3] {
        [BackendChoice::Container, BackendChoice::Raster, BackendChoice::Tools]
    }

    /// Reads a single backend from the `backend` argument
    pub fn from_args(args: &ArgMatches) -> CommandResult<Self> {
        let name = args
            .get_one::<String>("backend")
            .map(String::as_str)
            .unwrap_or("container");
        Self::from_name(name).ok_or_else(|| CommandError::Usage(format!("Unknown backend: {}", name)))
    }
}

/// Tools backend configured from the environment
pub(crate) fn tools_codec(config: &HarnessConfig) -> ToolsCodec {
    match &config.libtiff_dir {
        Some(dir) => ToolsCodec::with_tool_dir(dir),
        None => ToolsCodec::new(),
    }
}

/// Factory for creating command instances based on CLI arguments
///
/// This factory examines the subcommand and creates the matching command
/// instance for execution.
pub struct TiffpagesCommandFactory;

impl TiffpagesCommandFactory {
    /// Create a new factory instance
    pub fn new() -> Self {
        TiffpagesCommandFactory
    }
}

impl Default for TiffpagesCommandFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandFactory for TiffpagesCommandFactory {
    fn create_command(&self, args: &ArgMatches) -> CommandResult<Box<dyn Command>> {
        match args.subcommand() {
            Some(("split", sub)) => Ok(Box::new(SplitCommand::new(sub)?)),
            Some(("merge", sub)) => Ok(Box::new(MergeCommand::new(sub)?)),
            Some(("inspect", sub)) => Ok(Box::new(InspectCommand::new(sub)?)),
            Some(("conform", sub)) => Ok(Box::new(ConformCommand::new(sub)?)),
            Some((name, _)) => Err(CommandError::Usage(format!("Unknown command: {}", name))),
            None => Err(CommandError::Usage("No command given; try --help".to_string())),
        }
    }
}
