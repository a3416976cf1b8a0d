//! Command pattern interfaces
//!
//! This module defines the core Command pattern interfaces
//! for the CLI application, enabling a clean separation of concerns.

use std::fmt;
use std::io;

use crate::codec::CodecError;
use crate::harness::HarnessError;
use crate::tiff::errors::TiffError;

/// Errors surfaced by CLI commands
#[derive(Debug)]
pub enum CommandError {
    /// Bad or missing arguments
    Usage(String),
    Tiff(TiffError),
    Codec(CodecError),
    Harness(HarnessError),
    Io(io::Error),
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandError::Usage(msg) => write!(f, "{}", msg),
            CommandError::Tiff(e) => write!(f, "{}", e),
            CommandError::Codec(e) => write!(f, "{}", e),
            CommandError::Harness(e) => write!(f, "{}", e),
            CommandError::Io(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for CommandError {}

impl From<TiffError> for CommandError {
    fn from(error: TiffError) -> Self {
        CommandError::Tiff(error)
    }
}

impl From<CodecError> for CommandError {
    fn from(error: CodecError) -> Self {
        CommandError::Codec(error)
    }
}

impl From<HarnessError> for CommandError {
    fn from(error: HarnessError) -> Self {
        CommandError::Harness(error)
    }
}

impl From<io::Error> for CommandError {
    fn from(error: io::Error) -> Self {
        CommandError::Io(error)
    }
}

/// Result type for CLI commands
pub type CommandResult<T> = Result<T, CommandError>;

/// Represents an executable command in the application
///
/// Command objects encapsulate the logic for a specific CLI operation,
/// allowing for separation of concerns and better testability.
pub trait Command {
    /// Execute the command
    ///
    /// # Returns
    /// Result indicating success or an error
    fn execute(&self) -> CommandResult<()>;
}

/// Factory for creating commands from CLI arguments
///
/// This trait defines the interface for command factories
/// which can parse CLI arguments and create the appropriate Command.
pub trait CommandFactory {
    /// Create a new Command instance based on CLI arguments
    ///
    /// # Arguments
    /// * `args` - CLI argument matches from clap
    ///
    /// # Returns
    /// A command that implements the Command trait, or an error
    fn create_command(&self, args: &clap::ArgMatches) -> CommandResult<Box<dyn Command>>;
}
