mod commands;
mod context;

use thiserror::Error;

pub use commands::Command;
pub use context::CommandContext;

/// Result type for command operations
pub type CommandResult = Result<(), CommandError>;

/// Errors that can occur during command execution
#[derive(Debug, Error)]
pub enum CommandError {
    /// The command parameters are invalid
    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),
}
