//! Error types for impress-fna

use std::path::PathBuf;

use impress_attrmap::AttrError;
use thiserror::Error;

/// Result type alias for command runs
pub type Result<T> = std::result::Result<T, RunError>;

/// Errors that abort a run
#[derive(Error, Debug)]
pub enum RunError {
    /// The token is not a command name
    #[error("unknown command: {0}")]
    UnknownCommand(String),

    /// The token stream ended where a command needed an argument
    #[error("{command}: expected {expected}")]
    MissingArgument {
        command: String,
        expected: &'static str,
    },

    /// A map or value operation failed
    #[error("{command}: {source}")]
    Command {
        command: String,
        #[source]
        source: AttrError,
    },

    /// The command needs a file name and none was given
    #[error("{command}: no file name; use `file` first")]
    NoFile { command: String },

    /// The renamer refused or failed
    #[error("cannot rename {} to {}: {reason}", from.display(), to.display())]
    Rename {
        from: PathBuf,
        to: PathBuf,
        reason: String,
    },

    /// A configuration file could not be used
    #[error("config {}: {reason}", path.display())]
    Config { path: PathBuf, reason: String },

    /// Writing output or touching the file system failed
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl RunError {
    pub(crate) fn command(command: &str) -> impl FnOnce(AttrError) -> RunError + '_ {
        move |source| RunError::Command {
            command: command.to_string(),
            source,
        }
    }
}
