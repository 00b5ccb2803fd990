//! Program loading errors.

use camino::Utf8PathBuf;
use thiserror::Error;

/// An error that occurred while loading a module into a [`crate::Program`].
#[derive(Debug, Clone, Error)]
pub enum ProgramError {
    /// The module source could not be read.
    #[error("failed to read {path}")]
    Read {
        /// The path that was requested.
        path: Utf8PathBuf,
    },

    /// The module source is not valid TypeScript.
    #[error("{path}:{line}:{column}: {message}")]
    Parse {
        /// The module path.
        path: Utf8PathBuf,
        /// 1-indexed line of the syntax error.
        line: usize,
        /// 1-indexed column of the syntax error.
        column: usize,
        /// The parser message.
        message: String,
    },
}

impl ProgramError {
    /// Returns the path of the module the error belongs to.
    pub fn path(&self) -> &Utf8PathBuf {
        match self {
            ProgramError::Read { path } | ProgramError::Parse { path, .. } => path,
        }
    }
}
