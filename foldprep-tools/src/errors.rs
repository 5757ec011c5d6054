use std::path::PathBuf;

use thiserror::Error;

///
/// Failure of an external search tool. Fatal for the sequence being searched.
///
#[derive(Error, Debug)]
pub enum SearchToolError {
    #[error("{tool} binary not found: {}", binary.display())]
    ToolNotFound { tool: String, binary: PathBuf },

    #[error("{tool} exited with {status}: {stderr}")]
    Failed {
        tool: String,
        status: String,
        stderr: String,
    },

    #[error("{tool} timed out after {seconds:.1} seconds: {stderr}")]
    Timeout {
        tool: String,
        seconds: f64,
        stderr: String,
    },

    #[error("Could not parse {tool} output: {message}")]
    Unparsable { tool: String, message: String },

    #[error("Database {name} not found at {}", path.display())]
    DatabaseMissing { name: String, path: PathBuf },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SearchToolError>;
