use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MsaError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("MSA row {index} ({description}) has {found} aligned columns, expected {expected}")]
    RowLength {
        index: usize,
        description: String,
        found: usize,
        expected: usize,
    },

    #[error("MSA query row {found} does not match the chain sequence {expected}")]
    QueryMismatch { found: String, expected: String },

    #[error("Malformed {format} alignment: {message}")]
    Parse {
        format: &'static str,
        message: String,
    },
}

pub type Result<T> = std::result::Result<T, MsaError>;
