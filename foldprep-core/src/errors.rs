use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Invalid sequence entry: {0}")]
    InvalidEntry(String),

    #[error("Unsupported fold input dialect: {0}")]
    UnsupportedDialect(String),

    #[error("Template has {0} query indices but {1} template indices")]
    TemplateIndexMismatch(usize, usize),

    #[error("Duplicate chain id: {0}")]
    DuplicateChainId(String),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CoreError>;
