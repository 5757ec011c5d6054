use foldprep_tools::SearchToolError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("Structure {0} not found")]
    StructureNotFound(String),

    #[error("Could not read structure {id}: {message}")]
    StructureUnreadable { id: String, message: String },

    #[error("Malformed {format}: {message}")]
    Parse {
        format: &'static str,
        message: String,
    },

    #[error(transparent)]
    SearchTool(#[from] SearchToolError),
}

pub type Result<T> = std::result::Result<T, TemplateError>;
