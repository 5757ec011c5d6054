use std::sync::Arc;

use foldprep_msa::MsaError;
use foldprep_templates::TemplateError;
use foldprep_tools::SearchToolError;
use thiserror::Error;

///
/// Errors from processing a chain.
///
/// Cloneable: a failed cached computation is handed to every chain that shares
/// its sequence.
///
#[derive(Error, Debug, Clone)]
pub enum PipelineError {
    #[error("Chain {chain_id}: {message}")]
    Configuration { chain_id: String, message: String },

    #[error(transparent)]
    SearchTool(Arc<SearchToolError>),

    #[error(transparent)]
    Msa(#[from] MsaError),

    #[error(transparent)]
    Template(Arc<TemplateError>),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl From<SearchToolError> for PipelineError {
    fn from(e: SearchToolError) -> Self {
        PipelineError::SearchTool(Arc::new(e))
    }
}

impl From<TemplateError> for PipelineError {
    fn from(e: TemplateError) -> Self {
        match e {
            TemplateError::SearchTool(e) => PipelineError::SearchTool(Arc::new(e)),
            other => PipelineError::Template(Arc::new(other)),
        }
    }
}

pub type Result<T> = std::result::Result<T, PipelineError>;
