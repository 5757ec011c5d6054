//! The seams between the data pipeline and the search tools.

use std::time::{Duration, Instant};

use foldprep_msa::{Msa, MsaError};
use tracing::info;

use crate::config::{MsaToolConfig, RunConfig, TemplateToolConfig};
use crate::errors::{Result, SearchToolError};
use crate::hmmsearch::{HmmsearchOutput, run_hmmsearch};
use crate::jackhmmer::run_jackhmmer;
use crate::nhmmer::run_nhmmer;

///
/// Runs one MSA search for a sequence and returns the parsed alignment, query first.
///
/// Implementations must be safe to call from several threads at once.
///
pub trait SearchInvoker: Send + Sync {
    fn search(&self, sequence: &str, run_config: &RunConfig) -> Result<Msa>;
}

///
/// Searches a template database with a profile built from an MSA.
///
pub trait TemplateSearcher: Send + Sync {
    fn search_templates(&self, profile_msa: &Msa, config: &TemplateToolConfig) -> Result<HmmsearchOutput>;
}

///
/// Runs the HMMER suite as child processes.
///
#[derive(Debug, Clone, Default)]
pub struct HmmerSearchInvoker {
    timeout: Option<Duration>,
}

impl HmmerSearchInvoker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Kill any single tool invocation that runs longer than `timeout`.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self { timeout: Some(timeout) }
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }
}

fn unparsable(tool: &str) -> impl Fn(MsaError) -> SearchToolError + '_ {
    move |e| SearchToolError::Unparsable {
        tool: tool.to_string(),
        message: e.to_string(),
    }
}

impl SearchInvoker for HmmerSearchInvoker {
    fn search(&self, sequence: &str, run_config: &RunConfig) -> Result<Msa> {
        let tool = run_config.tool_name();
        let database = &run_config.database().name;
        info!("Getting {} MSA from {} for a sequence of length {}", tool, database, sequence.len());
        let start = Instant::now();

        let msa = match &run_config.config {
            MsaToolConfig::Jackhmmer(config) => {
                let sto = run_jackhmmer(sequence, config, self.timeout)?;
                Msa::from_stockholm(
                    sequence,
                    run_config.chain_poly_type,
                    &sto,
                    Some(config.max_sequences),
                    run_config.crop_size,
                    false,
                )
                .map_err(unparsable(tool))?
            }
            MsaToolConfig::Nhmmer(config) => {
                let sto = run_nhmmer(sequence, run_config.chain_poly_type, config, self.timeout)?;
                Msa::from_stockholm(
                    sequence,
                    run_config.chain_poly_type,
                    &sto,
                    None,
                    run_config.crop_size,
                    false,
                )
                .map_err(unparsable(tool))?
            }
        };

        info!(
            "Getting {} MSA from {} took {:.2} seconds ({} rows)",
            tool,
            database,
            start.elapsed().as_secs_f64(),
            msa.depth()
        );
        Ok(msa)
    }
}

impl TemplateSearcher for HmmerSearchInvoker {
    fn search_templates(&self, profile_msa: &Msa, config: &TemplateToolConfig) -> Result<HmmsearchOutput> {
        run_hmmsearch(profile_msa, config, self.timeout)
    }
}
