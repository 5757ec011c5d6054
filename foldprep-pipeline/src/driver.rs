use std::time::{Duration, Instant};

use foldprep_core::{Chain, FoldInput};
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use tracing::{error, info};

use crate::errors::{PipelineError, Result};
use crate::pipeline::DataPipeline;

///
/// Processes every chain of a fold input on a bounded worker pool.
///
/// Chains are independent apart from the shared sequence cache; output chain
/// order always matches input order.
///
pub struct PipelineDriver {
    pipeline: DataPipeline,
    pool: ThreadPool,
}

impl PipelineDriver {
    ///
    /// # Arguments
    /// - pipeline: the per-chain processor
    /// - num_workers: chains processed at once; `None` uses one per CPU
    ///
    pub fn new(pipeline: DataPipeline, num_workers: Option<usize>) -> Result<Self> {
        let mut builder = ThreadPoolBuilder::new().thread_name(|i| format!("foldprep-worker-{}", i));
        if let Some(num_workers) = num_workers {
            builder = builder.num_threads(num_workers);
        }
        let pool = builder
            .build()
            .map_err(|e| PipelineError::InvalidArgument(format!("could not start worker pool: {}", e)))?;
        Ok(Self { pipeline, pool })
    }

    pub fn pipeline(&self) -> &DataPipeline {
        &self.pipeline
    }

    pub fn num_workers(&self) -> usize {
        self.pool.current_num_threads()
    }

    pub fn process(&self, input: &FoldInput) -> Result<FoldInput> {
        self.process_with_progress(input, |_, _| {})
    }

    ///
    /// Like [`PipelineDriver::process`], calling `on_chain_done` with each
    /// finished chain and how long it took. Calls arrive in completion order.
    ///
    pub fn process_with_progress<F>(&self, input: &FoldInput, on_chain_done: F) -> Result<FoldInput>
    where
        F: Fn(&Chain, Duration) + Sync,
    {
        info!("Processing {} chains of {}", input.chains.len(), input.name);
        let start = Instant::now();

        let chains = self.pool.install(|| {
            input
                .chains
                .par_iter()
                .map(|chain| {
                    let chain_start = Instant::now();
                    let processed = self.pipeline.process_chain(chain);
                    let elapsed = chain_start.elapsed();
                    match &processed {
                        Ok(_) => info!(
                            "Processing chain {} took {:.2} seconds",
                            chain.id(),
                            elapsed.as_secs_f64()
                        ),
                        Err(e) => error!("Processing chain {} failed: {}", chain.id(), e),
                    }
                    on_chain_done(chain, elapsed);
                    processed
                })
                .collect::<Result<Vec<Chain>>>()
        })?;

        info!(
            "Processed {} chains of {} in {:.2} seconds",
            chains.len(),
            input.name,
            start.elapsed().as_secs_f64()
        );
        Ok(input.with_chains(chains))
    }
}
