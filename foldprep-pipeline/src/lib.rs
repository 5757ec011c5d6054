//! # Data pipeline
//!
//! Fills in the MSAs and structural templates of every protein and RNA chain of
//! a fold input.
//!
//! For a protein chain four jackhmmer searches run (uniref90, mgnify, small BFD
//! and UniProt). The first three are merged and deduplicated into the unpaired
//! MSA and UniProt becomes the paired MSA. The raw uniref90 alignment is the
//! profile for an hmmsearch template search, whose hits are filtered and
//! resolved to mmCIF structures. RNA chains get three nhmmer searches merged
//! into an unpaired MSA. Other chains pass through.
//!
//! Chains that already carry user MSAs are left alone. Results are cached per
//! sequence, so homomers are searched once.
//!
//! ```rust,ignore
//! use foldprep_pipeline::{DataPipeline, DataPipelineConfig, PipelineDriver};
//!
//! let config = DataPipelineConfig::from_file(Path::new("pipeline.yaml"))?;
//! let driver = PipelineDriver::new(DataPipeline::from_config(&config), config.num_workers)?;
//! let processed = driver.process(&FoldInput::from_file(Path::new("input.json"))?)?;
//! ```
pub mod cache;
pub mod config;
pub mod consts;
pub mod driver;
pub mod errors;
pub mod pipeline;
pub mod search_configs;
pub mod validation;

pub use cache::{CacheKey, SequenceCache};
pub use config::{DataPipelineConfig, DatabasePaths, ToolBinaries};
pub use driver::PipelineDriver;
pub use errors::{PipelineError, Result};
pub use pipeline::{DataPipeline, ProteinSearchResult};
pub use search_configs::{ProteinSearchConfigs, RnaSearchConfigs};
pub use validation::{ProteinOverrides, validate_protein_overrides};
