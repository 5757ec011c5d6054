//! # Search tools
//!
//! Configuration value objects and subprocess wrappers for the external search
//! tools the data pipeline drives:
//!
//! - [`config`]: `DatabaseConfig`, `RunConfig` and the per-tool configs, plus the
//!   template search and filter configs. All are plain values compared by content.
//! - [`invoker`]: the [`SearchInvoker`] and [`TemplateSearcher`] seams, and
//!   [`HmmerSearchInvoker`], which runs the HMMER suite as child processes.
//! - [`runner`]: spawning a tool with an optional timeout.
//!
//! Nothing here caches; memoization lives in the pipeline crate.
pub mod config;
pub mod consts;
pub mod errors;
pub mod hmmbuild;
pub mod hmmsearch;
pub mod invoker;
pub mod jackhmmer;
pub mod nhmmer;
pub mod runner;
mod utils;

pub use config::{
    DatabaseConfig, HmmsearchConfig, JackhmmerConfig, MsaToolConfig, NhmmerConfig, RunConfig,
    TemplateFilterConfig, TemplateToolConfig, TemplatesConfig,
};
pub use errors::{Result, SearchToolError};
pub use hmmsearch::HmmsearchOutput;
pub use invoker::{HmmerSearchInvoker, SearchInvoker, TemplateSearcher};
