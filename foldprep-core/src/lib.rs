//! # Core data model for foldprep
//!
//! This crate holds the value types that flow through the data pipeline:
//!
//! - [`models::Chain`]: a closed sum over the polymer kinds found in a fold input
//!   (protein, RNA, DNA, ligand). Protein and RNA chains carry the optional MSA and
//!   template fields that the pipeline fills in.
//! - [`models::FoldInput`]: an ordered collection of chains plus top-level metadata,
//!   read from and written to the fold input JSON dialect.
//! - [`models::Template`]: the structural template artifact consumed downstream.
//!
//! All of these are immutable values. Processing never mutates a chain in place,
//! it builds a new chain with the computed fields set.
pub mod consts;
pub mod errors;
pub mod models;
pub mod utils;

// re-export for cleaner imports
pub use errors::{CoreError, Result};
pub use models::{Chain, DnaChain, FoldInput, Ligand, PolymerType, ProteinChain, RnaChain, Template};
