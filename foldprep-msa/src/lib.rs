//! # Multiple sequence alignments
//!
//! [`Msa`] holds an alignment in A3M row form: match columns are upper-case
//! residues or `-`, insertions relative to the query are lower-case residues.
//! The first row is always the query, and every row has the same number of
//! match columns.
//!
//! Alignments are produced from search tool output ([`Msa::from_stockholm`]),
//! from user supplied text ([`Msa::from_a3m`]), and by merging the alignments of
//! several databases with [`merge`].
//!
//! ```
//! use foldprep_msa::{Msa, merge};
//! use foldprep_core::PolymerType;
//!
//! let a = Msa::from_a3m("MKV", PolymerType::Protein, ">q\nMKV\n>a\nMRV\n", None, false).unwrap();
//! let b = Msa::from_a3m("MKV", PolymerType::Protein, ">q\nMKV\n>b\nMRV\n>c\nLKV\n", None, false).unwrap();
//! let merged = merge(&[a, b], true).unwrap();
//! assert_eq!(merged.depth(), 3);
//! ```
pub mod consts;
pub mod errors;
pub mod merge;
pub mod msa;
pub mod stockholm;

pub use errors::{MsaError, Result};
pub use merge::merge;
pub use msa::Msa;
