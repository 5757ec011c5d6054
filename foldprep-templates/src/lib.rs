//! # Templates
//!
//! Structural template hits for a query: parsed from hmmsearch output, filtered
//! by release date, similarity and alignment quality, and resolved to mmCIF
//! structures only when asked.
//!
//! ```rust,ignore
//! use foldprep_templates::{DirectoryStructureStore, search_and_filter};
//!
//! let store = DirectoryStructureStore::new("/data/pdb_mmcif");
//! let templates = search_and_filter(sequence, &uniref90_msa, &config, &invoker, &store)?;
//! let resolved = templates.resolve(&store);
//! ```
pub mod consts;
pub mod errors;
pub mod hit;
pub mod search;
pub mod store;
pub mod templates;

pub use errors::{Result, TemplateError};
pub use hit::TemplateHit;
pub use search::search_and_filter;
pub use store::{DirectoryStructureStore, StructureStore};
pub use templates::Templates;
