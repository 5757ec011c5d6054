//! Umbrella crate re-exporting the foldprep workspace. Each member is behind a
//! feature of the same name; `pipeline` (the default) pulls in everything.

#[cfg(feature = "core")]
#[doc(inline)]
pub use foldprep_core as core;

#[cfg(feature = "msa")]
#[doc(inline)]
pub use foldprep_msa as msa;

#[cfg(feature = "tools")]
#[doc(inline)]
pub use foldprep_tools as tools;

#[cfg(feature = "templates")]
#[doc(inline)]
pub use foldprep_templates as templates;

#[cfg(feature = "pipeline")]
#[doc(inline)]
pub use foldprep_pipeline as pipeline;
