use foldprep_core::ProteinChain;

use crate::errors::{PipelineError, Result};

///
/// What a protein chain already carries from the user.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProteinOverrides {
    /// Nothing usable supplied: search.
    Absent,
    /// Unpaired MSA, paired MSA and templates all supplied (possibly empty): do not search.
    Complete,
}

///
/// Check the all-or-nothing rule for user supplied MSAs and templates.
///
/// A chain that carries any non-empty MSA or template list must set all three
/// fields; empty strings and an empty list count as set and mean "skip the search".
///
pub fn validate_protein_overrides(chain: &ProteinChain) -> Result<ProteinOverrides> {
    let unpaired = chain.unpaired_msa.as_deref();
    let paired = chain.paired_msa.as_deref();
    let templates = chain.templates.as_deref();

    if unpaired.is_some() && paired.is_some() && templates.is_some() {
        return Ok(ProteinOverrides::Complete);
    }

    let any_supplied = unpaired.is_some_and(|msa| !msa.is_empty())
        || paired.is_some_and(|msa| !msa.is_empty())
        || templates.is_some_and(|templates| !templates.is_empty());
    if !any_supplied {
        return Ok(ProteinOverrides::Absent);
    }

    let missing: Vec<&str> = [
        ("unpairedMsa", unpaired.is_none()),
        ("pairedMsa", paired.is_none()),
        ("templates", templates.is_none()),
    ]
    .into_iter()
    .filter_map(|(field, is_missing)| is_missing.then_some(field))
    .collect();
    Err(PipelineError::Configuration {
        chain_id: chain.id.clone(),
        message: format!(
            "MSAs and templates are only partially set (missing {}). To use custom MSAs \
             or templates set all three; use an empty MSA and an empty template list to \
             skip a search.",
            missing.join(", ")
        ),
    })
}
