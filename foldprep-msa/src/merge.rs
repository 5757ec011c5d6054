use tracing::debug;

use crate::errors::{MsaError, Result};
use crate::msa::Msa;

///
/// Merge the alignments of several databases into one.
///
/// The first MSA's query row becomes the single query row of the result; the query
/// rows of later MSAs are not repeated. With `deduplicate`, a row is kept only if its
/// match-column content has not been seen before (query included), so the order is:
/// query, novel rows of the first MSA, then novel rows of each following MSA.
/// Without `deduplicate` the non-query rows are concatenated as they are, which keeps
/// the row-to-row correspondence paired alignments rely on.
///
/// # Arguments
/// - msas: alignments for the same query sequence, in priority order
/// - deduplicate: whether to collapse duplicate rows
///
pub fn merge(msas: &[Msa], deduplicate: bool) -> Result<Msa> {
    let Some(first) = msas.first() else {
        return Err(MsaError::InvalidArgument(
            "cannot merge an empty list of MSAs".to_string(),
        ));
    };

    for msa in msas.iter().skip(1) {
        if msa.query_sequence() != first.query_sequence() {
            return Err(MsaError::InvalidArgument(format!(
                "cannot merge MSAs for different queries: {} and {}",
                first.query_sequence(),
                msa.query_sequence()
            )));
        }
        if msa.chain_poly_type() != first.chain_poly_type() {
            return Err(MsaError::InvalidArgument(format!(
                "cannot merge {} and {} MSAs",
                first.chain_poly_type(),
                msa.chain_poly_type()
            )));
        }
    }

    let total: usize = msas.iter().map(Msa::depth).sum();
    let mut sequences = Vec::with_capacity(total);
    let mut descriptions = Vec::with_capacity(total);

    sequences.push(first.sequences()[0].clone());
    descriptions.push(first.descriptions()[0].clone());
    for msa in msas {
        for (description, sequence) in msa.rows().skip(1) {
            sequences.push(sequence.to_string());
            descriptions.push(description.to_string());
        }
    }

    let merged = Msa::new(
        first.query_sequence(),
        first.chain_poly_type(),
        sequences,
        descriptions,
        deduplicate,
    )?;
    debug!(
        "Merged {} MSAs with {} rows into {} rows (deduplicate={})",
        msas.len(),
        total,
        merged.depth(),
        deduplicate
    );
    Ok(merged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use foldprep_core::PolymerType;
    use pretty_assertions::assert_eq;
    use rstest::*;

    fn protein_msa(a3m: &str) -> Msa {
        Msa::from_a3m("MKVL", PolymerType::Protein, a3m, None, false).unwrap()
    }

    #[fixture]
    fn msas() -> Vec<Msa> {
        vec![
            protein_msa(">query\nMKVL\n>a1\nMRVL\n>a2\nMKVL\n>a3\nLRVL\n"),
            protein_msa(">query\nMKVL\n>b1\nLRVL\n>b2\nMKIL\n>b3\nMRVL\n"),
            protein_msa(">query\nMKVL\n>c1\nMKIL\n>c2\nMKVI\n>c3\nMKVI\n"),
        ]
    }

    #[rstest]
    fn test_merge_dedup_order(msas: Vec<Msa>) {
        let merged = merge(&msas, true).unwrap();
        let descriptions: Vec<&str> = merged.rows().map(|(d, _)| d).collect();
        assert_eq!(descriptions, vec!["query", "a1", "a3", "b2", "c2"]);
    }

    #[rstest]
    fn test_merge_dedup_is_deterministic(msas: Vec<Msa>) {
        let first = merge(&msas, true).unwrap().to_a3m();
        let second = merge(&msas, true).unwrap().to_a3m();
        assert_eq!(first, second);
    }

    #[rstest]
    fn test_merge_without_dedup_concatenates(msas: Vec<Msa>) {
        let merged = merge(&msas, false).unwrap();
        assert_eq!(merged.depth(), 10);
        assert_eq!(merged.descriptions()[0], "query");
        assert_eq!(merged.descriptions()[4], "b1");
    }

    #[rstest]
    fn test_merge_single_without_dedup_is_identity(msas: Vec<Msa>) {
        let merged = merge(&msas[..1], false).unwrap();
        assert_eq!(merged, msas[0]);
    }

    #[rstest]
    fn test_merge_empty_is_invalid() {
        assert!(matches!(merge(&[], true), Err(MsaError::InvalidArgument(_))));
    }

    #[rstest]
    fn test_merge_different_queries_is_invalid(msas: Vec<Msa>) {
        let other = Msa::from_empty("MKVA", PolymerType::Protein);
        let err = merge(&[msas[0].clone(), other], true).unwrap_err();
        assert!(matches!(err, MsaError::InvalidArgument(_)));
    }

    #[rstest]
    fn test_rna_merge_has_no_duplicate_rows() {
        let rna = |a3m: &str| Msa::from_a3m("ACGU", PolymerType::Rna, a3m, None, false).unwrap();
        let merged = merge(
            &[
                rna(">query\nACGU\n>r1\nACGA\n>r2\nAC-U\n"),
                rna(">query\nACGU\n>n1\nAC-U\n>n2\nGCGU\n"),
                rna(">query\nACGU\n>c1\nACGA\n>c2\nACGU\n>c3\nGCGU\n"),
            ],
            true,
        )
        .unwrap();
        let rows: Vec<&str> = merged.rows().map(|(_, s)| s).collect();
        assert_eq!(rows, vec!["ACGU", "ACGA", "AC-U", "GCGU"]);
    }
}
