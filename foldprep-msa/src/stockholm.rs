//! Reading Stockholm alignments as written by `jackhmmer -A`, `nhmmer -A`,
//! `hmmalign` and `hmmsearch -A`.

use std::collections::HashMap;

use foldprep_core::PolymerType;
use foldprep_core::consts::GAP_CHARS;

use crate::consts::{QUERY_DESCRIPTION, RF_MATCH};
use crate::errors::{MsaError, Result};
use crate::msa::Msa;

///
/// One sequence of a Stockholm alignment, with its blocks already joined.
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockholmRecord {
    pub name: String,
    pub description: Option<String>,
    pub aligned: String,
}

///
/// Parse a Stockholm alignment into records, in order of first appearance.
///
/// # Arguments
/// - sto: the Stockholm text
/// - max_sequences: stop collecting new sequences after this many
///
pub fn parse_stockholm(sto: &str, max_sequences: Option<usize>) -> Result<Vec<StockholmRecord>> {
    let mut records: Vec<StockholmRecord> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut descriptions: HashMap<String, String> = HashMap::new();

    for line in sto.lines() {
        let line = line.trim_end();
        if line.is_empty() || line.starts_with("//") {
            continue;
        }
        if let Some(rest) = line.strip_prefix("#=GS") {
            let mut fields = rest.split_whitespace();
            if let (Some(name), Some("DE")) = (fields.next(), fields.next()) {
                descriptions.insert(name.to_string(), fields.collect::<Vec<_>>().join(" "));
            }
            continue;
        }
        if line.starts_with('#') {
            continue;
        }

        let mut fields = line.split_whitespace();
        let (Some(name), Some(aligned), None) = (fields.next(), fields.next(), fields.next()) else {
            return Err(MsaError::Parse {
                format: "Stockholm",
                message: format!("expected `name sequence`, found: {}", line),
            });
        };

        match index.get(name) {
            Some(&i) => records[i].aligned.push_str(aligned),
            None => {
                if max_sequences.is_some_and(|max| records.len() >= max) {
                    continue;
                }
                index.insert(name.to_string(), records.len());
                records.push(StockholmRecord {
                    name: name.to_string(),
                    description: None,
                    aligned: aligned.to_string(),
                });
            }
        }
    }

    for record in records.iter_mut() {
        record.description = descriptions.remove(&record.name);
    }

    let Some(first) = records.first() else {
        return Ok(records);
    };
    let width = first.aligned.len();
    if let Some(bad) = records.iter().find(|r| r.aligned.len() != width) {
        return Err(MsaError::Parse {
            format: "Stockholm",
            message: format!(
                "sequence {} has {} columns, expected {}",
                bad.name,
                bad.aligned.len(),
                width
            ),
        });
    }

    Ok(records)
}

///
/// The `#=GC RF` reference annotation, joined across blocks. HMMER marks model
/// match columns with `x` and insert columns with `.`.
///
pub fn parse_reference_line(sto: &str) -> Option<String> {
    let mut reference: Option<String> = None;
    for line in sto.lines() {
        let Some(rest) = line.strip_prefix("#=GC") else {
            continue;
        };
        let mut fields = rest.split_whitespace();
        if let (Some("RF"), Some(columns)) = (fields.next(), fields.next()) {
            reference.get_or_insert_with(String::new).push_str(columns);
        }
    }
    reference
}

///
/// Convert Stockholm records to A3M rows.
///
/// Match columns are taken from `reference` (an RF line) when given, otherwise
/// from the non-gap columns of the first record. Residues in the other columns
/// become lower-cased insertions and gaps there are dropped. In match columns
/// gaps become `-`.
///
pub fn records_to_a3m_rows(
    records: &[StockholmRecord],
    reference: Option<&str>,
) -> Vec<(String, String)> {
    let Some(first) = records.first() else {
        return Vec::new();
    };
    let is_match: Vec<bool> = match reference {
        Some(rf) if rf.len() == first.aligned.len() => rf.chars().map(|c| c == RF_MATCH).collect(),
        _ => first.aligned.chars().map(|c| !GAP_CHARS.contains(&c)).collect(),
    };

    records
        .iter()
        .map(|record| {
            let row: String = record
                .aligned
                .chars()
                .zip(is_match.iter())
                .filter_map(|(c, &matched)| match (matched, GAP_CHARS.contains(&c)) {
                    (true, true) => Some('-'),
                    (true, false) => Some(c.to_ascii_uppercase()),
                    (false, true) => None,
                    (false, false) => Some(c.to_ascii_lowercase()),
                })
                .collect();
            let description = match &record.description {
                Some(description) => format!("{} {}", record.name, description),
                None => record.name.clone(),
            };
            (description, row)
        })
        .collect()
}

impl Msa {
    ///
    /// Build an MSA from a search tool's Stockholm output.
    ///
    /// jackhmmer puts the query first, named [`QUERY_DESCRIPTION`] as in the query
    /// FASTA it was given. Alignments that only hold hits (hmmalign, hmmsearch)
    /// get the query row added in front of them.
    ///
    /// # Arguments
    /// - query_sequence: the chain sequence searched for
    /// - chain_poly_type: polymer type of the chain
    /// - sto: Stockholm text
    /// - max_sequences: maximum number of sequences to read from the alignment
    /// - max_depth: crop applied to the resulting MSA
    /// - deduplicate: collapse identical rows
    ///
    pub fn from_stockholm(
        query_sequence: &str,
        chain_poly_type: PolymerType,
        sto: &str,
        max_sequences: Option<usize>,
        max_depth: Option<usize>,
        deduplicate: bool,
    ) -> Result<Self> {
        let records = parse_stockholm(sto, max_sequences)?;
        if records.is_empty() {
            return Ok(Msa::from_empty(query_sequence, chain_poly_type));
        }

        let reference = parse_reference_line(sto);
        let rows = records_to_a3m_rows(&records, reference.as_deref());

        let mut a3m = String::new();
        // a hit may be identical to the query, so only the record name tells them apart
        if records[0].name != QUERY_DESCRIPTION {
            a3m.push_str(&format!(">{}\n{}\n", QUERY_DESCRIPTION, query_sequence));
        }
        for (description, row) in rows {
            a3m.push('>');
            a3m.push_str(&description);
            a3m.push('\n');
            a3m.push_str(&row);
            a3m.push('\n');
        }
        Msa::from_a3m(query_sequence, chain_poly_type, &a3m, max_depth, deduplicate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::*;

    #[fixture]
    fn sto() -> &'static str {
        "# STOCKHOLM 1.0\n\
         \n\
         #=GS hit_a/2-5 DE Uncharacterized protein\n\
         \n\
         query     MK-V\n\
         hit_a/2-5 MRGV\n\
         hit_b/1-3 M.-I\n\
         #=GC RF   xx.x\n\
         \n\
         query     L\n\
         hit_a/2-5 L\n\
         hit_b/1-3 -\n\
         #=GC RF   x\n\
         //\n"
    }

    #[rstest]
    fn test_parse_joins_blocks(sto: &str) {
        let records = parse_stockholm(sto, None).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].aligned, "MK-VL");
        assert_eq!(records[1].description.as_deref(), Some("Uncharacterized protein"));
        assert_eq!(records[2].aligned, "M.-I-");
    }

    #[rstest]
    fn test_parse_max_sequences(sto: &str) {
        let records = parse_stockholm(sto, Some(2)).unwrap();
        let names: Vec<&str> = records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["query", "hit_a/2-5"]);
    }

    #[rstest]
    fn test_from_stockholm_a3m_rows(sto: &str) {
        let msa = Msa::from_stockholm("MKVL", PolymerType::Protein, sto, None, None, false).unwrap();
        assert_eq!(
            msa.to_a3m(),
            ">query\nMKVL\n>hit_a/2-5 Uncharacterized protein\nMRgVL\n>hit_b/1-3\nM-I-\n"
        );
    }

    #[rstest]
    fn test_reference_line_is_joined(sto: &str) {
        assert_eq!(parse_reference_line(sto).as_deref(), Some("xx.xx"));
    }

    #[rstest]
    fn test_hits_only_alignment_gets_query_row() {
        let sto = "# STOCKHOLM 1.0\n\
                   hit_a/1-4 AC.GU\n\
                   hit_b/3-5 A-a-U\n\
                   #=GC RF   xx.xx\n\
                   //\n";
        let msa = Msa::from_stockholm("ACGU", PolymerType::Rna, sto, None, None, false).unwrap();
        assert_eq!(
            msa.to_a3m(),
            ">query\nACGU\n>hit_a/1-4\nACGU\n>hit_b/3-5\nA-a-U\n"
        );
    }

    #[rstest]
    fn test_hit_identical_to_query_is_not_taken_for_the_query() {
        let sto = "# STOCKHOLM 1.0\n\
                   1abc_A/1-4 MKVL\n\
                   2xyz_B/1-4 MRVL\n\
                   //\n";
        let msa = Msa::from_stockholm("MKVL", PolymerType::Protein, sto, None, None, false).unwrap();
        let descriptions: Vec<&str> = msa.rows().map(|(d, _)| d).collect();
        assert_eq!(descriptions, vec!["query", "1abc_A/1-4", "2xyz_B/1-4"]);
    }

    #[rstest]
    fn test_ragged_blocks_are_rejected() {
        let sto = "# STOCKHOLM 1.0\nquery MKV\nhit MK\n//\n";
        assert!(matches!(parse_stockholm(sto, None), Err(MsaError::Parse { .. })));
    }

    #[rstest]
    fn test_empty_output_is_query_only() {
        let msa = Msa::from_stockholm("ACGU", PolymerType::Rna, "# STOCKHOLM 1.0\n//\n", None, None, true)
            .unwrap();
        assert_eq!(msa.depth(), 1);
    }
}
