//! Template hits parsed from hmmsearch output.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use foldprep_core::consts::GAP_CHARS;
use foldprep_msa::consts::RF_MATCH;
use foldprep_msa::stockholm::{parse_reference_line, parse_stockholm};
use foldprep_tools::HmmsearchOutput;

use crate::consts::CHAIN_SEPARATOR;
use crate::errors::{Result, TemplateError};

///
/// One template candidate: a PDB chain aligned to the query.
///
/// Residue indices are zero-based. Template indices count residues of the
/// seqres chain sequence, starting from the hit's reported start.
///
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateHit {
    /// Hit name as reported by hmmsearch, e.g. `1abc_A/5-120`.
    pub name: String,
    pub pdb_id: String,
    pub chain_id: String,
    pub query_to_hit_mapping: BTreeMap<usize, usize>,
    /// Template residues covered by the alignment, upper-cased, without gaps.
    pub hit_sequence: String,
    pub identity: f64,
    pub score: f64,
    pub release_date: Option<NaiveDate>,
}

impl TemplateHit {
    /// Number of query residues aligned to a template residue.
    pub fn aligned_length(&self) -> usize {
        self.query_to_hit_mapping.len()
    }

    /// Aligned length as a fraction of the query length.
    pub fn align_ratio(&self, query_length: usize) -> f64 {
        if query_length == 0 {
            return 0.0;
        }
        self.aligned_length() as f64 / query_length as f64
    }
}

///
/// Split a hit name like `1abc_A/5-120` into its target (`1abc_A`) and
/// one-based start residue. Names without a range start at 1.
///
fn split_hit_name(name: &str) -> (&str, usize) {
    match name.rsplit_once('/') {
        Some((target, range)) => {
            let start = range
                .split_once('-')
                .and_then(|(start, _)| start.parse::<usize>().ok())
                .unwrap_or(1);
            (target, start.max(1))
        }
        None => (name, 1),
    }
}

///
/// Full-sequence scores by target name from an hmmsearch `--tblout` table.
///
pub fn parse_tblout(tblout: &str) -> Result<HashMap<String, f64>> {
    let mut scores = HashMap::new();
    for line in tblout.lines() {
        if line.starts_with('#') || line.trim().is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() < 6 {
            return Err(TemplateError::Parse {
                format: "hmmsearch table",
                message: format!("too few columns: {}", line),
            });
        }
        let score = fields[5].parse::<f64>().map_err(|_| TemplateError::Parse {
            format: "hmmsearch table",
            message: format!("bad score {:?} for {}", fields[5], fields[0]),
        })?;
        // the first row for a target is its best
        scores.entry(fields[0].to_string()).or_insert(score);
    }
    Ok(scores)
}

///
/// Parse hmmsearch output into template hits, in the order hmmsearch reports them.
///
/// The alignment's RF line marks the profile's match columns, one per query residue.
///
/// # Arguments
/// - query_sequence: the sequence the profile was built for
/// - output: raw hmmsearch alignment and score table
///
pub fn parse_hits(query_sequence: &str, output: &HmmsearchOutput) -> Result<Vec<TemplateHit>> {
    let records = parse_stockholm(&output.sto, None).map_err(|e| TemplateError::Parse {
        format: "hmmsearch alignment",
        message: e.to_string(),
    })?;
    if records.is_empty() {
        return Ok(Vec::new());
    }

    let reference = parse_reference_line(&output.sto).ok_or_else(|| TemplateError::Parse {
        format: "hmmsearch alignment",
        message: "missing #=GC RF line".to_string(),
    })?;
    let match_columns: Vec<bool> = reference.chars().map(|c| c == RF_MATCH).collect();
    let profile_length = match_columns.iter().filter(|&&m| m).count();
    if profile_length != query_sequence.len() {
        return Err(TemplateError::Parse {
            format: "hmmsearch alignment",
            message: format!(
                "profile has {} match columns but the query has {} residues",
                profile_length,
                query_sequence.len()
            ),
        });
    }

    let scores = parse_tblout(&output.tblout)?;
    let query: Vec<char> = query_sequence.chars().map(|c| c.to_ascii_uppercase()).collect();

    let mut hits = Vec::with_capacity(records.len());
    for record in records {
        let (target, start) = split_hit_name(&record.name);
        let Some((pdb_id, chain_id)) = target.split_once(CHAIN_SEPARATOR) else {
            return Err(TemplateError::Parse {
                format: "hmmsearch alignment",
                message: format!("hit name {} is not of the form <pdb>_<chain>", record.name),
            });
        };

        let mut query_to_hit_mapping = BTreeMap::new();
        let mut hit_sequence = String::new();
        let mut matches = 0usize;
        let mut query_index = 0usize;
        let mut hit_index = start - 1;
        for (c, &is_match) in record.aligned.chars().zip(match_columns.iter()) {
            let is_residue = !GAP_CHARS.contains(&c);
            if is_residue {
                hit_sequence.push(c.to_ascii_uppercase());
            }
            if is_match {
                if is_residue {
                    query_to_hit_mapping.insert(query_index, hit_index);
                    if query[query_index] == c.to_ascii_uppercase() {
                        matches += 1;
                    }
                }
                query_index += 1;
            }
            if is_residue {
                hit_index += 1;
            }
        }

        let identity = match query_to_hit_mapping.len() {
            0 => 0.0,
            aligned => matches as f64 / aligned as f64,
        };
        hits.push(TemplateHit {
            pdb_id: pdb_id.to_ascii_lowercase(),
            chain_id: chain_id.to_string(),
            score: scores.get(target).copied().unwrap_or(0.0),
            name: record.name,
            query_to_hit_mapping,
            hit_sequence,
            identity,
            release_date: None,
        });
    }
    Ok(hits)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::*;

    #[fixture]
    fn output() -> HmmsearchOutput {
        HmmsearchOutput {
            sto: "# STOCKHOLM 1.0\n\
                  \n\
                  1ABC_A/11-16 MK-VaL\n\
                  7xyz_B/1-4   MRGV.-\n\
                  #=GC RF      xxxx.x\n\
                  //\n"
                .to_string(),
            tblout: "# target name  accession  query name  accession  E-value  score  bias\n\
                     1ABC_A  -  query  -  1.2e-30  105.3  0.1\n\
                     7xyz_B  -  query  -  3.1e-10  40.0  0.0\n"
                .to_string(),
        }
    }

    #[rstest]
    fn test_parse_hits(output: HmmsearchOutput) {
        let hits = parse_hits("MKVLL", &output).unwrap();
        assert_eq!(hits.len(), 2);

        let first = &hits[0];
        assert_eq!(first.pdb_id, "1abc");
        assert_eq!(first.chain_id, "A");
        assert_eq!(first.score, 105.3);
        assert_eq!(first.hit_sequence, "MKVAL");
        // query 2 is a deletion; the inserted `a` shifts the template index of query 4
        let expected: BTreeMap<usize, usize> = [(0, 10), (1, 11), (3, 12), (4, 14)].into();
        assert_eq!(first.query_to_hit_mapping, expected);
        assert_eq!(first.aligned_length(), 4);

        let second = &hits[1];
        assert_eq!(second.hit_sequence, "MRGV");
        let expected: BTreeMap<usize, usize> = [(0, 0), (1, 1), (2, 2), (3, 3)].into();
        assert_eq!(second.query_to_hit_mapping, expected);
        // only the leading M matches the query
        assert_eq!(second.identity, 0.25);
    }

    #[rstest]
    fn test_profile_must_match_query(output: HmmsearchOutput) {
        assert!(matches!(parse_hits("MKV", &output), Err(TemplateError::Parse { .. })));
    }

    #[rstest]
    fn test_empty_output() {
        let output = HmmsearchOutput {
            sto: "# STOCKHOLM 1.0\n//\n".to_string(),
            tblout: "# no hits\n".to_string(),
        };
        assert!(parse_hits("MKV", &output).unwrap().is_empty());
    }

    #[rstest]
    #[case("1abc_A/5-120", ("1abc_A", 5))]
    #[case("1abc_A", ("1abc_A", 1))]
    #[case("1abc_A/x-y", ("1abc_A", 1))]
    fn test_split_hit_name(#[case] name: &str, #[case] expected: (&str, usize)) {
        assert_eq!(split_hit_name(name), expected);
    }
}
