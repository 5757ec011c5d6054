use std::collections::HashSet;
use std::fmt::Write;

use foldprep_core::PolymerType;
use foldprep_core::utils::ungapped_upper;

use crate::consts::{QUERY_DESCRIPTION, RF_MATCH};
use crate::errors::{MsaError, Result};

///
/// A multiple sequence alignment in A3M row form. Row 0 is the query.
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Msa {
    query_sequence: String,
    chain_poly_type: PolymerType,
    sequences: Vec<String>,
    descriptions: Vec<String>,
}

/// Number of match columns in an A3M row (lower-case insertions do not count).
pub fn aligned_length(row: &str) -> usize {
    row.chars().filter(|c| !c.is_ascii_lowercase()).count()
}

/// A3M row with insertions removed: the row's content in match columns only.
pub fn without_insertions(row: &str) -> String {
    row.chars().filter(|c| !c.is_ascii_lowercase()).collect()
}

impl Msa {
    ///
    /// Build an MSA from parallel lists of A3M rows and descriptions.
    ///
    /// # Arguments
    /// - query_sequence: the chain sequence the alignment is built for
    /// - chain_poly_type: polymer type of the chain
    /// - sequences: A3M rows, query first
    /// - descriptions: one description per row
    /// - deduplicate: collapse rows with identical match-column content, keeping the first
    ///
    pub fn new(
        query_sequence: &str,
        chain_poly_type: PolymerType,
        sequences: Vec<String>,
        descriptions: Vec<String>,
        deduplicate: bool,
    ) -> Result<Self> {
        if sequences.is_empty() {
            return Err(MsaError::InvalidArgument(
                "an MSA needs at least the query row".to_string(),
            ));
        }
        if sequences.len() != descriptions.len() {
            return Err(MsaError::InvalidArgument(format!(
                "{} sequences but {} descriptions",
                sequences.len(),
                descriptions.len()
            )));
        }

        let expected = aligned_length(&sequences[0]);
        for (index, (row, description)) in sequences.iter().zip(descriptions.iter()).enumerate() {
            let found = aligned_length(row);
            if found != expected {
                return Err(MsaError::RowLength {
                    index,
                    description: description.clone(),
                    found,
                    expected,
                });
            }
        }

        let (sequences, descriptions) = if deduplicate {
            let mut seen = HashSet::new();
            sequences
                .into_iter()
                .zip(descriptions)
                .filter(|(row, _)| seen.insert(without_insertions(row)))
                .unzip()
        } else {
            (sequences, descriptions)
        };

        Ok(Msa {
            query_sequence: query_sequence.to_string(),
            chain_poly_type,
            sequences,
            descriptions,
        })
    }

    ///
    /// An MSA holding only the query row.
    ///
    pub fn from_empty(query_sequence: &str, chain_poly_type: PolymerType) -> Self {
        Msa {
            query_sequence: query_sequence.to_string(),
            chain_poly_type,
            sequences: vec![query_sequence.to_string()],
            descriptions: vec![QUERY_DESCRIPTION.to_string()],
        }
    }

    ///
    /// Parse an MSA from A3M text.
    ///
    /// Empty text yields a query-only MSA. The first record must be the query
    /// (compared with gaps and insertions removed). `max_depth` keeps only the first
    /// rows, query included, before deduplication.
    ///
    pub fn from_a3m(
        query_sequence: &str,
        chain_poly_type: PolymerType,
        a3m: &str,
        max_depth: Option<usize>,
        deduplicate: bool,
    ) -> Result<Self> {
        let (mut sequences, mut descriptions) = parse_fasta(a3m)?;
        if sequences.is_empty() {
            return Ok(Msa::from_empty(query_sequence, chain_poly_type));
        }

        let found = ungapped_upper(&sequences[0]);
        if found != query_sequence.to_ascii_uppercase() {
            return Err(MsaError::QueryMismatch {
                found,
                expected: query_sequence.to_string(),
            });
        }

        if let Some(max_depth) = max_depth {
            if max_depth > 0 && max_depth < sequences.len() {
                sequences.truncate(max_depth);
                descriptions.truncate(max_depth);
            }
        }

        Msa::new(
            query_sequence,
            chain_poly_type,
            sequences,
            descriptions,
            deduplicate,
        )
    }

    pub fn query_sequence(&self) -> &str {
        &self.query_sequence
    }

    pub fn chain_poly_type(&self) -> PolymerType {
        self.chain_poly_type
    }

    pub fn sequences(&self) -> &[String] {
        &self.sequences
    }

    pub fn descriptions(&self) -> &[String] {
        &self.descriptions
    }

    /// Number of rows, query included.
    pub fn depth(&self) -> usize {
        self.sequences.len()
    }

    /// Number of match columns shared by all rows.
    pub fn aligned_length(&self) -> usize {
        aligned_length(&self.sequences[0])
    }

    /// Rows as `(description, sequence)` pairs, query first.
    pub fn rows(&self) -> impl Iterator<Item = (&str, &str)> {
        self.descriptions
            .iter()
            .map(String::as_str)
            .zip(self.sequences.iter().map(String::as_str))
    }

    ///
    /// Serialize to A3M text.
    ///
    pub fn to_a3m(&self) -> String {
        let mut a3m = String::new();
        for (description, sequence) in self.rows() {
            // writing into a String cannot fail
            let _ = writeln!(a3m, ">{}\n{}", description, sequence);
        }
        a3m
    }

    ///
    /// Serialize to Stockholm with a reference line marking every match column,
    /// for profile building with `hmmbuild --hand`. Insertions are dropped.
    ///
    pub fn to_hand_stockholm(&self) -> String {
        let names: Vec<String> = (0..self.depth())
            .map(|i| match i {
                0 => QUERY_DESCRIPTION.to_string(),
                i => format!("sequence_{}", i),
            })
            .collect();
        let width = names.iter().map(String::len).max().unwrap_or(0).max(7);

        let mut sto = String::from("# STOCKHOLM 1.0\n\n");
        for (name, sequence) in names.iter().zip(self.sequences.iter()) {
            let _ = writeln!(sto, "{:<width$} {}", name, without_insertions(sequence));
        }
        let reference: String = std::iter::repeat_n(RF_MATCH, self.aligned_length()).collect();
        let _ = writeln!(sto, "{:<width$} {}", "#=GC RF", reference);
        sto.push_str("//\n");
        sto
    }
}

///
/// Split FASTA-like text into sequences and descriptions. Lines starting with `#`
/// and blank lines are skipped; sequence lines are concatenated.
///
pub(crate) fn parse_fasta(text: &str) -> Result<(Vec<String>, Vec<String>)> {
    let mut sequences: Vec<String> = Vec::new();
    let mut descriptions: Vec<String> = Vec::new();

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some(description) = line.strip_prefix('>') {
            descriptions.push(description.to_string());
            sequences.push(String::new());
        } else {
            match sequences.last_mut() {
                Some(sequence) => sequence.push_str(line),
                None => {
                    return Err(MsaError::Parse {
                        format: "A3M",
                        message: format!("sequence line before any header: {}", line),
                    });
                }
            }
        }
    }

    Ok((sequences, descriptions))
}
