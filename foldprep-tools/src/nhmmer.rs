//! Nucleotide MSA search with nhmmer, realigned to the query with hmmalign.
//!
//! nhmmer's own alignment does not contain the query, so hits are collected,
//! aligned against a profile built from the query alone, and returned as a
//! Stockholm alignment whose RF line marks the query's columns.

use std::ffi::OsString;
use std::path::Path;
use std::time::Duration;

use foldprep_core::PolymerType;
use foldprep_core::utils::ungapped_upper;
use foldprep_msa::Msa;
use foldprep_msa::stockholm::parse_stockholm;
use tempfile::Builder;
use tracing::info;

use crate::config::NhmmerConfig;
use crate::consts::{
    ALIGNED_STO, HITS_FASTA, HITS_STO, NHMMER_F3, NHMMER_F3_SHORT, NHMMER_SHORT_QUERY_LENGTH,
    QUERY_FASTA, QUERY_HMM, QUERY_STO,
};
use crate::errors::{Result, SearchToolError};
use crate::hmmbuild::build_profile;
use crate::runner::{run_tool, tool_name};
use crate::utils::{check_database, read_tool_output, write_fasta, write_query_fasta};

///
/// Command line for one nhmmer run. Short queries get a looser final filter.
///
pub fn nhmmer_args(
    config: &NhmmerConfig,
    query_length: usize,
    query_fasta: &Path,
    output_sto: &Path,
) -> Vec<OsString> {
    let f3 = if query_length < NHMMER_SHORT_QUERY_LENGTH {
        NHMMER_F3_SHORT
    } else {
        NHMMER_F3
    };
    let mut args: Vec<OsString> = vec![
        "-o".into(),
        "/dev/null".into(),
        "--noali".into(),
        "--cpu".into(),
        config.n_cpu.to_string().into(),
        "-E".into(),
        config.e_value.to_string().into(),
        "-A".into(),
        output_sto.into(),
    ];
    if let Some(alphabet) = &config.alphabet {
        args.push(format!("--{}", alphabet).into());
    }
    args.push("--F3".into());
    args.push(f3.to_string().into());
    args.push(query_fasta.into());
    args.push(config.database_config.path.clone().into());
    args
}

pub fn hmmalign_args(query_hmm: &Path, hits_fasta: &Path, output_sto: &Path) -> Vec<OsString> {
    vec![
        "-o".into(),
        output_sto.into(),
        "--outformat".into(),
        "stockholm".into(),
        query_hmm.into(),
        hits_fasta.into(),
    ]
}

///
/// Search a nucleotide database for homologues of an RNA sequence.
///
/// # Returns
/// - a Stockholm alignment of the hits against the query's columns, or an empty
///   string when nothing was found
pub fn run_nhmmer(
    sequence: &str,
    chain_poly_type: PolymerType,
    config: &NhmmerConfig,
    timeout: Option<Duration>,
) -> Result<String> {
    check_database(&config.database_config)?;

    let workdir = Builder::new().prefix("nhmmer").tempdir()?;
    let query_fasta = workdir.path().join(QUERY_FASTA);
    let hits_sto = workdir.path().join(HITS_STO);
    write_query_fasta(&query_fasta, sequence)?;

    let args = nhmmer_args(config, sequence.len(), &query_fasta, &hits_sto);
    let elapsed = run_tool(&config.binary_path, &args, timeout)?;
    info!(
        "nhmmer against {} took {:.2} seconds",
        config.database_config.name,
        elapsed.as_secs_f64()
    );

    let tool = tool_name(&config.binary_path);
    let raw = read_tool_output(&tool, &hits_sto)?;
    let records = parse_stockholm(&raw, Some(config.max_sequences)).map_err(|e| {
        SearchToolError::Unparsable {
            tool: tool.clone(),
            message: e.to_string(),
        }
    })?;
    if records.is_empty() {
        return Ok(String::new());
    }

    let hits: Vec<(String, String)> = records
        .into_iter()
        .map(|record| (record.name, ungapped_upper(&record.aligned)))
        .collect();
    let hits_fasta = workdir.path().join(HITS_FASTA);
    write_fasta(&hits_fasta, hits.iter().map(|(n, s)| (n.as_str(), s.as_str())))?;

    let query_hmm = workdir.path().join(QUERY_HMM);
    build_profile(
        &config.hmmbuild_binary_path,
        &Msa::from_empty(sequence, chain_poly_type),
        config.alphabet.as_deref(),
        &workdir.path().join(QUERY_STO),
        &query_hmm,
        timeout,
    )?;

    let aligned_sto = workdir.path().join(ALIGNED_STO);
    run_tool(
        &config.hmmalign_binary_path,
        &hmmalign_args(&query_hmm, &hits_fasta, &aligned_sto),
        timeout,
    )?;
    read_tool_output(&tool_name(&config.hmmalign_binary_path), &aligned_sto)
}
