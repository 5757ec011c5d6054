//! Template search: a profile built from the query's MSA, searched against a
//! database of PDB sequences with hmmsearch.

use std::ffi::OsString;
use std::path::Path;
use std::time::Duration;

use foldprep_msa::Msa;
use tempfile::Builder;
use tracing::info;

use crate::config::{HmmsearchConfig, TemplateToolConfig};
use crate::consts::{HITS_STO, HITS_TBL, QUERY_HMM, QUERY_STO};
use crate::errors::{Result, SearchToolError};
use crate::hmmbuild::build_profile;
use crate::runner::{run_tool, tool_name};
use crate::utils::read_tool_output;

///
/// Raw hmmsearch results: the hit alignment (`-A`) and the per-target score table
/// (`--tblout`). Parsing them into template hits is up to the caller.
///
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HmmsearchOutput {
    pub sto: String,
    pub tblout: String,
}

pub fn hmmsearch_args(
    config: &HmmsearchConfig,
    query_hmm: &Path,
    database: &Path,
    output_sto: &Path,
    output_tbl: &Path,
) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec!["-o".into(), "/dev/null".into(), "--noali".into()];
    for (flag, value) in [
        ("--F1", config.filter_f1),
        ("--F2", config.filter_f2),
        ("--F3", config.filter_f3),
        ("-E", config.e_value),
        ("--incE", config.inc_e),
        ("--domE", config.dom_e),
        ("--incdomE", config.incdom_e),
    ] {
        args.push(flag.into());
        args.push(value.to_string().into());
    }
    args.extend([
        "-A".into(),
        output_sto.into(),
        "--tblout".into(),
        output_tbl.into(),
        query_hmm.into(),
        database.into(),
    ]);
    args
}

///
/// Build a profile from `profile_msa` and search the template database with it.
///
pub fn run_hmmsearch(
    profile_msa: &Msa,
    config: &TemplateToolConfig,
    timeout: Option<Duration>,
) -> Result<HmmsearchOutput> {
    if !config.database_path.exists() {
        return Err(SearchToolError::DatabaseMissing {
            name: "pdb_seqres".to_string(),
            path: config.database_path.clone(),
        });
    }
    let hmmsearch = &config.hmmsearch_config;

    let workdir = Builder::new().prefix("hmmsearch").tempdir()?;
    let query_hmm = workdir.path().join(QUERY_HMM);
    build_profile(
        &hmmsearch.hmmbuild_binary_path,
        profile_msa,
        Some(&hmmsearch.alphabet),
        &workdir.path().join(QUERY_STO),
        &query_hmm,
        timeout,
    )?;

    let output_sto = workdir.path().join(HITS_STO);
    let output_tbl = workdir.path().join(HITS_TBL);
    let args = hmmsearch_args(hmmsearch, &query_hmm, &config.database_path, &output_sto, &output_tbl);
    let elapsed = run_tool(&hmmsearch.hmmsearch_binary_path, &args, timeout)?;
    info!(
        "hmmsearch with a {}-row profile took {:.2} seconds",
        profile_msa.depth(),
        elapsed.as_secs_f64()
    );

    let tool = tool_name(&hmmsearch.hmmsearch_binary_path);
    Ok(HmmsearchOutput {
        sto: read_tool_output(&tool, &output_sto)?,
        tblout: read_tool_output(&tool, &output_tbl)?,
    })
}
