//! Protein MSA search with jackhmmer.

use std::ffi::OsString;
use std::path::Path;
use std::time::Duration;

use tempfile::Builder;
use tracing::info;

use crate::config::JackhmmerConfig;
use crate::consts::{HITS_STO, JACKHMMER_F1, JACKHMMER_F2, JACKHMMER_F3, QUERY_FASTA};
use crate::errors::Result;
use crate::runner::{run_tool, tool_name};
use crate::utils::{check_database, read_tool_output, write_query_fasta};

///
/// Command line for one jackhmmer run.
///
pub fn jackhmmer_args(config: &JackhmmerConfig, query_fasta: &Path, output_sto: &Path) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec![
        "-o".into(),
        "/dev/null".into(),
        "-A".into(),
        output_sto.into(),
        "--noali".into(),
        "--F1".into(),
        JACKHMMER_F1.to_string().into(),
        "--F2".into(),
        JACKHMMER_F2.to_string().into(),
        "--F3".into(),
        JACKHMMER_F3.to_string().into(),
        "--incE".into(),
        config.e_value.to_string().into(),
        "-E".into(),
        config.e_value.to_string().into(),
        "--cpu".into(),
        config.n_cpu.to_string().into(),
        "-N".into(),
        config.n_iter.to_string().into(),
    ];
    if let Some(z_value) = config.z_value {
        args.push("-Z".into());
        args.push(z_value.to_string().into());
    }
    args.push(query_fasta.into());
    args.push(config.database_config.path.clone().into());
    args
}

///
/// Search a database for homologues of a protein sequence.
///
/// # Returns
/// - the Stockholm alignment jackhmmer wrote, query first
pub fn run_jackhmmer(sequence: &str, config: &JackhmmerConfig, timeout: Option<Duration>) -> Result<String> {
    check_database(&config.database_config)?;

    let workdir = Builder::new().prefix("jackhmmer").tempdir()?;
    let query_fasta = workdir.path().join(QUERY_FASTA);
    let output_sto = workdir.path().join(HITS_STO);
    write_query_fasta(&query_fasta, sequence)?;

    let args = jackhmmer_args(config, &query_fasta, &output_sto);
    let elapsed = run_tool(&config.binary_path, &args, timeout)?;
    info!(
        "jackhmmer against {} took {:.2} seconds",
        config.database_config.name,
        elapsed.as_secs_f64()
    );

    read_tool_output(&tool_name(&config.binary_path), &output_sto)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DatabaseConfig;
    use crate::errors::SearchToolError;
    use pretty_assertions::assert_eq;
    use rstest::*;

    #[fixture]
    fn config() -> JackhmmerConfig {
        JackhmmerConfig {
            binary_path: "jackhmmer".into(),
            database_config: DatabaseConfig::new("uniref90", "/db/uniref90.fasta"),
            n_cpu: 8,
            n_iter: 1,
            e_value: 1e-4,
            z_value: None,
            max_sequences: 10_000,
        }
    }

    fn strings(args: &[OsString]) -> Vec<String> {
        args.iter().map(|a| a.to_string_lossy().into_owned()).collect()
    }

    #[rstest]
    fn test_args_without_z_value(config: JackhmmerConfig) {
        let args = strings(&jackhmmer_args(&config, Path::new("q.fasta"), Path::new("out.sto")));
        assert_eq!(&args[..4], &["-o", "/dev/null", "-A", "out.sto"]);
        assert!(!args.contains(&"-Z".to_string()));
        assert_eq!(&args[args.len() - 2..], &["q.fasta", "/db/uniref90.fasta"]);

        let cpu = args.iter().position(|a| a == "--cpu").unwrap();
        assert_eq!(args[cpu + 1], "8");
        let e = args.iter().position(|a| a == "-E").unwrap();
        assert_eq!(args[e + 1], "0.0001");
    }

    #[rstest]
    fn test_args_with_z_value(mut config: JackhmmerConfig) {
        config.z_value = Some(138_515_945.0);
        let args = strings(&jackhmmer_args(&config, Path::new("q.fasta"), Path::new("out.sto")));
        let z = args.iter().position(|a| a == "-Z").unwrap();
        assert_eq!(args[z + 1], "138515945");
    }

    #[rstest]
    fn test_missing_database_is_reported(mut config: JackhmmerConfig) {
        config.database_config.path = "/nonexistent/uniref90.fasta".into();
        let err = run_jackhmmer("MKVL", &config, None).unwrap_err();
        assert!(matches!(err, SearchToolError::DatabaseMissing { ref name, .. } if name == "uniref90"));
    }
}
