//! Building an HMM profile from an alignment with hmmbuild.

use std::ffi::OsString;
use std::fs;
use std::path::Path;
use std::time::Duration;

use foldprep_msa::Msa;
use tracing::debug;

use crate::errors::Result;
use crate::runner::run_tool;

///
/// Command line for `hmmbuild --hand`: match columns come from the RF line of the input.
///
pub fn hmmbuild_args(alphabet: Option<&str>, input_sto: &Path, output_hmm: &Path) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec!["--informat".into(), "stockholm".into(), "--hand".into()];
    if let Some(alphabet) = alphabet {
        args.push(format!("--{}", alphabet).into());
    }
    args.push(output_hmm.into());
    args.push(input_sto.into());
    args
}

///
/// Write `msa` as a hand-annotated Stockholm file next to `output_hmm` and build
/// a profile from it.
///
pub fn build_profile(
    binary: &Path,
    msa: &Msa,
    alphabet: Option<&str>,
    input_sto: &Path,
    output_hmm: &Path,
    timeout: Option<Duration>,
) -> Result<()> {
    fs::write(input_sto, msa.to_hand_stockholm())?;
    let args = hmmbuild_args(alphabet, input_sto, output_hmm);
    let elapsed = run_tool(binary, &args, timeout)?;
    debug!(
        "hmmbuild on {} rows took {:.2} seconds",
        msa.depth(),
        elapsed.as_secs_f64()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::*;

    #[rstest]
    #[case(Some("rna"), vec!["--informat", "stockholm", "--hand", "--rna", "q.hmm", "q.sto"])]
    #[case(None, vec!["--informat", "stockholm", "--hand", "q.hmm", "q.sto"])]
    fn test_hmmbuild_args(#[case] alphabet: Option<&str>, #[case] expected: Vec<&str>) {
        let args: Vec<String> = hmmbuild_args(alphabet, Path::new("q.sto"), Path::new("q.hmm"))
            .iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();
        assert_eq!(args, expected);
    }
}
