use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use clap::ArgMatches;
use tracing::info;

use foldprep_core::PolymerType;
use foldprep_core::utils::{get_dynamic_writer, read_to_string, ungapped_upper};
use foldprep_msa::{Msa, merge};

pub fn run_merge_msa(matches: &ArgMatches) -> Result<()> {
    let paths: Vec<&PathBuf> = matches
        .get_many::<PathBuf>("msas")
        .context("At least one A3M file is required.")?
        .collect();
    let chain_poly_type: PolymerType = matches
        .get_one::<String>("type")
        .map(String::as_str)
        .unwrap_or("protein")
        .parse()
        .map_err(|e: String| anyhow!(e))?;
    let deduplicate = !matches.get_flag("no-dedup");

    let texts = paths
        .iter()
        .map(|path| read_to_string(path))
        .collect::<Result<Vec<String>>>()?;

    let query = match matches.get_one::<String>("query") {
        Some(query) => query.to_ascii_uppercase(),
        None => texts
            .first()
            .and_then(|text| first_a3m_sequence(text))
            .ok_or_else(|| anyhow!("{:?} has no rows; pass the query with --query", paths[0]))?,
    };

    let msas = paths
        .iter()
        .zip(texts.iter())
        .map(|(path, text)| {
            Msa::from_a3m(&query, chain_poly_type, text, None, false)
                .with_context(|| format!("Failed to read A3M {:?}", path))
        })
        .collect::<Result<Vec<Msa>>>()?;

    let merged = merge(&msas, deduplicate)?;
    info!(
        "Merged {} MSAs with {} rows into {} rows",
        msas.len(),
        msas.iter().map(Msa::depth).sum::<usize>(),
        merged.depth()
    );

    match matches.get_one::<PathBuf>("output") {
        Some(output) => {
            let mut writer = get_dynamic_writer(output)?;
            writer.write_all(merged.to_a3m().as_bytes())?;
            writer.flush()?;
        }
        None => {
            let stdout = std::io::stdout();
            let mut handle = stdout.lock();
            handle.write_all(merged.to_a3m().as_bytes())?;
        }
    }

    Ok(())
}

/// The first record of an A3M file, without gaps or insertions.
fn first_a3m_sequence(a3m: &str) -> Option<String> {
    let mut lines = a3m.lines().map(str::trim).skip_while(|line| !line.starts_with('>'));
    lines.next()?;
    let sequence: String = lines.take_while(|line| !line.starts_with('>')).collect();
    let sequence: String = sequence.chars().filter(|c| !c.is_ascii_lowercase()).collect();
    (!sequence.is_empty()).then(|| ungapped_upper(&sequence))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::*;

    #[rstest]
    #[case(">query\nMKV\nLL\n>hit\nMRVLL\n", Some("MKVLL"))]
    #[case("# comment\n>query\nM-kV\n", Some("MV"))]
    #[case("", None)]
    fn test_first_a3m_sequence(#[case] a3m: &str, #[case] expected: Option<&str>) {
        assert_eq!(first_a3m_sequence(a3m).as_deref(), expected);
    }

    #[rstest]
    #[case(false, ">query\nMKVLL\n>a\nMRVLL\n>b\nMK-LL\n>c\nLKVLL\n")]
    #[case(true, ">query\nMKVLL\n>a\nMRVLL\n>b\nMK-LL\n>a2\nMRVLL\n>c\nLKVLL\n")]
    fn test_merge_msa_files(#[case] no_dedup: bool, #[case] expected: &str) {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("uniref90.a3m");
        let second = dir.path().join("mgnify.a3m");
        let output = dir.path().join("merged.a3m");
        std::fs::write(&first, ">query\nMKVLL\n>a\nMRVLL\n>b\nMK-LL\n").unwrap();
        std::fs::write(&second, ">query\nMKVLL\n>a2\nMRVLL\n>c\nLKVLL\n").unwrap();

        let mut args = vec!["foldprep".to_string(), "merge-msa".to_string()];
        args.push(first.display().to_string());
        args.push(second.display().to_string());
        args.push("--output".to_string());
        args.push(output.display().to_string());
        if no_dedup {
            args.push("--no-dedup".to_string());
        }
        let matches = crate::build_parser().try_get_matches_from(args).unwrap();
        let (_, merge_matches) = matches.subcommand().unwrap();

        run_merge_msa(merge_matches).unwrap();

        assert_eq!(std::fs::read_to_string(&output).unwrap(), expected);
    }
}
