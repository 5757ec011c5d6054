mod merge;
mod run;

use anyhow::Result;
use clap::Command;
use tracing_subscriber::EnvFilter;

pub mod consts {
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");
    pub const PKG_NAME: &str = "foldprep";
    pub const BIN_NAME: &str = "foldprep";
}

fn build_parser() -> Command {
    Command::new(consts::BIN_NAME)
        .bin_name(consts::BIN_NAME)
        .version(consts::VERSION)
        .author("Databio")
        .about("Prepare structure prediction inputs: search MSAs and templates for every chain.")
        .subcommand_required(true)
        .subcommand(run::cli::create_run_cli())
        .subcommand(merge::cli::create_merge_msa_cli())
}

fn init_logging() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("foldprep_pipeline=info".parse()?)
                .add_directive("foldprep_tools=info".parse()?)
                .add_directive("foldprep_templates=info".parse()?),
        )
        .init();
    Ok(())
}

fn main() -> Result<()> {
    init_logging()?;

    let app = build_parser();
    let matches = app.get_matches();

    match matches.subcommand() {
        //
        // RUN THE DATA PIPELINE
        //
        Some((run::cli::RUN_CMD, matches)) => {
            run::handlers::run_pipeline(matches)?;
        }

        //
        // MERGE A3M FILES
        //
        Some((merge::cli::MERGE_MSA_CMD, matches)) => {
            merge::handlers::run_merge_msa(matches)?;
        }

        _ => unreachable!("Subcommand not found"),
    };

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::*;

    #[rstest]
    fn test_parser_is_consistent() {
        build_parser().debug_assert();
    }

    #[rstest]
    fn test_parse_run() {
        let matches = build_parser()
            .try_get_matches_from([
                "foldprep", "run", "--input", "in.json", "--config", "cfg.yaml", "--threads", "4",
            ])
            .unwrap();
        let (name, run) = matches.subcommand().unwrap();
        assert_eq!(name, run::cli::RUN_CMD);
        assert_eq!(run.get_one::<usize>("threads"), Some(&4));
    }

    #[rstest]
    fn test_merge_needs_files() {
        assert!(build_parser().try_get_matches_from(["foldprep", "merge-msa"]).is_err());
    }
}
