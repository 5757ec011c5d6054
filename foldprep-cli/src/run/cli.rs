use std::path::PathBuf;

use clap::{Arg, Command, value_parser};

pub const RUN_CMD: &str = "run";

pub fn create_run_cli() -> Command {
    Command::new(RUN_CMD)
        .author("Databio")
        .about("Search MSAs and templates for every protein and RNA chain of a fold input.")
        .arg(
            Arg::new("input")
                .long("input")
                .short('i')
                .required(true)
                .value_parser(value_parser!(PathBuf))
                .help("Fold input JSON (optionally gzipped)"),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .required(true)
                .value_parser(value_parser!(PathBuf))
                .help("Pipeline config (.yaml, .yml or .toml)"),
        )
        .arg(
            Arg::new("output")
                .long("output")
                .short('o')
                .value_parser(value_parser!(PathBuf))
                .help("Where to write the processed input. Defaults to <name>_data.json"),
        )
        .arg(
            Arg::new("threads")
                .long("threads")
                .short('t')
                .value_parser(value_parser!(usize))
                .help("Number of chains processed at once (overrides num_workers)"),
        )
}
