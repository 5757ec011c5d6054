use std::path::PathBuf;

use clap::{Arg, ArgAction, Command, value_parser};

pub const MERGE_MSA_CMD: &str = "merge-msa";

pub fn create_merge_msa_cli() -> Command {
    Command::new(MERGE_MSA_CMD)
        .author("Databio")
        .about("Merge A3M alignments of the same query, dropping duplicate rows.")
        .arg(
            Arg::new("msas")
                .required(true)
                .num_args(1..)
                .value_parser(value_parser!(PathBuf))
                .help("A3M files, in priority order (optionally gzipped)"),
        )
        .arg(
            Arg::new("query")
                .long("query")
                .short('q')
                .help("Query sequence. Defaults to the first row of the first file"),
        )
        .arg(
            Arg::new("type")
                .long("type")
                .default_value("protein")
                .help("Polymer type of the query: protein, rna or dna"),
        )
        .arg(
            Arg::new("no-dedup")
                .long("no-dedup")
                .action(ArgAction::SetTrue)
                .help("Concatenate rows without removing duplicates"),
        )
        .arg(
            Arg::new("output")
                .long("output")
                .short('o')
                .value_parser(value_parser!(PathBuf))
                .help("Output A3M file. Defaults to stdout"),
        )
}
