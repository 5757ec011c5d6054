use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::ArgMatches;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use foldprep_core::FoldInput;
use foldprep_pipeline::{DataPipeline, DataPipelineConfig, PipelineDriver};

pub fn run_pipeline(matches: &ArgMatches) -> Result<()> {
    let input = matches
        .get_one::<PathBuf>("input")
        .context("A path to a fold input is required.")?;
    let config = matches
        .get_one::<PathBuf>("config")
        .context("A path to a pipeline config is required.")?;

    let mut config = DataPipelineConfig::from_file(config)?;
    if let Some(threads) = matches.get_one::<usize>("threads") {
        config.num_workers = Some(*threads);
    }

    let fold_input = FoldInput::from_file(input)?;
    let output = matches
        .get_one::<PathBuf>("output")
        .cloned()
        .unwrap_or_else(|| PathBuf::from(format!("{}_data.json", fold_input.name)));

    let driver = PipelineDriver::new(DataPipeline::from_config(&config), config.num_workers)?;
    info!(
        "Running the data pipeline on {} ({} chains, {} workers)",
        fold_input.name,
        fold_input.chains.len(),
        driver.num_workers()
    );

    let start = Instant::now();
    let pb = ProgressBar::new(fold_input.chains.len() as u64);
    pb.set_style(ProgressStyle::default_bar().template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}")?);
    pb.set_message(format!("Processing {}", fold_input.name));

    let processed = driver.process_with_progress(&fold_input, |chain, _| {
        pb.set_message(format!("Finished chain {}", chain.id()));
        pb.inc(1);
    });
    pb.finish_and_clear();
    let processed = processed.with_context(|| format!("Data pipeline failed for {}", fold_input.name))?;

    processed.to_file(&output)?;
    info!(
        "Data pipeline for {} took {:.2} seconds, wrote {:?}",
        fold_input.name,
        start.elapsed().as_secs_f64(),
        output
    );

    Ok(())
}
