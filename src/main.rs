//! gsea-enrich command-line interface

use std::io::Write;

use anyhow::Result;
use clap::Parser;
use log::{LevelFilter, info};

use geneset_enrichment::cli::Cli;
use geneset_enrichment::enrichment::run_enrichment;
use geneset_enrichment::io::{
    read_background, read_gmt, read_matrix, significant_output_path, write_listings,
    write_results,
};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    env_logger::Builder::new()
        .filter_level(log_level)
        .parse_default_env()
        .format_timestamp(None)
        .init();

    let config = cli.run_config();

    info!("Loading gene sets from {}", cli.annotations.display());
    let sets = read_gmt(&cli.annotations)?;
    info!("Loaded {} gene sets", sets.len());

    info!("Loading expression matrix from {}", cli.expression.display());
    let mut matrix = read_matrix(&cli.expression)?;
    info!(
        "Loaded {} genes x {} clusters",
        matrix.n_genes(),
        matrix.n_clusters()
    );

    if let Some(path) = &cli.background {
        let background = read_background(path)?;
        matrix = matrix.restrict_to(&background)?;
        info!(
            "Restricted universe to {} genes of {} background genes",
            matrix.n_genes(),
            background.len()
        );
    }

    let run = run_enrichment(&sets, &matrix, &config)?;

    let significant_path = cli
        .significant_output
        .clone()
        .unwrap_or_else(|| significant_output_path(&cli.output));
    write_listings(&run, &cli.output, &significant_path)?;
    info!(
        "Wrote {} and {}",
        cli.output.display(),
        significant_path.display()
    );

    if cli.print {
        let listing = if cli.significant_only {
            &run.significant
        } else {
            &run.results
        };
        let stdout = std::io::stdout();
        let mut handle = stdout.lock();
        write_results(&mut handle, listing, run.engine)?;
        handle.flush()?;
    }

    Ok(())
}
