//! Command-line interface definition.

use std::path::PathBuf;

use clap::Parser;

use crate::config::{Engine, GseaFdr, RunConfig};

#[derive(Parser, Debug)]
#[command(
    name = "gsea-enrich",
    author,
    version,
    about = "Gene set enrichment testing of an expression matrix column",
    long_about = None
)]
pub struct Cli {
    /// Enrichment engine
    #[arg(long, value_enum, default_value_t = Engine::Gsea)]
    pub engine: Engine,

    /// Gene set file (GMT: id, description, genes; tab-delimited)
    #[arg(short = 'a', long = "annotations")]
    pub annotations: PathBuf,

    /// Expression matrix (gene followed by one score per cluster; tab-delimited)
    #[arg(short = 'e', long = "expression")]
    pub expression: PathBuf,

    /// Matrix column to rank and score genes by
    #[arg(short, long, default_value_t = 0)]
    pub cluster: usize,

    /// Number of GSEA permutations
    #[arg(short, long, default_value_t = 1000)]
    pub permutations: usize,

    /// GSEA weight exponent for the observed gene set
    #[arg(short, long, default_value_t = 1.0)]
    pub weight: f64,

    /// GSEA weight exponent for the permuted gene sets of the null distribution
    #[arg(long, default_value_t = 1.0)]
    pub null_weight: f64,

    /// False discovery rate threshold for the significant listing
    #[arg(short = 'r', long, default_value_t = 0.05)]
    pub alpha: f64,

    /// Random seed for GSEA permutations
    #[arg(short, long, default_value_t = 42)]
    pub seed: u64,

    /// Number of worker threads (default: all cores)
    #[arg(short, long)]
    pub threads: Option<usize>,

    /// Source of the FDR column for GSEA runs
    #[arg(long, value_enum, default_value_t = GseaFdr::Empirical)]
    pub gsea_fdr: GseaFdr,

    /// Restrict the gene universe to the genes listed in this file
    #[arg(short, long)]
    pub background: Option<PathBuf>,

    /// Output TSV path for all results
    #[arg(short, long)]
    pub output: PathBuf,

    /// Output TSV path for significant results (default: <output stem>.significant.<ext>)
    #[arg(long)]
    pub significant_output: Option<PathBuf>,

    /// Also print the results to the console
    #[arg(long)]
    pub print: bool,

    /// Print only significant results to the console
    #[arg(long, requires = "print")]
    pub significant_only: bool,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub fn run_config(&self) -> RunConfig {
        let mut config = RunConfig::new(self.engine)
            .with_cluster(self.cluster)
            .with_permutations(self.permutations)
            .with_weight(self.weight)
            .with_null_weight(self.null_weight)
            .with_alpha(self.alpha)
            .with_seed(self.seed)
            .with_gsea_fdr(self.gsea_fdr);
        if let Some(threads) = self.threads {
            config = config.with_threads(threads);
        }
        config
    }
}
