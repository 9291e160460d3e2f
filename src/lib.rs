//! # geneset-enrichment
//!
//! Gene set enrichment testing over the columns of an expression matrix.
//!
//! Given a matrix of per-gene scores and a collection of named gene sets, every gene set
//! is scored for a chosen column with one of three engines, the resulting p-values are
//! corrected for multiple testing and a false discovery threshold selects the significant
//! sets.
//!
//! ## Core Features
//!
//! - **GSEA**: running-sum enrichment score, seeded permutation null distribution,
//!   normalized score and empirical p-value
//! - **Wilcoxon**: rank-sum test of in-set scores against the whole column
//! - **PAGE**: z-score of the gene set mean against the column mean and deviation
//! - **Multiple Testing Correction**: Benjamini-Hochberg with a tail-minimum pass
//! - **Parallel Scoring**: one independent work item per gene set on a rayon pool
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use geneset_enrichment::config::{Engine, RunConfig};
//! use geneset_enrichment::enrichment::run_enrichment;
//! use geneset_enrichment::io::{read_gmt, read_matrix};
//!
//! # fn main() -> anyhow::Result<()> {
//! let sets = read_gmt("sets.gmt")?;
//! let matrix = read_matrix("scores.tsv")?;
//! let run = run_enrichment(&sets, &matrix, &RunConfig::new(Engine::Page))?;
//! for r in &run.significant {
//!     println!("{}\t{}\t{}", r.gene_set_id, r.p_value, r.fdr);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Organization
//!
//! - **[`data`]**: gene sets, the expression matrix and the ranked universe
//! - **[`enrichment`]**: engines, work items, dispatcher and the run pipeline
//! - **[`testing`]**: statistical tests and multiple testing correction
//! - **[`io`]**: input readers and result writers
//! - **[`config`]** / **[`cli`]**: run configuration and command-line surface

pub mod cli;
pub mod config;
pub mod data;
pub mod enrichment;
pub mod error;
pub mod io;
pub mod testing;

pub use error::{DegenerateCondition, EnrichmentError};
