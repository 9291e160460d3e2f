//! Gene set enrichment engines and the run pipeline that drives them.
//!
//! A run ranks the genes of one matrix column, turns every gene set into a [`WorkItem`],
//! scores the items in parallel with the selected engine, sorts the results by p-value,
//! fills in the FDR column and finally applies the significance threshold.
//!
//! ## Available Methods
//!
//! - **GSEA** (`gsea`): running-sum statistic with a permutation null distribution
//! - **Wilcoxon** (`wilcoxon`): rank-sum test of in-set scores against all scores
//! - **PAGE** (`page`): z-score of the gene set mean against the column distribution

use std::time::Instant;

use log::{debug, info, warn};

use crate::config::{Engine, GseaFdr, RunConfig};
use crate::data::{ExpressionMatrix, GeneSet, GeneSetCollection, Universe};
use crate::error::Result;

mod dispatch;
mod fdr;
pub mod gsea;
pub mod page;
pub mod wilcoxon;

pub use dispatch::dispatch;
pub use fdr::{apply_benjamini_hochberg, significance_filter, sort_by_p_value};
pub use gsea::GseaParams;
pub use page::PageParams;
pub use wilcoxon::WilcoxonParams;

/// Outcome of scoring one gene set.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichmentResult {
    /// Matrix column the genes were ranked by
    pub cluster: usize,
    /// Number of genes in the matrix
    pub universe_size: usize,
    pub gene_set_id: String,
    /// Number of members in the gene set, including members absent from the matrix
    pub gene_set_size: usize,
    pub p_value: f64,
    pub fdr: f64,
    /// Raw enrichment score (GSEA only)
    pub enrichment_score: Option<f64>,
    /// Normalized enrichment score (GSEA only)
    pub normalized_enrichment_score: Option<f64>,
}

impl EnrichmentResult {
    /// Create a result whose FDR is still unset (1.0) until correction.
    pub fn new(gene_set: &GeneSet, universe: &Universe<'_>, p_value: f64) -> Self {
        EnrichmentResult {
            cluster: universe.cluster(),
            universe_size: universe.size(),
            gene_set_id: gene_set.id().to_string(),
            gene_set_size: gene_set.len(),
            p_value,
            fdr: 1.0,
            enrichment_score: None,
            normalized_enrichment_score: None,
        }
    }

    pub fn with_fdr(mut self, fdr: f64) -> Self {
        self.fdr = fdr;
        self
    }

    pub fn with_scores(mut self, es: f64, nes: f64) -> Self {
        self.enrichment_score = Some(es);
        self.normalized_enrichment_score = Some(nes);
        self
    }
}

/// The common contract of the engines: score one gene set against a ranked universe.
///
/// Implementations must not keep state between calls; everything a score needs is
/// either in `self`, the gene set or the read-only universe.
pub trait ScoreGeneSet: Sync {
    fn score(&self, gene_set: &GeneSet, universe: &Universe<'_>) -> Result<EnrichmentResult>;
}

/// Engine-specific inputs of a work item. Resolved once per run from the [`RunConfig`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EngineParams {
    Gsea(GseaParams),
    Wilcoxon(WilcoxonParams),
    Page(PageParams),
}

impl EngineParams {
    pub fn for_run(config: &RunConfig, universe: &Universe<'_>) -> Self {
        match config.engine {
            Engine::Gsea => EngineParams::Gsea(GseaParams {
                permutations: config.permutations,
                weight: config.weight,
                null_weight: config.null_weight,
                seed: config.seed,
            }),
            Engine::Wilcoxon => EngineParams::Wilcoxon(WilcoxonParams),
            Engine::Page => EngineParams::Page(PageParams::from_universe(universe)),
        }
    }

    /// Parameters for the `index`-th item; GSEA items get their own RNG seed.
    fn for_item(self, index: usize) -> Self {
        match self {
            EngineParams::Gsea(params) => EngineParams::Gsea(GseaParams {
                seed: params.seed.wrapping_add(index as u64),
                ..params
            }),
            other => other,
        }
    }
}

impl ScoreGeneSet for EngineParams {
    fn score(&self, gene_set: &GeneSet, universe: &Universe<'_>) -> Result<EnrichmentResult> {
        match self {
            EngineParams::Gsea(params) => params.score(gene_set, universe),
            EngineParams::Wilcoxon(params) => params.score(gene_set, universe),
            EngineParams::Page(params) => params.score(gene_set, universe),
        }
    }
}

/// One independent unit of work: a gene set and the parameters to score it with.
#[derive(Debug, Clone, Copy)]
pub struct WorkItem<'a> {
    pub gene_set: &'a GeneSet,
    pub params: EngineParams,
}

impl WorkItem<'_> {
    pub fn evaluate(&self, universe: &Universe<'_>) -> Result<EnrichmentResult> {
        self.params.score(self.gene_set, universe)
    }
}

/// One work item per gene set, in collection order.
pub fn build_work_items(collection: &GeneSetCollection, params: EngineParams) -> Vec<WorkItem<'_>> {
    collection
        .iter()
        .enumerate()
        .map(|(index, gene_set)| WorkItem {
            gene_set,
            params: params.for_item(index),
        })
        .collect()
}

/// All results of a run in ascending p-value order, plus the subset passing `alpha`.
#[derive(Debug, Clone)]
pub struct EnrichmentRun {
    pub engine: Engine,
    pub results: Vec<EnrichmentResult>,
    pub significant: Vec<EnrichmentResult>,
}

/// Score every gene set of `collection` against one column of `matrix`.
///
/// Fails as a whole when any single gene set cannot be scored.
pub fn run_enrichment(
    collection: &GeneSetCollection,
    matrix: &ExpressionMatrix,
    config: &RunConfig,
) -> anyhow::Result<EnrichmentRun> {
    config.validate(matrix.n_clusters())?;

    let universe = Universe::new(matrix, config.cluster)?;
    report_missing_members(collection, &universe);

    let params = EngineParams::for_run(config, &universe);
    let items = build_work_items(collection, params);

    let column = match matrix.column_names().and_then(|names| names.get(config.cluster)) {
        Some(name) => format!("{} ({})", config.cluster, name),
        None => config.cluster.to_string(),
    };
    info!(
        "Running {} on cluster {}: {} gene sets, {} genes, {} worker threads",
        config.engine.name(),
        column,
        items.len(),
        universe.size(),
        config.threads.unwrap_or_else(rayon::current_num_threads)
    );

    let start = Instant::now();
    let mut results = dispatch(&items, &universe, config.threads)?;
    info!("Scored {} gene sets in {:.2?}", results.len(), start.elapsed());

    match (config.engine, config.gsea_fdr) {
        (Engine::Gsea, GseaFdr::Empirical) => sort_by_p_value(&mut results),
        _ => apply_benjamini_hochberg(&mut results)?,
    }

    let significant = significance_filter(&results, config.alpha)?;
    info!(
        "{} of {} gene sets pass FDR <= {}",
        significant.len(),
        results.len(),
        config.alpha
    );

    Ok(EnrichmentRun {
        engine: config.engine,
        results,
        significant,
    })
}

fn report_missing_members(collection: &GeneSetCollection, universe: &Universe<'_>) {
    let mut affected_sets = 0;
    let mut missing_total = 0;
    for gene_set in collection {
        let missing = universe.resolve(gene_set).missing;
        if missing > 0 {
            debug!(
                "{}: {} of {} members absent from the matrix",
                gene_set.id(),
                missing,
                gene_set.len()
            );
            affected_sets += 1;
            missing_total += missing;
        }
    }

    if affected_sets > 0 {
        warn!(
            "{} gene sets have members absent from the matrix ({} members in total); \
             they are excluded from scoring",
            affected_sets,
            missing_total
        );
    }
}
