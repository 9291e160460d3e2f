//! Rank-sum comparison of a gene set's scores against the whole cluster column.

use log::debug;

use crate::data::{GeneSet, Universe};
use crate::enrichment::{EnrichmentResult, ScoreGeneSet};
use crate::error::{EnrichmentError, Result};
use crate::testing::inference::nonparametric::rank_sum;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WilcoxonParams;

impl ScoreGeneSet for WilcoxonParams {
    fn score(&self, gene_set: &GeneSet, universe: &Universe<'_>) -> Result<EnrichmentResult> {
        let membership = universe.resolve(gene_set);

        // Both samples are built fresh for this gene set and dropped with it.
        let in_set: Vec<f64> = membership
            .rows
            .iter()
            .map(|&row| universe.value(row))
            .collect();
        let all_scores = universe.values().to_vec();

        let test = rank_sum(&in_set, &all_scores)
            .map_err(|condition| EnrichmentError::degenerate(gene_set.id(), condition))?;

        debug!(
            "{}: z={:.4} p={:.4} ({} of {} members scored)",
            gene_set.id(),
            test.statistic,
            test.p_value,
            in_set.len(),
            gene_set.len()
        );

        Ok(EnrichmentResult::new(gene_set, universe, test.p_value))
    }
}
