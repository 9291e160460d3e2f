//! Parametric analysis of gene set enrichment: a z-score of the gene set mean against the
//! mean and standard deviation of the whole cluster column.

use log::debug;

use crate::data::{GeneSet, Universe};
use crate::enrichment::{EnrichmentResult, ScoreGeneSet};
use crate::error::{EnrichmentError, Result};
use crate::testing::inference::parametric::z_test_from_summary;

/// Column statistics shared by every gene set of a run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageParams {
    pub global_mean: f64,
    /// Population standard deviation (no degrees-of-freedom correction)
    pub global_stddev: f64,
}

impl PageParams {
    pub fn from_universe(universe: &Universe<'_>) -> Self {
        let values = universe.values();
        PageParams {
            global_mean: values.mean().unwrap_or(0.0),
            global_stddev: values.std(0.0),
        }
    }
}

impl ScoreGeneSet for PageParams {
    fn score(&self, gene_set: &GeneSet, universe: &Universe<'_>) -> Result<EnrichmentResult> {
        let membership = universe.resolve(gene_set);
        let size = membership.rows.len();
        let geneset_mean = if size == 0 {
            0.0
        } else {
            membership.rows.iter().map(|&row| universe.value(row)).sum::<f64>() / size as f64
        };

        let test = z_test_from_summary(geneset_mean, size, self.global_mean, self.global_stddev)
            .map_err(|condition| EnrichmentError::degenerate(gene_set.id(), condition))?;

        debug!(
            "{}: z={:.4} p={:.4} ({} of {} members scored)",
            gene_set.id(),
            test.statistic,
            test.p_value,
            size,
            gene_set.len()
        );

        Ok(EnrichmentResult::new(gene_set, universe, test.p_value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::ExpressionMatrix;
    use crate::error::DegenerateCondition;
    use approx::assert_relative_eq;

    fn five_genes() -> ExpressionMatrix {
        ExpressionMatrix::from_rows(
            (1..=5).map(|i| (format!("g{}", i), vec![i as f64])).collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_global_statistics() {
        let matrix = five_genes();
        let universe = Universe::new(&matrix, 0).unwrap();
        let params = PageParams::from_universe(&universe);
        assert_relative_eq!(params.global_mean, 3.0);
        assert_relative_eq!(params.global_stddev, 2.0_f64.sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn test_page_known_value() {
        let matrix = five_genes();
        let universe = Universe::new(&matrix, 0).unwrap();
        let params = PageParams::from_universe(&universe);
        let result = params
            .score(&GeneSet::new("HIGH", ["g4", "g5", "missing"]), &universe)
            .unwrap();
        assert_relative_eq!(result.p_value, 0.0668072012688581, epsilon = 1e-9);
        assert_eq!(result.gene_set_size, 3);
    }

    #[test]
    fn test_page_degenerate_inputs() {
        let matrix = ExpressionMatrix::from_rows(vec![
            ("a".to_string(), vec![2.0]),
            ("b".to_string(), vec![2.0]),
        ])
        .unwrap();
        let universe = Universe::new(&matrix, 0).unwrap();
        let params = PageParams::from_universe(&universe);
        let err = params.score(&GeneSet::new("FLAT", ["a"]), &universe).unwrap_err();
        assert!(matches!(
            err,
            EnrichmentError::DegenerateInput { condition: DegenerateCondition::ZeroStdDev, .. }
        ));

        let matrix = five_genes();
        let universe = Universe::new(&matrix, 0).unwrap();
        let params = PageParams::from_universe(&universe);
        let err = params.score(&GeneSet::new("NONE", ["zz"]), &universe).unwrap_err();
        assert!(matches!(
            err,
            EnrichmentError::DegenerateInput { condition: DegenerateCondition::EmptyGeneSet, .. }
        ));
    }
}
