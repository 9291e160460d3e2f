//! Running-sum gene set enrichment with a permutation null distribution.

use log::debug;
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::index;

use crate::data::{GeneSet, Universe};
use crate::enrichment::{EnrichmentResult, ScoreGeneSet};
use crate::error::{DegenerateCondition, EnrichmentError, Result};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GseaParams {
    pub permutations: usize,
    /// Exponent applied to the scores of the observed gene set's hits
    pub weight: f64,
    /// Exponent applied to the scores of permuted gene sets' hits
    pub null_weight: f64,
    /// Seed of this item's permutation RNG
    pub seed: u64,
}

/// Kolmogorov-Smirnov style running-sum statistic of `hits` (matrix rows) against the
/// universe ranking.
///
/// Walking the ranking from the top, a hit adds `value^weight / sum(hit values^weight)`
/// and a miss subtracts `1 / (N - Nh)`. Returns `max(max_net, |min_net|)`.
pub fn enrichment_score(
    universe: &Universe<'_>,
    hits: &[usize],
    weight: f64,
) -> std::result::Result<f64, DegenerateCondition> {
    let n = universe.size();
    let n_hits = hits.len();

    if n_hits == 0 {
        return Err(DegenerateCondition::EmptyGeneSet);
    }
    if n_hits >= n {
        return Err(DegenerateCondition::SetSpansUniverse);
    }

    let mut is_hit = vec![false; n];
    let mut hit_weight_sum = 0.0;
    for &row in hits {
        is_hit[row] = true;
        hit_weight_sum += universe.value(row).powf(weight);
    }

    if !hit_weight_sum.is_finite() {
        return Err(DegenerateCondition::NonFiniteHitWeight { weight });
    }
    if hit_weight_sum == 0.0 {
        return Err(DegenerateCondition::ZeroHitWeight);
    }

    let miss_step = 1.0 / (n - n_hits) as f64;
    let mut net = 0.0;
    let mut max_net = f64::NEG_INFINITY;
    let mut min_net = f64::INFINITY;

    for &row in universe.ranking() {
        if is_hit[row] {
            net += universe.value(row).powf(weight) / hit_weight_sum;
        } else {
            net -= miss_step;
        }
        max_net = max_net.max(net);
        min_net = min_net.min(net);
    }

    Ok(max_net.max(min_net.abs()))
}

/// Scores of `permutations` random gene sets of `set_size` genes drawn uniformly without
/// replacement from the universe.
pub fn null_distribution<R>(
    universe: &Universe<'_>,
    set_size: usize,
    permutations: usize,
    weight: f64,
    rng: &mut R,
) -> std::result::Result<Vec<f64>, DegenerateCondition>
where
    R: Rng + ?Sized,
{
    let n = universe.size();
    if set_size >= n {
        return Err(DegenerateCondition::SetSpansUniverse);
    }

    (0..permutations)
        .map(|_| {
            let sample = index::sample(rng, n, set_size).into_vec();
            enrichment_score(universe, &sample, weight)
        })
        .collect()
}

/// Mean of the positive and of the negative members of a null distribution.
#[derive(Debug, Clone, Copy)]
struct SignedMeans {
    positive: Option<f64>,
    negative: Option<f64>,
}

impl SignedMeans {
    fn new(null_scores: &[f64]) -> Self {
        let (mut pos_sum, mut pos_count) = (0.0, 0usize);
        let (mut neg_sum, mut neg_count) = (0.0, 0usize);
        for &e in null_scores {
            if e > 0.0 {
                pos_sum += e;
                pos_count += 1;
            } else if e < 0.0 {
                neg_sum += e;
                neg_count += 1;
            }
        }

        SignedMeans {
            positive: (pos_count > 0).then(|| pos_sum / pos_count as f64),
            negative: (neg_count > 0).then(|| neg_sum / neg_count as f64),
        }
    }

    fn normalize(&self, score: f64) -> std::result::Result<f64, DegenerateCondition> {
        let mean = if score > 0.0 {
            self.positive
        } else if score < 0.0 {
            self.negative
        } else {
            None
        };
        mean.map(|m| score / m).ok_or(DegenerateCondition::NoSameSignedNull)
    }
}

/// Divide `observed` by the mean of the null scores sharing its sign.
pub fn normalize_score(
    observed: f64,
    null_scores: &[f64],
) -> std::result::Result<f64, DegenerateCondition> {
    SignedMeans::new(null_scores).normalize(observed)
}

/// Empirical p-value of `score` relative to the mean of `distribution`.
///
/// Scores above the mean count the values `>= score`, scores below it count the values
/// `<= score`; a score equal to the mean gets 1.
pub fn empirical_p_value(
    score: f64,
    distribution: &[f64],
) -> std::result::Result<f64, DegenerateCondition> {
    if distribution.is_empty() {
        return Err(DegenerateCondition::EmptyDistribution);
    }

    let len = distribution.len() as f64;
    let mean = distribution.iter().sum::<f64>() / len;

    if score == mean {
        return Ok(1.0);
    }

    let tail = if score > mean {
        distribution.iter().filter(|&&e| e >= score).count()
    } else {
        distribution.iter().filter(|&&e| e <= score).count()
    };

    Ok(tail as f64 / len)
}

impl ScoreGeneSet for GseaParams {
    fn score(&self, gene_set: &GeneSet, universe: &Universe<'_>) -> Result<EnrichmentResult> {
        let degenerate =
            |condition: DegenerateCondition| EnrichmentError::degenerate(gene_set.id(), condition);

        let membership = universe.resolve(gene_set);
        let es = enrichment_score(universe, &membership.rows, self.weight).map_err(degenerate)?;

        let mut rng = StdRng::seed_from_u64(self.seed);
        let null = null_distribution(
            universe,
            membership.rows.len(),
            self.permutations,
            self.null_weight,
            &mut rng,
        )
        .map_err(degenerate)?;

        let means = SignedMeans::new(&null);
        let nes = means.normalize(es).map_err(degenerate)?;
        let normalized_null = null
            .iter()
            .map(|&e| means.normalize(e))
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(degenerate)?;

        let p_value = empirical_p_value(es, &null).map_err(degenerate)?;
        let fdr = empirical_p_value(nes, &normalized_null).map_err(degenerate)?;

        debug!(
            "{}: es={:.4} nes={:.4} p={:.4} ({} of {} members scored)",
            gene_set.id(),
            es,
            nes,
            p_value,
            membership.rows.len(),
            gene_set.len()
        );

        Ok(EnrichmentResult::new(gene_set, universe, p_value)
            .with_fdr(fdr)
            .with_scores(es, nes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::ExpressionMatrix;
    use approx::assert_relative_eq;

    fn four_genes() -> ExpressionMatrix {
        ExpressionMatrix::from_rows(vec![
            ("g1".to_string(), vec![3.0]),
            ("g2".to_string(), vec![2.0]),
            ("g3".to_string(), vec![1.0]),
            ("g4".to_string(), vec![0.0]),
        ])
        .unwrap()
    }

    #[test]
    fn test_running_sum_example() {
        let matrix = four_genes();
        let universe = Universe::new(&matrix, 0).unwrap();
        let hits = universe.resolve(&GeneSet::new("S", ["g1", "g3"])).rows;
        let es = enrichment_score(&universe, &hits, 1.0).unwrap();
        assert_relative_eq!(es, 0.75, epsilon = 1e-12);
    }

    #[test]
    fn test_weight_changes_hit_steps() {
        let matrix = four_genes();
        let universe = Universe::new(&matrix, 0).unwrap();
        let hits = universe.resolve(&GeneSet::new("S", ["g1", "g3"])).rows;
        // weight 2: hit sum 9 + 1 = 10, first step 0.9
        let es = enrichment_score(&universe, &hits, 2.0).unwrap();
        assert_relative_eq!(es, 0.9, epsilon = 1e-12);
        // weight 0: every hit steps by 1/2
        let es = enrichment_score(&universe, &hits, 0.0).unwrap();
        assert_relative_eq!(es, 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_bottom_heavy_set_uses_min_deviation() {
        let matrix = ExpressionMatrix::from_rows(vec![
            ("a".to_string(), vec![4.0]),
            ("b".to_string(), vec![3.0]),
            ("c".to_string(), vec![2.0]),
            ("d".to_string(), vec![1.0]),
        ])
        .unwrap();
        let universe = Universe::new(&matrix, 0).unwrap();
        let hits = universe.resolve(&GeneSet::new("S", ["d"])).rows;
        // three misses of 1/3 reach -1 before the single hit brings it back to 0
        let es = enrichment_score(&universe, &hits, 1.0).unwrap();
        assert_relative_eq!(es, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_degenerate_scores() {
        let matrix = four_genes();
        let universe = Universe::new(&matrix, 0).unwrap();

        let all = universe.resolve(&GeneSet::new("S", ["g1", "g2", "g3", "g4"])).rows;
        assert_eq!(
            enrichment_score(&universe, &all, 1.0).unwrap_err(),
            DegenerateCondition::SetSpansUniverse
        );

        let zero = universe.resolve(&GeneSet::new("S", ["g4"])).rows;
        assert_eq!(
            enrichment_score(&universe, &zero, 1.0).unwrap_err(),
            DegenerateCondition::ZeroHitWeight
        );

        assert_eq!(
            enrichment_score(&universe, &[], 1.0).unwrap_err(),
            DegenerateCondition::EmptyGeneSet
        );
    }

    #[test]
    fn test_non_finite_hit_weight() {
        let matrix = ExpressionMatrix::from_rows(vec![
            ("a".to_string(), vec![3.0]),
            ("b".to_string(), vec![-1.0]),
            ("c".to_string(), vec![2.0]),
            ("d".to_string(), vec![0.5]),
        ])
        .unwrap();
        let universe = Universe::new(&matrix, 0).unwrap();

        // (-1)^0.5 is NaN
        let hits = universe.resolve(&GeneSet::new("S", ["a", "b"])).rows;
        assert_eq!(
            enrichment_score(&universe, &hits, 0.5).unwrap_err(),
            DegenerateCondition::NonFiniteHitWeight { weight: 0.5 }
        );

        let err = GseaParams {
            permutations: 10,
            weight: 0.5,
            null_weight: 1.0,
            seed: 1,
        }
        .score(&GeneSet::new("S", ["a", "b"]), &universe)
        .unwrap_err();
        assert!(err.to_string().contains("not finite"));
        assert!(!err.to_string().contains("is zero"));
    }

    #[test]
    fn test_zero_score_with_negative_weight() {
        let matrix = four_genes();
        let universe = Universe::new(&matrix, 0).unwrap();
        // 0^-1 is infinite
        let hits = universe.resolve(&GeneSet::new("S", ["g1", "g4"])).rows;
        assert_eq!(
            enrichment_score(&universe, &hits, -1.0).unwrap_err(),
            DegenerateCondition::NonFiniteHitWeight { weight: -1.0 }
        );
    }

    #[test]
    fn test_absent_gene_set_is_empty() {
        let matrix = four_genes();
        let universe = Universe::new(&matrix, 0).unwrap();
        let params = GseaParams {
            permutations: 10,
            weight: 1.0,
            null_weight: 1.0,
            seed: 1,
        };
        match params.score(&GeneSet::new("GHOST", ["x"]), &universe).unwrap_err() {
            EnrichmentError::DegenerateInput { gene_set, condition } => {
                assert_eq!(gene_set, "GHOST");
                assert_eq!(condition, DegenerateCondition::EmptyGeneSet);
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_null_weight_drives_only_the_null() {
        let matrix = ExpressionMatrix::from_rows(
            (1..=30).map(|i| (format!("g{}", i), vec![(31 - i) as f64 / 3.0])).collect(),
        )
        .unwrap();
        let universe = Universe::new(&matrix, 0).unwrap();
        let set = GeneSet::new("TOP", ["g1", "g2", "g4", "g9"]);
        let params = |null_weight| GseaParams {
            permutations: 300,
            weight: 2.0,
            null_weight,
            seed: 5,
        };

        let linear_null = params(1.0).score(&set, &universe).unwrap();
        let squared_null = params(2.0).score(&set, &universe).unwrap();

        // the observed score always uses `weight`
        let hits = universe.resolve(&set).rows;
        let es = enrichment_score(&universe, &hits, 2.0).unwrap();
        assert_eq!(linear_null.enrichment_score, Some(es));
        assert_eq!(squared_null.enrichment_score, Some(es));

        let nes_linear = linear_null.normalized_enrichment_score.unwrap();
        let nes_squared = squared_null.normalized_enrichment_score.unwrap();
        assert!((nes_linear - nes_squared).abs() > 1e-6);

        let mut rng = StdRng::seed_from_u64(5);
        let null = null_distribution(&universe, hits.len(), 300, 1.0, &mut rng).unwrap();
        assert_relative_eq!(
            nes_linear,
            normalize_score(es, &null).unwrap(),
            epsilon = 1e-12
        );
        assert_relative_eq!(
            linear_null.p_value,
            empirical_p_value(es, &null).unwrap(),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_null_distribution_length_and_seed() {
        let matrix = ExpressionMatrix::from_rows(
            (1..=20).map(|i| (format!("g{}", i), vec![i as f64])).collect(),
        )
        .unwrap();
        let universe = Universe::new(&matrix, 0).unwrap();

        let mut rng = StdRng::seed_from_u64(7);
        let first = null_distribution(&universe, 4, 250, 1.0, &mut rng).unwrap();
        assert_eq!(first.len(), 250);
        assert!(first.iter().all(|&e| e > 0.0 && e <= 1.0));

        let mut rng = StdRng::seed_from_u64(7);
        let second = null_distribution(&universe, 4, 250, 1.0, &mut rng).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_normalize_score_uses_same_signed_mean() {
        let null = [0.2, 0.4, -0.5, 0.6];
        assert_relative_eq!(normalize_score(0.8, &null).unwrap(), 2.0, epsilon = 1e-12);
        assert_relative_eq!(normalize_score(-1.0, &null).unwrap(), 2.0, epsilon = 1e-12);
        assert_eq!(
            normalize_score(-1.0, &[0.2, 0.3]).unwrap_err(),
            DegenerateCondition::NoSameSignedNull
        );
        assert!(normalize_score(0.0, &null).is_err());
    }

    #[test]
    fn test_empirical_p_value_tails() {
        let dist = [0.1, 0.2, 0.3, 0.4, 0.5];
        // mean 0.3
        assert_eq!(empirical_p_value(0.3, &dist).unwrap(), 1.0);
        assert_relative_eq!(empirical_p_value(0.4, &dist).unwrap(), 0.4);
        assert_relative_eq!(empirical_p_value(0.15, &dist).unwrap(), 0.2);
        assert_eq!(empirical_p_value(0.9, &dist).unwrap(), 0.0);
        assert_eq!(
            empirical_p_value(0.9, &[]).unwrap_err(),
            DegenerateCondition::EmptyDistribution
        );
    }

    #[test]
    fn test_gsea_params_score_is_reproducible() {
        let matrix = ExpressionMatrix::from_rows(
            (1..=30).map(|i| (format!("g{}", i), vec![(31 - i) as f64])).collect(),
        )
        .unwrap();
        let universe = Universe::new(&matrix, 0).unwrap();
        let set = GeneSet::new("TOP", ["g1", "g2", "g3", "g_absent"]);
        let params = GseaParams {
            permutations: 200,
            weight: 1.0,
            null_weight: 1.0,
            seed: 11,
        };

        let first = params.score(&set, &universe).unwrap();
        let second = params.score(&set, &universe).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.gene_set_size, 4);
        assert_eq!(first.universe_size, 30);
        assert!(first.p_value < 0.05);
        assert!((0.0..=1.0).contains(&first.fdr));
        assert!(first.normalized_enrichment_score.unwrap() > 1.0);
    }
}
