use crate::error::DegenerateCondition;
use crate::testing::TestResult;
use num_traits::Float;
use single_utilities::traits::FloatOps;
use statrs::distribution::{ContinuousCDF, Normal};
use std::cmp::Ordering;

/// Wilcoxon rank-sum test of `x` against `y` using the normal approximation.
///
/// Ranks are computed over the pooled sample with ties averaged. The statistic is
/// `z = (R_x - n_x (n + 1) / 2) / sqrt(n_x n_y (n + 1) / 12)` where `R_x` is the rank sum
/// of `x`; no continuity or tie correction is applied.
///
/// # Arguments
///
/// * `x` - First sample
/// * `y` - Second sample
///
/// # Returns
///
/// `TestResult` holding the z statistic and its two-sided p-value, or
/// [`DegenerateCondition::EmptyGeneSet`] when either sample is empty.
pub fn rank_sum<T>(
    x: &[T],
    y: &[T],
) -> Result<TestResult<T>, DegenerateCondition>
where
    T: FloatOps,
{
    let nx = x.len();
    let ny = y.len();

    if nx == 0 || ny == 0 {
        return Err(DegenerateCondition::EmptyGeneSet);
    }

    // Combine samples and assign group labels (0 for x, 1 for y)
    let mut combined: Vec<(T, usize)> = Vec::with_capacity(nx + ny);
    combined.extend(x.iter().map(|&v| (v, 0)));
    combined.extend(y.iter().map(|&v| (v, 1)));

    combined.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal));

    // Assign ranks (with ties averaged)
    let mut ranks = vec![T::zero(); nx + ny];
    let mut i = 0;
    while i < combined.len() {
        let val = combined[i].0;
        let mut j = i + 1;

        while j < combined.len() && combined[j].0 == val {
            j += 1;
        }

        let rank = T::from(i + j - 1).unwrap() / T::from(2.0).unwrap() + T::one();
        for k in i..j {
            ranks[k] = rank;
        }

        i = j;
    }

    let mut rank_sum_x = T::zero();
    for i in 0..combined.len() {
        if combined[i].1 == 0 {
            rank_sum_x += ranks[i];
        }
    }

    let n = nx + ny;
    let expected = T::from(nx * (n + 1)).unwrap() / T::from(2.0).unwrap();
    let variance = T::from(nx * ny * (n + 1)).unwrap() / T::from(12.0).unwrap();
    let standard_error = Float::sqrt(variance);
    let z = (rank_sum_x - expected) / standard_error;

    let normal = Normal::new(0.0, 1.0).unwrap();
    let z_f64 = z.to_f64().unwrap();

    let p_value = T::from((2.0 * normal.sf(z_f64.abs())).min(1.0)).unwrap();

    Ok(TestResult::new(z, p_value)
        .with_standard_error(standard_error)
        .with_metadata("rank_sum", rank_sum_x)
        .with_metadata("expected_rank_sum", expected)
        .with_metadata("nx", T::from(nx).unwrap())
        .with_metadata("ny", T::from(ny).unwrap()))
}
