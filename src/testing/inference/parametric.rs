//! Parametric tests against a known score distribution.
//!
//! The z test here compares the mean of a sample drawn from a population whose mean and
//! standard deviation are known, which is the setting of parametric gene set scoring.

use crate::error::DegenerateCondition;
use crate::testing::TestResult;
use statrs::distribution::{ContinuousCDF, Normal};

/// Perform a one-sample z test from summary statistics.
///
/// The statistic is oriented population-minus-sample:
/// `z = (population_mean - sample_mean) * sqrt(sample_size) / population_sd`.
/// The p-value is the standard normal upper-tail probability of `|z|`.
///
/// # Arguments
///
/// * `sample_mean`, `sample_size` - Mean and count of the sample
/// * `population_mean`, `population_sd` - Mean and standard deviation of the population
///
/// # Returns
///
/// `TestResult` containing the z statistic and p-value, or the condition that makes the
/// statistic undefined.
pub fn z_test_from_summary(
    sample_mean: f64,
    sample_size: usize,
    population_mean: f64,
    population_sd: f64,
) -> Result<TestResult<f64>, DegenerateCondition> {
    if sample_size == 0 {
        return Err(DegenerateCondition::EmptyGeneSet);
    }
    if population_sd == 0.0 {
        return Err(DegenerateCondition::ZeroStdDev);
    }

    let standard_error = population_sd / (sample_size as f64).sqrt();
    let z = (population_mean - sample_mean) / standard_error;
    let p_value = upper_tail_abs(z);

    Ok(TestResult::new(z, p_value)
        .with_standard_error(standard_error)
        .with_metadata("sample_mean", sample_mean)
        .with_metadata("sample_size", sample_size as f64))
}

/// P(Z > |z|) under the standard normal distribution.
#[inline]
pub fn upper_tail_abs(z: f64) -> f64 {
    if !z.is_finite() {
        return if z.is_infinite() { 0.0 } else { 1.0 };
    }
    let normal = Normal::new(0.0, 1.0).unwrap();
    normal.sf(z.abs())
}
