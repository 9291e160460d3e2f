//! Multiple testing correction for controlling the false discovery rate
//! when many gene sets are tested simultaneously.

use anyhow::{Result, anyhow};

/// Apply the Benjamini-Hochberg (BH) procedure to p-values sorted in ascending order.
///
/// Rank `i` (1-based) gets `min(1, p[i] * n / i)`, followed by a backward tail-minimum
/// pass so that no value exceeds any value ranked after it.
///
/// # Arguments
/// * `sorted_p_values` - p-values in ascending order
///
/// # Returns
/// * `Result<Vec<f64>>` - adjusted p-values, aligned with the input
///
/// # Example
/// ```
/// use geneset_enrichment::testing::correction::benjamini_hochberg_sorted;
///
/// let adjusted = benjamini_hochberg_sorted(&[0.01, 0.03, 0.05]).unwrap();
/// assert!((adjusted[0] - 0.03).abs() < 1e-12);
/// ```
pub fn benjamini_hochberg_sorted(sorted_p_values: &[f64]) -> Result<Vec<f64>> {
    let n = sorted_p_values.len();
    if n == 0 {
        return Err(anyhow!("Empty p-value array"));
    }

    validate_p_values(sorted_p_values)?;

    if sorted_p_values.windows(2).any(|w| w[0] > w[1]) {
        return Err(anyhow!("p-values must be sorted in ascending order"));
    }

    let mut adjusted: Vec<f64> = sorted_p_values
        .iter()
        .enumerate()
        .map(|(i, &p)| (p * n as f64 / (i + 1) as f64).min(1.0))
        .collect();

    tail_minimum(&mut adjusted);
    Ok(adjusted)
}

/// Replace every value with the minimum of itself and all values after it.
///
/// Applying this twice is the same as applying it once.
pub fn tail_minimum(values: &mut [f64]) {
    let mut current_min = f64::INFINITY;

    // Process from largest rank to smallest
    for value in values.iter_mut().rev() {
        current_min = value.min(current_min);
        *value = current_min;
    }
}

fn validate_p_values(p_values: &[f64]) -> Result<()> {
    for (i, &p) in p_values.iter().enumerate() {
        if !(0.0..=1.0).contains(&p) {
            return Err(anyhow!("Invalid p-value at index {}: {}", i, p));
        }
    }
    Ok(())
}
