use std::cmp::Ordering;

use crate::config::validate_alpha;
use crate::enrichment::EnrichmentResult;
use crate::error::Result;
use crate::testing::correction::benjamini_hochberg_sorted;

/// Stable sort by ascending p-value.
pub fn sort_by_p_value(results: &mut [EnrichmentResult]) {
    results.sort_by(|a, b| a.p_value.partial_cmp(&b.p_value).unwrap_or(Ordering::Equal));
}

/// Sort `results` by p-value and overwrite each FDR with its Benjamini-Hochberg
/// adjusted p-value.
pub fn apply_benjamini_hochberg(results: &mut [EnrichmentResult]) -> anyhow::Result<()> {
    if results.is_empty() {
        return Ok(());
    }

    sort_by_p_value(results);
    let p_values: Vec<f64> = results.iter().map(|r| r.p_value).collect();
    let adjusted = benjamini_hochberg_sorted(&p_values)?;

    for (result, fdr) in results.iter_mut().zip(adjusted) {
        result.fdr = fdr;
    }
    Ok(())
}

/// Results with `FDR <= alpha`, in their input order.
pub fn significance_filter(
    results: &[EnrichmentResult],
    alpha: f64,
) -> Result<Vec<EnrichmentResult>> {
    validate_alpha(alpha)?;
    Ok(results
        .iter()
        .filter(|r| r.fdr <= alpha)
        .cloned()
        .collect())
}
