//! Run configuration and its validation.

use clap::ValueEnum;

use crate::error::{EnrichmentError, Result};

/// The statistical engine used to score every gene set of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Engine {
    /// Running-sum permutation test
    Gsea,
    /// Rank-sum test of in-set scores against all scores
    Wilcoxon,
    /// Parametric z-score against the global score distribution
    Page,
}

impl Engine {
    pub fn name(&self) -> &'static str {
        match self {
            Engine::Gsea => "gsea",
            Engine::Wilcoxon => "wilcoxon",
            Engine::Page => "page",
        }
    }
}

/// Where the FDR column of a GSEA run comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum GseaFdr {
    /// Empirical p-value of the normalized score against the normalized null distribution
    Empirical,
    /// Benjamini-Hochberg adjustment of the nominal p-values
    #[value(name = "bh")]
    BenjaminiHochberg,
}

#[derive(Debug, Clone)]
pub struct RunConfig {
    pub engine: Engine,
    /// Column of the expression matrix the genes are ranked and scored by
    pub cluster: usize,
    pub permutations: usize,
    /// Exponent applied to hit scores of the observed gene set
    pub weight: f64,
    /// Exponent applied to hit scores of the permuted gene sets. Kept separate from
    /// `weight` on purpose: the null distribution is built unweighted by default.
    pub null_weight: f64,
    pub alpha: f64,
    pub seed: u64,
    /// Worker count; `None` sizes the pool to the available cores
    pub threads: Option<usize>,
    pub gsea_fdr: GseaFdr,
}

impl Default for RunConfig {
    fn default() -> Self {
        RunConfig {
            engine: Engine::Gsea,
            cluster: 0,
            permutations: 1000,
            weight: 1.0,
            null_weight: 1.0,
            alpha: 0.05,
            seed: 42,
            threads: None,
            gsea_fdr: GseaFdr::Empirical,
        }
    }
}

impl RunConfig {
    pub fn new(engine: Engine) -> Self {
        RunConfig {
            engine,
            ..Default::default()
        }
    }

    pub fn with_cluster(mut self, cluster: usize) -> Self {
        self.cluster = cluster;
        self
    }

    pub fn with_permutations(mut self, permutations: usize) -> Self {
        self.permutations = permutations;
        self
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    pub fn with_null_weight(mut self, null_weight: f64) -> Self {
        self.null_weight = null_weight;
        self
    }

    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = Some(threads);
        self
    }

    pub fn with_gsea_fdr(mut self, gsea_fdr: GseaFdr) -> Self {
        self.gsea_fdr = gsea_fdr;
        self
    }

    /// Check the configuration against a matrix with `n_clusters` columns.
    pub fn validate(&self, n_clusters: usize) -> Result<()> {
        validate_alpha(self.alpha)?;

        if self.cluster >= n_clusters {
            return Err(EnrichmentError::config(format!(
                "cluster index {} out of bounds for a matrix with {} columns",
                self.cluster, n_clusters
            )));
        }

        if self.engine == Engine::Gsea {
            if self.permutations == 0 {
                return Err(EnrichmentError::config(
                    "permutation count must be positive",
                ));
            }
            if !self.weight.is_finite() || !self.null_weight.is_finite() {
                return Err(EnrichmentError::config(format!(
                    "weight exponents must be finite, got {} and {}",
                    self.weight, self.null_weight
                )));
            }
        }

        if self.threads == Some(0) {
            return Err(EnrichmentError::config("thread count must be positive"));
        }

        Ok(())
    }
}

pub(crate) fn validate_alpha(alpha: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&alpha) {
        return Err(EnrichmentError::config(format!(
            "alpha must lie in [0, 1], got {}",
            alpha
        )));
    }
    Ok(())
}
