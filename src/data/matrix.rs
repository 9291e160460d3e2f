use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use ndarray::{Array2, ArrayView1, Axis};

use crate::data::GeneSet;
use crate::error::{EnrichmentError, Result};

/// Dense genes × clusters score matrix keyed by gene identifier.
#[derive(Debug, Clone)]
pub struct ExpressionMatrix {
    genes: Vec<String>,
    index: HashMap<String, usize>,
    column_names: Option<Vec<String>>,
    values: Array2<f64>,
}

fn invalid(reason: impl Into<String>) -> EnrichmentError {
    EnrichmentError::InvalidMatrix {
        reason: reason.into(),
    }
}

impl ExpressionMatrix {
    pub fn new(genes: Vec<String>, values: Array2<f64>) -> Result<Self> {
        if genes.is_empty() || values.ncols() == 0 {
            return Err(invalid("matrix has no genes or no columns"));
        }
        if genes.len() != values.nrows() {
            return Err(invalid(format!(
                "{} gene identifiers for {} rows",
                genes.len(),
                values.nrows()
            )));
        }
        if let Some(((row, col), v)) = values.indexed_iter().find(|(_, v)| !v.is_finite()) {
            return Err(invalid(format!(
                "non-finite value {} for gene {} in column {}",
                v, genes[row], col
            )));
        }

        let mut index = HashMap::with_capacity(genes.len());
        for (row, gene) in genes.iter().enumerate() {
            if index.insert(gene.clone(), row).is_some() {
                return Err(invalid(format!("duplicate gene identifier {}", gene)));
            }
        }

        Ok(ExpressionMatrix {
            genes,
            index,
            column_names: None,
            values,
        })
    }

    /// Build a matrix from `(gene, scores)` rows. Every row must carry the same number of scores.
    pub fn from_rows(rows: Vec<(String, Vec<f64>)>) -> Result<Self> {
        let n_cols = rows.first().map(|(_, v)| v.len()).unwrap_or(0);
        let mut genes = Vec::with_capacity(rows.len());
        let mut flat = Vec::with_capacity(rows.len() * n_cols);

        for (gene, scores) in rows {
            if scores.len() != n_cols {
                return Err(invalid(format!(
                    "gene {} has {} values, expected {}",
                    gene,
                    scores.len(),
                    n_cols
                )));
            }
            genes.push(gene);
            flat.extend(scores);
        }

        let values = Array2::from_shape_vec((genes.len(), n_cols), flat)
            .map_err(|e| invalid(e.to_string()))?;
        Self::new(genes, values)
    }

    pub fn with_column_names(mut self, names: Vec<String>) -> Result<Self> {
        if names.len() != self.n_clusters() {
            return Err(invalid(format!(
                "{} column names for {} columns",
                names.len(),
                self.n_clusters()
            )));
        }
        self.column_names = Some(names);
        Ok(self)
    }

    pub fn n_genes(&self) -> usize {
        self.genes.len()
    }

    pub fn n_clusters(&self) -> usize {
        self.values.ncols()
    }

    pub fn genes(&self) -> &[String] {
        &self.genes
    }

    pub fn column_names(&self) -> Option<&[String]> {
        self.column_names.as_deref()
    }

    pub fn gene_index(&self, gene: &str) -> Option<usize> {
        self.index.get(gene).copied()
    }

    pub fn value(&self, gene: &str, cluster: usize) -> Option<f64> {
        let row = self.gene_index(gene)?;
        self.values.get((row, cluster)).copied()
    }

    pub fn column(&self, cluster: usize) -> Result<ArrayView1<'_, f64>> {
        if cluster >= self.n_clusters() {
            return Err(EnrichmentError::config(format!(
                "cluster index {} out of bounds for a matrix with {} columns",
                cluster,
                self.n_clusters()
            )));
        }
        Ok(self.values.column(cluster))
    }

    /// Keep only the genes listed in `background`, preserving row order.
    pub fn restrict_to(&self, background: &HashSet<String>) -> Result<Self> {
        let rows: Vec<usize> = (0..self.n_genes())
            .filter(|&row| background.contains(&self.genes[row]))
            .collect();
        if rows.is_empty() {
            return Err(invalid("no matrix gene is part of the background"));
        }

        let genes = rows.iter().map(|&row| self.genes[row].clone()).collect();
        let values = self.values.select(Axis(0), &rows);
        let mut restricted = Self::new(genes, values)?;
        restricted.column_names = self.column_names.clone();
        Ok(restricted)
    }
}

/// Members of a gene set located in the matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct Membership {
    /// Matrix rows of the members present in the matrix
    pub rows: Vec<usize>,
    /// Members absent from the matrix; excluded from scoring
    pub missing: usize,
}

/// One cluster column of a matrix together with its descending ranking.
///
/// Built once per run and shared read-only by every work item.
#[derive(Debug)]
pub struct Universe<'a> {
    matrix: &'a ExpressionMatrix,
    cluster: usize,
    values: ArrayView1<'a, f64>,
    order: Vec<usize>,
}

impl<'a> Universe<'a> {
    pub fn new(matrix: &'a ExpressionMatrix, cluster: usize) -> Result<Self> {
        let values = matrix.column(cluster)?;

        // Stable sort: ties keep matrix row order.
        let mut order: Vec<usize> = (0..matrix.n_genes()).collect();
        order.sort_by(|&a, &b| {
            values[b]
                .partial_cmp(&values[a])
                .unwrap_or(Ordering::Equal)
        });

        Ok(Universe {
            matrix,
            cluster,
            values,
            order,
        })
    }

    pub fn matrix(&self) -> &'a ExpressionMatrix {
        self.matrix
    }

    pub fn cluster(&self) -> usize {
        self.cluster
    }

    /// Number of genes in the universe.
    pub fn size(&self) -> usize {
        self.order.len()
    }

    pub fn values(&self) -> ArrayView1<'a, f64> {
        self.values
    }

    pub fn value(&self, row: usize) -> f64 {
        self.values[row]
    }

    /// Matrix rows sorted descending by score.
    pub fn ranking(&self) -> &[usize] {
        &self.order
    }

    pub fn ranked_genes(&self) -> impl Iterator<Item = &str> + '_ {
        self.order
            .iter()
            .map(move |&row| self.matrix.genes[row].as_str())
    }

    pub fn resolve(&self, set: &GeneSet) -> Membership {
        let mut rows = Vec::with_capacity(set.len());
        let mut missing = 0;
        for gene in set.genes() {
            match self.matrix.gene_index(gene) {
                Some(row) => rows.push(row),
                None => missing += 1,
            }
        }
        Membership { rows, missing }
    }
}
