//! Two-sample and one-sample significance tests used by the enrichment engines.

pub mod nonparametric;

pub mod parametric;
