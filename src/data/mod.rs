//! Gene sets, the expression matrix and the ranked universe derived from one of its columns.
//!
//! Everything here is loaded once and read-only for the rest of a run, so it can be shared
//! by reference across workers.

mod gene_set;
mod matrix;

pub use gene_set::{GeneSet, GeneSetCollection};
pub use matrix::{ExpressionMatrix, Membership, Universe};
