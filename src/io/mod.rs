//! File formats around the enrichment core: tab-delimited gene set and expression matrix
//! inputs, background gene lists and the result listings.

mod background;
mod gmt;
mod matrix;
mod results;

pub use background::read_background;
pub use gmt::{parse_gmt, read_gmt};
pub use matrix::{parse_matrix, read_matrix};
pub use results::{significant_output_path, write_listings, write_results};
