use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use anyhow::{Context, Result, anyhow};

use crate::data::ExpressionMatrix;

/// Read a tab-delimited expression matrix: `gene<TAB>score<TAB>score...`.
pub fn read_matrix(path: impl AsRef<Path>) -> Result<ExpressionMatrix> {
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("Failed to open expression matrix {}", path.display()))?;
    parse_matrix(BufReader::new(file))
        .with_context(|| format!("Failed to read expression matrix {}", path.display()))
}

/// Parse matrix lines. A first line whose value fields are not all numeric is taken as a
/// header of column names.
pub fn parse_matrix<R: BufRead>(reader: R) -> Result<ExpressionMatrix> {
    let mut rows: Vec<(String, Vec<f64>)> = Vec::new();
    let mut header: Option<Vec<String>> = None;
    let mut first = true;

    for (line_idx, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim_end_matches(['\r', '\n']);
        if line.trim().is_empty() {
            continue;
        }

        let mut fields = line.split('\t');
        let gene = fields.next().unwrap_or("").trim();
        let raw: Vec<&str> = fields.map(str::trim).collect();

        let parsed: std::result::Result<Vec<f64>, _> =
            raw.iter().map(|v| v.parse::<f64>()).collect();

        match parsed {
            Ok(values) => {
                if gene.is_empty() {
                    return Err(anyhow!("Missing gene identifier on line {}", line_idx + 1));
                }
                rows.push((gene.to_string(), values));
            }
            Err(_) if first => {
                header = Some(raw.iter().map(|s| s.to_string()).collect());
            }
            Err(e) => {
                return Err(anyhow!(
                    "Failed to parse score for gene {} on line {}: {}",
                    gene,
                    line_idx + 1,
                    e
                ));
            }
        }
        first = false;
    }

    let matrix = ExpressionMatrix::from_rows(rows)?;
    match header {
        Some(names) => Ok(matrix.with_column_names(names)?),
        None => Ok(matrix),
    }
}
