use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use anyhow::{Context, Result};

/// Read a background gene list: the first tab-delimited field of every non-empty line.
pub fn read_background(path: impl AsRef<Path>) -> Result<HashSet<String>> {
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("Failed to open background file {}", path.display()))?;

    let mut genes = HashSet::new();
    for line in BufReader::new(file).lines() {
        let line = line.with_context(|| format!("Failed to read {}", path.display()))?;
        if let Some(gene) = line.split('\t').next().map(str::trim).filter(|g| !g.is_empty()) {
            genes.insert(gene.to_string());
        }
    }
    Ok(genes)
}
