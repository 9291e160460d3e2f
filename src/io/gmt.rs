use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use log::warn;

use crate::data::{GeneSet, GeneSetCollection};

/// Read a GMT file: one gene set per line, `id<TAB>description<TAB>gene...`.
pub fn read_gmt(path: impl AsRef<Path>) -> Result<GeneSetCollection> {
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("Failed to open gene set file {}", path.display()))?;
    parse_gmt(BufReader::new(file))
        .with_context(|| format!("Failed to read gene set file {}", path.display()))
}

/// Parse GMT lines. The description field is ignored; sets without members are skipped.
pub fn parse_gmt<R: BufRead>(reader: R) -> Result<GeneSetCollection> {
    let mut collection = GeneSetCollection::default();
    let mut skipped = 0;

    for (line_idx, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim_end_matches(['\r', '\n']);
        if line.trim().is_empty() {
            continue;
        }

        let parts: Vec<&str> = line.split('\t').collect();
        let id = parts[0].trim();
        if id.is_empty() {
            return Err(anyhow!("Missing gene set identifier on line {}", line_idx + 1));
        }

        let genes: Vec<&str> = parts
            .iter()
            .skip(2)
            .map(|g| g.trim())
            .filter(|g| !g.is_empty())
            .collect();

        if genes.is_empty() {
            skipped += 1;
            continue;
        }

        collection.push(GeneSet::new(id, genes));
    }

    if skipped > 0 {
        warn!("Skipped {} gene sets without members", skipped);
    }

    Ok(collection)
}
