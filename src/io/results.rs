use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tempfile::NamedTempFile;

use crate::config::Engine;
use crate::enrichment::{EnrichmentResult, EnrichmentRun};

/// Write a ranked listing as TSV. GSEA listings carry the raw and normalized scores.
pub fn write_results<W: Write>(
    out: &mut W,
    results: &[EnrichmentResult],
    engine: Engine,
) -> std::io::Result<()> {
    let gsea = engine == Engine::Gsea;

    if gsea {
        writeln!(
            out,
            "cluster\tgene_set\tset_size\tuniverse_size\tes\tnes\tp_value\tfdr"
        )?;
    } else {
        writeln!(out, "cluster\tgene_set\tset_size\tuniverse_size\tp_value\tfdr")?;
    }

    for r in results {
        write!(
            out,
            "{}\t{}\t{}\t{}",
            r.cluster, r.gene_set_id, r.gene_set_size, r.universe_size
        )?;
        if gsea {
            write!(
                out,
                "\t{}\t{}",
                format_optional(r.enrichment_score),
                format_optional(r.normalized_enrichment_score)
            )?;
        }
        writeln!(out, "\t{:.6e}\t{:.6e}", r.p_value, r.fdr)?;
    }

    Ok(())
}

fn format_optional(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.6}", v),
        None => "NA".to_string(),
    }
}

fn render(results: &[EnrichmentResult], engine: Engine) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    write_results(&mut buffer, results, engine)?;
    Ok(buffer)
}

/// Write `contents` to a temporary file next to `path`; it is removed again when dropped
/// without being persisted.
fn stage(path: &Path, contents: &[u8]) -> Result<NamedTempFile> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut file = NamedTempFile::new_in(dir)
        .with_context(|| format!("Failed to create a temporary file for {}", path.display()))?;
    file.write_all(contents)
        .and_then(|_| file.flush())
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(file)
}

fn persist(staged: NamedTempFile, path: &Path) -> Result<()> {
    staged
        .persist(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    Ok(())
}

/// Write the full and the significant listing of a run.
///
/// Both listings are staged before either is moved into place, so a failure while writing
/// leaves neither output behind.
pub fn write_listings(run: &EnrichmentRun, output: &Path, significant: &Path) -> Result<()> {
    let all = stage(output, &render(&run.results, run.engine)?)?;
    let passing = stage(significant, &render(&run.significant, run.engine)?)?;

    persist(all, output)?;
    persist(passing, significant)
}

/// `results.tsv` -> `results.significant.tsv`; `results` -> `results.significant`.
pub fn significant_output_path(output: &Path) -> PathBuf {
    let stem = output
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "results".to_string());
    let name = match output.extension() {
        Some(ext) => format!("{}.significant.{}", stem, ext.to_string_lossy()),
        None => format!("{}.significant", stem),
    };
    output.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(id: &str, p: f64, fdr: f64) -> EnrichmentResult {
        EnrichmentResult {
            cluster: 0,
            universe_size: 100,
            gene_set_id: id.to_string(),
            gene_set_size: 10,
            p_value: p,
            fdr,
            enrichment_score: None,
            normalized_enrichment_score: None,
        }
    }

    #[test]
    fn test_write_page_listing() {
        let mut out = Vec::new();
        write_results(&mut out, &[result("SET", 0.01, 0.02)], Engine::Page).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "cluster\tgene_set\tset_size\tuniverse_size\tp_value\tfdr");
        assert!(lines[1].starts_with("0\tSET\t10\t100\t"));
        assert_eq!(lines[1].split('\t').count(), 6);
    }

    #[test]
    fn test_write_gsea_listing() {
        let mut r = result("SET", 0.01, 0.02);
        r.enrichment_score = Some(0.75);
        r.normalized_enrichment_score = Some(1.5);
        let mut out = Vec::new();
        write_results(&mut out, &[r], Engine::Gsea).unwrap();
        let text = String::from_utf8(out).unwrap();
        let row: Vec<_> = text.lines().nth(1).unwrap().split('\t').collect();
        assert_eq!(row.len(), 8);
        assert_eq!(row[4], "0.750000");
        assert_eq!(row[5], "1.500000");
    }

    #[test]
    fn test_write_listings() {
        let dir = tempfile::TempDir::new().unwrap();
        let run = EnrichmentRun {
            engine: Engine::Wilcoxon,
            results: vec![result("A", 0.001, 0.002), result("B", 0.3, 0.3)],
            significant: vec![result("A", 0.001, 0.002)],
        };
        let output = dir.path().join("out.tsv");
        let significant = significant_output_path(&output);
        write_listings(&run, &output, &significant).unwrap();

        assert_eq!(std::fs::read_to_string(&output).unwrap().lines().count(), 3);
        assert_eq!(std::fs::read_to_string(&significant).unwrap().lines().count(), 2);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 2);
    }

    #[test]
    fn test_failed_listing_leaves_no_output() {
        let dir = tempfile::TempDir::new().unwrap();
        let run = EnrichmentRun {
            engine: Engine::Page,
            results: vec![result("A", 0.01, 0.02)],
            significant: vec![result("A", 0.01, 0.02)],
        };
        let output = dir.path().join("out.tsv");
        let significant = dir.path().join("missing_dir").join("out.significant.tsv");

        assert!(write_listings(&run, &output, &significant).is_err());
        assert!(!output.exists());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_significant_output_path() {
        assert_eq!(
            significant_output_path(Path::new("out/results.tsv")),
            PathBuf::from("out/results.significant.tsv")
        );
        assert_eq!(
            significant_output_path(Path::new("results")),
            PathBuf::from("results.significant")
        );
    }
}
