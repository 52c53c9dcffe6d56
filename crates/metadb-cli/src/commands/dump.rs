//! Export of a scraper's work queue to CSV files.

use anyhow::{Context, Result};
use metadb_core::{Database, MbType};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Dump everything the latest scraper of `source` has not processed yet.
///
/// Writes `<outname>.csv`, or `<outname>-1.csv`, `<outname>-2.csv`, ... with
/// at most `perfile` rows each when `perfile` is given.
pub fn run_dump(
    db_path: &Path,
    source: &str,
    outname: &str,
    perfile: Option<usize>,
) -> Result<Vec<PathBuf>> {
    if perfile == Some(0) {
        anyhow::bail!("--perfile must be at least 1");
    }

    let db = Database::open(db_path)?;
    let source = db
        .load_source(source)?
        .with_context(|| format!("Unknown source: {source}"))?;
    let scraper = db
        .latest_scraper_for_source(&source)
        .context("Failed to load latest scraper")?
        .with_context(|| format!("Source {} has no scrapers", source.name))?;

    let rows: Vec<Vec<String>> = match scraper.mb_type {
        MbType::Recording => {
            log::info!("Dumping recording items");
            db.unprocessed_recordings(&scraper, None)?
                .iter()
                .map(|row| row.fields())
                .collect()
        }
        MbType::ReleaseGroup => {
            log::info!("Dumping release_group items");
            db.unprocessed_release_groups(&scraper, None)?
                .iter()
                .map(|row| row.fields())
                .collect()
        }
    };

    let written = dump_rows(outname, scraper.mb_type.export_keys(), &rows, perfile)?;
    for path in &written {
        println!("✓ Wrote {}", path.display());
    }
    log::info!("Dumped {} unprocessed items for {}", rows.len(), source.name);

    Ok(written)
}

/// Write `rows` under the `outname` template, splitting every `perfile` rows.
pub fn dump_rows(
    outname: &str,
    keys: &[&str],
    rows: &[Vec<String>],
    perfile: Option<usize>,
) -> Result<Vec<PathBuf>> {
    let Some(perfile) = perfile else {
        let path = PathBuf::from(format!("{outname}.csv"));
        write_csv(&path, keys, rows)?;
        return Ok(vec![path]);
    };

    if rows.is_empty() {
        log::info!("Nothing to dump, no files written for {outname}");
        return Ok(Vec::new());
    }

    let mut written = Vec::new();
    for (i, chunk) in rows.chunks(perfile).enumerate() {
        let path = PathBuf::from(format!("{outname}-{}.csv", i + 1));
        write_csv(&path, keys, chunk)?;
        written.push(path);
    }
    Ok(written)
}

fn write_csv(path: &Path, keys: &[&str], rows: &[Vec<String>]) -> Result<()> {
    let file =
        File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    let mut out = BufWriter::new(file);

    write_record(&mut out, keys.iter().copied())?;
    for row in rows {
        write_record(&mut out, row.iter().map(String::as_str))?;
    }
    out.flush()?;
    Ok(())
}

fn write_record<'a>(out: &mut impl Write, fields: impl Iterator<Item = &'a str>) -> Result<()> {
    let line = fields.map(escape_field).collect::<Vec<_>>().join(",");
    out.write_all(line.as_bytes())?;
    out.write_all(b"\r\n")?;
    Ok(())
}

/// Quote a field when it contains a delimiter, quote, or line break.
fn escape_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
