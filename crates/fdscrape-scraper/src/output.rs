//! CSV and JSON output of extracted records.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use fdscrape_core::ProductRecord;

use crate::error::ScraperError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Csv,
    Json,
}

impl OutputFormat {
    pub const ALL: [Self; 2] = [Self::Csv, Self::Json];

    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Csv => "CSV",
            Self::Json => "JSON",
        }
    }
}

/// Writes `records` as CSV with a header row taken from the first record.
///
/// Absent fields become empty cells.
///
/// # Errors
///
/// Returns [`ScraperError::Csv`] on serialization or write failure.
pub fn write_csv<W: Write>(writer: W, records: &[ProductRecord]) -> Result<(), ScraperError> {
    let mut csv = csv::Writer::from_writer(writer);
    for record in records {
        csv.serialize(record)?;
    }
    csv.flush().map_err(csv::Error::from)?;
    Ok(())
}

/// Writes `records` as a pretty-printed JSON array (2-space indent, `null`
/// for absent fields, non-ASCII left unescaped).
///
/// # Errors
///
/// Returns [`ScraperError::Json`] on serialization or write failure.
pub fn write_json<W: Write>(writer: W, records: &[ProductRecord]) -> Result<(), ScraperError> {
    serde_json::to_writer_pretty(writer, records).map_err(|source| ScraperError::Json {
        context: "product records".to_owned(),
        source,
    })
}

/// Writes `<dir>/<stem>.csv` and `<dir>/<stem>.json`, creating `dir` if
/// needed. Returns the written paths in that order.
///
/// # Errors
///
/// Returns [`ScraperError::Io`] if the directory or a file cannot be
/// created, or a serialization error from the writers.
pub fn write_records(
    dir: &Path,
    stem: &str,
    records: &[ProductRecord],
) -> Result<Vec<PathBuf>, ScraperError> {
    std::fs::create_dir_all(dir).map_err(|e| ScraperError::io(dir, e))?;

    let mut written = Vec::with_capacity(OutputFormat::ALL.len());
    for format in OutputFormat::ALL {
        let path = dir.join(format!("{stem}.{}", format.extension()));
        let file = File::create(&path).map_err(|e| ScraperError::io(&path, e))?;
        let mut writer = BufWriter::new(file);
        match format {
            OutputFormat::Csv => write_csv(&mut writer, records)?,
            OutputFormat::Json => write_json(&mut writer, records)?,
        }
        writer.flush().map_err(|e| ScraperError::io(&path, e))?;

        tracing::info!(
            records = records.len(),
            path = %path.display(),
            "Saved {} records to {}",
            records.len(),
            format.label()
        );
        written.push(path);
    }
    Ok(written)
}

/// Reads a JSON file produced by [`write_json`].
///
/// # Errors
///
/// Returns [`ScraperError::Io`] if the file cannot be opened and
/// [`ScraperError::Json`] if it does not hold a record array.
pub fn read_json(path: &Path) -> Result<Vec<ProductRecord>, ScraperError> {
    let file = File::open(path).map_err(|e| ScraperError::io(path, e))?;
    serde_json::from_reader(BufReader::new(file)).map_err(|source| ScraperError::Json {
        context: path.display().to_string(),
        source,
    })
}

#[cfg(test)]
#[path = "output_test.rs"]
mod tests;
