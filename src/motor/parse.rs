//! Readers for thrust-curve files.
//!
//! Two formats are understood: a delimited two-column table (time, thrust)
//! and the RASP `.eng` motor format. Both return raw pairs; ordering and
//! de-duplication happen in [`ThrustCurve::load`](super::ThrustCurve::load).

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use csv::{ReaderBuilder, Trim};
use log::debug;

use crate::error::Result;

/// Motor data file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurveFormat {
    Csv,
    Rasp,
}

impl CurveFormat {
    /// Guess the format from a file extension; unknown extensions read as CSV.
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .as_deref()
        {
            Some("eng") | Some("rasp") => Self::Rasp,
            _ => Self::Csv,
        }
    }
}

fn is_comment(field: &str) -> bool {
    field.starts_with('#') || field.starts_with(';')
}

/// Parse `time,thrust` rows.
///
/// Blank lines, comment lines (`#` or `;`), rows with fewer than two fields
/// and non-numeric header rows are skipped.
pub fn read_csv<R: Read>(reader: R) -> Result<Vec<(f64, f64)>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let mut pairs = Vec::new();
    for record in rdr.records() {
        let record = record?;
        let (Some(t), Some(f)) = (record.get(0), record.get(1)) else {
            continue;
        };
        if t.is_empty() || is_comment(t) {
            continue;
        }
        match (t.parse::<f64>(), f.parse::<f64>()) {
            (Ok(t), Ok(f)) => pairs.push((t, f)),
            _ => debug!("skipping non-numeric thrust row {:?}", record),
        }
    }
    Ok(pairs)
}

/// Parse the first motor block of a RASP `.eng` file.
///
/// Leading blank/comment lines and one header line are skipped; pairs are
/// read until a blank line, a comment, or a line that does not parse.
pub fn read_rasp<R: BufRead>(reader: R) -> Result<Vec<(f64, f64)>> {
    let mut lines = Vec::new();
    for line in reader.lines() {
        lines.push(line?.trim().to_string());
    }

    let body = lines
        .iter()
        .skip_while(|l| l.is_empty() || is_comment(l))
        .skip(1); // motor header: name diameter length delays masses maker

    let mut pairs = Vec::new();
    for line in body {
        if line.is_empty() || is_comment(line) {
            break;
        }
        let mut parts = line.split_whitespace();
        let parsed = match (parts.next(), parts.next()) {
            (Some(t), Some(f)) => t.parse::<f64>().ok().zip(f.parse::<f64>().ok()),
            _ => None,
        };
        match parsed {
            Some(pair) => pairs.push(pair),
            None => break,
        }
    }
    Ok(pairs)
}

/// Read raw `(time, thrust)` pairs from a file, choosing the parser by extension.
pub fn load_file(path: impl AsRef<Path>) -> Result<Vec<(f64, f64)>> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let format = CurveFormat::from_path(path);
    let pairs = match format {
        CurveFormat::Csv => read_csv(file)?,
        CurveFormat::Rasp => read_rasp(BufReader::new(file))?,
    };
    debug!("read {} thrust samples from {} ({:?})", pairs.len(), path.display(), format);
    Ok(pairs)
}
