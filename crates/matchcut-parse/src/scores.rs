//! Score sheet parsing.
//!
//! The sheet is a plain tabular spreadsheet with one row per point and a
//! fixed, positionally-addressed column layout:
//!
//! | set | point | set 1 | set 2 | games | points | comment |
//!
//! The first row is a header and is skipped. Rows whose first cell is empty
//! are skipped too (scorekeepers leave blank separator rows between sets).
//! Score cells may arrive as text (`"6/4"`) or as numbers (a bare `3` the
//! spreadsheet stored as a float), so cells are coerced through
//! [`cell_str`]/[`cell_u32`].

use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};

use matchcut_core::{Error, Result, ScoreRecord};

/// Parse the first worksheet of a score workbook into records, in row order.
///
/// # Errors
///
/// [`Error::Parse`] when the workbook cannot be opened or its first
/// worksheet cannot be read.
pub fn parse_scores(path: &Path) -> Result<Vec<ScoreRecord>> {
    let mut workbook = open_workbook_auto(path)
        .map_err(|e| Error::parse(path, format!("cannot open workbook: {e}")))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| Error::parse(path, "workbook has no worksheets"))?
        .map_err(|e| Error::parse(path, format!("cannot read worksheet: {e}")))?;

    let records: Vec<ScoreRecord> = range
        .rows()
        .skip(1)
        .filter_map(record_from_row)
        .collect();

    tracing::debug!("Parsed {} score rows from {}", records.len(), path.display());
    Ok(records)
}

/// Convert one data row into a record. Returns `None` for rows that should
/// be skipped (empty or non-numeric first cell).
fn record_from_row(row: &[Data]) -> Option<ScoreRecord> {
    let set_number = cell_u32(row.first()?)?;

    Some(ScoreRecord {
        set_number,
        point_number: row.get(1).and_then(cell_u32).unwrap_or(0),
        completed_set1: row.get(2).and_then(cell_str),
        completed_set2: row.get(3).and_then(cell_str),
        games: row.get(4).and_then(cell_str).unwrap_or_else(|| "0/0".into()),
        points: row.get(5).and_then(cell_str).unwrap_or_else(|| "0/0".into()),
        comment: row.get(6).and_then(cell_str).unwrap_or_default(),
    })
}

/// Cell as trimmed text; numeric cells are rendered without a trailing `.0`.
/// Empty cells (and empty strings) are `None`.
fn cell_str(cell: &Data) -> Option<String> {
    match cell {
        Data::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Data::Float(f) if f.fract() == 0.0 => Some(format!("{}", *f as i64)),
        Data::Float(f) => Some(f.to_string()),
        Data::Int(i) => Some(i.to_string()),
        Data::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Cell as a non-negative integer, accepting floats and numeric text.
fn cell_u32(cell: &Data) -> Option<u32> {
    match cell {
        Data::Float(f) if *f >= 0.0 => Some(*f as u32),
        Data::Int(i) if *i >= 0 => Some(*i as u32),
        Data::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
