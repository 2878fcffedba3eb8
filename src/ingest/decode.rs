// ABOUTME: Tabular decoder turning uploaded bytes into a grid of untyped cells
// ABOUTME: Handles xlsx/xls via calamine and comma-delimited CSV via the csv crate
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! Tabular decoding of uploaded plan files.
//!
//! Spreadsheet formats are read through calamine's format auto-detection over
//! an in-memory cursor; only the first sheet is considered and only cached
//! cell values are used (no formula evaluation). CSV is comma-delimited with
//! standard quoting; records may have uneven lengths.

use super::IngestError;
use calamine::{open_workbook_auto_from_rs, Data, Reader};
use std::borrow::Cow;
use std::io::Cursor;

/// An untyped scalar decoded from the source file
///
/// No type is guaranteed by the source format; all typing happens during row
/// normalization. Date-like spreadsheet cells are stringified here.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    /// Absent or empty cell
    Empty,
    /// Textual cell content
    Text(String),
    /// Numeric cell content
    Number(f64),
    /// Boolean cell content
    Bool(bool),
}

impl Cell {
    /// Stringified view of the cell, the way header matching and row
    /// normalization see it
    #[must_use]
    pub fn text(&self) -> Cow<'_, str> {
        match self {
            Self::Empty => Cow::Borrowed(""),
            Self::Text(s) => Cow::Borrowed(s),
            Self::Number(n) => Cow::Owned(n.to_string()),
            Self::Bool(b) => Cow::Owned(b.to_string()),
        }
    }

    /// Whether the cell is empty or whitespace-only text
    #[must_use]
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Text(s) => s.trim().is_empty(),
            Self::Number(_) | Self::Bool(_) => false,
        }
    }

    fn from_sheet(value: &Data) -> Self {
        match value {
            Data::Empty | Data::Error(_) => Self::Empty,
            Data::String(s) => Self::Text(s.clone()),
            Data::Float(f) => Self::Number(*f),
            Data::Int(i) => Self::Number(*i as f64),
            Data::Bool(b) => Self::Bool(*b),
            // Dates and durations carry through as text; normalization treats
            // them like any other free-text value.
            Data::DateTime(dt) => Self::Text(dt.to_string()),
            Data::DateTimeIso(s) | Data::DurationIso(s) => Self::Text(s.clone()),
        }
    }
}

/// A decoded file: ordered rows of ordered cells, uneven lengths allowed
pub type Grid = Vec<Vec<Cell>>;

/// Decode path selected from the declared content type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanFormat {
    /// xlsx/xls workbook, first sheet only
    Spreadsheet,
    /// Comma-delimited CSV, treated as a single-sheet table
    Csv,
}

impl PlanFormat {
    /// Select the decode path for a declared MIME type
    ///
    /// Only the two CSV MIME types route to the CSV decoder; everything else
    /// is attempted as a spreadsheet, so a caller that skipped MIME filtering
    /// still ends up with `UnreadableFile` rather than a misparse.
    #[must_use]
    pub fn from_content_type(content_type: &str) -> Self {
        let mime = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        match mime.as_str() {
            "text/csv" | "application/csv" => Self::Csv,
            _ => Self::Spreadsheet,
        }
    }
}

/// Decode an uploaded file into a [`Grid`], first sheet only
///
/// # Errors
///
/// Returns [`IngestError::UnreadableFile`] when the buffer cannot be parsed
/// as the selected format (corrupt archive, unsupported encoding).
pub fn decode(bytes: &[u8], content_type: &str) -> Result<Grid, IngestError> {
    match PlanFormat::from_content_type(content_type) {
        PlanFormat::Spreadsheet => decode_spreadsheet(bytes),
        PlanFormat::Csv => decode_csv(bytes),
    }
}

fn decode_spreadsheet(bytes: &[u8]) -> Result<Grid, IngestError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))
        .map_err(|e| IngestError::UnreadableFile(e.to_string()))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| IngestError::UnreadableFile("workbook contains no sheets".into()))?
        .map_err(|e| IngestError::UnreadableFile(e.to_string()))?;

    Ok(range
        .rows()
        .map(|row| row.iter().map(Cell::from_sheet).collect())
        .collect())
}

fn decode_csv(bytes: &[u8]) -> Result<Grid, IngestError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes);

    let mut grid = Grid::new();
    for record in reader.records() {
        let record = record.map_err(|e| IngestError::UnreadableFile(e.to_string()))?;
        grid.push(
            record
                .iter()
                .map(|field| {
                    if field.is_empty() {
                        Cell::Empty
                    } else {
                        Cell::Text(field.to_owned())
                    }
                })
                .collect(),
        );
    }
    Ok(grid)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_selection() {
        assert_eq!(PlanFormat::from_content_type("text/csv"), PlanFormat::Csv);
        assert_eq!(
            PlanFormat::from_content_type("application/csv"),
            PlanFormat::Csv
        );
        assert_eq!(
            PlanFormat::from_content_type("Text/CSV; charset=utf-8"),
            PlanFormat::Csv
        );
        assert_eq!(
            PlanFormat::from_content_type(
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            ),
            PlanFormat::Spreadsheet
        );
        assert_eq!(
            PlanFormat::from_content_type("application/vnd.ms-excel"),
            PlanFormat::Spreadsheet
        );
    }

    #[test]
    fn test_decode_csv_uneven_rows() {
        let bytes = b"Day,Exercise,Sets\nMonday,Squat\n";
        let grid = decode(bytes, "text/csv").unwrap();
        assert_eq!(grid.len(), 2);
        assert_eq!(grid[0].len(), 3);
        assert_eq!(grid[1].len(), 2);
        assert_eq!(grid[1][0], Cell::Text("Monday".into()));
    }

    #[test]
    fn test_decode_csv_quoting() {
        let bytes = b"Day,Exercise\n\"Monday\",\"Overhead Press, seated\"\n";
        let grid = decode(bytes, "text/csv").unwrap();
        assert_eq!(grid[1][1], Cell::Text("Overhead Press, seated".into()));
    }

    #[test]
    fn test_decode_csv_empty_fields_are_empty_cells() {
        let bytes = b"Day,Exercise,Sets\nMonday,,3\n";
        let grid = decode(bytes, "text/csv").unwrap();
        assert_eq!(grid[1][1], Cell::Empty);
    }

    #[test]
    fn test_decode_rejects_garbage_spreadsheet() {
        let bytes = b"definitely not a workbook";
        let err = decode(bytes, "application/vnd.ms-excel").unwrap_err();
        assert!(matches!(err, IngestError::UnreadableFile(_)));
    }

    #[test]
    fn test_decode_rejects_non_utf8_csv() {
        let bytes = [0x44u8, 0x61, 0x79, 0x2c, 0xff, 0xfe, 0x0a];
        let err = decode(&bytes, "text/csv").unwrap_err();
        assert!(matches!(err, IngestError::UnreadableFile(_)));
    }

    #[test]
    fn test_cell_text_formats_whole_numbers_without_fraction() {
        assert_eq!(Cell::Number(60.0).text(), "60");
        assert_eq!(Cell::Number(2.5).text(), "2.5");
    }

    #[test]
    fn test_cell_blankness() {
        assert!(Cell::Empty.is_blank());
        assert!(Cell::Text("   ".into()).is_blank());
        assert!(!Cell::Text("Monday".into()).is_blank());
        assert!(!Cell::Number(0.0).is_blank());
    }
}
