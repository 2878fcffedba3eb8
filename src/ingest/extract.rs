// ABOUTME: Row extraction and normalization for uploaded workout plans
// ABOUTME: Turns grid rows after the header into NewWorkout records with per-field coercion
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! Row normalization for the ingestion pipeline.
//!
//! Rows strictly after the header are processed in source order. Gap rows
//! (fully empty, or with a blank Day/Exercise cell) are intentional rest-day
//! separators in real exports and are skipped silently. Field coercion never
//! fails a row: unparsable set/rep counts become 0, unparsable weights become
//! absent.

use super::columns::HeaderMap;
use super::decode::{Cell, Grid};
use crate::models::NewWorkout;

/// Outcome of the extraction stage: surviving rows plus a scan count
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedPlan {
    /// Normalized plan rows, source order preserved
    pub rows: Vec<NewWorkout>,
    /// Number of rows after the header that were considered
    pub rows_considered: usize,
}

/// Extract and normalize the data rows of a located plan table
#[must_use]
pub fn extract_rows(grid: &Grid, header_index: usize, header: &HeaderMap) -> ParsedPlan {
    let mut rows = Vec::new();
    let mut rows_considered = 0;

    for row in grid.iter().skip(header_index + 1) {
        rows_considered += 1;

        if row.iter().all(Cell::is_blank) {
            continue;
        }

        let (Some(day), Some(exercise)) = (
            trimmed_text(row, header.day),
            trimmed_text(row, header.exercise),
        ) else {
            // Rest-day separator or partial row, not malformed input.
            continue;
        };

        rows.push(NewWorkout {
            day,
            exercise,
            sets: header.sets.map_or(0, |index| parse_count(cell_at(row, index))),
            reps: header.reps.map_or(0, |index| parse_count(cell_at(row, index))),
            start_weight: header
                .weight
                .and_then(|index| parse_decimal(cell_at(row, index))),
            progression_rule: header
                .progression
                .and_then(|index| trimmed_text(row, index)),
        });
    }

    ParsedPlan {
        rows,
        rows_considered,
    }
}

/// Cell lookup tolerating rows shorter than the header
fn cell_at(row: &[Cell], index: usize) -> &Cell {
    row.get(index).unwrap_or(&Cell::Empty)
}

/// Trimmed text content, `None` when the cell is blank
fn trimmed_text(row: &[Cell], index: usize) -> Option<String> {
    let cell = cell_at(row, index);
    if cell.is_blank() {
        return None;
    }
    let text = cell.text();
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_owned())
}

/// Integer coercion for set/rep counts; unparsable values default to 0
fn parse_count(cell: &Cell) -> i64 {
    match cell {
        Cell::Number(n) => *n as i64,
        Cell::Text(s) => {
            let value = s.trim();
            value
                .parse::<i64>()
                .ok()
                .or_else(|| value.parse::<f64>().ok().map(|f| f as i64))
                .unwrap_or(0)
        }
        Cell::Empty | Cell::Bool(_) => 0,
    }
}

/// Decimal coercion for weights; unparsable values are absent
fn parse_decimal(cell: &Cell) -> Option<f64> {
    match cell {
        Cell::Number(n) => Some(*n),
        Cell::Text(s) => s.trim().parse::<f64>().ok(),
        Cell::Empty | Cell::Bool(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::columns::resolve_columns;
    use crate::ingest::decode::decode;
    use crate::ingest::locate_header;

    fn parse_csv(input: &str) -> ParsedPlan {
        let grid = decode(input.as_bytes(), "text/csv").unwrap();
        let (header_index, header_row) = locate_header(&grid).unwrap();
        let header = resolve_columns(header_row).unwrap();
        extract_rows(&grid, header_index, &header)
    }

    #[test]
    fn test_end_to_end_example_plan() {
        let plan = parse_csv(
            "Day,Exercise,Sets,Reps,Start Weight,Progression\n\
             Monday,Squat,3,5,60,+2.5kg/week\n\
             Monday,,3,5,60,\n\
             Tuesday,Bench Press,4,8,40,\n",
        );

        assert_eq!(plan.rows_considered, 3);
        assert_eq!(plan.rows.len(), 2);

        assert_eq!(
            plan.rows[0],
            NewWorkout {
                day: "Monday".into(),
                exercise: "Squat".into(),
                sets: 3,
                reps: 5,
                start_weight: Some(60.0),
                progression_rule: Some("+2.5kg/week".into()),
            }
        );
        assert_eq!(
            plan.rows[1],
            NewWorkout {
                day: "Tuesday".into(),
                exercise: "Bench Press".into(),
                sets: 4,
                reps: 8,
                start_weight: Some(40.0),
                progression_rule: None,
            }
        );
    }

    #[test]
    fn test_blank_exercise_rows_dropped_regardless_of_other_cells() {
        let plan = parse_csv(
            "Day,Exercise,Sets\n\
             Monday,   ,5\n\
             Monday,Squat,3\n",
        );
        assert_eq!(plan.rows.len(), 1);
        assert_eq!(plan.rows[0].exercise, "Squat");
    }

    #[test]
    fn test_missing_optional_columns_default_per_field() {
        let plan = parse_csv(
            "Day,Exercise\n\
             Monday,Squat\n",
        );
        let row = &plan.rows[0];
        assert_eq!(row.sets, 0);
        assert_eq!(row.reps, 0);
        assert_eq!(row.start_weight, None);
        assert_eq!(row.progression_rule, None);
    }

    #[test]
    fn test_unparsable_cells_degrade_without_failing_the_row() {
        let plan = parse_csv(
            "Day,Exercise,Sets,Reps,Weight\n\
             Monday,Squat,heavy,five,bodyweight\n",
        );
        let row = &plan.rows[0];
        assert_eq!(row.sets, 0);
        assert_eq!(row.reps, 0);
        assert_eq!(row.start_weight, None);
    }

    #[test]
    fn test_decimal_counts_truncate() {
        let plan = parse_csv(
            "Day,Exercise,Sets,Reps\n\
             Monday,Squat,3.5,8.9\n",
        );
        assert_eq!(plan.rows[0].sets, 3);
        assert_eq!(plan.rows[0].reps, 8);
    }

    #[test]
    fn test_day_and_exercise_preserve_case_and_trim() {
        let plan = parse_csv(
            "Day,Exercise\n\
             \"  Monday \",\"  Front SQUAT \"\n",
        );
        assert_eq!(plan.rows[0].day, "Monday");
        assert_eq!(plan.rows[0].exercise, "Front SQUAT");
    }

    #[test]
    fn test_rows_shorter_than_header_treat_missing_cells_as_absent() {
        let plan = parse_csv(
            "Day,Exercise,Sets,Reps,Weight,Progression\n\
             Monday,Squat,3\n",
        );
        let row = &plan.rows[0];
        assert_eq!(row.sets, 3);
        assert_eq!(row.reps, 0);
        assert_eq!(row.start_weight, None);
        assert_eq!(row.progression_rule, None);
    }

    #[test]
    fn test_zero_weight_is_stored_not_dropped() {
        let plan = parse_csv(
            "Day,Exercise,Weight\n\
             Monday,Plank,0\n",
        );
        assert_eq!(plan.rows[0].start_weight, Some(0.0));
    }

    #[test]
    fn test_fully_empty_rows_are_counted_but_skipped() {
        let plan = parse_csv(
            "Day,Exercise\n\
             ,\n\
             Monday,Squat\n",
        );
        assert_eq!(plan.rows_considered, 2);
        assert_eq!(plan.rows.len(), 1);
    }
}
