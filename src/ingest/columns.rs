// ABOUTME: Header location and column-role resolution for uploaded workout plans
// ABOUTME: Finds the first Day/Exercise-labelled row and maps header cells to semantic roles
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! Header heuristics for the ingestion pipeline.
//!
//! Real-world plan exports put incidental rows (titles, notes, blank spacing)
//! above the actual table, and no fixed column schema is guaranteed. The
//! locator anchors on column 0 because exports consistently place "Day" or
//! "Exercise" as the leftmost header label; the resolver then matches each
//! role by keyword substring. The matching is deliberately permissive: a
//! column may satisfy several roles at once and "set" matches inside longer
//! words. Input files in the wild rely on this looseness, so stricter
//! matching is an option to offer, not a fix to make silently.

use super::decode::{Cell, Grid};
use super::IngestError;

/// Semantic meaning of a workout-plan column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// Weekday label, mandatory
    Day,
    /// Exercise name, mandatory
    Exercise,
    /// Planned set count
    Sets,
    /// Planned rep count
    Reps,
    /// Starting weight
    Weight,
    /// Progression rule
    Progression,
}

impl Role {
    /// Keywords matched as substrings of the lower-cased header cell
    #[must_use]
    pub const fn keywords(self) -> &'static [&'static str] {
        match self {
            Self::Day => &["day"],
            Self::Exercise => &["exercise"],
            Self::Sets => &["set"],
            Self::Reps => &["rep"],
            Self::Weight => &["weight", "kg", "lb"],
            Self::Progression => &["progression", "prog"],
        }
    }
}

/// Resolved role → column-index mapping for one upload
///
/// Day and Exercise are always present; the other four roles may be absent
/// and default to unresolved without failing the upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderMap {
    /// Column holding the day label
    pub day: usize,
    /// Column holding the exercise name
    pub exercise: usize,
    /// Column holding the set count, if any
    pub sets: Option<usize>,
    /// Column holding the rep count, if any
    pub reps: Option<usize>,
    /// Column holding the starting weight, if any
    pub weight: Option<usize>,
    /// Column holding the progression rule, if any
    pub progression: Option<usize>,
}

/// Locate the header row in a decoded grid
///
/// Scans rows top-down; the first non-empty row whose FIRST cell contains
/// "day" or "exercise" (case-insensitive) is the header, regardless of which
/// of the two labels appears first in the file.
///
/// # Errors
///
/// Returns [`IngestError::HeaderNotFound`] when no row matches before the
/// grid ends, including the fully-empty-grid case.
pub fn locate_header(grid: &Grid) -> Result<(usize, &[Cell]), IngestError> {
    for (index, row) in grid.iter().enumerate() {
        let Some(first) = row.first() else { continue };
        let label = first.text().to_lowercase();
        if label.contains("day") || label.contains("exercise") {
            return Ok((index, row.as_slice()));
        }
    }
    Err(IngestError::HeaderNotFound(
        "no row starts with a Day or Exercise label".into(),
    ))
}

/// Resolve header cells into a [`HeaderMap`]
///
/// Each role takes the first column (left-to-right) whose lower-cased text
/// contains one of the role's keywords. No exclusivity is enforced between
/// roles.
///
/// # Errors
///
/// Returns [`IngestError::RequiredColumnsMissing`] when Day or Exercise does
/// not resolve; the remaining roles are independently optional.
pub fn resolve_columns(header: &[Cell]) -> Result<HeaderMap, IngestError> {
    let (Some(day), Some(exercise)) = (
        find_role(header, Role::Day),
        find_role(header, Role::Exercise),
    ) else {
        return Err(IngestError::RequiredColumnsMissing(
            "Day and Exercise columns are both required".into(),
        ));
    };

    Ok(HeaderMap {
        day,
        exercise,
        sets: find_role(header, Role::Sets),
        reps: find_role(header, Role::Reps),
        weight: find_role(header, Role::Weight),
        progression: find_role(header, Role::Progression),
    })
}

fn find_role(header: &[Cell], role: Role) -> Option<usize> {
    header.iter().position(|cell| {
        let text = cell.text().to_lowercase();
        role.keywords().iter().any(|keyword| text.contains(keyword))
    })
}
