// ABOUTME: Workout-plan ingestion pipeline entry point and error taxonomy
// ABOUTME: Chains decode → header location → column resolution → extraction → plan replacement
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! # Workout-Plan Ingestion
//!
//! Turns an uploaded spreadsheet or CSV into the user's stored workout plan.
//! The pipeline consumes the raw file bytes plus the declared content type;
//! it never touches the filesystem. Stages:
//!
//! 1. [`decode`] — bytes → rectangular grid of untyped cells, first sheet only
//! 2. [`columns::locate_header`] — find the first row labelled Day/Exercise
//! 3. [`columns::resolve_columns`] — map header cells to semantic roles
//! 4. [`extract::extract_rows`] — normalize data rows, skipping gap rows
//! 5. [`crate::database::Database::replace_workout_plan`] — atomic swap
//!
//! Stages 1–4 are pure and fail fast with no partial writes; only stage 5
//! touches storage. Stage 4 never fails: malformed rows degrade per-field or
//! are skipped, so the pipeline always reaches the replace step once the
//! header has been resolved.

pub mod columns;
pub mod decode;
pub mod extract;

pub use columns::{locate_header, resolve_columns, HeaderMap, Role};
pub use decode::{decode, Cell, Grid, PlanFormat};
pub use extract::{extract_rows, ParsedPlan};

use crate::database::Database;
use crate::models::IngestionResult;
use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

/// Typed failures of the ingestion pipeline
///
/// Each variant carries a human-readable detail string. The first three are
/// surfaced to the uploader as input problems; `Persistence` leaves the stored
/// plan state unknown and callers must re-run the whole pipeline.
#[derive(Debug, Error)]
pub enum IngestError {
    /// The byte buffer is not a valid instance of a supported tabular format
    #[error("invalid file format: {0}")]
    UnreadableFile(String),
    /// No row in the grid satisfies the header heuristic
    #[error("could not find header row: {0}")]
    HeaderNotFound(String),
    /// Header found but the Day or Exercise column is absent
    #[error("required columns not found: {0}")]
    RequiredColumnsMissing(String),
    /// The replace step could not complete
    #[error("failed to store workout plan: {0}")]
    Persistence(String),
}

/// Run the full ingestion pipeline for one uploaded plan
///
/// Decodes `bytes` according to `content_type`, extracts the plan rows and
/// atomically replaces `user_id`'s stored workout plan with them. An upload
/// in which every data row is a gap row is valid and leaves the user with an
/// empty plan.
///
/// # Errors
///
/// Returns an [`IngestError`] when the file cannot be decoded, the header
/// heuristics fail, or the storage swap does not complete.
pub async fn ingest_plan(
    database: &Database,
    user_id: Uuid,
    bytes: &[u8],
    content_type: &str,
) -> Result<IngestionResult, IngestError> {
    let grid = decode::decode(bytes, content_type)?;
    let (header_index, header_row) = columns::locate_header(&grid)?;
    let header = columns::resolve_columns(header_row)?;
    let plan = extract::extract_rows(&grid, header_index, &header);

    debug!(
        user.id = %user_id,
        plan.header_row = header_index,
        plan.rows_considered = plan.rows_considered,
        plan.rows_extracted = plan.rows.len(),
        "workout plan parsed"
    );

    let records = database
        .replace_workout_plan(user_id, &plan.rows)
        .await
        .map_err(|e| IngestError::Persistence(e.to_string()))?;

    info!(
        user.id = %user_id,
        plan.records = records.len(),
        "workout plan replaced"
    );

    Ok(IngestionResult {
        total: records.len(),
        records,
    })
}
