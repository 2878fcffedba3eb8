// ABOUTME: End-to-end tests for the workout-plan ingestion pipeline
// ABOUTME: Covers CSV and XLSX uploads, replacement semantics and failure taxonomy
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use chart2fit::ingest::{ingest_plan, IngestError};
use rust_xlsxwriter::Workbook;

const CSV_MIME: &str = "text/csv";
const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

const SAMPLE_CSV: &str = "Day,Exercise,Sets,Reps,Start Weight,Progression\n\
                          Monday,Squat,3,5,60,+2.5kg/week\n\
                          Monday,,3,5,60,\n\
                          Tuesday,Bench Press,4,8,40,\n";

fn sample_xlsx() -> Vec<u8> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();

    // Incidental title row above the real header, like real-world exports.
    sheet.write(0, 0, "My Training Block").unwrap();
    let header = ["Day", "Exercise", "Sets", "Reps", "Start Weight", "Progression"];
    for (col, label) in header.iter().enumerate() {
        sheet.write(2, col as u16, *label).unwrap();
    }
    sheet.write(3, 0, "Monday").unwrap();
    sheet.write(3, 1, "Squat").unwrap();
    sheet.write_number(3, 2, 3.0).unwrap();
    sheet.write_number(3, 3, 5.0).unwrap();
    sheet.write_number(3, 4, 60.0).unwrap();
    sheet.write(3, 5, "+2.5kg/week").unwrap();

    sheet.write(4, 0, "Tuesday").unwrap();
    sheet.write(4, 1, "Bench Press").unwrap();
    sheet.write_number(4, 2, 4.0).unwrap();
    sheet.write_number(4, 3, 8.0).unwrap();
    sheet.write_number(4, 4, 40.0).unwrap();

    workbook.save_to_buffer().unwrap()
}

#[tokio::test]
async fn test_csv_upload_end_to_end() {
    let database = common::create_test_database().await.unwrap();
    let user = common::create_test_user(&database).await.unwrap();

    let result = ingest_plan(&database, user.id, SAMPLE_CSV.as_bytes(), CSV_MIME)
        .await
        .unwrap();

    // The blank-exercise row is dropped; two records survive, in order.
    assert_eq!(result.total, 2);
    assert_eq!(result.records.len(), 2);

    let first = &result.records[0];
    assert_eq!(first.day, "Monday");
    assert_eq!(first.exercise, "Squat");
    assert_eq!(first.sets, 3);
    assert_eq!(first.reps, 5);
    assert_eq!(first.start_weight, Some(60.0));
    assert_eq!(first.progression_rule.as_deref(), Some("+2.5kg/week"));

    let second = &result.records[1];
    assert_eq!(second.day, "Tuesday");
    assert_eq!(second.exercise, "Bench Press");
    assert_eq!(second.sets, 4);
    assert_eq!(second.reps, 8);
    assert_eq!(second.start_weight, Some(40.0));
    assert_eq!(second.progression_rule, None);

    // The records are persisted with their generated ids.
    let stored = database.get_workout_plan(user.id).await.unwrap();
    assert_eq!(stored.len(), result.records.len());
    for (stored_row, returned) in stored.iter().zip(&result.records) {
        assert_eq!(stored_row.id, returned.id);
        assert_eq!(stored_row.user_id, user.id);
        assert_eq!(stored_row.day, returned.day);
        assert_eq!(stored_row.exercise, returned.exercise);
        assert_eq!(stored_row.sets, returned.sets);
        assert_eq!(stored_row.reps, returned.reps);
        assert_eq!(stored_row.start_weight, returned.start_weight);
        assert_eq!(stored_row.progression_rule, returned.progression_rule);
    }
}

#[tokio::test]
async fn test_xlsx_upload_end_to_end() {
    let database = common::create_test_database().await.unwrap();
    let user = common::create_test_user(&database).await.unwrap();

    let bytes = sample_xlsx();
    let result = ingest_plan(&database, user.id, &bytes, XLSX_MIME)
        .await
        .unwrap();

    assert_eq!(result.total, 2);
    assert_eq!(result.records[0].exercise, "Squat");
    assert_eq!(result.records[0].sets, 3);
    assert_eq!(result.records[0].start_weight, Some(60.0));
    assert_eq!(result.records[1].exercise, "Bench Press");
    assert_eq!(result.records[1].start_weight, Some(40.0));
    assert_eq!(result.records[1].progression_rule, None);
}

#[tokio::test]
async fn test_reupload_replaces_previous_plan() {
    let database = common::create_test_database().await.unwrap();
    let user = common::create_test_user(&database).await.unwrap();

    ingest_plan(&database, user.id, SAMPLE_CSV.as_bytes(), CSV_MIME)
        .await
        .unwrap();

    let plan_b = "Day,Exercise,Sets\nWednesday,Deadlift,5\n";
    let result = ingest_plan(&database, user.id, plan_b.as_bytes(), CSV_MIME)
        .await
        .unwrap();
    assert_eq!(result.total, 1);

    // Exactly plan B remains, none of plan A.
    let stored = database.get_workout_plan(user.id).await.unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].exercise, "Deadlift");
    assert_eq!(stored[0].day, "Wednesday");
}

#[tokio::test]
async fn test_reingestion_is_idempotent_up_to_ids() {
    let database = common::create_test_database().await.unwrap();
    let user = common::create_test_user(&database).await.unwrap();

    let first = ingest_plan(&database, user.id, SAMPLE_CSV.as_bytes(), CSV_MIME)
        .await
        .unwrap();
    let second = ingest_plan(&database, user.id, SAMPLE_CSV.as_bytes(), CSV_MIME)
        .await
        .unwrap();

    assert_eq!(first.total, second.total);
    for (a, b) in first.records.iter().zip(&second.records) {
        assert_eq!(a.day, b.day);
        assert_eq!(a.exercise, b.exercise);
        assert_eq!(a.sets, b.sets);
        assert_eq!(a.reps, b.reps);
        assert_eq!(a.start_weight, b.start_weight);
        assert_eq!(a.progression_rule, b.progression_rule);
    }
}

#[tokio::test]
async fn test_all_gap_rows_degrades_to_empty_plan() {
    let database = common::create_test_database().await.unwrap();
    let user = common::create_test_user(&database).await.unwrap();

    ingest_plan(&database, user.id, SAMPLE_CSV.as_bytes(), CSV_MIME)
        .await
        .unwrap();

    // A header-only upload is valid and empties the stored plan.
    let rest_week = "Day,Exercise\n,\n,\n";
    let result = ingest_plan(&database, user.id, rest_week.as_bytes(), CSV_MIME)
        .await
        .unwrap();
    assert_eq!(result.total, 0);

    let stored = database.get_workout_plan(user.id).await.unwrap();
    assert!(stored.is_empty());
}

#[tokio::test]
async fn test_unreadable_file_makes_no_writes() {
    let database = common::create_test_database().await.unwrap();
    let user = common::create_test_user(&database).await.unwrap();

    ingest_plan(&database, user.id, SAMPLE_CSV.as_bytes(), CSV_MIME)
        .await
        .unwrap();

    let err = ingest_plan(&database, user.id, b"not a workbook", XLSX_MIME)
        .await
        .unwrap_err();
    assert!(matches!(err, IngestError::UnreadableFile(_)));

    // The previous plan is untouched by a pre-persistence failure.
    let stored = database.get_workout_plan(user.id).await.unwrap();
    assert_eq!(stored.len(), 2);
}

#[tokio::test]
async fn test_header_not_found() {
    let database = common::create_test_database().await.unwrap();
    let user = common::create_test_user(&database).await.unwrap();

    let csv = "Week 1 Notes\nSquat,Bench\n";
    let err = ingest_plan(&database, user.id, csv.as_bytes(), CSV_MIME)
        .await
        .unwrap_err();
    assert!(matches!(err, IngestError::HeaderNotFound(_)));
}

#[tokio::test]
async fn test_required_columns_missing() {
    let database = common::create_test_database().await.unwrap();
    let user = common::create_test_user(&database).await.unwrap();

    let csv = "Day,Sets,Reps\nMonday,3,5\n";
    let err = ingest_plan(&database, user.id, csv.as_bytes(), CSV_MIME)
        .await
        .unwrap_err();
    assert!(matches!(err, IngestError::RequiredColumnsMissing(_)));
}

#[tokio::test]
async fn test_concurrent_same_user_uploads_never_mix() {
    let database = common::create_test_database().await.unwrap();
    let user = common::create_test_user(&database).await.unwrap();

    let plan_a = "Day,Exercise\nMonday,Squat\nTuesday,Bench Press\n";
    let plan_b = "Day,Exercise\nWednesday,Deadlift\nThursday,Overhead Press\n";

    let db_a = database.clone();
    let db_b = database.clone();
    let user_id = user.id;

    let (a, b) = tokio::join!(
        ingest_plan(&db_a, user_id, plan_a.as_bytes(), CSV_MIME),
        ingest_plan(&db_b, user_id, plan_b.as_bytes(), CSV_MIME),
    );
    a.unwrap();
    b.unwrap();

    let stored = database.get_workout_plan(user_id).await.unwrap();
    let exercises: Vec<&str> = stored.iter().map(|w| w.exercise.as_str()).collect();

    let is_plan_a = {
        let mut sorted = exercises.clone();
        sorted.sort_unstable();
        sorted == ["Bench Press", "Squat"]
    };
    let is_plan_b = {
        let mut sorted = exercises.clone();
        sorted.sort_unstable();
        sorted == ["Deadlift", "Overhead Press"]
    };

    assert!(
        is_plan_a || is_plan_b,
        "stored plan mixes two uploads: {exercises:?}"
    );
}

#[tokio::test]
async fn test_uploads_for_different_users_are_independent() {
    let database = common::create_test_database().await.unwrap();
    let alice = common::create_test_user_with_email(&database, "alice@example.com")
        .await
        .unwrap();
    let bob = common::create_test_user_with_email(&database, "bob@example.com")
        .await
        .unwrap();

    ingest_plan(&database, alice.id, SAMPLE_CSV.as_bytes(), CSV_MIME)
        .await
        .unwrap();
    let plan_b = "Day,Exercise\nFriday,Row\n";
    ingest_plan(&database, bob.id, plan_b.as_bytes(), CSV_MIME)
        .await
        .unwrap();

    assert_eq!(database.get_workout_plan(alice.id).await.unwrap().len(), 2);
    assert_eq!(database.get_workout_plan(bob.id).await.unwrap().len(), 1);
}
