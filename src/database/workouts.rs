// ABOUTME: Workout-plan storage operations including the atomic plan replacer
// ABOUTME: Plan queries, per-user delete+insert replacement and progress aggregation

use super::Database;
use crate::models::{NewWorkout, Workout};
use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use uuid::Uuid;

/// Aggregation window for progress queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProgressPeriod {
    /// Trailing 7 days
    #[default]
    Week,
    /// Trailing 30 days
    Month,
    /// Trailing year
    Year,
}

impl ProgressPeriod {
    /// SQLite date modifier for the window start
    const fn start_modifier(self) -> &'static str {
        match self {
            Self::Week => "-7 days",
            Self::Month => "-30 days",
            Self::Year => "-1 year",
        }
    }

    /// Grouping expression for per-bucket completion data
    const fn group_expr(self) -> &'static str {
        match self {
            Self::Week | Self::Month => "date(l.date)",
            Self::Year => "strftime('%Y-%m', l.date)",
        }
    }
}

/// Per-date workout completion figures
#[derive(Debug, Clone, Serialize)]
pub struct CompletionPoint {
    /// Date bucket (day or month); `None` groups plan rows with no logs yet
    pub date: Option<String>,
    /// Distinct plan rows logged in the bucket
    pub completed_exercises: i64,
    /// Plan rows in the user's current plan
    pub total_exercises: i64,
    /// Completion percentage, rounded to two decimals
    pub completion_rate: f64,
}

/// Per-exercise, per-date strength data point
#[derive(Debug, Clone, Serialize)]
pub struct StrengthPoint {
    /// Exercise name from the plan
    pub exercise: String,
    /// Log date
    pub date: NaiveDate,
    /// Average weight used that day
    pub avg_weight: f64,
    /// Heaviest weight used that day
    pub max_weight: f64,
    /// Number of logged sessions
    pub sessions: i64,
}

/// One of the user's most-loaded exercises
#[derive(Debug, Clone, Serialize)]
pub struct TopExercise {
    /// Exercise name
    pub exercise: String,
    /// Average logged weight
    pub avg_weight: f64,
    /// Number of logged sessions
    pub sessions: i64,
}

/// Overall progress summary for the progress page
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressSummary {
    /// Distinct plan rows logged in the trailing week
    pub weekly_workouts: i64,
    /// Distinct plan rows logged in the trailing month
    pub monthly_workouts: i64,
    /// Distinct active days in the trailing 30 days
    pub current_streak: i64,
    /// Up to five exercises ranked by average logged weight
    pub top_exercises: Vec<TopExercise>,
}

fn row_to_workout(row: &SqliteRow) -> Result<Workout> {
    let user_id: String = row.try_get("user_id")?;
    let created_at: DateTime<Utc> = row.try_get("created_at")?;
    Ok(Workout {
        id: row.try_get("id")?,
        user_id: Uuid::parse_str(&user_id)?,
        day: row.try_get("day")?,
        exercise: row.try_get("exercise")?,
        sets: row.try_get("sets")?,
        reps: row.try_get("reps")?,
        start_weight: row.try_get("start_weight")?,
        progression_rule: row.try_get("progression_rule")?,
        created_at,
    })
}

impl Database {
    /// Create the workouts table
    ///
    /// # Errors
    ///
    /// Returns an error if table or index creation fails.
    pub(super) async fn migrate_workouts(&self) -> Result<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS workouts (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                day TEXT NOT NULL,
                exercise TEXT NOT NULL,
                sets INTEGER NOT NULL,
                reps INTEGER NOT NULL,
                start_weight REAL,
                progression_rule TEXT,
                created_at DATETIME NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_workouts_user_day ON workouts(user_id, day)")
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Atomically replace a user's workout plan
    ///
    /// Deletes every stored plan row for `user_id` and inserts `rows` in
    /// order inside one transaction, returning the inserted records with
    /// their generated ids. An empty `rows` is valid and leaves the user
    /// with no plan. Replacements for the same user are serialized through
    /// a per-user lock; different users never contend.
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction cannot complete. The stored plan
    /// state is then unknown and the caller must retry the whole ingestion.
    pub async fn replace_workout_plan(
        &self,
        user_id: Uuid,
        rows: &[NewWorkout],
    ) -> Result<Vec<Workout>> {
        let lock = self.plan_lock(user_id);
        let _guard = lock.lock().await;

        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM workouts WHERE user_id = $1")
            .bind(user_id.to_string())
            .execute(&mut *tx)
            .await?;

        let mut stored = Vec::with_capacity(rows.len());
        for row in rows {
            let created_at = Utc::now();
            let inserted = sqlx::query(
                r"
                INSERT INTO workouts
                    (user_id, day, exercise, sets, reps, start_weight, progression_rule, created_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                RETURNING id
                ",
            )
            .bind(user_id.to_string())
            .bind(&row.day)
            .bind(&row.exercise)
            .bind(row.sets)
            .bind(row.reps)
            .bind(row.start_weight)
            .bind(&row.progression_rule)
            .bind(created_at)
            .fetch_one(&mut *tx)
            .await?;

            stored.push(Workout {
                id: inserted.try_get("id")?,
                user_id,
                day: row.day.clone(),
                exercise: row.exercise.clone(),
                sets: row.sets,
                reps: row.reps,
                start_weight: row.start_weight,
                progression_rule: row.progression_rule.clone(),
                created_at,
            });
        }

        tx.commit().await?;
        Ok(stored)
    }

    /// Fetch the user's full workout plan, ordered by day then insertion
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn get_workout_plan(&self, user_id: Uuid) -> Result<Vec<Workout>> {
        let rows = sqlx::query("SELECT * FROM workouts WHERE user_id = $1 ORDER BY day, id")
            .bind(user_id.to_string())
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(row_to_workout).collect()
    }

    /// Fetch the plan rows for one day label
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn get_workouts_for_day(&self, user_id: Uuid, day: &str) -> Result<Vec<Workout>> {
        let rows = sqlx::query("SELECT * FROM workouts WHERE user_id = $1 AND day = $2 ORDER BY id")
            .bind(user_id.to_string())
            .bind(day)
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(row_to_workout).collect()
    }

    /// Per-date completion figures for the progress page
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn completion_data(
        &self,
        user_id: Uuid,
        period: ProgressPeriod,
    ) -> Result<Vec<CompletionPoint>> {
        let sql = format!(
            r"
            SELECT
                {group} AS bucket,
                COUNT(DISTINCT l.workout_id) AS completed_exercises,
                COUNT(DISTINCT w.id) AS total_exercises,
                ROUND(CAST(COUNT(DISTINCT l.workout_id) AS REAL) * 100.0
                      / COUNT(DISTINCT w.id), 2) AS completion_rate
            FROM workouts w
            LEFT JOIN logs l
                ON w.id = l.workout_id
                AND l.user_id = w.user_id
                AND l.date >= date('now', '{start}')
            WHERE w.user_id = $1
            GROUP BY bucket
            ORDER BY bucket
            ",
            group = period.group_expr(),
            start = period.start_modifier(),
        );

        let rows = sqlx::query(&sql)
            .bind(user_id.to_string())
            .fetch_all(&self.pool)
            .await?;

        rows.iter()
            .map(|row| {
                Ok(CompletionPoint {
                    date: row.try_get("bucket")?,
                    completed_exercises: row.try_get("completed_exercises")?,
                    total_exercises: row.try_get("total_exercises")?,
                    completion_rate: row.try_get("completion_rate")?,
                })
            })
            .collect()
    }

    /// Per-exercise strength progression for the progress page
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn strength_data(
        &self,
        user_id: Uuid,
        period: ProgressPeriod,
    ) -> Result<Vec<StrengthPoint>> {
        let sql = format!(
            r"
            SELECT
                w.exercise AS exercise,
                l.date AS date,
                AVG(l.actual_weight) AS avg_weight,
                MAX(l.actual_weight) AS max_weight,
                COUNT(*) AS sessions
            FROM logs l
            JOIN workouts w ON l.workout_id = w.id
            WHERE l.user_id = $1
                AND l.actual_weight IS NOT NULL
                AND l.date >= date('now', '{start}')
            GROUP BY w.exercise, l.date
            ORDER BY w.exercise, l.date
            ",
            start = period.start_modifier(),
        );

        let rows = sqlx::query(&sql)
            .bind(user_id.to_string())
            .fetch_all(&self.pool)
            .await?;

        rows.iter()
            .map(|row| {
                Ok(StrengthPoint {
                    exercise: row.try_get("exercise")?,
                    date: row.try_get("date")?,
                    avg_weight: row.try_get("avg_weight")?,
                    max_weight: row.try_get("max_weight")?,
                    sessions: row.try_get("sessions")?,
                })
            })
            .collect()
    }

    /// Overall progress summary
    ///
    /// # Errors
    ///
    /// Returns an error if any of the summary queries fails.
    pub async fn progress_summary(&self, user_id: Uuid) -> Result<ProgressSummary> {
        let weekly_workouts = self.distinct_workouts_logged_since(user_id, "-7 days").await?;
        let monthly_workouts = self
            .distinct_workouts_logged_since(user_id, "-30 days")
            .await?;
        let current_streak = self.distinct_log_dates_since(user_id, "-30 days").await?;

        let top_rows = sqlx::query(
            r"
            SELECT
                w.exercise AS exercise,
                AVG(l.actual_weight) AS avg_weight,
                COUNT(*) AS sessions
            FROM logs l
            JOIN workouts w ON l.workout_id = w.id
            WHERE l.user_id = $1 AND l.actual_weight IS NOT NULL
            GROUP BY w.exercise
            ORDER BY avg_weight DESC
            LIMIT 5
            ",
        )
        .bind(user_id.to_string())
        .fetch_all(&self.pool)
        .await?;

        let top_exercises = top_rows
            .iter()
            .map(|row| {
                Ok(TopExercise {
                    exercise: row.try_get("exercise")?,
                    avg_weight: row.try_get("avg_weight")?,
                    sessions: row.try_get("sessions")?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(ProgressSummary {
            weekly_workouts,
            monthly_workouts,
            current_streak,
            top_exercises,
        })
    }
}
