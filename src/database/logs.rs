// ABOUTME: Workout log database operations
// ABOUTME: Records completed workouts and serves log queries joined with planned values

use super::Database;
use crate::models::{LogWorkoutRequest, WorkoutLog, WorkoutLogDetail};
use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use uuid::Uuid;

/// Optional date-range filter for log queries
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogRangeFilter {
    /// Inclusive range start
    pub start_date: Option<NaiveDate>,
    /// Inclusive range end
    pub end_date: Option<NaiveDate>,
}

fn row_to_log_detail(row: &SqliteRow) -> Result<WorkoutLogDetail> {
    let user_id: String = row.try_get("user_id")?;
    let created_at: DateTime<Utc> = row.try_get("created_at")?;
    Ok(WorkoutLogDetail {
        log: WorkoutLog {
            id: row.try_get("id")?,
            user_id: Uuid::parse_str(&user_id)?,
            workout_id: row.try_get("workout_id")?,
            actual_sets: row.try_get("actual_sets")?,
            actual_reps: row.try_get("actual_reps")?,
            actual_weight: row.try_get("actual_weight")?,
            date: row.try_get("date")?,
            created_at,
        },
        exercise: row.try_get("exercise")?,
        planned_sets: row.try_get("planned_sets")?,
        planned_reps: row.try_get("planned_reps")?,
        planned_weight: row.try_get("planned_weight")?,
    })
}

const LOG_DETAIL_COLUMNS: &str = r"
    l.id AS id,
    l.user_id AS user_id,
    l.workout_id AS workout_id,
    l.actual_sets AS actual_sets,
    l.actual_reps AS actual_reps,
    l.actual_weight AS actual_weight,
    l.date AS date,
    l.created_at AS created_at,
    w.exercise AS exercise,
    w.sets AS planned_sets,
    w.reps AS planned_reps,
    w.start_weight AS planned_weight
";

impl Database {
    /// Create the logs table
    ///
    /// # Errors
    ///
    /// Returns an error if table or index creation fails.
    pub(super) async fn migrate_logs(&self) -> Result<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS logs (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                workout_id INTEGER NOT NULL REFERENCES workouts(id) ON DELETE CASCADE,
                actual_sets INTEGER NOT NULL,
                actual_reps INTEGER NOT NULL,
                actual_weight REAL,
                date DATE NOT NULL,
                created_at DATETIME NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_logs_user_date ON logs(user_id, date)")
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Record a completed workout for the given date
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails (including an unknown workout id
    /// rejected by the foreign key).
    pub async fn log_workout(
        &self,
        user_id: Uuid,
        request: &LogWorkoutRequest,
        date: NaiveDate,
    ) -> Result<i64> {
        let row = sqlx::query(
            r"
            INSERT INTO logs
                (user_id, workout_id, actual_sets, actual_reps, actual_weight, date, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id
            ",
        )
        .bind(user_id.to_string())
        .bind(request.workout_id)
        .bind(request.actual_sets)
        .bind(request.actual_reps)
        .bind(request.actual_weight)
        .bind(date)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(row.try_get("id")?)
    }

    /// Fetch one day's logs joined with the planned values
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn logs_for_date(
        &self,
        user_id: Uuid,
        date: NaiveDate,
    ) -> Result<Vec<WorkoutLogDetail>> {
        let sql = format!(
            r"
            SELECT {LOG_DETAIL_COLUMNS}
            FROM logs l
            JOIN workouts w ON l.workout_id = w.id
            WHERE l.user_id = $1 AND l.date = $2
            ORDER BY l.created_at
            "
        );
        let rows = sqlx::query(&sql)
            .bind(user_id.to_string())
            .bind(date)
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(row_to_log_detail).collect()
    }

    /// Fetch logs over an optional date range, newest first
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn logs_in_range(
        &self,
        user_id: Uuid,
        filter: LogRangeFilter,
    ) -> Result<Vec<WorkoutLogDetail>> {
        // Range applies only when both bounds are present, matching the
        // frontend's all-or-nothing query parameters.
        let range = filter.start_date.zip(filter.end_date);

        let sql = format!(
            r"
            SELECT {LOG_DETAIL_COLUMNS}
            FROM logs l
            JOIN workouts w ON l.workout_id = w.id
            WHERE l.user_id = $1
                {range_clause}
            ORDER BY l.date DESC, l.created_at
            ",
            range_clause = if range.is_some() {
                "AND l.date BETWEEN $2 AND $3"
            } else {
                ""
            },
        );

        let mut query = sqlx::query(&sql).bind(user_id.to_string());
        if let Some((start, end)) = range {
            query = query.bind(start).bind(end);
        }

        let rows = query.fetch_all(&self.pool).await?;
        rows.iter().map(row_to_log_detail).collect()
    }

    /// Count distinct plan rows logged since a SQLite date modifier
    pub(super) async fn distinct_workouts_logged_since(
        &self,
        user_id: Uuid,
        start_modifier: &str,
    ) -> Result<i64> {
        let sql = format!(
            "SELECT COUNT(DISTINCT workout_id) AS count FROM logs \
             WHERE user_id = $1 AND date >= date('now', '{start_modifier}')"
        );
        let row = sqlx::query(&sql)
            .bind(user_id.to_string())
            .fetch_one(&self.pool)
            .await?;
        Ok(row.try_get("count")?)
    }

    /// Count distinct plan rows logged on one date
    pub(super) async fn distinct_workouts_logged_on(
        &self,
        user_id: Uuid,
        date: NaiveDate,
    ) -> Result<i64> {
        let row = sqlx::query(
            "SELECT COUNT(DISTINCT workout_id) AS count FROM logs \
             WHERE user_id = $1 AND date = $2",
        )
        .bind(user_id.to_string())
        .bind(date)
        .fetch_one(&self.pool)
        .await?;
        Ok(row.try_get("count")?)
    }

    /// Count distinct log dates since a SQLite date modifier
    pub(super) async fn distinct_log_dates_since(
        &self,
        user_id: Uuid,
        start_modifier: &str,
    ) -> Result<i64> {
        let sql = format!(
            "SELECT COUNT(DISTINCT date) AS streak FROM logs \
             WHERE user_id = $1 AND date >= date('now', '{start_modifier}')"
        );
        let row = sqlx::query(&sql)
            .bind(user_id.to_string())
            .fetch_one(&self.pool)
            .await?;
        Ok(row.try_get("streak")?)
    }

    /// Delete a log entry owned by the user
    ///
    /// Returns `false` when the log does not exist or belongs to someone
    /// else.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    pub async fn delete_log(&self, user_id: Uuid, log_id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM logs WHERE id = $1 AND user_id = $2")
            .bind(log_id)
            .bind(user_id.to_string())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
