// ABOUTME: Dashboard aggregation queries spanning workouts, logs and meals
// ABOUTME: Serves the overview, recent-activity and quick-stats panels

use super::Database;
use crate::models::{Meal, Workout, WorkoutLog};
use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::Row;
use uuid::Uuid;

/// Headline figures plus today's plan for the dashboard landing panel
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardOverview {
    /// Distinct plan rows logged today
    pub today_workouts: i64,
    /// Distinct plan rows logged in the trailing week
    pub weekly_workouts: i64,
    /// Distinct active days in the trailing 30 days
    pub current_streak: i64,
    /// Calories eaten today
    pub today_calories: i64,
    /// Plan rows scheduled for today's weekday
    pub today_plan: Vec<Workout>,
}

/// A recent log entry with its exercise name
#[derive(Debug, Clone, Serialize)]
pub struct RecentWorkout {
    /// The log row
    #[serde(flatten)]
    pub log: WorkoutLog,
    /// Exercise name from the plan
    pub exercise: String,
}

/// Latest workout logs and meals for the activity feed
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentActivity {
    /// Latest ten workout logs
    pub recent_workouts: Vec<RecentWorkout>,
    /// Latest ten meals
    pub recent_meals: Vec<Meal>,
}

/// Compact statistics panel
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuickStats {
    /// Distinct plan rows logged in the trailing 30 days
    pub monthly_workouts: i64,
    /// Average daily calories over the trailing week, rounded
    pub weekly_avg_calories: i64,
    /// Most frequently logged exercise
    pub top_exercise: String,
    /// Calories eaten over the trailing 30 days
    pub monthly_calories: i64,
}

impl Database {
    /// Dashboard overview: headline counts plus today's plan
    ///
    /// # Errors
    ///
    /// Returns an error if any of the queries fails.
    pub async fn dashboard_overview(&self, user_id: Uuid) -> Result<DashboardOverview> {
        let today = Utc::now().date_naive();
        let today_workouts = self.distinct_workouts_logged_on(user_id, today).await?;
        let weekly_workouts = self
            .distinct_workouts_logged_since(user_id, "-7 days")
            .await?;
        let current_streak = self.distinct_log_dates_since(user_id, "-30 days").await?;
        let today_calories = self.calories_on(user_id, today).await?;

        // Plan rows are keyed by the English weekday label, the same label
        // the ingestion pipeline stored from the uploaded sheet.
        let weekday = Utc::now().format("%A").to_string();
        let today_plan = self.get_workouts_for_day(user_id, &weekday).await?;

        Ok(DashboardOverview {
            today_workouts,
            weekly_workouts,
            current_streak,
            today_calories,
            today_plan,
        })
    }

    /// Latest ten workout logs and meals
    ///
    /// # Errors
    ///
    /// Returns an error if a query fails.
    pub async fn recent_activity(&self, user_id: Uuid) -> Result<RecentActivity> {
        let log_rows = sqlx::query(
            r"
            SELECT
                l.id AS id,
                l.user_id AS user_id,
                l.workout_id AS workout_id,
                l.actual_sets AS actual_sets,
                l.actual_reps AS actual_reps,
                l.actual_weight AS actual_weight,
                l.date AS date,
                l.created_at AS created_at,
                w.exercise AS exercise
            FROM logs l
            JOIN workouts w ON l.workout_id = w.id
            WHERE l.user_id = $1
            ORDER BY l.date DESC, l.created_at DESC
            LIMIT 10
            ",
        )
        .bind(user_id.to_string())
        .fetch_all(&self.pool)
        .await?;

        let recent_workouts = log_rows
            .iter()
            .map(|row| {
                let owner: String = row.try_get("user_id")?;
                let created_at: DateTime<Utc> = row.try_get("created_at")?;
                Ok(RecentWorkout {
                    log: WorkoutLog {
                        id: row.try_get("id")?,
                        user_id: Uuid::parse_str(&owner)?,
                        workout_id: row.try_get("workout_id")?,
                        actual_sets: row.try_get("actual_sets")?,
                        actual_reps: row.try_get("actual_reps")?,
                        actual_weight: row.try_get("actual_weight")?,
                        date: row.try_get("date")?,
                        created_at,
                    },
                    exercise: row.try_get("exercise")?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let recent_meals = self.recent_meals(user_id, 10).await?;

        Ok(RecentActivity {
            recent_workouts,
            recent_meals,
        })
    }

    /// Compact statistics for the dashboard side panel
    ///
    /// # Errors
    ///
    /// Returns an error if any of the queries fails.
    pub async fn quick_stats(&self, user_id: Uuid) -> Result<QuickStats> {
        let monthly_workouts = self
            .distinct_workouts_logged_since(user_id, "-30 days")
            .await?;

        let weekly = sqlx::query(
            r"
            SELECT AVG(daily_calories) AS avg_calories
            FROM (
                SELECT date, SUM(calories) AS daily_calories
                FROM meals
                WHERE user_id = $1 AND date >= date('now', '-7 days')
                GROUP BY date
            )
            ",
        )
        .bind(user_id.to_string())
        .fetch_one(&self.pool)
        .await?;
        let weekly_avg: Option<f64> = weekly.try_get("avg_calories")?;

        let top = sqlx::query(
            r"
            SELECT w.exercise AS exercise, COUNT(*) AS sessions
            FROM logs l
            JOIN workouts w ON l.workout_id = w.id
            WHERE l.user_id = $1
            GROUP BY w.exercise
            ORDER BY sessions DESC
            LIMIT 1
            ",
        )
        .bind(user_id.to_string())
        .fetch_optional(&self.pool)
        .await?;
        let top_exercise = top
            .map(|row| row.try_get::<String, _>("exercise"))
            .transpose()?
            .unwrap_or_else(|| "No workouts yet".to_owned());

        let monthly_calories = self.calories_since(user_id, "-30 days").await?;

        Ok(QuickStats {
            monthly_workouts,
            weekly_avg_calories: weekly_avg.unwrap_or(0.0).round() as i64,
            top_exercise,
            monthly_calories,
        })
    }
}
