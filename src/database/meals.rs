// ABOUTME: Meal and calorie-tracking database operations
// ABOUTME: Meal CRUD plus daily/weekly/monthly calorie aggregation

use super::Database;
use crate::models::{Meal, NewMealRequest};
use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use uuid::Uuid;

/// One day's meals plus the calorie total
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TodayMeals {
    /// Meals recorded for the day, newest first
    pub meals: Vec<Meal>,
    /// Sum of the day's calories
    pub total_calories: i64,
}

/// Per-day calorie aggregation bucket
#[derive(Debug, Clone, Serialize)]
pub struct DailyCalories {
    /// Day
    pub date: NaiveDate,
    /// Calories eaten that day
    pub total_calories: i64,
    /// Protein eaten that day, grams
    pub total_protein: Option<f64>,
    /// Carbohydrates eaten that day, grams
    pub total_carbs: Option<f64>,
    /// Fat eaten that day, grams
    pub total_fat: Option<f64>,
    /// Number of meals recorded
    pub meal_count: i64,
}

/// Headline calorie figures for the calories page
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalorieSummary {
    /// Calories eaten today
    pub today_calories: i64,
    /// Average daily calories over the trailing week, rounded
    pub weekly_average: i64,
    /// Calories eaten over the trailing 30 days
    pub monthly_total: i64,
}

fn row_to_meal(row: &SqliteRow) -> Result<Meal> {
    let user_id: String = row.try_get("user_id")?;
    let created_at: DateTime<Utc> = row.try_get("created_at")?;
    Ok(Meal {
        id: row.try_get("id")?,
        user_id: Uuid::parse_str(&user_id)?,
        food_name: row.try_get("food_name")?,
        calories: row.try_get("calories")?,
        protein: row.try_get("protein")?,
        carbs: row.try_get("carbs")?,
        fat: row.try_get("fat")?,
        date: row.try_get("date")?,
        created_at,
    })
}

impl Database {
    /// Create the meals table
    ///
    /// # Errors
    ///
    /// Returns an error if table or index creation fails.
    pub(super) async fn migrate_meals(&self) -> Result<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS meals (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                food_name TEXT NOT NULL,
                calories INTEGER NOT NULL,
                protein REAL,
                carbs REAL,
                fat REAL,
                date DATE NOT NULL,
                created_at DATETIME NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_meals_user_date ON meals(user_id, date)")
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Record a meal; the date defaults to today when the request omits it
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub async fn add_meal(&self, user_id: Uuid, request: &NewMealRequest) -> Result<i64> {
        let date = request
            .date
            .unwrap_or_else(|| Utc::now().date_naive());

        let row = sqlx::query(
            r"
            INSERT INTO meals
                (user_id, food_name, calories, protein, carbs, fat, date, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id
            ",
        )
        .bind(user_id.to_string())
        .bind(request.food_name.trim())
        .bind(request.calories)
        .bind(request.protein)
        .bind(request.carbs)
        .bind(request.fat)
        .bind(date)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(row.try_get("id")?)
    }

    /// Fetch one day's meals plus the calorie total
    ///
    /// # Errors
    ///
    /// Returns an error if a query fails.
    pub async fn meals_for_date(&self, user_id: Uuid, date: NaiveDate) -> Result<TodayMeals> {
        let rows = sqlx::query(
            "SELECT * FROM meals WHERE user_id = $1 AND date = $2 ORDER BY created_at DESC",
        )
        .bind(user_id.to_string())
        .bind(date)
        .fetch_all(&self.pool)
        .await?;

        let meals = rows.iter().map(row_to_meal).collect::<Result<Vec<_>>>()?;

        let total = sqlx::query(
            "SELECT SUM(calories) AS total FROM meals WHERE user_id = $1 AND date = $2",
        )
        .bind(user_id.to_string())
        .bind(date)
        .fetch_one(&self.pool)
        .await?;
        let total_calories: Option<i64> = total.try_get("total")?;

        Ok(TodayMeals {
            meals,
            total_calories: total_calories.unwrap_or(0),
        })
    }

    /// Delete a meal owned by the user
    ///
    /// Returns `false` when the meal does not exist or belongs to someone
    /// else.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    pub async fn delete_meal(&self, user_id: Uuid, meal_id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM meals WHERE id = $1 AND user_id = $2")
            .bind(meal_id)
            .bind(user_id.to_string())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Per-day calorie totals since a SQLite date modifier
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn daily_calories(
        &self,
        user_id: Uuid,
        start_modifier: &str,
    ) -> Result<Vec<DailyCalories>> {
        let sql = format!(
            r"
            SELECT
                date,
                SUM(calories) AS total_calories,
                SUM(protein) AS total_protein,
                SUM(carbs) AS total_carbs,
                SUM(fat) AS total_fat,
                COUNT(*) AS meal_count
            FROM meals
            WHERE user_id = $1 AND date >= date('now', '{start_modifier}')
            GROUP BY date
            ORDER BY date
            "
        );

        let rows = sqlx::query(&sql)
            .bind(user_id.to_string())
            .fetch_all(&self.pool)
            .await?;

        rows.iter()
            .map(|row| {
                Ok(DailyCalories {
                    date: row.try_get("date")?,
                    total_calories: row.try_get("total_calories")?,
                    total_protein: row.try_get("total_protein")?,
                    total_carbs: row.try_get("total_carbs")?,
                    total_fat: row.try_get("total_fat")?,
                    meal_count: row.try_get("meal_count")?,
                })
            })
            .collect()
    }

    /// Latest meals for the activity feed, newest first
    pub(super) async fn recent_meals(&self, user_id: Uuid, limit: i64) -> Result<Vec<Meal>> {
        let rows = sqlx::query(
            "SELECT * FROM meals WHERE user_id = $1 \
             ORDER BY date DESC, created_at DESC LIMIT $2",
        )
        .bind(user_id.to_string())
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_meal).collect()
    }

    /// Sum of calories since a SQLite date modifier
    pub(super) async fn calories_since(&self, user_id: Uuid, start_modifier: &str) -> Result<i64> {
        let sql = format!(
            "SELECT SUM(calories) AS total FROM meals \
             WHERE user_id = $1 AND date >= date('now', '{start_modifier}')"
        );
        let row = sqlx::query(&sql)
            .bind(user_id.to_string())
            .fetch_one(&self.pool)
            .await?;
        let total: Option<i64> = row.try_get("total")?;
        Ok(total.unwrap_or(0))
    }

    /// Sum of calories on one date
    pub(super) async fn calories_on(&self, user_id: Uuid, date: NaiveDate) -> Result<i64> {
        let row = sqlx::query(
            "SELECT SUM(calories) AS total FROM meals WHERE user_id = $1 AND date = $2",
        )
        .bind(user_id.to_string())
        .bind(date)
        .fetch_one(&self.pool)
        .await?;
        let total: Option<i64> = row.try_get("total")?;
        Ok(total.unwrap_or(0))
    }

    /// Headline calorie figures: today, trailing-week average, trailing month
    ///
    /// # Errors
    ///
    /// Returns an error if a query fails.
    pub async fn calorie_summary(&self, user_id: Uuid) -> Result<CalorieSummary> {
        let today_calories = self.calories_on(user_id, Utc::now().date_naive()).await?;

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
        let weekly_average: Option<f64> = weekly.try_get("avg_calories")?;

        let monthly_total = self.calories_since(user_id, "-30 days").await?;

        Ok(CalorieSummary {
            today_calories,
            weekly_average: weekly_average.unwrap_or(0.0).round() as i64,
            monthly_total,
        })
    }
}
