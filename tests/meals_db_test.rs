// ABOUTME: Integration tests for meal storage and calorie aggregation
// ABOUTME: Validates meal CRUD, daily buckets and the calorie summary math
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use chart2fit::models::NewMealRequest;
use chrono::{Days, Utc};

fn meal(food_name: &str, calories: i64) -> NewMealRequest {
    NewMealRequest {
        food_name: food_name.into(),
        calories,
        protein: None,
        carbs: None,
        fat: None,
        date: None,
    }
}

#[tokio::test]
async fn test_add_and_fetch_todays_meals() {
    let database = common::create_test_database().await.unwrap();
    let user = common::create_test_user(&database).await.unwrap();

    let request = NewMealRequest {
        food_name: "  Oatmeal ".into(),
        calories: 350,
        protein: Some(12.0),
        carbs: Some(60.0),
        fat: Some(6.0),
        date: None,
    };
    let meal_id = database.add_meal(user.id, &request).await.unwrap();
    assert!(meal_id > 0);
    database.add_meal(user.id, &meal("Apple", 80)).await.unwrap();

    let today = Utc::now().date_naive();
    let todays = database.meals_for_date(user.id, today).await.unwrap();
    assert_eq!(todays.meals.len(), 2);
    assert_eq!(todays.total_calories, 430);

    // Food names are trimmed on insert.
    assert!(todays.meals.iter().any(|m| m.food_name == "Oatmeal"));
}

#[tokio::test]
async fn test_delete_meal_scoped_to_owner() {
    let database = common::create_test_database().await.unwrap();
    let alice = common::create_test_user_with_email(&database, "alice@example.com")
        .await
        .unwrap();
    let bob = common::create_test_user_with_email(&database, "bob@example.com")
        .await
        .unwrap();

    let meal_id = database.add_meal(alice.id, &meal("Rice", 200)).await.unwrap();

    assert!(!database.delete_meal(bob.id, meal_id).await.unwrap());
    assert!(database.delete_meal(alice.id, meal_id).await.unwrap());
    assert!(!database.delete_meal(alice.id, meal_id).await.unwrap());
}

#[tokio::test]
async fn test_daily_calories_buckets_by_date() {
    let database = common::create_test_database().await.unwrap();
    let user = common::create_test_user(&database).await.unwrap();

    let today = Utc::now().date_naive();
    let yesterday = today.checked_sub_days(Days::new(1)).unwrap();

    database.add_meal(user.id, &meal("Breakfast", 400)).await.unwrap();
    database.add_meal(user.id, &meal("Lunch", 600)).await.unwrap();

    let mut old = meal("Dinner", 700);
    old.date = Some(yesterday);
    database.add_meal(user.id, &old).await.unwrap();

    let weekly = database.daily_calories(user.id, "-7 days").await.unwrap();
    assert_eq!(weekly.len(), 2);
    assert_eq!(weekly[0].date, yesterday);
    assert_eq!(weekly[0].total_calories, 700);
    assert_eq!(weekly[1].date, today);
    assert_eq!(weekly[1].total_calories, 1000);
    assert_eq!(weekly[1].meal_count, 2);
}

#[tokio::test]
async fn test_calorie_summary_math() {
    let database = common::create_test_database().await.unwrap();
    let user = common::create_test_user(&database).await.unwrap();

    let today = Utc::now().date_naive();
    let yesterday = today.checked_sub_days(Days::new(1)).unwrap();

    database.add_meal(user.id, &meal("Breakfast", 500)).await.unwrap();
    let mut old = meal("Dinner", 1000);
    old.date = Some(yesterday);
    database.add_meal(user.id, &old).await.unwrap();

    let summary = database.calorie_summary(user.id).await.unwrap();
    assert_eq!(summary.today_calories, 500);
    // Two active days averaging (500 + 1000) / 2.
    assert_eq!(summary.weekly_average, 750);
    assert_eq!(summary.monthly_total, 1500);
}

#[tokio::test]
async fn test_summary_is_zero_for_fresh_user() {
    let database = common::create_test_database().await.unwrap();
    let user = common::create_test_user(&database).await.unwrap();

    let summary = database.calorie_summary(user.id).await.unwrap();
    assert_eq!(summary.today_calories, 0);
    assert_eq!(summary.weekly_average, 0);
    assert_eq!(summary.monthly_total, 0);
}
