//! Shared setup for database-backed tests.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::str::FromStr;

use crate::db::init_database;
use crate::db::models::{NewUser, NewWorkout, User, Workout};
use crate::db::operations::{create_user, create_workout};

/// In-memory database with all migrations applied.
///
/// A single connection keeps every query on the same in-memory database.
pub async fn setup_test_db() -> SqlitePool {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .expect("valid in-memory url")
        .foreign_keys(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .expect("Failed to create in-memory database");

    init_database(&pool)
        .await
        .expect("Failed to run migrations");

    pool
}

pub async fn seed_test_user(pool: &SqlitePool) -> User {
    create_user(
        pool,
        &NewUser {
            first_name: "Test".into(),
            last_name: "User".into(),
            password_hash: "not-a-real-hash".into(),
        },
    )
    .await
    .expect("Failed to insert test user")
}

pub async fn seed_test_workout(
    pool: &SqlitePool,
    user: &User,
    name: &str,
    due_date: Option<DateTime<Utc>>,
) -> Workout {
    create_workout(
        pool,
        &user.id,
        &NewWorkout {
            name: name.to_string(),
            due_date,
        },
    )
    .await
    .expect("Failed to insert test workout")
}

pub async fn count_rows(pool: &SqlitePool, table: &str) -> i64 {
    sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {}", table))
        .fetch_one(pool)
        .await
        .expect("Failed to count rows")
}
