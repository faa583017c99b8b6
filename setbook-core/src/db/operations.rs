use chrono::Utc;
use log::debug;
use sqlx::{SqliteConnection, SqlitePool};
use uuid::Uuid;

use crate::db::begin_write;
use crate::db::models::{
    NewSet, NewUser, NewWorkout, Set, User, Workout, WorkoutOrder, WorkoutRow,
    validate_set_values,
};
use crate::errors::{Error, Result};
use crate::lifecycle::Status;

const WORKOUT_COLUMNS: &str =
    "id, user_id, name, comments, created_at, updated_at, due_date, status";

// Users
pub async fn create_user(pool: &SqlitePool, user: &NewUser) -> Result<User> {
    if user.first_name.trim().is_empty() {
        return Err(Error::invalid("first name must not be empty"));
    }
    let id = Uuid::new_v4().to_string();
    let created = sqlx::query_as::<_, User>(
        "INSERT INTO users (id, first_name, last_name, password_hash) VALUES (?1, ?2, ?3, ?4)
         RETURNING id, first_name, last_name, password_hash",
    )
    .bind(&id)
    .bind(user.first_name.trim())
    .bind(user.last_name.trim())
    .bind(&user.password_hash)
    .fetch_one(pool)
    .await?;
    Ok(created)
}

pub async fn get_user(pool: &SqlitePool, user_id: &str) -> Result<User> {
    sqlx::query_as::<_, User>(
        "SELECT id, first_name, last_name, password_hash FROM users WHERE id = ?1",
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| Error::not_found("user", user_id))
}

// Workouts
async fn fetch_workout(conn: &mut SqliteConnection, workout_id: &str) -> Result<Workout> {
    let row = sqlx::query_as::<_, WorkoutRow>(&format!(
        "SELECT {} FROM workouts WHERE id = ?1",
        WORKOUT_COLUMNS
    ))
    .bind(workout_id)
    .fetch_optional(&mut *conn)
    .await?
    .ok_or_else(|| Error::not_found("workout", workout_id))?;
    Workout::try_from(row)
}

fn collect_workouts(rows: Vec<WorkoutRow>) -> Result<Vec<Workout>> {
    rows.into_iter().map(Workout::try_from).collect()
}

async fn ensure_workout_exists(conn: &mut SqliteConnection, workout_id: &str) -> Result<()> {
    let exists: Option<i64> = sqlx::query_scalar("SELECT 1 FROM workouts WHERE id = ?1")
        .bind(workout_id)
        .fetch_optional(&mut *conn)
        .await?;
    exists
        .map(|_| ())
        .ok_or_else(|| Error::not_found("workout", workout_id))
}

async fn ensure_exercise_exists(conn: &mut SqliteConnection, exercise_name: &str) -> Result<()> {
    let exists: Option<i64> = sqlx::query_scalar("SELECT 1 FROM exercises WHERE name = ?1")
        .bind(exercise_name)
        .fetch_optional(&mut *conn)
        .await?;
    exists
        .map(|_| ())
        .ok_or_else(|| Error::not_found("exercise", exercise_name))
}

async fn touch_workout(conn: &mut SqliteConnection, workout_id: &str) -> Result<()> {
    sqlx::query("UPDATE workouts SET updated_at = ?1 WHERE id = ?2")
        .bind(Utc::now())
        .bind(workout_id)
        .execute(&mut *conn)
        .await?;
    Ok(())
}

pub async fn create_workout(
    pool: &SqlitePool,
    user_id: &str,
    workout: &NewWorkout,
) -> Result<Workout> {
    let name = workout.name.trim();
    if name.is_empty() {
        return Err(Error::invalid("workout name must not be empty"));
    }

    let mut tx = begin_write(pool).await?;

    let user_exists: Option<i64> = sqlx::query_scalar("SELECT 1 FROM users WHERE id = ?1")
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await?;
    if user_exists.is_none() {
        return Err(Error::not_found("user", user_id));
    }

    let id = Uuid::new_v4().to_string();
    let now = Utc::now();
    sqlx::query(
        "INSERT INTO workouts (id, user_id, name, comments, created_at, updated_at, due_date, status)
         VALUES (?1, ?2, ?3, '[]', ?4, ?5, ?6, ?7)",
    )
    .bind(&id)
    .bind(user_id)
    .bind(name)
    .bind(now)
    .bind(now)
    .bind(workout.due_date)
    .bind(Status::Pending)
    .execute(&mut *tx)
    .await?;

    let created = fetch_workout(&mut tx, &id).await?;
    tx.commit().await?;
    debug!("Created workout {} for user {}", id, user_id);
    Ok(created)
}

pub async fn get_workout(pool: &SqlitePool, workout_id: &str) -> Result<Workout> {
    let mut conn = pool.acquire().await?;
    fetch_workout(&mut conn, workout_id).await
}

pub async fn get_workout_by_name(pool: &SqlitePool, user_id: &str, name: &str) -> Result<Workout> {
    let row = sqlx::query_as::<_, WorkoutRow>(&format!(
        "SELECT {} FROM workouts WHERE user_id = ?1 AND name = ?2 ORDER BY created_at LIMIT 1",
        WORKOUT_COLUMNS
    ))
    .bind(user_id)
    .bind(name)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| Error::not_found("workout", name))?;
    Workout::try_from(row)
}

pub async fn list_workouts(
    pool: &SqlitePool,
    user_id: &str,
    order: WorkoutOrder,
) -> Result<Vec<Workout>> {
    let rows = sqlx::query_as::<_, WorkoutRow>(&format!(
        "SELECT {} FROM workouts WHERE user_id = ?1 ORDER BY {}, id",
        WORKOUT_COLUMNS,
        order.order_by()
    ))
    .bind(user_id)
    .fetch_all(pool)
    .await?;
    collect_workouts(rows)
}

pub async fn list_completed_workouts(pool: &SqlitePool, user_id: &str) -> Result<Vec<Workout>> {
    let rows = sqlx::query_as::<_, WorkoutRow>(&format!(
        "SELECT {} FROM workouts WHERE user_id = ?1 AND status = ?2 ORDER BY updated_at, id",
        WORKOUT_COLUMNS
    ))
    .bind(user_id)
    .bind(Status::Completed)
    .fetch_all(pool)
    .await?;
    collect_workouts(rows)
}

pub async fn add_comment(pool: &SqlitePool, workout_id: &str, comment: &str) -> Result<Workout> {
    let comment = comment.trim();
    if comment.is_empty() {
        return Err(Error::invalid("comment must not be empty"));
    }

    let mut tx = begin_write(pool).await?;
    let mut workout = fetch_workout(&mut tx, workout_id).await?;
    workout.comments.push(comment.to_string());
    workout.updated_at = Utc::now();

    sqlx::query("UPDATE workouts SET comments = ?1, updated_at = ?2 WHERE id = ?3")
        .bind(serde_json::to_string(&workout.comments)?)
        .bind(workout.updated_at)
        .bind(workout_id)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;
    Ok(workout)
}

/// Links catalog exercises to a workout. Every name must already exist in the
/// catalog, otherwise nothing is linked. Returns the number of new links.
pub async fn add_exercises_to_workout<S: AsRef<str>>(
    pool: &SqlitePool,
    workout_id: &str,
    exercise_names: &[S],
) -> Result<usize> {
    let mut tx = begin_write(pool).await?;
    ensure_workout_exists(&mut tx, workout_id).await?;

    let mut linked = 0;
    for name in exercise_names {
        let name = name.as_ref().trim();
        ensure_exercise_exists(&mut tx, name).await?;
        let result = sqlx::query(
            "INSERT OR IGNORE INTO workout_exercises (workout_id, exercise_name) VALUES (?1, ?2)",
        )
        .bind(workout_id)
        .bind(name)
        .execute(&mut *tx)
        .await?;
        linked += result.rows_affected() as usize;
    }

    if linked > 0 {
        touch_workout(&mut tx, workout_id).await?;
    }
    tx.commit().await?;
    Ok(linked)
}

pub async fn workout_exercises(pool: &SqlitePool, workout_id: &str) -> Result<Vec<String>> {
    let mut conn = pool.acquire().await?;
    ensure_workout_exists(&mut conn, workout_id).await?;
    let names = sqlx::query_scalar::<_, String>(
        "SELECT exercise_name FROM workout_exercises WHERE workout_id = ?1 ORDER BY exercise_name",
    )
    .bind(workout_id)
    .fetch_all(&mut *conn)
    .await?;
    Ok(names)
}

/// Marks a workout as done. `Completed` is never undone by status derivation.
pub async fn mark_completed(pool: &SqlitePool, workout_id: &str) -> Result<Workout> {
    let mut tx = begin_write(pool).await?;
    ensure_workout_exists(&mut tx, workout_id).await?;
    sqlx::query("UPDATE workouts SET status = ?1, updated_at = ?2 WHERE id = ?3")
        .bind(Status::Completed)
        .bind(Utc::now())
        .bind(workout_id)
        .execute(&mut *tx)
        .await?;
    let workout = fetch_workout(&mut tx, workout_id).await?;
    tx.commit().await?;
    Ok(workout)
}

/// Deletes a workout owned by `user_id` along with its sets and exercise links.
pub async fn delete_workout(pool: &SqlitePool, user_id: &str, workout_id: &str) -> Result<u64> {
    let mut tx = begin_write(pool).await?;

    let owned: Option<i64> =
        sqlx::query_scalar("SELECT 1 FROM workouts WHERE id = ?1 AND user_id = ?2")
            .bind(workout_id)
            .bind(user_id)
            .fetch_optional(&mut *tx)
            .await?;
    if owned.is_none() {
        return Err(Error::not_found("workout", workout_id));
    }

    let sets = sqlx::query("DELETE FROM sets WHERE workout_id = ?1")
        .bind(workout_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();
    sqlx::query("DELETE FROM workout_exercises WHERE workout_id = ?1")
        .bind(workout_id)
        .execute(&mut *tx)
        .await?;
    sqlx::query("DELETE FROM workouts WHERE id = ?1")
        .bind(workout_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    debug!("Deleted workout {} and {} sets", workout_id, sets);
    Ok(sets)
}

// Sets
pub async fn add_set(pool: &SqlitePool, workout_id: &str, set: &NewSet) -> Result<Set> {
    validate_set_values(set.reps, set.weight)?;
    let exercise_name = set.exercise_name.trim();

    let mut tx = begin_write(pool).await?;
    ensure_workout_exists(&mut tx, workout_id).await?;
    ensure_exercise_exists(&mut tx, exercise_name).await?;

    let created = sqlx::query_as::<_, Set>(
        "INSERT INTO sets (id, workout_id, exercise_name, reps, weight) VALUES (?1, ?2, ?3, ?4, ?5)
         RETURNING id, workout_id, exercise_name, reps, weight",
    )
    .bind(Uuid::new_v4().to_string())
    .bind(workout_id)
    .bind(exercise_name)
    .bind(set.reps)
    .bind(set.weight)
    .fetch_one(&mut *tx)
    .await?;

    touch_workout(&mut tx, workout_id).await?;
    tx.commit().await?;
    Ok(created)
}

pub async fn get_set(pool: &SqlitePool, set_id: &str) -> Result<Set> {
    sqlx::query_as::<_, Set>(
        "SELECT id, workout_id, exercise_name, reps, weight FROM sets WHERE id = ?1",
    )
    .bind(set_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| Error::not_found("set", set_id))
}

pub async fn sets_for_workout(pool: &SqlitePool, workout_id: &str) -> Result<Vec<Set>> {
    let sets = sqlx::query_as::<_, Set>(
        "SELECT id, workout_id, exercise_name, reps, weight FROM sets
         WHERE workout_id = ?1 ORDER BY rowid",
    )
    .bind(workout_id)
    .fetch_all(pool)
    .await?;
    Ok(sets)
}

pub async fn update_set(pool: &SqlitePool, set_id: &str, reps: i64, weight: f64) -> Result<Set> {
    validate_set_values(reps, weight)?;

    let mut tx = begin_write(pool).await?;
    let updated = sqlx::query_as::<_, Set>(
        "UPDATE sets SET reps = ?1, weight = ?2 WHERE id = ?3
         RETURNING id, workout_id, exercise_name, reps, weight",
    )
    .bind(reps)
    .bind(weight)
    .bind(set_id)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or_else(|| Error::not_found("set", set_id))?;

    touch_workout(&mut tx, &updated.workout_id).await?;
    tx.commit().await?;
    Ok(updated)
}

pub async fn delete_set(pool: &SqlitePool, set_id: &str) -> Result<()> {
    let mut tx = begin_write(pool).await?;
    let workout_id: String =
        sqlx::query_scalar("DELETE FROM sets WHERE id = ?1 RETURNING workout_id")
            .bind(set_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| Error::not_found("set", set_id))?;

    touch_workout(&mut tx, &workout_id).await?;
    tx.commit().await?;
    Ok(())
}
