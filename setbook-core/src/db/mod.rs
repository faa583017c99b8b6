pub mod models;
pub mod operations;
#[cfg(test)]
pub(crate) mod test_utils;

use chrono::Utc;
use log::{debug, info};
use sqlx::{Sqlite, SqliteConnection, SqlitePool, Transaction};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqliteSynchronous};
use std::env;
use std::str::FromStr;
use std::time::Duration;
use tokio::sync::OnceCell;

use crate::errors::{Error, Result};

static DB_PATH: OnceCell<String> = OnceCell::const_new();

/// Path of the SQLite file, taken from `DATABASE_URL` unless `set_db_path` ran first.
pub async fn get_db_path() -> Result<&'static String> {
    DB_PATH
        .get_or_try_init(|| async {
            env::var("DATABASE_URL").map_err(|_| {
                Error::invalid("DATABASE_URL must be specified or present in the environment")
            })
        })
        .await
}

pub async fn set_db_path(path: &str) -> Result<()> {
    DB_PATH
        .set(path.to_string())
        .map_err(|e| Error::invalid(format!("Failed to set DB_PATH: {:?}", e)))
}

/// Accepts a `sqlite:` URL (including `sqlite::memory:`) or a bare file path.
pub async fn open_pool(db_path: &str) -> Result<SqlitePool> {
    let options = if db_path.starts_with("sqlite:") {
        SqliteConnectOptions::from_str(db_path)?
    } else {
        SqliteConnectOptions::new().filename(db_path)
    };
    let options = options
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .synchronous(SqliteSynchronous::Normal)
        .busy_timeout(Duration::from_millis(5000))
        .foreign_keys(true);

    let pool = SqlitePool::connect_with(options).await?;
    debug!("Opened SQLite pool at {}", db_path);
    Ok(pool)
}

/// Opens a transaction that holds the write lock from its first statement.
///
/// A deferred transaction that reads and then writes fails with SQLITE_BUSY
/// when another writer got in between; this one waits on busy_timeout instead.
pub(crate) async fn begin_write(pool: &SqlitePool) -> Result<Transaction<'static, Sqlite>> {
    Ok(pool.begin_with("BEGIN IMMEDIATE").await?)
}

pub async fn drop_all_tables(pool: &SqlitePool) -> Result<()> {
    let mut tx = pool.begin().await?;
    for table in [
        "sets",
        "workout_exercises",
        "workouts",
        "users",
        "exercise_categories",
        "exercise_main_muscles",
        "exercise_secondary_muscles",
        "exercise_equipment",
        "exercises",
        "categories",
        "muscles",
        "equipment",
    ] {
        sqlx::query(&format!("DELETE FROM {}", table))
            .execute(&mut *tx)
            .await?;
    }
    tx.commit().await?;
    Ok(())
}

struct Migration {
    name: &'static str,
    up_sql: &'static str,
}

const MIGRATION_2026_10_19_000000_0000_SETUP_TABLES: &str =
    include_str!("../../../migrations/2026-10-19-000000-0000_setup_tables/up.sql");

const MIGRATIONS: &[Migration] = &[Migration {
    name: "2026-10-19-000000-0000_setup_tables",
    up_sql: MIGRATION_2026_10_19_000000_0000_SETUP_TABLES,
}];

async fn init_migrations_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS _migrations (
            name TEXT NOT NULL PRIMARY KEY,
            applied_at TEXT NOT NULL
        )",
    )
    .execute(pool)
    .await?;
    Ok(())
}

async fn is_migration_applied(conn: &mut SqliteConnection, name: &str) -> Result<bool> {
    let applied: Option<i64> = sqlx::query_scalar("SELECT 1 FROM _migrations WHERE name = ?1")
        .bind(name)
        .fetch_optional(&mut *conn)
        .await?;
    Ok(applied.is_some())
}

/// Splits a migration script into statements. Comments must sit on their own
/// `--` lines and statements must not contain a literal `;`.
fn split_statements(sql: &str) -> Vec<String> {
    let body = sql
        .lines()
        .filter(|line| !line.trim_start().starts_with("--"))
        .collect::<Vec<_>>()
        .join("\n");
    body.split(';')
        .map(str::trim)
        .filter(|statement| !statement.is_empty())
        .map(String::from)
        .collect()
}

/// Applies every embedded migration not yet recorded in `_migrations`.
///
/// Each migration runs under the write lock together with its bookkeeping
/// row, so concurrent starts on a fresh file apply it exactly once.
pub async fn init_database(pool: &SqlitePool) -> Result<()> {
    init_migrations_table(pool).await?;

    for migration in MIGRATIONS {
        let mut tx = begin_write(pool).await?;
        if is_migration_applied(&mut tx, migration.name).await? {
            debug!("Migration {} already applied, skipping", migration.name);
            continue;
        }

        info!("Applying migration {}", migration.name);
        for statement in split_statements(migration.up_sql) {
            sqlx::query(&statement)
                .execute(&mut *tx)
                .await
                .map_err(|source| Error::Migration {
                    name: migration.name,
                    source,
                })?;
        }

        sqlx::query("INSERT INTO _migrations (name, applied_at) VALUES (?1, ?2)")
            .bind(migration.name)
            .bind(Utc::now())
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
    }

    Ok(())
}
