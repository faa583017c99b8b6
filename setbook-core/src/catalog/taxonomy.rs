use log::{debug, warn};
use sqlx::{SqliteConnection, SqlitePool};
use uuid::Uuid;

use crate::catalog::TaxonomyKind;
use crate::errors::{Error, Result, is_unique_violation};

fn normalize_name(name: &str) -> Result<&str> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(Error::invalid("taxonomy name must not be empty"));
    }
    Ok(trimmed)
}

async fn find_id(conn: &mut SqliteConnection, kind: TaxonomyKind, name: &str) -> Result<Option<String>> {
    let id = sqlx::query_scalar::<_, String>(&format!(
        "SELECT id FROM {} WHERE name = ?1",
        kind.table()
    ))
    .bind(name)
    .fetch_optional(&mut *conn)
    .await?;
    Ok(id)
}

/// Inserts `name` under a fresh id. If the unique constraint on `name` rejects
/// the insert, another writer got there first and its id is returned instead.
async fn create_or_adopt(conn: &mut SqliteConnection, kind: TaxonomyKind, name: &str) -> Result<String> {
    let id = Uuid::new_v4().to_string();
    let inserted = sqlx::query(&format!(
        "INSERT INTO {} (id, name) VALUES (?1, ?2)",
        kind.table()
    ))
    .bind(&id)
    .bind(name)
    .execute(&mut *conn)
    .await;

    match inserted {
        Ok(_) => {
            debug!("Created {} '{}' with id {}", kind, name, id);
            Ok(id)
        }
        Err(err) if is_unique_violation(&err) => {
            warn!("{} '{}' was created concurrently, re-reading", kind, name);
            find_id(conn, kind, name).await?.ok_or(Error::Storage(err))
        }
        Err(err) => Err(err.into()),
    }
}

/// Returns the id of the `kind` entity called `name`, creating it if needed.
///
/// Runs on a single connection so it can take part in a caller's transaction.
pub async fn resolve(conn: &mut SqliteConnection, kind: TaxonomyKind, name: &str) -> Result<String> {
    let name = normalize_name(name)?;
    if let Some(id) = find_id(conn, kind, name).await? {
        return Ok(id);
    }
    create_or_adopt(conn, kind, name).await
}

pub async fn get_or_create_taxonomy_entity(
    pool: &SqlitePool,
    kind: TaxonomyKind,
    name: &str,
) -> Result<String> {
    let mut conn = pool.acquire().await?;
    resolve(&mut conn, kind, name).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_utils::{count_rows, setup_test_db};

    #[tokio::test]
    async fn resolving_twice_returns_same_id() {
        let pool = setup_test_db().await;
        let first = get_or_create_taxonomy_entity(&pool, TaxonomyKind::Muscle, "Glutes")
            .await
            .unwrap();
        let second = get_or_create_taxonomy_entity(&pool, TaxonomyKind::Muscle, "Glutes")
            .await
            .unwrap();

        assert_eq!(first, second);
        assert_eq!(count_rows(&pool, "muscles").await, 1);
    }

    #[tokio::test]
    async fn kinds_are_independent() {
        let pool = setup_test_db().await;
        let category = get_or_create_taxonomy_entity(&pool, TaxonomyKind::Category, "Cable")
            .await
            .unwrap();
        let equipment = get_or_create_taxonomy_entity(&pool, TaxonomyKind::Equipment, "Cable")
            .await
            .unwrap();

        assert_ne!(category, equipment);
        assert_eq!(count_rows(&pool, "categories").await, 1);
        assert_eq!(count_rows(&pool, "equipment").await, 1);
    }

    #[tokio::test]
    async fn surrounding_whitespace_is_ignored() {
        let pool = setup_test_db().await;
        let plain = get_or_create_taxonomy_entity(&pool, TaxonomyKind::Equipment, "Barbell")
            .await
            .unwrap();
        let padded = get_or_create_taxonomy_entity(&pool, TaxonomyKind::Equipment, "  Barbell ")
            .await
            .unwrap();
        assert_eq!(plain, padded);
    }

    #[tokio::test]
    async fn empty_name_is_rejected_without_writing() {
        let pool = setup_test_db().await;
        let err = get_or_create_taxonomy_entity(&pool, TaxonomyKind::Category, "   ")
            .await
            .unwrap_err();

        assert!(matches!(err, Error::InvalidInput(_)));
        assert_eq!(count_rows(&pool, "categories").await, 0);
    }

    #[tokio::test]
    async fn losing_the_insert_race_adopts_the_winner() {
        let pool = setup_test_db().await;
        sqlx::query("INSERT INTO categories (id, name) VALUES ('winner', 'Strength')")
            .execute(&pool)
            .await
            .unwrap();

        // Skip the lookup, as a resolver that read before the winner committed would.
        let mut conn = pool.acquire().await.unwrap();
        let id = create_or_adopt(&mut conn, TaxonomyKind::Category, "Strength")
            .await
            .unwrap();
        drop(conn);

        assert_eq!(id, "winner");
        assert_eq!(count_rows(&pool, "categories").await, 1);
    }
}
