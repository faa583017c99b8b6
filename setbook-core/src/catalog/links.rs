use log::debug;
use sqlx::SqliteConnection;

use crate::catalog::{Association, resolve};
use crate::errors::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkOutcome {
    Linked,
    AlreadyLinked,
}

/// Links an exercise to a taxonomy entity. Re-linking an existing pair is a no-op.
pub async fn link(
    conn: &mut SqliteConnection,
    exercise_name: &str,
    association: Association,
    taxonomy_id: &str,
) -> Result<LinkOutcome> {
    let result = sqlx::query(&format!(
        "INSERT OR IGNORE INTO {} (exercise_name, {}) VALUES (?1, ?2)",
        association.join_table(),
        association.taxonomy_column()
    ))
    .bind(exercise_name)
    .bind(taxonomy_id)
    .execute(&mut *conn)
    .await?;

    if result.rows_affected() == 0 {
        Ok(LinkOutcome::AlreadyLinked)
    } else {
        debug!("Linked {} {} to {}", association, taxonomy_id, exercise_name);
        Ok(LinkOutcome::Linked)
    }
}

/// Resolves `name` in the association's taxonomy and links it.
pub async fn link_name(
    conn: &mut SqliteConnection,
    exercise_name: &str,
    association: Association,
    name: &str,
) -> Result<LinkOutcome> {
    let taxonomy_id = resolve(conn, association.taxonomy(), name).await?;
    link(conn, exercise_name, association, &taxonomy_id).await
}

/// Links every name in `names`, returning how many links were new.
pub async fn link_all<S: AsRef<str>>(
    conn: &mut SqliteConnection,
    exercise_name: &str,
    association: Association,
    names: &[S],
) -> Result<usize> {
    let mut created = 0;
    for name in names {
        if link_name(conn, exercise_name, association, name.as_ref()).await? == LinkOutcome::Linked {
            created += 1;
        }
    }
    Ok(created)
}
