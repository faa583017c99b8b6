use sqlx::SqlitePool;

use crate::catalog::{Association, TaxonomyKind};
use crate::db::models::{Exercise, ExerciseDetail, TaxonomyEntity};
use crate::errors::{Error, Result};

pub async fn list_exercises(pool: &SqlitePool) -> Result<Vec<Exercise>> {
    let exercises =
        sqlx::query_as::<_, Exercise>("SELECT name, description FROM exercises ORDER BY name")
            .fetch_all(pool)
            .await?;
    Ok(exercises)
}

async fn linked_names(
    pool: &SqlitePool,
    exercise_name: &str,
    association: Association,
) -> Result<Vec<String>> {
    let names = sqlx::query_scalar::<_, String>(&format!(
        "SELECT t.name FROM {join} j JOIN {table} t ON t.id = j.{column} \
         WHERE j.exercise_name = ?1 ORDER BY t.name",
        join = association.join_table(),
        table = association.taxonomy().table(),
        column = association.taxonomy_column(),
    ))
    .bind(exercise_name)
    .fetch_all(pool)
    .await?;
    Ok(names)
}

pub async fn get_exercise(pool: &SqlitePool, name: &str) -> Result<ExerciseDetail> {
    let exercise = sqlx::query_as::<_, Exercise>(
        "SELECT name, description FROM exercises WHERE name = ?1",
    )
    .bind(name)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| Error::not_found("exercise", name))?;

    Ok(ExerciseDetail {
        categories: linked_names(pool, &exercise.name, Association::Category).await?,
        main_muscles: linked_names(pool, &exercise.name, Association::MainMuscle).await?,
        secondary_muscles: linked_names(pool, &exercise.name, Association::SecondaryMuscle)
            .await?,
        equipment: linked_names(pool, &exercise.name, Association::Equipment).await?,
        name: exercise.name,
        description: exercise.description,
    })
}

pub async fn list_taxonomy(pool: &SqlitePool, kind: TaxonomyKind) -> Result<Vec<TaxonomyEntity>> {
    let entities = sqlx::query_as::<_, TaxonomyEntity>(&format!(
        "SELECT id, name FROM {} ORDER BY name",
        kind.table()
    ))
    .fetch_all(pool)
    .await?;
    Ok(entities)
}
