use log::{debug, error, info};
use sqlx::SqlitePool;

use crate::catalog::{Association, link_all};
use crate::db::begin_write;
use crate::errors::{Error, Result};

/// One entry of a fixed catalog definition set.
#[derive(Debug, Clone, Copy)]
pub struct ExerciseDefinition {
    pub name: &'static str,
    pub description: &'static str,
    pub categories: &'static [&'static str],
    pub main_muscles: &'static [&'static str],
    pub secondary_muscles: &'static [&'static str],
    pub equipment: &'static [&'static str],
}

impl ExerciseDefinition {
    pub fn names_for(&self, association: Association) -> &'static [&'static str] {
        match association {
            Association::Category => self.categories,
            Association::MainMuscle => self.main_muscles,
            Association::SecondaryMuscle => self.secondary_muscles,
            Association::Equipment => self.equipment,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    /// The catalog already had exercises; nothing was written.
    Skipped { existing: i64 },
    Seeded { exercises: usize, links: usize },
}

/// Populates the catalog from `definitions` unless it already holds any exercise.
///
/// Everything happens in one transaction; on failure nothing is kept and the
/// cause comes back wrapped in `Error::Seed`.
pub async fn seed(pool: &SqlitePool, definitions: &[ExerciseDefinition]) -> Result<SeedOutcome> {
    match seed_in_transaction(pool, definitions).await {
        Ok(outcome) => Ok(outcome),
        Err(err) => {
            error!("Catalog seeding rolled back: {}", err);
            Err(Error::Seed(Box::new(err)))
        }
    }
}

async fn seed_in_transaction(
    pool: &SqlitePool,
    definitions: &[ExerciseDefinition],
) -> Result<SeedOutcome> {
    // Write lock before the count guard: a concurrent seeder waits on
    // busy_timeout and then sees the finished catalog.
    let mut tx = begin_write(pool).await?;

    let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM exercises")
        .fetch_one(&mut *tx)
        .await?;
    if existing > 0 {
        info!("Catalog already holds {} exercises, skipping seed", existing);
        return Ok(SeedOutcome::Skipped { existing });
    }

    let mut exercises = 0;
    let mut links = 0;
    for definition in definitions {
        let name = definition.name.trim();
        if name.is_empty() {
            return Err(Error::invalid("exercise name must not be empty"));
        }

        let inserted = sqlx::query(
            "INSERT OR IGNORE INTO exercises (name, description) VALUES (?1, ?2)",
        )
        .bind(name)
        .bind(definition.description)
        .execute(&mut *tx)
        .await?;
        exercises += inserted.rows_affected() as usize;

        for association in Association::ALL {
            links += link_all(&mut tx, name, association, definition.names_for(association)).await?;
        }
        debug!("Seeded exercise {}", name);
    }

    tx.commit().await?;
    info!("Seeded catalog with {} exercises and {} links", exercises, links);
    Ok(SeedOutcome::Seeded { exercises, links })
}

pub const DEFAULT_CATALOG: &[ExerciseDefinition] = &[
    ExerciseDefinition {
        name: "Push Up",
        description: "A classic bodyweight exercise that works the chest, shoulders, and triceps.",
        categories: &["Strength"],
        main_muscles: &["Chest", "Triceps"],
        secondary_muscles: &["Front Delts"],
        equipment: &["Bodyweight"],
    },
    ExerciseDefinition {
        name: "Pull Up",
        description: "An upper-body strength exercise that targets the back and biceps.",
        categories: &["Strength"],
        main_muscles: &["Back", "Biceps"],
        secondary_muscles: &[],
        equipment: &["Chin-Up Bar"],
    },
    ExerciseDefinition {
        name: "Squat",
        description: "A fundamental lower-body exercise that strengthens the legs and glutes.",
        categories: &["Strength", "Powerlifting"],
        main_muscles: &["Quadriceps", "Glutes"],
        secondary_muscles: &["Hamstrings", "Calves"],
        equipment: &["Barbell", "Bodyweight"],
    },
    ExerciseDefinition {
        name: "Deadlift",
        description: "A compound exercise that works the entire posterior chain.",
        categories: &["Strength", "Powerlifting"],
        main_muscles: &["Back", "Glutes", "Hamstrings"],
        secondary_muscles: &[],
        equipment: &["Barbell"],
    },
    ExerciseDefinition {
        name: "Overhead Press",
        description: "A shoulder exercise that builds strength and size in the deltoids.",
        categories: &["Strength"],
        main_muscles: &["Delts"],
        secondary_muscles: &["Triceps"],
        equipment: &["Barbell", "Dumbbell"],
    },
    ExerciseDefinition {
        name: "Bench Press",
        description: "A classic upper-body exercise for building chest strength.",
        categories: &["Strength", "Powerlifting"],
        main_muscles: &["Chest"],
        secondary_muscles: &["Front Delts", "Triceps"],
        equipment: &["Barbell", "Bench"],
    },
    ExerciseDefinition {
        name: "Bent Over Row",
        description: "A compound exercise that targets the muscles of the back.",
        categories: &["Strength"],
        main_muscles: &["Back"],
        secondary_muscles: &["Biceps", "Rear Delts"],
        equipment: &["Barbell"],
    },
    ExerciseDefinition {
        name: "Lunge",
        description: "A unilateral leg exercise that improves balance and strength.",
        categories: &["Strength"],
        main_muscles: &["Quadriceps", "Glutes"],
        secondary_muscles: &[],
        equipment: &["Bodyweight", "Dumbbell"],
    },
    ExerciseDefinition {
        name: "Bicep Curl",
        description: "An isolation exercise for the biceps.",
        categories: &["Strength"],
        main_muscles: &["Biceps"],
        secondary_muscles: &[],
        equipment: &["Dumbbell", "Barbell", "EZ Bar"],
    },
    ExerciseDefinition {
        name: "Tricep Extension",
        description: "An isolation exercise for the triceps.",
        categories: &["Strength"],
        main_muscles: &["Triceps"],
        secondary_muscles: &[],
        equipment: &["Dumbbell", "Cable"],
    },
];
