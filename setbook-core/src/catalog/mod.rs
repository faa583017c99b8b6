//! Normalized exercise catalog.
//!
//! Exercises are keyed by name. Categories, muscles and equipment live in their
//! own tables with generated ids and unique names, and are attached to
//! exercises through four join tables.

mod links;
mod reader;
mod seed;
mod taxonomy;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub use links::{LinkOutcome, link, link_all, link_name};
pub use reader::{get_exercise, list_exercises, list_taxonomy};
pub use seed::{DEFAULT_CATALOG, ExerciseDefinition, SeedOutcome, seed};
pub use taxonomy::{get_or_create_taxonomy_entity, resolve};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaxonomyKind {
    Category,
    Muscle,
    Equipment,
}

impl TaxonomyKind {
    pub const ALL: [TaxonomyKind; 3] = [
        TaxonomyKind::Category,
        TaxonomyKind::Muscle,
        TaxonomyKind::Equipment,
    ];

    pub(crate) fn table(&self) -> &'static str {
        match self {
            TaxonomyKind::Category => "categories",
            TaxonomyKind::Muscle => "muscles",
            TaxonomyKind::Equipment => "equipment",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TaxonomyKind::Category => "category",
            TaxonomyKind::Muscle => "muscle",
            TaxonomyKind::Equipment => "equipment",
        }
    }
}

impl fmt::Display for TaxonomyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaxonomyKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "category" | "categories" => Ok(TaxonomyKind::Category),
            "muscle" | "muscles" => Ok(TaxonomyKind::Muscle),
            "equipment" => Ok(TaxonomyKind::Equipment),
            other => Err(format!("unknown taxonomy kind '{}'", other)),
        }
    }
}

/// The four ways an exercise can be linked to a taxonomy entity.
///
/// Main and secondary muscles share the `muscles` table but use separate joins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Association {
    Category,
    MainMuscle,
    SecondaryMuscle,
    Equipment,
}

impl Association {
    pub const ALL: [Association; 4] = [
        Association::Category,
        Association::MainMuscle,
        Association::SecondaryMuscle,
        Association::Equipment,
    ];

    pub fn taxonomy(&self) -> TaxonomyKind {
        match self {
            Association::Category => TaxonomyKind::Category,
            Association::MainMuscle | Association::SecondaryMuscle => TaxonomyKind::Muscle,
            Association::Equipment => TaxonomyKind::Equipment,
        }
    }

    pub(crate) fn join_table(&self) -> &'static str {
        match self {
            Association::Category => "exercise_categories",
            Association::MainMuscle => "exercise_main_muscles",
            Association::SecondaryMuscle => "exercise_secondary_muscles",
            Association::Equipment => "exercise_equipment",
        }
    }

    pub(crate) fn taxonomy_column(&self) -> &'static str {
        match self {
            Association::Category => "category_id",
            Association::MainMuscle | Association::SecondaryMuscle => "muscle_id",
            Association::Equipment => "equipment_id",
        }
    }
}

impl fmt::Display for Association {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Association::Category => "category",
            Association::MainMuscle => "main muscle",
            Association::SecondaryMuscle => "secondary muscle",
            Association::Equipment => "equipment",
        };
        f.write_str(label)
    }
}
