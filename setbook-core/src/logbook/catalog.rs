use crate::catalog::{self, ExerciseDefinition, SeedOutcome, TaxonomyKind};
use crate::db::models::{Exercise, ExerciseDetail, TaxonomyEntity};
use crate::errors::Result;
use crate::logbook::Logbook;

impl Logbook {
    pub async fn seed_catalog(&self, definitions: &[ExerciseDefinition]) -> Result<SeedOutcome> {
        catalog::seed(&self.db_pool, definitions).await
    }

    pub async fn get_or_create_taxonomy_entity(
        &self,
        kind: TaxonomyKind,
        name: &str,
    ) -> Result<String> {
        catalog::get_or_create_taxonomy_entity(&self.db_pool, kind, name).await
    }

    pub async fn get_all_exercises(&self) -> Result<Vec<Exercise>> {
        catalog::list_exercises(&self.db_pool).await
    }

    pub async fn get_exercise(&self, name: &str) -> Result<ExerciseDetail> {
        catalog::get_exercise(&self.db_pool, name).await
    }

    pub async fn get_taxonomy(&self, kind: TaxonomyKind) -> Result<Vec<TaxonomyEntity>> {
        catalog::list_taxonomy(&self.db_pool, kind).await
    }
}
