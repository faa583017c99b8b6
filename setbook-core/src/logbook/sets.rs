use crate::db::models::{NewSet, Set};
use crate::db::operations;
use crate::errors::Result;
use crate::logbook::Logbook;

impl Logbook {
    pub async fn add_set(&self, workout_id: &str, set: &NewSet) -> Result<Set> {
        operations::add_set(&self.db_pool, workout_id, set).await
    }

    pub async fn get_set(&self, set_id: &str) -> Result<Set> {
        operations::get_set(&self.db_pool, set_id).await
    }

    pub async fn get_sets_for_workout(&self, workout_id: &str) -> Result<Vec<Set>> {
        operations::sets_for_workout(&self.db_pool, workout_id).await
    }

    pub async fn update_set(&self, set_id: &str, reps: i64, weight: f64) -> Result<Set> {
        operations::update_set(&self.db_pool, set_id, reps, weight).await
    }

    pub async fn delete_set(&self, set_id: &str) -> Result<()> {
        operations::delete_set(&self.db_pool, set_id).await
    }
}
