//! Workout and user operations.

use chrono::{DateTime, Utc};

use crate::db::models::{NewUser, NewWorkout, User, Workout, WorkoutOrder};
use crate::db::operations;
use crate::errors::Result;
use crate::lifecycle::Status;
use crate::logbook::Logbook;

impl Logbook {
    pub async fn create_user(&self, user: &NewUser) -> Result<User> {
        operations::create_user(&self.db_pool, user).await
    }

    pub async fn get_user(&self, user_id: &str) -> Result<User> {
        operations::get_user(&self.db_pool, user_id).await
    }

    /// Create a workout for `user_id`, optionally due at `due_date`.
    pub async fn new_workout(
        &self,
        user_id: &str,
        name: &str,
        due_date: Option<DateTime<Utc>>,
    ) -> Result<Workout> {
        let workout = NewWorkout {
            name: name.to_string(),
            due_date,
        };
        operations::create_workout(&self.db_pool, user_id, &workout).await
    }

    pub async fn get_workout(&self, workout_id: &str) -> Result<Workout> {
        operations::get_workout(&self.db_pool, workout_id).await
    }

    pub async fn get_workout_by_name(&self, user_id: &str, name: &str) -> Result<Workout> {
        operations::get_workout_by_name(&self.db_pool, user_id, name).await
    }

    pub async fn get_all_workouts(&self, user_id: &str, order: WorkoutOrder) -> Result<Vec<Workout>> {
        operations::list_workouts(&self.db_pool, user_id, order).await
    }

    pub async fn get_completed_workouts(&self, user_id: &str) -> Result<Vec<Workout>> {
        operations::list_completed_workouts(&self.db_pool, user_id).await
    }

    /// Status of a workout as it should be displayed right now.
    pub async fn workout_status(&self, workout_id: &str) -> Result<Status> {
        let workout = self.get_workout(workout_id).await?;
        Ok(workout.status_at(Utc::now()))
    }

    pub async fn add_comment(&self, workout_id: &str, comment: &str) -> Result<Workout> {
        operations::add_comment(&self.db_pool, workout_id, comment).await
    }

    pub async fn add_exercises_to_workout<S: AsRef<str>>(
        &self,
        workout_id: &str,
        exercise_names: &[S],
    ) -> Result<usize> {
        operations::add_exercises_to_workout(&self.db_pool, workout_id, exercise_names).await
    }

    pub async fn get_workout_exercises(&self, workout_id: &str) -> Result<Vec<String>> {
        operations::workout_exercises(&self.db_pool, workout_id).await
    }

    /// Mark a workout as done.
    pub async fn complete_workout(&self, workout_id: &str) -> Result<Workout> {
        operations::mark_completed(&self.db_pool, workout_id).await
    }

    /// Delete a workout and every set it owns. Returns the number of sets removed.
    pub async fn delete_workout(&self, user_id: &str, workout_id: &str) -> Result<u64> {
        operations::delete_workout(&self.db_pool, user_id, workout_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{DEFAULT_CATALOG, TaxonomyKind};
    use crate::db::models::NewSet;
    use crate::db::test_utils::{count_rows, setup_test_db};
    use chrono::Duration;

    async fn logbook() -> Logbook {
        Logbook::from_pool(setup_test_db().await).await.unwrap()
    }

    async fn athlete(logbook: &Logbook) -> User {
        logbook
            .create_user(&NewUser {
                first_name: "Ada".into(),
                last_name: "Lift".into(),
                password_hash: "$2b$08$opaque".into(),
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn opening_seeds_catalog_once() {
        let logbook = logbook().await;
        assert_eq!(
            logbook.get_all_exercises().await.unwrap().len(),
            DEFAULT_CATALOG.len()
        );

        let pool = logbook.db_pool.clone();
        let reopened = Logbook::from_pool(pool).await.unwrap();
        assert_eq!(
            count_rows(&reopened.db_pool, "exercises").await,
            DEFAULT_CATALOG.len() as i64
        );
        assert_eq!(count_rows(&reopened.db_pool, "categories").await, 2);
    }

    #[tokio::test]
    async fn strength_is_shared_across_seeded_exercises() {
        let logbook = logbook().await;
        let squat = logbook.get_exercise("Squat").await.unwrap();
        assert!(squat.categories.contains(&"Strength".to_string()));
        assert!(squat.main_muscles.contains(&"Quadriceps".to_string()));

        let first = logbook
            .get_or_create_taxonomy_entity(TaxonomyKind::Category, "Strength")
            .await
            .unwrap();
        let second = logbook
            .get_or_create_taxonomy_entity(TaxonomyKind::Category, "Strength")
            .await
            .unwrap();
        assert_eq!(first, second);

        let strength_rows = logbook
            .get_taxonomy(TaxonomyKind::Category)
            .await
            .unwrap()
            .into_iter()
            .filter(|c| c.name == "Strength")
            .count();
        assert_eq!(strength_rows, 1);
    }

    #[tokio::test]
    async fn workout_session_flow() {
        let logbook = logbook().await;
        let user = athlete(&logbook).await;
        let due = Utc::now() + Duration::days(3);

        let workout = logbook.new_workout(&user.id, "Heavy lower", Some(due)).await.unwrap();
        assert_eq!(logbook.workout_status(&workout.id).await.unwrap(), Status::Pending);

        logbook
            .add_exercises_to_workout(&workout.id, &["Squat", "Deadlift"])
            .await
            .unwrap();
        let set = logbook
            .add_set(
                &workout.id,
                &NewSet {
                    exercise_name: "Deadlift".into(),
                    reps: 3,
                    weight: 180.0,
                },
            )
            .await
            .unwrap();
        logbook.update_set(&set.id, 2, 185.0).await.unwrap();
        logbook.add_comment(&workout.id, "grip gave out").await.unwrap();

        let done = logbook.complete_workout(&workout.id).await.unwrap();
        assert_eq!(done.comments, vec!["grip gave out"]);
        assert!(done.updated_at >= workout.updated_at);
        assert_eq!(logbook.workout_status(&workout.id).await.unwrap(), Status::Completed);
        assert_eq!(logbook.get_completed_workouts(&user.id).await.unwrap().len(), 1);

        let removed = logbook.delete_workout(&user.id, &workout.id).await.unwrap();
        assert_eq!(removed, 1);
        assert!(logbook.get_sets_for_workout(&workout.id).await.unwrap().is_empty());
        assert!(logbook.get_set(&set.id).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn reset_restores_a_fresh_catalog() {
        let logbook = logbook().await;
        let user = athlete(&logbook).await;
        logbook.new_workout(&user.id, "Temp", None).await.unwrap();

        let outcome = logbook.reset().await.unwrap();
        assert!(matches!(outcome, crate::catalog::SeedOutcome::Seeded { .. }));
        assert_eq!(count_rows(&logbook.db_pool, "workouts").await, 0);
        assert_eq!(count_rows(&logbook.db_pool, "users").await, 0);
        assert_eq!(
            count_rows(&logbook.db_pool, "exercises").await,
            DEFAULT_CATALOG.len() as i64
        );
    }
}
