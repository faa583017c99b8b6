use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::Error;
use crate::lifecycle::{Status, derive_status};

// User models
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub password_hash: String,
}

// Catalog models
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Exercise {
    pub name: String,
    pub description: String,
}

/// An exercise together with the display names of everything it is linked to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExerciseDetail {
    pub name: String,
    pub description: String,
    pub categories: Vec<String>,
    pub main_muscles: Vec<String>,
    pub secondary_muscles: Vec<String>,
    pub equipment: Vec<String>,
}

impl fmt::Display for ExerciseDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.name)?;
        if !self.description.is_empty() {
            writeln!(f, "  {}", self.description)?;
        }
        writeln!(f, "  categories: {}", self.categories.join(", "))?;
        writeln!(f, "  main muscles: {}", self.main_muscles.join(", "))?;
        writeln!(f, "  secondary muscles: {}", self.secondary_muscles.join(", "))?;
        write!(f, "  equipment: {}", self.equipment.join(", "))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct TaxonomyEntity {
    pub id: String,
    pub name: String,
}

// Workout models
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workout {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub comments: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub due_date: Option<DateTime<Utc>>,
    pub status: Status,
}

impl Workout {
    /// Status as it should be shown at `now`. Does not touch the stored value.
    pub fn status_at(&self, now: DateTime<Utc>) -> Status {
        derive_status(self.status, self.due_date, now)
    }
}

impl fmt::Display for Workout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let due = self
            .due_date
            .map(|d| d.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "-".to_string());
        write!(
            f,
            "{} [{}] due {} ({})",
            self.name,
            self.status_at(Utc::now()),
            due,
            self.id
        )
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub(crate) struct WorkoutRow {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub comments: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub due_date: Option<DateTime<Utc>>,
    pub status: Status,
}

impl TryFrom<WorkoutRow> for Workout {
    type Error = Error;

    fn try_from(row: WorkoutRow) -> Result<Self, Error> {
        let comments = if row.comments.trim().is_empty() {
            Vec::new()
        } else {
            serde_json::from_str::<Vec<String>>(&row.comments).map_err(|e| {
                Error::Corrupt(format!("comments of workout {}: {}", row.id, e))
            })?
        };

        Ok(Workout {
            id: row.id,
            user_id: row.user_id,
            name: row.name,
            comments,
            created_at: row.created_at,
            updated_at: row.updated_at,
            due_date: row.due_date,
            status: row.status,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewWorkout {
    pub name: String,
    pub due_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WorkoutOrder {
    #[default]
    CreatedAt,
    DueDate,
    Name,
}

impl WorkoutOrder {
    pub(crate) fn order_by(&self) -> &'static str {
        match self {
            WorkoutOrder::CreatedAt => "created_at",
            WorkoutOrder::DueDate => "due_date IS NULL, due_date",
            WorkoutOrder::Name => "name COLLATE NOCASE",
        }
    }
}

// Set models
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Set {
    pub id: String,
    pub workout_id: String,
    pub exercise_name: String,
    pub reps: i64,
    pub weight: f64,
}

impl fmt::Display for Set {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {:.1}kg x {} reps",
            self.exercise_name, self.weight, self.reps
        )
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewSet {
    pub exercise_name: String,
    pub reps: i64,
    pub weight: f64,
}

pub(crate) fn validate_set_values(reps: i64, weight: f64) -> Result<(), Error> {
    if reps < 0 {
        return Err(Error::invalid(format!("reps must be non-negative, got {}", reps)));
    }
    if !weight.is_finite() || weight < 0.0 {
        return Err(Error::invalid(format!(
            "weight must be a non-negative number, got {}",
            weight
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn row(comments: &str) -> WorkoutRow {
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap();
        WorkoutRow {
            id: "w1".into(),
            user_id: "u1".into(),
            name: "Leg day".into(),
            comments: comments.into(),
            created_at: at,
            updated_at: at,
            due_date: None,
            status: Status::Pending,
        }
    }

    #[test]
    fn decodes_comment_list_in_order() {
        let workout = Workout::try_from(row(r#"["warmup felt slow","PR on squat"]"#)).unwrap();
        assert_eq!(workout.comments, vec!["warmup felt slow", "PR on squat"]);
    }

    #[test]
    fn empty_comment_column_is_empty_list() {
        assert!(Workout::try_from(row("")).unwrap().comments.is_empty());
    }

    #[test]
    fn malformed_comments_are_corrupt() {
        let err = Workout::try_from(row("{not json")).unwrap_err();
        assert!(matches!(err, Error::Corrupt(_)));
    }

    #[test]
    fn rejects_negative_or_non_finite_set_values() {
        assert!(validate_set_values(0, 0.0).is_ok());
        assert!(validate_set_values(-1, 20.0).is_err());
        assert!(validate_set_values(5, -2.5).is_err());
        assert!(validate_set_values(5, f64::NAN).is_err());
        assert!(validate_set_values(5, f64::INFINITY).is_err());
    }
}
