//! Workout lifecycle status and its time-based derivation.
//!
//! `Completed` is only ever reached through an explicit user action. The other
//! three states are recomputed from the due date whenever a workout is shown,
//! always in UTC.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// How long past its due date a workout stays `pending` before turning `overdue`.
pub const OVERDUE_AFTER_HOURS: i64 = 72;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum Status {
    #[default]
    Pending,
    Active,
    Overdue,
    Completed,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Pending => "pending",
            Status::Active => "active",
            Status::Overdue => "overdue",
            Status::Completed => "completed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Status::Completed)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(Status::Pending),
            "active" => Ok(Status::Active),
            "overdue" | "over_due" => Ok(Status::Overdue),
            "completed" => Ok(Status::Completed),
            other => Err(format!("unknown workout status '{}'", other)),
        }
    }
}

/// Recomputes a workout's status for display.
///
/// A stored `Completed` is returned untouched. A missing due date never derives
/// `Active` or `Overdue`.
pub fn derive_status(stored: Status, due_date: Option<DateTime<Utc>>, now: DateTime<Utc>) -> Status {
    if stored.is_terminal() {
        return stored;
    }
    let Some(due) = due_date else {
        return Status::Pending;
    };

    if now > due + Duration::hours(OVERDUE_AFTER_HOURS) {
        return Status::Overdue;
    }

    if now.date_naive() == due.date_naive() {
        return Status::Active;
    }

    Status::Pending
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn reference_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 10, 0, 0, 0).unwrap()
    }

    #[test]
    fn four_days_past_due_is_overdue() {
        let due = Utc.with_ymd_and_hms(2024, 1, 6, 0, 0, 0).unwrap();
        assert_eq!(
            derive_status(Status::Pending, Some(due), reference_now()),
            Status::Overdue
        );
    }

    #[test]
    fn same_calendar_day_is_active() {
        let due = Utc.with_ymd_and_hms(2024, 1, 10, 8, 0, 0).unwrap();
        assert_eq!(
            derive_status(Status::Pending, Some(due), reference_now()),
            Status::Active
        );
    }

    #[test]
    fn future_due_date_is_pending() {
        let due = Utc.with_ymd_and_hms(2024, 1, 20, 0, 0, 0).unwrap();
        assert_eq!(
            derive_status(Status::Active, Some(due), reference_now()),
            Status::Pending
        );
    }

    #[test]
    fn completed_is_never_recomputed() {
        let overdue = Utc.with_ymd_and_hms(2023, 6, 1, 0, 0, 0).unwrap();
        let today = Utc.with_ymd_and_hms(2024, 1, 10, 12, 0, 0).unwrap();
        for due in [Some(overdue), Some(today), None] {
            assert_eq!(
                derive_status(Status::Completed, due, reference_now()),
                Status::Completed
            );
        }
    }

    #[test]
    fn missing_due_date_stays_pending() {
        assert_eq!(
            derive_status(Status::Overdue, None, reference_now()),
            Status::Pending
        );
    }

    #[test]
    fn exactly_seventy_two_hours_is_not_overdue() {
        let due = reference_now() - Duration::hours(OVERDUE_AFTER_HOURS);
        assert_eq!(
            derive_status(Status::Pending, Some(due), reference_now()),
            Status::Pending
        );
        let just_past = reference_now() + Duration::seconds(1);
        assert_eq!(
            derive_status(Status::Pending, Some(due), just_past),
            Status::Overdue
        );
    }

    #[test]
    fn yesterday_within_window_is_pending() {
        let due = Utc.with_ymd_and_hms(2024, 1, 9, 23, 0, 0).unwrap();
        assert_eq!(
            derive_status(Status::Pending, Some(due), reference_now()),
            Status::Pending
        );
    }

    #[test]
    fn derivation_is_idempotent() {
        let due = Utc.with_ymd_and_hms(2024, 1, 10, 8, 0, 0).unwrap();
        let once = derive_status(Status::Pending, Some(due), reference_now());
        let twice = derive_status(once, Some(due), reference_now());
        assert_eq!(once, twice);
    }

    #[test]
    fn parses_legacy_overdue_spelling() {
        assert_eq!("over_due".parse::<Status>(), Ok(Status::Overdue));
        assert_eq!("Completed".parse::<Status>(), Ok(Status::Completed));
        assert!("done".parse::<Status>().is_err());
    }
}
