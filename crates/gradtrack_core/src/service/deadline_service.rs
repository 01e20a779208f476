//! Deadline use-case service.
//!
//! # Responsibility
//! - Provide deadline CRUD on top of the repository.
//! - Bucket deadlines by urgency relative to a reference date.
//!
//! # Invariants
//! - Every deadline lands in exactly one bucket. Completion wins over date;
//!   the remaining buckets partition the date line around `today`, `today + 7`,
//!   and `today + 30`.

use crate::model::deadline::{Deadline, DeadlineId, DeadlinePatch, NewDeadline};
use crate::model::user::UserId;
use crate::repo::deadline_repo::{DateWindow, DeadlineListFilter, DeadlineRepository};
use crate::repo::RepoResult;
use chrono::{Days, NaiveDate};
use serde::Serialize;

/// Days covered by the "this week" bucket and window.
pub const WEEK_WINDOW_DAYS: u64 = 7;

/// Days covered by the "this month" bucket and the upcoming window.
pub const MONTH_WINDOW_DAYS: u64 = 30;

/// Deadlines bucketed by urgency.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorizedDeadlines {
    /// Not completed, dated before `today`.
    pub overdue: Vec<Deadline>,
    /// Not completed, dated within `[today, today + 7]`.
    pub this_week: Vec<Deadline>,
    /// Not completed, dated within `(today + 7, today + 30]`.
    pub this_month: Vec<Deadline>,
    /// Not completed, dated after `today + 30`.
    pub upcoming: Vec<Deadline>,
    pub completed: Vec<Deadline>,
}

/// List envelope: the flat filtered list plus its urgency buckets.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeadlineListResult {
    pub deadlines: Vec<Deadline>,
    pub categorized_deadlines: CategorizedDeadlines,
}

/// Deadline service facade over repository implementations.
pub struct DeadlineService<R: DeadlineRepository> {
    repo: R,
}

impl<R: DeadlineRepository> DeadlineService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn create_deadline(&self, user_id: UserId, new: &NewDeadline) -> RepoResult<Deadline> {
        self.repo.create(user_id, new)
    }

    pub fn get_deadline(&self, user_id: UserId, id: DeadlineId) -> RepoResult<Option<Deadline>> {
        self.repo.get(user_id, id)
    }

    /// Lists deadlines date-ascending and buckets them relative to `today`.
    pub fn list_deadlines(
        &self,
        user_id: UserId,
        filter: &DeadlineListFilter,
        today: NaiveDate,
    ) -> RepoResult<DeadlineListResult> {
        let deadlines = self.repo.list(user_id, filter)?;
        let categorized_deadlines = categorize_deadlines(&deadlines, today);
        Ok(DeadlineListResult {
            deadlines,
            categorized_deadlines,
        })
    }

    /// Not-completed deadlines due within the next thirty days.
    pub fn upcoming_deadlines(
        &self,
        user_id: UserId,
        today: NaiveDate,
    ) -> RepoResult<Vec<Deadline>> {
        let filter = DeadlineListFilter {
            window: Some(upcoming_window(today)),
            ..DeadlineListFilter::default()
        };
        self.repo.list(user_id, &filter)
    }

    pub fn update_deadline(
        &self,
        user_id: UserId,
        id: DeadlineId,
        patch: &DeadlinePatch,
    ) -> RepoResult<Deadline> {
        self.repo.update(user_id, id, patch)
    }

    pub fn delete_deadline(&self, user_id: UserId, id: DeadlineId) -> RepoResult<()> {
        self.repo.delete(user_id, id)
    }
}

/// Inclusive window `[today, today + 7]`.
pub fn week_window(today: NaiveDate) -> DateWindow {
    DateWindow {
        from: today,
        to: add_days(today, WEEK_WINDOW_DAYS),
    }
}

/// Inclusive window `[today, today + 30]`.
pub fn upcoming_window(today: NaiveDate) -> DateWindow {
    DateWindow {
        from: today,
        to: add_days(today, MONTH_WINDOW_DAYS),
    }
}

/// Buckets deadlines by urgency relative to `today`, preserving input order.
pub fn categorize_deadlines(deadlines: &[Deadline], today: NaiveDate) -> CategorizedDeadlines {
    let week_end = add_days(today, WEEK_WINDOW_DAYS);
    let month_end = add_days(today, MONTH_WINDOW_DAYS);

    let mut buckets = CategorizedDeadlines::default();
    for deadline in deadlines {
        let bucket = if deadline.completed {
            &mut buckets.completed
        } else if deadline.date < today {
            &mut buckets.overdue
        } else if deadline.date <= week_end {
            &mut buckets.this_week
        } else if deadline.date <= month_end {
            &mut buckets.this_month
        } else {
            &mut buckets.upcoming
        };
        bucket.push(deadline.clone());
    }
    buckets
}

fn add_days(date: NaiveDate, days: u64) -> NaiveDate {
    date.checked_add_days(Days::new(days)).unwrap_or(date)
}

#[cfg(test)]
mod tests {
    use super::{categorize_deadlines, upcoming_window, week_window};
    use crate::model::deadline::{Deadline, DeadlineType};
    use chrono::NaiveDate;
    use uuid::Uuid;

    fn date(text: &str) -> NaiveDate {
        text.parse().expect("valid test date")
    }

    fn deadline_on(date_text: &str, completed: bool) -> Deadline {
        Deadline {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            title: "d".to_string(),
            deadline_type: DeadlineType::Application,
            date: date(date_text),
            completed,
            university_id: None,
            created_at: 0,
            updated_at: 0,
        }
    }

    #[test]
    fn buckets_partition_the_date_line() {
        let today = date("2026-03-01");
        let deadlines = vec![
            deadline_on("2026-02-28", false), // overdue
            deadline_on("2026-03-01", false), // this week (today)
            deadline_on("2026-03-08", false), // this week (boundary)
            deadline_on("2026-03-09", false), // this month
            deadline_on("2026-03-31", false), // this month (boundary)
            deadline_on("2026-04-01", false), // upcoming
            deadline_on("2026-02-01", true),  // completed wins over overdue
        ];

        let buckets = categorize_deadlines(&deadlines, today);
        assert_eq!(buckets.overdue.len(), 1);
        assert_eq!(buckets.this_week.len(), 2);
        assert_eq!(buckets.this_month.len(), 2);
        assert_eq!(buckets.upcoming.len(), 1);
        assert_eq!(buckets.completed.len(), 1);
    }

    #[test]
    fn windows_are_inclusive_of_both_ends() {
        let today = date("2026-03-01");
        assert_eq!(week_window(today).to, date("2026-03-08"));
        assert_eq!(upcoming_window(today).from, today);
        assert_eq!(upcoming_window(today).to, date("2026-03-31"));
    }
}
