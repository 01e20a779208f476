//! Dashboard use-case service.
//!
//! # Responsibility
//! - Assemble the summary card counts from aggregation queries.
//! - Build the recent-activity feed from per-entity read models.
//! - Serve the upcoming-deadlines widget with day counts.
//!
//! # Invariants
//! - An entity whose `created_at` equals its `updated_at` has never been
//!   modified; the feed reports it as created, otherwise as updated.
//!   Completion wins over both for tasks and deadlines.
//! - `total_count` reflects the feed before the limit is applied.

use crate::model::deadline::DeadlineType;
use crate::model::task::TaskStatus;
use crate::model::user::UserId;
use crate::repo::dashboard_repo::{
    DashboardRepository, RecentDeadline, RecentDocument, RecentTask, RecentUniversity,
    UpcomingDeadlineRow,
};
use crate::repo::RepoResult;
use crate::service::deadline_service::{upcoming_window, week_window};
use chrono::NaiveDate;
use serde::Serialize;
use std::cmp::Reverse;
use std::collections::BTreeMap;

/// Feed length when the caller does not ask for a specific limit.
pub const DEFAULT_ACTIVITY_LIMIT: usize = 10;

/// University counts for the summary card.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UniversityStats {
    pub total: u32,
    pub by_status: BTreeMap<String, u32>,
    pub by_category: BTreeMap<String, u32>,
}

/// Not-completed deadline counts over the dashboard windows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeadlineStats {
    pub upcoming: u32,
    pub this_week: u32,
    pub this_month: u32,
}

/// Task counts for the summary card.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskStats {
    pub total: u32,
    pub pending: u32,
    pub overdue: u32,
    pub high_priority: u32,
}

/// Document counts for the summary card.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentStats {
    pub total: u32,
    pub by_type: BTreeMap<String, u32>,
}

/// Aggregated counts behind the dashboard cards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DashboardSummary {
    pub universities: UniversityStats,
    pub deadlines: DeadlineStats,
    pub tasks: TaskStats,
    pub documents: DocumentStats,
}

/// Entity behind an activity item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityKind {
    University,
    Document,
    Task,
    Deadline,
}

/// What happened to the entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityAction {
    Created,
    Updated,
    Completed,
}

/// One entry in the recent-activity feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActivityItem {
    /// Entity id prefixed by its kind, unique across the feed.
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ActivityKind,
    pub action: ActivityAction,
    pub title: String,
    pub description: String,
    /// Epoch milliseconds of the change.
    pub timestamp: i64,
}

/// Activity feed envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityFeed {
    pub activities: Vec<ActivityItem>,
    /// Feed size before the limit was applied.
    pub total_count: usize,
}

/// One entry of the upcoming-deadlines widget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpcomingDeadlineItem {
    pub id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub deadline_type: DeadlineType,
    pub date: NaiveDate,
    pub university_name: Option<String>,
    /// Whole days from today to the deadline date.
    pub days_until: i64,
}

/// Dashboard service facade over the aggregation repository.
pub struct DashboardService<R: DashboardRepository> {
    repo: R,
}

impl<R: DashboardRepository> DashboardService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Summary counts for the dashboard cards, relative to `today`.
    pub fn summary(&self, user_id: UserId, today: NaiveDate) -> RepoResult<DashboardSummary> {
        let month = upcoming_window(today);

        Ok(DashboardSummary {
            universities: UniversityStats {
                total: self.repo.count_universities(user_id)?,
                by_status: self.repo.universities_by_status(user_id)?,
                by_category: self.repo.universities_by_category(user_id)?,
            },
            deadlines: DeadlineStats {
                upcoming: self.repo.count_deadlines_in_window(user_id, month)?,
                this_week: self
                    .repo
                    .count_deadlines_in_window(user_id, week_window(today))?,
                this_month: self.repo.count_deadlines_in_window(user_id, month)?,
            },
            tasks: TaskStats {
                total: self.repo.count_tasks(user_id)?,
                pending: self.repo.count_pending_tasks(user_id)?,
                overdue: self.repo.count_overdue_tasks(user_id, today)?,
                high_priority: self.repo.count_high_priority_tasks(user_id)?,
            },
            documents: DocumentStats {
                total: self.repo.count_documents(user_id)?,
                by_type: self.repo.documents_by_type(user_id)?,
            },
        })
    }

    /// Recent changes across all entities, newest first.
    pub fn activity(&self, user_id: UserId, limit: Option<usize>) -> RepoResult<ActivityFeed> {
        let mut activities = Vec::new();
        activities.extend(
            self.repo
                .recent_universities(user_id)?
                .iter()
                .map(university_activity),
        );
        activities.extend(
            self.repo
                .recent_documents(user_id)?
                .iter()
                .map(document_activity),
        );
        activities.extend(self.repo.recent_tasks(user_id)?.iter().map(task_activity));
        activities.extend(
            self.repo
                .recent_deadlines(user_id)?
                .iter()
                .map(deadline_activity),
        );

        activities.sort_by_key(|item| (Reverse(item.timestamp), item.id.clone()));

        let total_count = activities.len();
        // A zero limit falls back to the default, like a missing one.
        let limit = limit.filter(|value| *value != 0).unwrap_or(DEFAULT_ACTIVITY_LIMIT);
        activities.truncate(limit);

        Ok(ActivityFeed {
            activities,
            total_count,
        })
    }

    /// The five soonest not-completed deadlines within thirty days of `today`.
    pub fn upcoming_deadlines(
        &self,
        user_id: UserId,
        today: NaiveDate,
    ) -> RepoResult<Vec<UpcomingDeadlineItem>> {
        let rows = self
            .repo
            .upcoming_deadlines(user_id, upcoming_window(today))?;
        Ok(rows
            .iter()
            .map(|row| upcoming_deadline_item(row, today))
            .collect())
    }
}

fn creation_action(created_at: i64, updated_at: i64) -> ActivityAction {
    if created_at == updated_at {
        ActivityAction::Created
    } else {
        ActivityAction::Updated
    }
}

fn university_activity(row: &RecentUniversity) -> ActivityItem {
    let action = creation_action(row.created_at, row.updated_at);
    let verb = match action {
        ActivityAction::Created => "Added",
        _ => "Updated",
    };

    ActivityItem {
        id: format!("uni-{}", row.id),
        kind: ActivityKind::University,
        action,
        title: format!("{verb} {}", row.name),
        description: format!("{} school", row.category.as_str()),
        timestamp: row.updated_at,
    }
}

fn document_activity(row: &RecentDocument) -> ActivityItem {
    let action = creation_action(row.created_at, row.updated_at);
    let verb = match action {
        ActivityAction::Created => "Uploaded",
        _ => "Updated",
    };

    ActivityItem {
        id: format!("doc-{}", row.id),
        kind: ActivityKind::Document,
        action,
        title: format!("{verb} {}", row.name),
        description: format!("{} {}", row.doc_type.as_str(), row.version),
        timestamp: row.updated_at,
    }
}

fn task_activity(row: &RecentTask) -> ActivityItem {
    let (action, verb) = if row.completed_at.is_some() && row.status == TaskStatus::Completed {
        (ActivityAction::Completed, "Completed")
    } else if row.created_at == row.updated_at {
        (ActivityAction::Created, "Added")
    } else {
        (ActivityAction::Updated, "Updated")
    };

    ActivityItem {
        id: format!("task-{}", row.id),
        kind: ActivityKind::Task,
        action,
        title: format!("{verb} {}", row.title),
        description: row
            .university_name
            .as_deref()
            .map(|name| format!("Related to {name}"))
            .unwrap_or_else(|| "General task".to_string()),
        timestamp: row.updated_at,
    }
}

fn deadline_activity(row: &RecentDeadline) -> ActivityItem {
    let (action, verb) = if row.completed {
        (ActivityAction::Completed, "Completed")
    } else if row.created_at == row.updated_at {
        (ActivityAction::Created, "Added")
    } else {
        (ActivityAction::Updated, "Updated")
    };

    ActivityItem {
        id: format!("deadline-{}", row.id),
        kind: ActivityKind::Deadline,
        action,
        title: format!("{verb} {}", row.title),
        description: match row.university_name.as_deref() {
            Some(name) => format!("{name} - {}", row.deadline_type.as_str()),
            None => row.deadline_type.as_str().to_string(),
        },
        timestamp: row.updated_at,
    }
}

fn upcoming_deadline_item(row: &UpcomingDeadlineRow, today: NaiveDate) -> UpcomingDeadlineItem {
    UpcomingDeadlineItem {
        id: row.id.to_string(),
        title: row.title.clone(),
        deadline_type: row.deadline_type,
        date: row.date,
        university_name: row.university_name.clone(),
        days_until: (row.date - today).num_days(),
    }
}

#[cfg(test)]
mod tests {
    use super::{
        deadline_activity, task_activity, university_activity, upcoming_deadline_item,
        ActivityAction,
    };
    use crate::model::deadline::DeadlineType;
    use crate::model::task::TaskStatus;
    use crate::model::university::{UniversityCategory, UniversityStatus};
    use crate::repo::dashboard_repo::{RecentDeadline, RecentTask, RecentUniversity, UpcomingDeadlineRow};
    use chrono::NaiveDate;
    use uuid::Uuid;

    #[test]
    fn untouched_university_reports_as_created() {
        let row = RecentUniversity {
            id: Uuid::new_v4(),
            name: "MIT".to_string(),
            status: UniversityStatus::Researching,
            category: UniversityCategory::Reach,
            created_at: 100,
            updated_at: 100,
        };

        let item = university_activity(&row);
        assert_eq!(item.action, ActivityAction::Created);
        assert_eq!(item.title, "Added MIT");
        assert_eq!(item.description, "REACH school");
    }

    #[test]
    fn completed_task_wins_over_updated() {
        let row = RecentTask {
            id: Uuid::new_v4(),
            title: "Send SOP".to_string(),
            status: TaskStatus::Completed,
            completed_at: Some(200),
            university_name: Some("CMU".to_string()),
            created_at: 100,
            updated_at: 200,
        };

        let item = task_activity(&row);
        assert_eq!(item.action, ActivityAction::Completed);
        assert_eq!(item.title, "Completed Send SOP");
        assert_eq!(item.description, "Related to CMU");
    }

    #[test]
    fn deadline_without_university_describes_bare_type() {
        let row = RecentDeadline {
            id: Uuid::new_v4(),
            title: "FAFSA".to_string(),
            deadline_type: DeadlineType::Other,
            completed: false,
            university_name: None,
            created_at: 100,
            updated_at: 100,
        };

        let item = deadline_activity(&row);
        assert_eq!(item.description, "OTHER");
    }

    #[test]
    fn days_until_counts_whole_days() {
        let today: NaiveDate = "2026-03-01".parse().expect("valid test date");
        let row = UpcomingDeadlineRow {
            id: Uuid::new_v4(),
            title: "App due".to_string(),
            deadline_type: DeadlineType::Application,
            date: "2026-03-15".parse().expect("valid test date"),
            university_name: None,
        };

        assert_eq!(upcoming_deadline_item(&row, today).days_until, 14);
    }
}
