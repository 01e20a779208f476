//! Task use-case service.
//!
//! # Responsibility
//! - Provide task CRUD on top of the repository.
//! - Derive the kanban grouping returned alongside every task list.
//!
//! # Invariants
//! - Kanban buckets hold PENDING, IN_PROGRESS, and COMPLETED tasks only;
//!   cancelled tasks stay in the flat list but join no bucket.

use crate::model::task::{NewTask, Task, TaskId, TaskPatch, TaskStatus};
use crate::model::user::UserId;
use crate::repo::task_repo::{TaskListFilter, TaskRepository};
use crate::repo::RepoResult;
use serde::Serialize;

/// Tasks grouped into the three fixed kanban columns.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct KanbanTasks {
    pub pending: Vec<Task>,
    pub in_progress: Vec<Task>,
    pub completed: Vec<Task>,
}

/// List envelope: the flat filtered list plus its kanban grouping.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskListResult {
    pub tasks: Vec<Task>,
    pub kanban_tasks: KanbanTasks,
}

/// Task service facade over repository implementations.
pub struct TaskService<R: TaskRepository> {
    repo: R,
}

impl<R: TaskRepository> TaskService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn create_task(&self, user_id: UserId, new: &NewTask) -> RepoResult<Task> {
        self.repo.create(user_id, new)
    }

    pub fn get_task(&self, user_id: UserId, id: TaskId) -> RepoResult<Option<Task>> {
        self.repo.get(user_id, id)
    }

    /// Lists tasks in priority-then-due order and groups them into kanban
    /// columns.
    pub fn list_tasks(
        &self,
        user_id: UserId,
        filter: &TaskListFilter,
    ) -> RepoResult<TaskListResult> {
        let tasks = self.repo.list(user_id, filter)?;
        let kanban_tasks = group_kanban(&tasks);
        Ok(TaskListResult {
            tasks,
            kanban_tasks,
        })
    }

    pub fn update_task(
        &self,
        user_id: UserId,
        id: TaskId,
        patch: &TaskPatch,
    ) -> RepoResult<Task> {
        self.repo.update(user_id, id, patch)
    }

    /// Status-only update used by kanban drag-and-drop.
    pub fn move_task(
        &self,
        user_id: UserId,
        id: TaskId,
        status: TaskStatus,
    ) -> RepoResult<Task> {
        self.repo.update(user_id, id, &TaskPatch::status(status))
    }

    pub fn delete_task(&self, user_id: UserId, id: TaskId) -> RepoResult<()> {
        self.repo.delete(user_id, id)
    }
}

/// Groups tasks into kanban columns, preserving input order.
pub fn group_kanban(tasks: &[Task]) -> KanbanTasks {
    let mut grouped = KanbanTasks::default();
    for task in tasks {
        match task.status {
            TaskStatus::Pending => grouped.pending.push(task.clone()),
            TaskStatus::InProgress => grouped.in_progress.push(task.clone()),
            TaskStatus::Completed => grouped.completed.push(task.clone()),
            TaskStatus::Cancelled => {}
        }
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::group_kanban;
    use crate::model::task::{Task, TaskPriority, TaskStatus};
    use uuid::Uuid;

    fn task_with_status(status: TaskStatus) -> Task {
        Task {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            title: "t".to_string(),
            description: None,
            status,
            priority: TaskPriority::Medium,
            due_date: None,
            completed_at: (status == TaskStatus::Completed).then_some(0),
            university_id: None,
            created_at: 0,
            updated_at: 0,
        }
    }

    #[test]
    fn cancelled_tasks_join_no_bucket() {
        let tasks = vec![
            task_with_status(TaskStatus::Pending),
            task_with_status(TaskStatus::Cancelled),
            task_with_status(TaskStatus::InProgress),
            task_with_status(TaskStatus::Completed),
        ];

        let grouped = group_kanban(&tasks);
        assert_eq!(grouped.pending.len(), 1);
        assert_eq!(grouped.in_progress.len(), 1);
        assert_eq!(grouped.completed.len(), 1);
    }
}
