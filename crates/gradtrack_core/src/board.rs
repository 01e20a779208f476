//! Kanban board controller.
//!
//! # Responsibility
//! - Hold the cached task list plus the active filter and sort settings.
//! - Produce the board view through one filter, sort, group pass.
//! - Apply optimistic status moves with rollback on persist failure.
//!
//! # Invariants
//! - Rendering never mutates the cache; the same state renders the same view.
//! - A failed move leaves the cache exactly as it was before the move.

use crate::model::task::{Task, TaskId, TaskPriority, TaskStatus};
use crate::model::university::UniversityId;
use chrono::NaiveDate;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Board filter settings. Predicates AND-combine; `None`/empty means "all".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoardFilters {
    pub priority: Option<TaskPriority>,
    pub university: Option<UniversityId>,
    /// Case-insensitive substring match on title or description.
    pub search: String,
}

/// Sortable column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortKey {
    #[default]
    Created,
    Priority,
    Due,
    Title,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

/// Active sort settings. Defaults to newest created first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BoardSort {
    pub key: SortKey,
    pub direction: SortDirection,
}

/// View model for one rendered task card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskCard {
    pub id: TaskId,
    pub title: String,
    pub priority: TaskPriority,
    pub due_date: Option<NaiveDate>,
    /// Human label for the due date, `None` when the task has none.
    pub due_label: Option<String>,
    /// Not completed and due before today.
    pub overdue: bool,
    pub university_id: Option<UniversityId>,
}

/// Rendered board: cards grouped into the three fixed columns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoardView {
    pub pending: Vec<TaskCard>,
    pub in_progress: Vec<TaskCard>,
    pub completed: Vec<TaskCard>,
    /// Cards surviving the filters, across all columns.
    pub visible_total: usize,
}

/// Error surfaced by an optimistic move.
#[derive(Debug)]
pub enum BoardMoveError<E> {
    /// Task id is not in the cached list.
    UnknownTask(TaskId),
    /// Persist operation failed; the cache was rolled back.
    Persist(E),
}

impl<E: Display> Display for BoardMoveError<E> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownTask(id) => write!(f, "task not on board: {id}"),
            Self::Persist(err) => write!(f, "move not persisted: {err}"),
        }
    }
}

impl<E: Error + 'static> Error for BoardMoveError<E> {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Persist(err) => Some(err),
            Self::UnknownTask(_) => None,
        }
    }
}

/// Board state: cached tasks plus the active filter and sort settings.
#[derive(Debug, Clone, Default)]
pub struct BoardState {
    tasks: Vec<Task>,
    pub filters: BoardFilters,
    pub sort: BoardSort,
}

impl BoardState {
    pub fn new(tasks: Vec<Task>) -> Self {
        Self {
            tasks,
            ..Self::default()
        }
    }

    /// Replaces the cached task list, keeping filters and sort.
    pub fn set_tasks(&mut self, tasks: Vec<Task>) {
        self.tasks = tasks;
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn clear_filters(&mut self) {
        self.filters = BoardFilters::default();
    }

    /// Renders the board: filter, sort, then group into columns.
    pub fn render(&self, today: NaiveDate) -> BoardView {
        let mut visible: Vec<&Task> = self
            .tasks
            .iter()
            .filter(|task| matches_filters(task, &self.filters))
            .collect();
        sort_tasks(&mut visible, self.sort);

        let mut view = BoardView {
            visible_total: visible.len(),
            ..BoardView::default()
        };
        for task in visible {
            let column = match task.status {
                TaskStatus::Pending => &mut view.pending,
                TaskStatus::InProgress => &mut view.in_progress,
                TaskStatus::Completed => &mut view.completed,
                TaskStatus::Cancelled => continue,
            };
            column.push(task_card(task, today));
        }
        view
    }

    /// Moves a task to a new status optimistically.
    ///
    /// The cache is updated first, then `persist` runs against the pre-move
    /// task. On success the cache entry is replaced with the persisted row;
    /// on failure it is rolled back.
    pub fn move_task<E>(
        &mut self,
        task_id: TaskId,
        new_status: TaskStatus,
        persist: impl FnOnce(&Task, TaskStatus) -> Result<Task, E>,
    ) -> Result<(), BoardMoveError<E>> {
        let index = self
            .tasks
            .iter()
            .position(|task| task.id == task_id)
            .ok_or(BoardMoveError::UnknownTask(task_id))?;

        let previous = self.tasks[index].clone();
        self.tasks[index].status = new_status;

        match persist(&previous, new_status) {
            Ok(persisted) => {
                self.tasks[index] = persisted;
                Ok(())
            }
            Err(err) => {
                self.tasks[index] = previous;
                Err(BoardMoveError::Persist(err))
            }
        }
    }
}

fn matches_filters(task: &Task, filters: &BoardFilters) -> bool {
    if let Some(priority) = filters.priority {
        if task.priority != priority {
            return false;
        }
    }
    if let Some(university) = filters.university {
        if task.university_id != Some(university) {
            return false;
        }
    }
    if !filters.search.is_empty() {
        let needle = filters.search.to_lowercase();
        let title_match = task.title.to_lowercase().contains(&needle);
        let desc_match = task
            .description
            .as_deref()
            .is_some_and(|text| text.to_lowercase().contains(&needle));
        if !title_match && !desc_match {
            return false;
        }
    }
    true
}

fn sort_tasks(tasks: &mut [&Task], sort: BoardSort) {
    tasks.sort_by(|a, b| {
        let ordering = match sort.key {
            SortKey::Created => a.created_at.cmp(&b.created_at),
            SortKey::Priority => a.priority.rank().cmp(&b.priority.rank()),
            // Missing due dates sort after every real date.
            SortKey::Due => a
                .due_date
                .unwrap_or(NaiveDate::MAX)
                .cmp(&b.due_date.unwrap_or(NaiveDate::MAX)),
            SortKey::Title => a.title.to_lowercase().cmp(&b.title.to_lowercase()),
        };
        match sort.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });
}

fn task_card(task: &Task, today: NaiveDate) -> TaskCard {
    TaskCard {
        id: task.id,
        title: task.title.clone(),
        priority: task.priority,
        due_date: task.due_date,
        due_label: task.due_date.map(|due| format_due_label(due, today)),
        overdue: task.is_overdue(today),
        university_id: task.university_id,
    }
}

/// Human label for a due date relative to `today`.
///
/// Past dates read "N days overdue", the next week reads relatively, anything
/// further out falls back to the ISO date.
pub fn format_due_label(due: NaiveDate, today: NaiveDate) -> String {
    let days = (due - today).num_days();
    match days {
        _ if days < 0 => format!("{} days overdue", -days),
        0 => "Due today".to_string(),
        1 => "Due tomorrow".to_string(),
        _ if days <= 7 => format!("Due in {days} days"),
        _ => due.format("%Y-%m-%d").to_string(),
    }
}
