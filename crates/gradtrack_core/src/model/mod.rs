//! Domain model for the application tracker.
//!
//! # Responsibility
//! - Define the canonical entities (university, task, document, deadline) and
//!   their owning-user scoping.
//! - Define create/patch input shapes and their field-level validation.
//!
//! # Invariants
//! - Every entity row is exclusively owned by one `UserId`.
//! - A task's `completed_at` is non-null iff its status is `Completed`.

pub mod deadline;
pub mod document;
pub mod task;
pub mod university;
pub mod user;
pub mod validation;
