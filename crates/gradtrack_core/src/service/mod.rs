//! Use-case service layer.
//!
//! # Responsibility
//! - Provide the application-facing API on top of repository traits.
//! - Own response envelope shapes (kanban groupings, deadline buckets,
//!   dashboard summaries) and the pure functions that derive them.
//!
//! # Invariants
//! - Services never touch SQL directly; all persistence goes through a
//!   repository trait so tests can substitute fakes.

pub mod dashboard_service;
pub mod deadline_service;
pub mod document_service;
pub mod task_service;
pub mod university_service;
