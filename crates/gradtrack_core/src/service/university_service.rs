//! University use-case service.
//!
//! Thin facade over the repository; universities have no derived envelope.

use crate::model::university::{
    NewUniversity, University, UniversityId, UniversityPatch,
};
use crate::model::user::UserId;
use crate::repo::university_repo::{UniversityListFilter, UniversityRepository};
use crate::repo::RepoResult;

/// University service facade over repository implementations.
pub struct UniversityService<R: UniversityRepository> {
    repo: R,
}

impl<R: UniversityRepository> UniversityService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn create_university(
        &self,
        user_id: UserId,
        new: &NewUniversity,
    ) -> RepoResult<University> {
        self.repo.create(user_id, new)
    }

    pub fn get_university(
        &self,
        user_id: UserId,
        id: UniversityId,
    ) -> RepoResult<Option<University>> {
        self.repo.get(user_id, id)
    }

    /// Lists universities newest first, optionally filtered by status and
    /// category.
    pub fn list_universities(
        &self,
        user_id: UserId,
        filter: &UniversityListFilter,
    ) -> RepoResult<Vec<University>> {
        self.repo.list(user_id, filter)
    }

    pub fn update_university(
        &self,
        user_id: UserId,
        id: UniversityId,
        patch: &UniversityPatch,
    ) -> RepoResult<University> {
        self.repo.update(user_id, id, patch)
    }

    pub fn delete_university(&self, user_id: UserId, id: UniversityId) -> RepoResult<()> {
        self.repo.delete(user_id, id)
    }
}
