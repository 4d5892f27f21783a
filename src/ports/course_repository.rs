//! Course repository port.
//!
//! Read and write access to the course catalog.

use crate::domain::catalog::Course;
use crate::domain::foundation::{CourseId, DomainError};
use async_trait::async_trait;

#[async_trait]
pub trait CourseRepository: Send + Sync {
    /// Save a new course.
    ///
    /// # Errors
    ///
    /// - `DatabaseError` on persistence failure
    async fn save(&self, course: &Course) -> Result<(), DomainError>;

    /// Find a course by its ID.
    ///
    /// Returns `None` if not found.
    async fn find_by_id(&self, id: &CourseId) -> Result<Option<Course>, DomainError>;

    /// Load every listed course that exists. Unknown ids are skipped.
    async fn find_many(&self, ids: &[CourseId]) -> Result<Vec<Course>, DomainError>;

    /// Load the whole catalog.
    async fn list_all(&self) -> Result<Vec<Course>, DomainError>;
}
