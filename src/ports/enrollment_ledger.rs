//! Enrollment ledger port.
//!
//! # Uniqueness
//!
//! At most one enrollment exists per `(course_id, profile_id)`. `enroll` is
//! a single conditional write: it either inserts or reports the existing
//! entry, never overwrites.

use crate::domain::enrollment::{EnrollOutcome, Enrollment};
use crate::domain::foundation::{CourseId, DomainError, ProfileId};
use async_trait::async_trait;

#[async_trait]
pub trait EnrollmentLedger: Send + Sync {
    /// Insert the enrollment unless one already exists for the same course
    /// and profile.
    async fn enroll(&self, enrollment: &Enrollment) -> Result<EnrollOutcome, DomainError>;

    /// Delete the profile's enrollment. Returns false if there was none.
    async fn unenroll(&self, course_id: &CourseId, profile_id: &ProfileId)
        -> Result<bool, DomainError>;

    async fn find(
        &self,
        course_id: &CourseId,
        profile_id: &ProfileId,
    ) -> Result<Option<Enrollment>, DomainError>;

    /// Courses the profile is enrolled in.
    async fn enrolled_course_ids(&self, profile_id: &ProfileId)
        -> Result<Vec<CourseId>, DomainError>;

    /// Every enrollment of a course, oldest first.
    async fn list_for_course(&self, course_id: &CourseId) -> Result<Vec<Enrollment>, DomainError>;
}
