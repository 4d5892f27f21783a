//! Availability registry port.
//!
//! Per-school assignment records and school subscriptions.
//!
//! # Atomicity
//!
//! `sync_schools` replaces the whole school set of a course in one step.
//! Concurrent readers observe either the old or the new set.

use crate::domain::availability::{AssignmentDiff, AvailabilityRecord};
use crate::domain::foundation::{CourseId, DomainError, SchoolId, Timestamp};
use async_trait::async_trait;
use std::collections::BTreeSet;

#[async_trait]
pub trait AvailabilityRegistry: Send + Sync {
    /// All assignment records of one school.
    async fn records_for_school(
        &self,
        school_id: &SchoolId,
    ) -> Result<Vec<AvailabilityRecord>, DomainError>;

    /// The assignment record of one course at one school.
    async fn find(
        &self,
        course_id: &CourseId,
        school_id: &SchoolId,
    ) -> Result<Option<AvailabilityRecord>, DomainError>;

    /// Replaces the set of schools a course is assigned to.
    ///
    /// New schools get a record targeting everyone; kept schools keep their
    /// record; missing schools lose theirs.
    async fn sync_schools(
        &self,
        course_id: &CourseId,
        schools: &BTreeSet<SchoolId>,
    ) -> Result<AssignmentDiff, DomainError>;

    /// Overwrites the audience targeting of an existing record.
    ///
    /// # Errors
    ///
    /// - `AvailabilityNotFound` if the course is not assigned to the school
    async fn update_targeting(&self, record: &AvailabilityRecord) -> Result<(), DomainError>;

    /// Paid courses the school holds an active subscription to at `now`.
    async fn subscribed_course_ids(
        &self,
        school_id: &SchoolId,
        now: &Timestamp,
    ) -> Result<Vec<CourseId>, DomainError>;
}
