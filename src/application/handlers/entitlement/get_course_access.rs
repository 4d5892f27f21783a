//! GetCourseAccessHandler - Query handler for a single course's access view.

use std::collections::HashSet;
use std::sync::Arc;

use crate::domain::entitlement::{resolve_catalog, CourseView, EntitlementError, UserContext};
use crate::domain::foundation::{CourseId, Timestamp};
use crate::ports::{AvailabilityRegistry, CourseRepository, EnrollmentLedger};

use super::support::course_visible;

/// Query for one course as seen by the caller.
#[derive(Debug, Clone)]
pub struct GetCourseAccessQuery {
    pub course_id: CourseId,
    pub ctx: UserContext,
}

/// Handler backing content delivery. Applies the catalog rules to one course.
pub struct GetCourseAccessHandler {
    courses: Arc<dyn CourseRepository>,
    availability: Arc<dyn AvailabilityRegistry>,
    ledger: Arc<dyn EnrollmentLedger>,
}

impl GetCourseAccessHandler {
    pub fn new(
        courses: Arc<dyn CourseRepository>,
        availability: Arc<dyn AvailabilityRegistry>,
        ledger: Arc<dyn EnrollmentLedger>,
    ) -> Self {
        Self {
            courses,
            availability,
            ledger,
        }
    }

    pub async fn handle(&self, query: GetCourseAccessQuery) -> Result<CourseView, EntitlementError> {
        let ctx = &query.ctx;
        let not_found = || EntitlementError::course_not_found(query.course_id);

        let course = self
            .courses
            .find_by_id(&query.course_id)
            .await?
            .ok_or_else(not_found)?;

        // An existing enrollment outlives a revoked assignment.
        let enrolled = match ctx.subject() {
            Some(subject) => self
                .ledger
                .find(&course.id, &subject.profile_id)
                .await?
                .is_some(),
            None => false,
        };

        if !enrolled && !course_visible(self.availability.as_ref(), ctx, &course).await? {
            return Err(not_found());
        }

        let holds = match ctx {
            UserContext::Admin { school_id } => self
                .availability
                .subscribed_course_ids(school_id, &Timestamp::now())
                .await?
                .contains(&course.id),
            UserContext::Superadmin => true,
            UserContext::Student { .. } | UserContext::Teacher { .. } => enrolled,
        };

        let entitled: HashSet<CourseId> = holds.then_some(course.id).into_iter().collect();
        let view = resolve_catalog(ctx, std::slice::from_ref(&course), &entitled)
            .into_iter()
            .next()
            .ok_or_else(not_found)?;

        tracing::debug!(
            course_id = %course.id,
            role = ?ctx.role(),
            enrolled = view.is_enrolled,
            "Resolved course access"
        );
        Ok(view)
    }
}
