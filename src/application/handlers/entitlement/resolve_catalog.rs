//! ResolveCatalogHandler - Query handler listing the courses a user sees.

use std::collections::HashSet;
use std::sync::Arc;

use crate::domain::entitlement::{
    resolve_catalog, visible_course_ids, CourseView, EntitlementError, UserContext,
};
use crate::domain::foundation::{CourseId, DomainError, Timestamp};
use crate::ports::{AvailabilityRegistry, CourseRepository, EnrollmentLedger};

/// Query for the caller's annotated catalog.
#[derive(Debug, Clone)]
pub struct ResolveCatalogQuery {
    pub ctx: UserContext,
}

/// Handler for catalog resolution.
pub struct ResolveCatalogHandler {
    courses: Arc<dyn CourseRepository>,
    availability: Arc<dyn AvailabilityRegistry>,
    ledger: Arc<dyn EnrollmentLedger>,
}

impl ResolveCatalogHandler {
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

    pub async fn handle(&self, query: ResolveCatalogQuery) -> Result<Vec<CourseView>, EntitlementError> {
        let ctx = &query.ctx;

        let Some(school_id) = ctx.school_id() else {
            let courses = self.courses.list_all().await?;
            return Ok(resolve_catalog(ctx, &courses, &HashSet::new()));
        };

        let records = self.availability.records_for_school(school_id).await?;
        let ids = visible_course_ids(ctx, &records);
        if ids.is_empty() {
            tracing::debug!(school_id = %school_id, role = ?ctx.role(), "No visible courses");
            return Ok(Vec::new());
        }

        let (courses, entitled) =
            futures::try_join!(self.courses.find_many(&ids), self.entitled_course_ids(ctx))?;

        let views = resolve_catalog(ctx, &courses, &entitled);
        tracing::debug!(
            school_id = %school_id,
            role = ?ctx.role(),
            visible = views.len(),
            "Resolved catalog"
        );
        Ok(views)
    }

    /// Courses the caller holds: enrollments for students and teachers,
    /// active subscriptions for admins.
    async fn entitled_course_ids(&self, ctx: &UserContext) -> Result<HashSet<CourseId>, DomainError> {
        let ids = match ctx {
            UserContext::Student { profile_id, .. } | UserContext::Teacher { profile_id, .. } => {
                self.ledger.enrolled_course_ids(profile_id).await?
            }
            UserContext::Admin { school_id } => {
                self.availability
                    .subscribed_course_ids(school_id, &Timestamp::now())
                    .await?
            }
            UserContext::Superadmin => Vec::new(),
        };
        Ok(ids.into_iter().collect())
    }
}
