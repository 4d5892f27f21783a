//! ListCourseEnrollmentsHandler - Superadmin audit listing of a course's ledger.

use std::sync::Arc;

use crate::domain::entitlement::{EntitlementError, UserContext};
use crate::domain::enrollment::Enrollment;
use crate::domain::foundation::CourseId;
use crate::ports::{CourseRepository, EnrollmentLedger};

#[derive(Debug, Clone)]
pub struct ListCourseEnrollmentsQuery {
    pub course_id: CourseId,
    pub ctx: UserContext,
}

pub struct ListCourseEnrollmentsHandler {
    courses: Arc<dyn CourseRepository>,
    ledger: Arc<dyn EnrollmentLedger>,
}

impl ListCourseEnrollmentsHandler {
    pub fn new(courses: Arc<dyn CourseRepository>, ledger: Arc<dyn EnrollmentLedger>) -> Self {
        Self { courses, ledger }
    }

    pub async fn handle(
        &self,
        query: ListCourseEnrollmentsQuery,
    ) -> Result<Vec<Enrollment>, EntitlementError> {
        if !query.ctx.is_superadmin() {
            return Err(EntitlementError::unauthorized("only superadmins can audit enrollments"));
        }

        if self.courses.find_by_id(&query.course_id).await?.is_none() {
            return Err(EntitlementError::course_not_found(query.course_id));
        }

        Ok(self.ledger.list_for_course(&query.course_id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::entitlement::test_support::*;

    #[tokio::test]
    async fn lists_every_enrollment_of_the_course() {
        let fx = Fixture::new();
        let course = fx.add_course(free_course("Art")).await;
        for profile in ["st-1", "st-2"] {
            let subject = student(profile, "s-1", None).subject().unwrap();
            fx.store
                .enroll(&Enrollment::self_enrolled(course.id, &subject))
                .await
                .unwrap();
        }
        let handler = ListCourseEnrollmentsHandler::new(fx.store.clone(), fx.store.clone());

        let listed = handler
            .handle(ListCourseEnrollmentsQuery {
                course_id: course.id,
                ctx: UserContext::Superadmin,
            })
            .await
            .unwrap();

        assert_eq!(listed.len(), 2);
    }

    #[tokio::test]
    async fn admins_cannot_audit() {
        let fx = Fixture::new();
        let course = fx.add_course(free_course("Art")).await;
        let handler = ListCourseEnrollmentsHandler::new(fx.store.clone(), fx.store.clone());

        let err = handler
            .handle(ListCourseEnrollmentsQuery {
                course_id: course.id,
                ctx: admin("s-1"),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, EntitlementError::Unauthorized(_)));
    }
}
