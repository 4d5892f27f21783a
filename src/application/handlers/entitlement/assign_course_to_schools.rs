//! AssignCourseToSchoolsHandler - Command handler replacing a course's school set.

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::domain::availability::AssignmentDiff;
use crate::domain::entitlement::{EntitlementError, EntitlementEvent, UserContext};
use crate::domain::foundation::{CourseId, SchoolId};
use crate::ports::{AvailabilityRegistry, CourseRepository, EventPublisher, SchoolRegistry};

use super::support::{ensure_school_exists, publish};

/// Command to make a course available to exactly the given schools.
#[derive(Debug, Clone)]
pub struct AssignCourseToSchoolsCommand {
    pub course_id: CourseId,
    /// Desired set; duplicates collapse and an empty list un-assigns everywhere.
    pub school_ids: Vec<SchoolId>,
    pub ctx: UserContext,
}

/// Result of an assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignCourseToSchoolsResult {
    pub assigned_count: usize,
    pub diff: AssignmentDiff,
}

/// Handler for course-to-school assignment. Enrollments are left untouched.
pub struct AssignCourseToSchoolsHandler {
    courses: Arc<dyn CourseRepository>,
    availability: Arc<dyn AvailabilityRegistry>,
    schools: Arc<dyn SchoolRegistry>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl AssignCourseToSchoolsHandler {
    pub fn new(
        courses: Arc<dyn CourseRepository>,
        availability: Arc<dyn AvailabilityRegistry>,
        schools: Arc<dyn SchoolRegistry>,
        event_publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            courses,
            availability,
            schools,
            event_publisher,
        }
    }

    pub async fn handle(
        &self,
        cmd: AssignCourseToSchoolsCommand,
    ) -> Result<AssignCourseToSchoolsResult, EntitlementError> {
        if !cmd.ctx.is_superadmin() {
            return Err(EntitlementError::unauthorized("only superadmins can assign courses"));
        }

        let course = self
            .courses
            .find_by_id(&cmd.course_id)
            .await?
            .ok_or_else(|| EntitlementError::course_not_found(cmd.course_id))?;

        let desired: BTreeSet<SchoolId> = cmd.school_ids.into_iter().collect();

        for school_id in &desired {
            if !course.scope.permits_school(school_id) {
                return Err(EntitlementError::validation(
                    "school_ids",
                    format!("course is owned by another school than {}", school_id),
                ));
            }
            ensure_school_exists(self.schools.as_ref(), school_id).await?;
        }

        let diff = self.availability.sync_schools(&course.id, &desired).await?;

        tracing::info!(
            course_id = %course.id,
            added = diff.added.len(),
            removed = diff.removed.len(),
            assigned = diff.assigned_count(),
            "Course assignment synced"
        );

        if !diff.is_noop() {
            publish(
                self.event_publisher.as_ref(),
                &EntitlementEvent::course_assigned(course.id, &diff),
            )
            .await;
        }

        Ok(AssignCourseToSchoolsResult {
            assigned_count: diff.assigned_count(),
            diff,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::directory::InMemoryDirectory;
    use crate::application::handlers::entitlement::test_support::*;
    use crate::domain::catalog::{Course, CourseScope, Pricing};
    use crate::domain::enrollment::Enrollment;
    use crate::ports::EnrollmentLedger;

    fn directory() -> Arc<InMemoryDirectory> {
        Arc::new(
            InMemoryDirectory::new()
                .with_school(school("s-1"))
                .with_school(school("s-2"))
                .with_school(school("s-3")),
        )
    }

    fn handler(fx: &Fixture) -> AssignCourseToSchoolsHandler {
        AssignCourseToSchoolsHandler::new(fx.store.clone(), fx.store.clone(), directory(), fx.bus.clone())
    }

    fn assign(course_id: CourseId, schools: &[&str]) -> AssignCourseToSchoolsCommand {
        AssignCourseToSchoolsCommand {
            course_id,
            school_ids: schools.iter().map(|s| school(s)).collect(),
            ctx: UserContext::Superadmin,
        }
    }

    #[tokio::test]
    async fn assigns_distinct_schools() {
        let fx = Fixture::new();
        let course = fx.add_course(free_course("Art")).await;

        let result = handler(&fx)
            .handle(assign(course.id, &["s-1", "s-2", "s-1"]))
            .await
            .unwrap();

        assert_eq!(result.assigned_count, 2);
        assert_eq!(result.diff.added.len(), 2);
        assert!(fx.bus.has_event("course.assigned.v1"));
    }

    #[tokio::test]
    async fn resync_removes_dropped_schools_and_keeps_enrollments() {
        let fx = Fixture::new();
        let course = fx.add_course(free_course("Art")).await;
        let handler = handler(&fx);
        handler.handle(assign(course.id, &["s-1", "s-2"])).await.unwrap();

        let ctx = student("st-1", "s-1", None);
        fx.store
            .enroll(&Enrollment::self_enrolled(course.id, &ctx.subject().unwrap()))
            .await
            .unwrap();

        let result = handler.handle(assign(course.id, &[])).await.unwrap();

        assert_eq!(result.assigned_count, 0);
        assert_eq!(result.diff.removed.len(), 2);
        assert!(fx.store.records_for_school(&school("s-1")).await.unwrap().is_empty());
        assert_eq!(fx.store.enrollment_count().await, 1);
    }

    #[tokio::test]
    async fn unchanged_set_publishes_nothing() {
        let fx = Fixture::new();
        let course = fx.add_course(free_course("Art")).await;
        let handler = handler(&fx);
        handler.handle(assign(course.id, &["s-1"])).await.unwrap();
        fx.bus.clear();

        let result = handler.handle(assign(course.id, &["s-1"])).await.unwrap();

        assert_eq!(result.assigned_count, 1);
        assert_eq!(fx.bus.event_count(), 0);
    }

    #[tokio::test]
    async fn unknown_school_is_not_found_and_writes_nothing() {
        let fx = Fixture::new();
        let course = fx.add_course(free_course("Art")).await;

        let err = handler(&fx)
            .handle(assign(course.id, &["s-1", "s-404"]))
            .await
            .unwrap_err();

        assert!(matches!(err, EntitlementError::NotFound { ref resource, .. } if resource == "School"));
        assert!(fx.store.records_for_school(&school("s-1")).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn school_scoped_course_only_goes_to_owner() {
        let fx = Fixture::new();
        let course = fx
            .add_course(
                Course::new(
                    "Local History",
                    None,
                    CourseScope::School {
                        school_id: school("s-1"),
                    },
                    Pricing::Free,
                    None,
                    None,
                )
                .unwrap(),
            )
            .await;

        let err = handler(&fx)
            .handle(assign(course.id, &["s-2"]))
            .await
            .unwrap_err();

        assert!(matches!(err, EntitlementError::ValidationFailed { .. }));
    }

    #[tokio::test]
    async fn non_superadmin_is_rejected() {
        let fx = Fixture::new();
        let course = fx.add_course(free_course("Art")).await;
        let mut cmd = assign(course.id, &["s-1"]);
        cmd.ctx = admin("s-1");

        let err = handler(&fx).handle(cmd).await.unwrap_err();

        assert!(matches!(err, EntitlementError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn missing_course_is_not_found() {
        let fx = Fixture::new();

        let err = handler(&fx)
            .handle(assign(CourseId::new(), &["s-1"]))
            .await
            .unwrap_err();

        assert!(matches!(err, EntitlementError::NotFound { .. }));
    }
}
