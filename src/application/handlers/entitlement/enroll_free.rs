//! EnrollFreeHandler - Command handler for self-enrollment into free courses.

use std::sync::Arc;

use crate::domain::entitlement::{EntitlementError, EntitlementEvent, UserContext};
use crate::domain::enrollment::{EnrollOutcome, Enrollment};
use crate::domain::foundation::CourseId;
use crate::ports::{AvailabilityRegistry, CourseRepository, EnrollmentLedger, EventPublisher};

use super::support::{course_visible, publish};

/// Command to enroll the caller into a free course.
#[derive(Debug, Clone)]
pub struct EnrollFreeCommand {
    pub course_id: CourseId,
    pub ctx: UserContext,
}

/// Handler for free self-enrollment.
pub struct EnrollFreeHandler {
    courses: Arc<dyn CourseRepository>,
    availability: Arc<dyn AvailabilityRegistry>,
    ledger: Arc<dyn EnrollmentLedger>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl EnrollFreeHandler {
    pub fn new(
        courses: Arc<dyn CourseRepository>,
        availability: Arc<dyn AvailabilityRegistry>,
        ledger: Arc<dyn EnrollmentLedger>,
        event_publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            courses,
            availability,
            ledger,
            event_publisher,
        }
    }

    pub async fn handle(&self, cmd: EnrollFreeCommand) -> Result<Enrollment, EntitlementError> {
        // 1. Only students and teachers hold enrollments
        let subject = cmd
            .ctx
            .subject()
            .ok_or_else(|| EntitlementError::unauthorized("only students and teachers can enroll"))?;

        // 2. Course must exist and be visible to the caller
        let course = self
            .courses
            .find_by_id(&cmd.course_id)
            .await?
            .ok_or_else(|| EntitlementError::course_not_found(cmd.course_id))?;

        if !course_visible(self.availability.as_ref(), &cmd.ctx, &course).await? {
            return Err(EntitlementError::course_not_found(cmd.course_id));
        }

        // 3. Paid courses go through activation codes
        if !course.is_free() {
            return Err(EntitlementError::not_free(course.id));
        }

        // 4. Single conditional write
        let enrollment = Enrollment::self_enrolled(course.id, &subject);
        match self.ledger.enroll(&enrollment).await? {
            EnrollOutcome::Enrolled(enrollment) => {
                tracing::info!(
                    course_id = %enrollment.course_id,
                    profile_id = %enrollment.profile_id,
                    school_id = %enrollment.school_id,
                    "Self-enrolled in free course"
                );
                publish(
                    self.event_publisher.as_ref(),
                    &EntitlementEvent::enrolled(&enrollment),
                )
                .await;
                Ok(enrollment)
            }
            EnrollOutcome::AlreadyEnrolled => Err(EntitlementError::already_enrolled()),
        }
    }
}
