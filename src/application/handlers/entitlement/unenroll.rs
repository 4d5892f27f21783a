//! UnenrollHandler - Command handler removing the caller's enrollment.

use std::sync::Arc;

use crate::domain::entitlement::{EntitlementError, EntitlementEvent, UserContext};
use crate::domain::foundation::CourseId;
use crate::ports::{EnrollmentLedger, EventPublisher};

use super::support::publish;

/// Command to drop the caller's enrollment in a course.
#[derive(Debug, Clone)]
pub struct UnenrollCommand {
    pub course_id: CourseId,
    pub ctx: UserContext,
}

/// Whether an enrollment was actually removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnenrollResult {
    pub removed: bool,
}

/// Handler for unenrollment. Removing a missing enrollment succeeds.
pub struct UnenrollHandler {
    ledger: Arc<dyn EnrollmentLedger>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl UnenrollHandler {
    pub fn new(ledger: Arc<dyn EnrollmentLedger>, event_publisher: Arc<dyn EventPublisher>) -> Self {
        Self {
            ledger,
            event_publisher,
        }
    }

    pub async fn handle(&self, cmd: UnenrollCommand) -> Result<UnenrollResult, EntitlementError> {
        let subject = cmd
            .ctx
            .subject()
            .ok_or_else(|| EntitlementError::unauthorized("only students and teachers can unenroll"))?;

        let removed = self.ledger.unenroll(&cmd.course_id, &subject.profile_id).await?;

        if removed {
            tracing::info!(
                course_id = %cmd.course_id,
                profile_id = %subject.profile_id,
                "Unenrolled"
            );
            publish(
                self.event_publisher.as_ref(),
                &EntitlementEvent::unenrolled(cmd.course_id, subject.profile_id),
            )
            .await;
        }

        Ok(UnenrollResult { removed })
    }
}
