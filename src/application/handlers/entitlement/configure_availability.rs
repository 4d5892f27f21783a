//! ConfigureAvailabilityHandler - Command handler for audience targeting.

use std::sync::Arc;

use crate::domain::availability::{Audience, AvailabilityRecord};
use crate::domain::entitlement::{EntitlementError, EntitlementEvent, UserContext};
use crate::domain::foundation::{ClassId, CourseId, SchoolId};
use crate::ports::{AvailabilityRegistry, EventPublisher};

use super::support::publish;

/// Command to retarget an existing assignment.
#[derive(Debug, Clone)]
pub struct ConfigureAvailabilityCommand {
    pub course_id: CourseId,
    pub school_id: SchoolId,
    pub audience: Audience,
    pub target_class_id: Option<ClassId>,
    pub ctx: UserContext,
}

pub struct ConfigureAvailabilityHandler {
    availability: Arc<dyn AvailabilityRegistry>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl ConfigureAvailabilityHandler {
    pub fn new(
        availability: Arc<dyn AvailabilityRegistry>,
        event_publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            availability,
            event_publisher,
        }
    }

    pub async fn handle(
        &self,
        cmd: ConfigureAvailabilityCommand,
    ) -> Result<AvailabilityRecord, EntitlementError> {
        if !cmd.ctx.manages_school(&cmd.school_id) {
            return Err(EntitlementError::unauthorized(
                "only the school's admins can configure availability",
            ));
        }

        let mut record = self
            .availability
            .find(&cmd.course_id, &cmd.school_id)
            .await?
            .ok_or_else(|| {
                EntitlementError::not_found(
                    "Availability",
                    format!("{}/{}", cmd.course_id, cmd.school_id),
                )
            })?;

        record.retarget(cmd.audience, cmd.target_class_id)?;
        self.availability.update_targeting(&record).await?;

        tracing::info!(
            course_id = %record.course_id,
            school_id = %record.school_id,
            audience = record.audience.as_str(),
            class_id = ?record.target_class_id,
            "Availability retargeted"
        );
        publish(
            self.event_publisher.as_ref(),
            &EntitlementEvent::availability_configured(&record),
        )
        .await;

        Ok(record)
    }
}
