//! CreateActivationCodeHandler - Command handler issuing activation codes.

use std::sync::Arc;

use crate::domain::activation::{ActivationCode, RedemptionCode};
use crate::domain::entitlement::{EntitlementError, EntitlementEvent, UserContext};
use crate::domain::foundation::{CourseId, SchoolId};
use crate::ports::{ActivationCodeVault, CourseRepository, EventPublisher, SchoolRegistry};

use super::support::{ensure_school_exists, publish};

/// Command to issue a code for a course.
#[derive(Debug, Clone)]
pub struct CreateActivationCodeCommand {
    pub course_id: CourseId,
    /// Explicit code text; a random `XXXX-XXXX` code is generated when absent.
    pub code: Option<String>,
    pub school_id: Option<SchoolId>,
    /// Defaults to the course's seat cap.
    pub max_redemptions: Option<u32>,
    pub ctx: UserContext,
}

pub struct CreateActivationCodeHandler {
    courses: Arc<dyn CourseRepository>,
    vault: Arc<dyn ActivationCodeVault>,
    schools: Arc<dyn SchoolRegistry>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl CreateActivationCodeHandler {
    pub fn new(
        courses: Arc<dyn CourseRepository>,
        vault: Arc<dyn ActivationCodeVault>,
        schools: Arc<dyn SchoolRegistry>,
        event_publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            courses,
            vault,
            schools,
            event_publisher,
        }
    }

    pub async fn handle(
        &self,
        cmd: CreateActivationCodeCommand,
    ) -> Result<ActivationCode, EntitlementError> {
        if !cmd.ctx.is_superadmin() {
            return Err(EntitlementError::unauthorized("only superadmins can issue codes"));
        }

        let code = match cmd.code.as_deref() {
            Some(raw) => RedemptionCode::parse(raw)?,
            None => RedemptionCode::generate(),
        };

        let course = self
            .courses
            .find_by_id(&cmd.course_id)
            .await?
            .ok_or_else(|| EntitlementError::course_not_found(cmd.course_id))?;

        if let Some(school_id) = &cmd.school_id {
            ensure_school_exists(self.schools.as_ref(), school_id).await?;
        }

        let activation = ActivationCode::new(code, &course, cmd.school_id, cmd.max_redemptions)?;
        self.vault.create(&activation).await?;

        tracing::info!(
            course_id = %course.id,
            code_id = %activation.id,
            max = activation.max_redemptions,
            "Activation code created"
        );
        publish(
            self.event_publisher.as_ref(),
            &EntitlementEvent::code_created(&activation),
        )
        .await;

        Ok(activation)
    }
}
