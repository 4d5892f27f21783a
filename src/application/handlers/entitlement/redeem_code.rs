//! RedeemCodeHandler - Command handler for activation code redemption.
//!
//! The store performs the lookup, capacity checks and the paired
//! counter/enrollment write as one atomic step; this handler only maps the
//! outcome and announces it.

use std::sync::Arc;

use crate::domain::activation::{RedemptionCode, RedemptionOutcome};
use crate::domain::entitlement::{EntitlementError, EntitlementEvent, UserContext};
use crate::domain::enrollment::Enrollment;
use crate::domain::foundation::CourseId;
use crate::ports::{ActivationCodeVault, EventPublisher};

use super::support::publish;

/// Command to redeem an activation code for a course.
#[derive(Debug, Clone)]
pub struct RedeemCodeCommand {
    pub course_id: CourseId,
    /// Raw code as typed by the user; normalized before lookup.
    pub code: String,
    pub ctx: UserContext,
}

/// Handler for activation code redemption.
pub struct RedeemCodeHandler {
    vault: Arc<dyn ActivationCodeVault>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl RedeemCodeHandler {
    pub fn new(vault: Arc<dyn ActivationCodeVault>, event_publisher: Arc<dyn EventPublisher>) -> Self {
        Self {
            vault,
            event_publisher,
        }
    }

    pub async fn handle(&self, cmd: RedeemCodeCommand) -> Result<Enrollment, EntitlementError> {
        let subject = cmd
            .ctx
            .subject()
            .ok_or_else(|| EntitlementError::unauthorized("only students and teachers can redeem codes"))?;

        let code = RedemptionCode::parse(&cmd.code)?;

        let outcome = self.vault.redeem(&code, &cmd.course_id, &subject).await?;

        match outcome {
            RedemptionOutcome::Redeemed { enrollment, code } => {
                tracing::info!(
                    course_id = %cmd.course_id,
                    profile_id = %enrollment.profile_id,
                    school_id = %enrollment.school_id,
                    redeemed = code.redeemed_count,
                    max = code.max_redemptions,
                    "Activation code redeemed"
                );
                publish(
                    self.event_publisher.as_ref(),
                    &EntitlementEvent::code_redeemed(&code, &enrollment),
                )
                .await;
                publish(
                    self.event_publisher.as_ref(),
                    &EntitlementEvent::enrolled(&enrollment),
                )
                .await;
                Ok(enrollment)
            }
            RedemptionOutcome::NotFound => {
                tracing::debug!(course_id = %cmd.course_id, "Activation code not found");
                Err(EntitlementError::not_found("ActivationCode", code))
            }
            RedemptionOutcome::Exhausted { redeemed, max } => {
                tracing::info!(course_id = %cmd.course_id, redeemed, max, "Activation code exhausted");
                Err(EntitlementError::exhausted(format!(
                    "Activation code has been fully used ({}/{})",
                    redeemed, max
                )))
            }
            RedemptionOutcome::SeatCapReached { granted, cap } => {
                tracing::info!(course_id = %cmd.course_id, granted, cap, "Course seat cap reached");
                Err(EntitlementError::exhausted(format!(
                    "All {} seats for this course are taken",
                    cap
                )))
            }
            RedemptionOutcome::AlreadyEnrolled => Err(EntitlementError::already_enrolled()),
        }
    }
}
