//! Helpers shared by the entitlement handlers.

use crate::domain::catalog::Course;
use crate::domain::entitlement::{EntitlementError, EntitlementEvent, UserContext};
use crate::domain::foundation::{EventEnvelope, SchoolId};
use crate::ports::{AvailabilityRegistry, EventPublisher, SchoolRegistry};

/// Returns true if `course` is visible to `ctx` under the catalog rules.
///
/// School-scoped courses are never visible outside their owning school,
/// whatever the assignment records say.
pub(crate) async fn course_visible(
    availability: &dyn AvailabilityRegistry,
    ctx: &UserContext,
    course: &Course,
) -> Result<bool, EntitlementError> {
    let Some(school_id) = ctx.school_id() else {
        return Ok(ctx.is_superadmin());
    };
    if !course.scope.permits_school(school_id) {
        return Ok(false);
    }

    let record = availability.find(&course.id, school_id).await?;
    Ok(record.map(|r| ctx.admits(&r)).unwrap_or(false))
}

/// Publishes an event for a committed write.
///
/// The write has already happened, so a delivery failure is logged rather
/// than turned into a request failure.
pub(crate) async fn publish(publisher: &dyn EventPublisher, event: &EntitlementEvent) {
    let envelope = EventEnvelope::from_event(event);
    let event_type = envelope.event_type.clone();
    if let Err(e) = publisher.publish(envelope).await {
        tracing::warn!(
            event_type = %event_type,
            course_id = %event.course_id,
            "Failed to publish event: {}",
            e
        );
    }
}

/// Fails with `NotFound` unless the school registry knows `school_id`.
pub(crate) async fn ensure_school_exists(
    registry: &dyn SchoolRegistry,
    school_id: &SchoolId,
) -> Result<(), EntitlementError> {
    let exists = registry.school_exists(school_id).await.map_err(|e| {
        tracing::warn!(school_id = %school_id, "School registry lookup failed: {}", e);
        EntitlementError::dependency_unavailable(e.to_string())
    })?;

    if exists {
        Ok(())
    } else {
        Err(EntitlementError::not_found("School", school_id))
    }
}
