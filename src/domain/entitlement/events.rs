//! Entitlement domain events.
//!
//! Emitted after a write has been committed. Events are named in past tense.

use crate::domain::activation::ActivationCode;
use crate::domain::availability::{AssignmentDiff, Audience, AvailabilityRecord};
use crate::domain::enrollment::{Enrollment, EnrollmentSource};
use crate::domain::foundation::{
    ActivationCodeId, ClassId, CourseId, DomainEvent, EventId, ProfileId, SchoolId, Timestamp,
};
use serde::{Deserialize, Serialize};

/// An entitlement change concerning one course.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntitlementEvent {
    pub event_id: EventId,
    pub course_id: CourseId,
    pub occurred_at: Timestamp,
    #[serde(flatten)]
    pub change: EntitlementChange,
}

/// What changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "change", rename_all = "snake_case")]
pub enum EntitlementChange {
    Enrolled {
        profile_id: ProfileId,
        school_id: SchoolId,
        source: EnrollmentSource,
    },
    Unenrolled {
        profile_id: ProfileId,
    },
    CodeRedeemed {
        code_id: ActivationCodeId,
        profile_id: ProfileId,
        redeemed_count: u32,
        max_redemptions: u32,
    },
    CodeCreated {
        code_id: ActivationCodeId,
        school_id: Option<SchoolId>,
        max_redemptions: u32,
    },
    CourseAssigned {
        added: Vec<SchoolId>,
        removed: Vec<SchoolId>,
        assigned_count: usize,
    },
    AvailabilityConfigured {
        school_id: SchoolId,
        audience: Audience,
        target_class_id: Option<ClassId>,
    },
}

impl EntitlementEvent {
    fn new(course_id: CourseId, change: EntitlementChange) -> Self {
        Self {
            event_id: EventId::new(),
            course_id,
            occurred_at: Timestamp::now(),
            change,
        }
    }

    pub fn enrolled(enrollment: &Enrollment) -> Self {
        Self::new(
            enrollment.course_id,
            EntitlementChange::Enrolled {
                profile_id: enrollment.profile_id.clone(),
                school_id: enrollment.school_id.clone(),
                source: enrollment.source,
            },
        )
    }

    pub fn unenrolled(course_id: CourseId, profile_id: ProfileId) -> Self {
        Self::new(course_id, EntitlementChange::Unenrolled { profile_id })
    }

    pub fn code_redeemed(code: &ActivationCode, enrollment: &Enrollment) -> Self {
        Self::new(
            code.course_id,
            EntitlementChange::CodeRedeemed {
                code_id: code.id,
                profile_id: enrollment.profile_id.clone(),
                redeemed_count: code.redeemed_count,
                max_redemptions: code.max_redemptions,
            },
        )
    }

    pub fn code_created(code: &ActivationCode) -> Self {
        Self::new(
            code.course_id,
            EntitlementChange::CodeCreated {
                code_id: code.id,
                school_id: code.school_id.clone(),
                max_redemptions: code.max_redemptions,
            },
        )
    }

    pub fn course_assigned(course_id: CourseId, diff: &AssignmentDiff) -> Self {
        Self::new(
            course_id,
            EntitlementChange::CourseAssigned {
                added: diff.added.clone(),
                removed: diff.removed.clone(),
                assigned_count: diff.assigned_count(),
            },
        )
    }

    pub fn availability_configured(record: &AvailabilityRecord) -> Self {
        Self::new(
            record.course_id,
            EntitlementChange::AvailabilityConfigured {
                school_id: record.school_id.clone(),
                audience: record.audience,
                target_class_id: record.target_class_id.clone(),
            },
        )
    }
}

impl DomainEvent for EntitlementEvent {
    fn event_type(&self) -> &'static str {
        match self.change {
            EntitlementChange::Enrolled { .. } => "enrollment.created.v1",
            EntitlementChange::Unenrolled { .. } => "enrollment.deleted.v1",
            EntitlementChange::CodeRedeemed { .. } => "activation_code.redeemed.v1",
            EntitlementChange::CodeCreated { .. } => "activation_code.created.v1",
            EntitlementChange::CourseAssigned { .. } => "course.assigned.v1",
            EntitlementChange::AvailabilityConfigured { .. } => "availability.configured.v1",
        }
    }

    fn aggregate_id(&self) -> String {
        self.course_id.to_string()
    }

    fn aggregate_type(&self) -> &'static str {
        "Course"
    }

    fn occurred_at(&self) -> Timestamp {
        self.occurred_at
    }

    fn event_id(&self) -> EventId {
        self.event_id.clone()
    }
}
