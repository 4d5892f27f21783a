//! Activation code entity and the redemption decision.
//!
//! The decision is a pure function over a snapshot of the code, the course
//! and the ledger. Stores take that snapshot under their own lock or
//! transaction and apply the outcome atomically.

use crate::domain::catalog::Course;
use crate::domain::enrollment::{Enrollment, Subject};
use crate::domain::foundation::{ActivationCodeId, CourseId, SchoolId, Timestamp, ValidationError};
use serde::{Deserialize, Serialize};

use super::RedemptionCode;

/// Derived availability of a code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CodeStatus {
    Available,
    Exhausted,
}

/// A capacity-bounded code granting access to one paid course.
///
/// # Invariants
///
/// - `redeemed_count <= max_redemptions`
/// - `max_redemptions >= 1` and never above the course's seat cap
/// - only `redeemed_count` ever changes after creation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivationCode {
    pub id: ActivationCodeId,
    pub code: RedemptionCode,
    pub course_id: CourseId,

    /// Restricts redemption to one school's users.
    pub school_id: Option<SchoolId>,

    pub redeemed_count: u32,
    pub max_redemptions: u32,
    pub created_at: Timestamp,
}

/// Ledger facts read alongside the code when redeeming.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SeatUsage {
    /// Enrollments of the course granted by any activation code.
    pub code_granted: u32,
    /// Whether the redeeming profile already holds an enrollment.
    pub already_enrolled: bool,
}

/// Outcome of evaluating a redemption.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RedemptionOutcome {
    /// The code is consumed once and the enrollment must be written with it.
    Redeemed {
        enrollment: Enrollment,
        code: ActivationCode,
    },
    /// No code matches for this course and caller.
    NotFound,
    /// The code has no redemptions left.
    Exhausted { redeemed: u32, max: u32 },
    /// The course's seat cap is already consumed by code-granted enrollments.
    SeatCapReached { granted: u32, cap: u32 },
    /// The caller already holds access.
    AlreadyEnrolled,
}

impl ActivationCode {
    /// Creates a code for a course.
    ///
    /// Capacity defaults to the course's seat cap. A course without a cap
    /// requires an explicit capacity.
    pub fn new(
        code: RedemptionCode,
        course: &Course,
        school_id: Option<SchoolId>,
        max_redemptions: Option<u32>,
    ) -> Result<Self, ValidationError> {
        let capacity = max_redemptions
            .or(course.max_users_allowed)
            .ok_or_else(|| ValidationError::empty_field("max_redemptions"))?;

        let upper = course.max_users_allowed.unwrap_or(u32::MAX);
        if capacity == 0 || capacity > upper {
            return Err(ValidationError::out_of_range(
                "max_redemptions",
                1,
                upper as i64,
                capacity as i64,
            ));
        }

        if let (Some(owner), Some(school)) = (course.scope.owner(), school_id.as_ref()) {
            if owner != school {
                return Err(ValidationError::invalid_format(
                    "school_id",
                    "code school must own the course",
                ));
            }
        }

        Ok(Self {
            id: ActivationCodeId::new(),
            code,
            course_id: course.id,
            school_id,
            redeemed_count: 0,
            max_redemptions: capacity,
            created_at: Timestamp::now(),
        })
    }

    pub fn status(&self) -> CodeStatus {
        if self.redeemed_count < self.max_redemptions {
            CodeStatus::Available
        } else {
            CodeStatus::Exhausted
        }
    }

    pub fn remaining(&self) -> u32 {
        self.max_redemptions.saturating_sub(self.redeemed_count)
    }

    /// Returns true if the given school's users may use this code.
    pub fn usable_by(&self, school_id: &SchoolId) -> bool {
        match &self.school_id {
            None => true,
            Some(restricted) => restricted == school_id,
        }
    }

    /// Decides a redemption by `subject` against a consistent snapshot.
    pub fn redeem(&self, course: &Course, subject: &Subject, usage: SeatUsage) -> RedemptionOutcome {
        if self.course_id != course.id || !self.usable_by(&subject.school_id) {
            return RedemptionOutcome::NotFound;
        }

        if self.status() == CodeStatus::Exhausted {
            return RedemptionOutcome::Exhausted {
                redeemed: self.redeemed_count,
                max: self.max_redemptions,
            };
        }

        if let Some(cap) = course.max_users_allowed {
            if usage.code_granted >= cap {
                return RedemptionOutcome::SeatCapReached {
                    granted: usage.code_granted,
                    cap,
                };
            }
        }

        if usage.already_enrolled {
            return RedemptionOutcome::AlreadyEnrolled;
        }

        let mut code = self.clone();
        code.redeemed_count += 1;

        RedemptionOutcome::Redeemed {
            enrollment: Enrollment::via_code(course.id, subject, self.id),
            code,
        }
    }
}
