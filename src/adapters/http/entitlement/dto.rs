//! HTTP DTOs (Data Transfer Objects) for entitlement endpoints.
//!
//! Domain views that already serialize cleanly (`CourseView`, `Enrollment`,
//! `AvailabilityRecord`) are returned as-is; the rest get a wire shape here.

use serde::{Deserialize, Serialize};

use crate::domain::activation::{ActivationCode, CodeStatus};
use crate::domain::availability::{AssignmentDiff, Audience};
use crate::domain::catalog::Pricing;
use crate::domain::entitlement::CourseView;
use crate::domain::enrollment::Enrollment;
use crate::domain::foundation::{ClassId, SchoolId, Timestamp};

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Request to add a course to the catalog.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCourseRequest {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Owning school; absent for a global course.
    #[serde(default)]
    pub school_id: Option<SchoolId>,
    pub pricing: Pricing,
    #[serde(default)]
    pub max_users_allowed: Option<u32>,
    #[serde(default)]
    pub content_url: Option<String>,
}

/// Request to redeem an activation code.
#[derive(Debug, Clone, Deserialize)]
pub struct RedeemCodeRequest {
    pub code: String,
}

/// Request to replace the set of schools a course is assigned to.
#[derive(Debug, Clone, Deserialize)]
pub struct AssignSchoolsRequest {
    pub school_ids: Vec<SchoolId>,
}

/// Request to retarget one school's assignment.
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigureAvailabilityRequest {
    pub audience: Audience,
    #[serde(default)]
    pub target_class_id: Option<ClassId>,
}

/// Request to issue an activation code.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateActivationCodeRequest {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub school_id: Option<SchoolId>,
    #[serde(default)]
    pub max_redemptions: Option<u32>,
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// The caller's catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogResponse {
    pub courses: Vec<CourseView>,
}

/// Outcome of enrolling or redeeming.
///
/// An existing enrollment is reported as success with `already_enrolled`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrollmentResponse {
    pub already_enrolled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enrollment: Option<Enrollment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl EnrollmentResponse {
    pub fn granted(enrollment: Enrollment) -> Self {
        Self {
            already_enrolled: false,
            enrollment: Some(enrollment),
            message: None,
        }
    }

    pub fn already_enrolled(message: impl Into<String>) -> Self {
        Self {
            already_enrolled: true,
            enrollment: None,
            message: Some(message.into()),
        }
    }
}

/// Result of a school resync.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignSchoolsResponse {
    pub assigned_count: usize,
    pub added: Vec<SchoolId>,
    pub removed: Vec<SchoolId>,
}

impl From<AssignmentDiff> for AssignSchoolsResponse {
    fn from(diff: AssignmentDiff) -> Self {
        Self {
            assigned_count: diff.assigned_count(),
            added: diff.added,
            removed: diff.removed,
        }
    }
}

/// Audit listing of a course's enrollments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrollmentsResponse {
    pub enrollments: Vec<Enrollment>,
}

/// Activation code as shown to superadmins.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivationCodeResponse {
    pub id: String,
    pub code: String,
    pub course_id: String,
    pub school_id: Option<SchoolId>,
    pub redeemed_count: u32,
    pub max_redemptions: u32,
    pub remaining: u32,
    pub status: CodeStatus,
    pub created_at: Timestamp,
}

impl From<ActivationCode> for ActivationCodeResponse {
    fn from(code: ActivationCode) -> Self {
        Self {
            id: code.id.to_string(),
            code: code.code.as_str().to_string(),
            course_id: code.course_id.to_string(),
            remaining: code.remaining(),
            status: code.status(),
            school_id: code.school_id,
            redeemed_count: code.redeemed_count,
            max_redemptions: code.max_redemptions,
            created_at: code.created_at,
        }
    }
}

/// Standard error response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
}

impl ErrorResponse {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}
