//! Entitlement-specific error types.
//!
//! # HTTP Status Mapping
//!
//! | Error | HTTP Status |
//! |-------|-------------|
//! | Unauthorized | 401 |
//! | NotFound | 404 |
//! | AlreadyEnrolled | 200 (reported as existing access) |
//! | Exhausted | 409 |
//! | NotFree | 402 |
//! | DependencyUnavailable | 503 |
//! | ValidationFailed | 400 |
//! | Infrastructure | 500 |

use crate::domain::foundation::{CourseId, DomainError, ErrorCode, ValidationError};

/// Entitlement errors surfaced to callers.
///
/// Store conflicts are reported as `AlreadyEnrolled` or `Exhausted`, never
/// as a raw consistency failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntitlementError {
    /// The caller's identity could not be established, or their role may
    /// not perform the operation.
    Unauthorized(String),

    /// The resource does not exist or is not visible to the caller.
    NotFound { resource: String, id: String },

    /// The caller already holds access to the course.
    AlreadyEnrolled,

    /// No redemptions or seats are left.
    Exhausted(String),

    /// Self-enrollment was attempted on a paid course.
    NotFree(CourseId),

    /// A collaborator (directory, roster, registry) could not be reached.
    DependencyUnavailable(String),

    /// Malformed input.
    ValidationFailed { field: String, message: String },

    /// Persistence failure.
    Infrastructure(String),
}

impl EntitlementError {
    pub fn unauthorized(reason: impl Into<String>) -> Self {
        EntitlementError::Unauthorized(reason.into())
    }

    pub fn not_found(resource: impl Into<String>, id: impl ToString) -> Self {
        EntitlementError::NotFound {
            resource: resource.into(),
            id: id.to_string(),
        }
    }

    pub fn course_not_found(course_id: CourseId) -> Self {
        Self::not_found("Course", course_id)
    }

    pub fn already_enrolled() -> Self {
        EntitlementError::AlreadyEnrolled
    }

    pub fn exhausted(reason: impl Into<String>) -> Self {
        EntitlementError::Exhausted(reason.into())
    }

    pub fn not_free(course_id: CourseId) -> Self {
        EntitlementError::NotFree(course_id)
    }

    pub fn dependency_unavailable(message: impl Into<String>) -> Self {
        EntitlementError::DependencyUnavailable(message.into())
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        EntitlementError::ValidationFailed {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn infrastructure(message: impl Into<String>) -> Self {
        EntitlementError::Infrastructure(message.into())
    }

    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            EntitlementError::Unauthorized(_) => ErrorCode::Unauthorized,
            EntitlementError::NotFound { resource, .. } => match resource.as_str() {
                "School" => ErrorCode::SchoolNotFound,
                "Availability" => ErrorCode::AvailabilityNotFound,
                "ActivationCode" => ErrorCode::ActivationCodeNotFound,
                _ => ErrorCode::CourseNotFound,
            },
            EntitlementError::AlreadyEnrolled => ErrorCode::EnrollmentExists,
            EntitlementError::Exhausted(_) => ErrorCode::ActivationCodeExhausted,
            EntitlementError::NotFree(_) => ErrorCode::CourseNotFree,
            EntitlementError::DependencyUnavailable(_) => ErrorCode::DirectoryUnavailable,
            EntitlementError::ValidationFailed { .. } => ErrorCode::ValidationFailed,
            EntitlementError::Infrastructure(_) => ErrorCode::DatabaseError,
        }
    }

    /// Returns a user-friendly error message.
    pub fn message(&self) -> String {
        match self {
            EntitlementError::Unauthorized(reason) => format!("Not authorized: {}", reason),
            EntitlementError::NotFound { resource, id } => {
                format!("{} not found: {}", resource, id)
            }
            EntitlementError::AlreadyEnrolled => "You already have access to this course".to_string(),
            EntitlementError::Exhausted(reason) => reason.clone(),
            EntitlementError::NotFree(id) => {
                format!("Course {} is paid and requires an activation code", id)
            }
            EntitlementError::DependencyUnavailable(msg) => {
                format!("A required service is unavailable: {}", msg)
            }
            EntitlementError::ValidationFailed { field, message } => {
                format!("Validation failed for '{}': {}", field, message)
            }
            EntitlementError::Infrastructure(msg) => format!("Error: {}", msg),
        }
    }

    /// Returns true if the caller may retry the same request later.
    pub fn is_retryable(&self) -> bool {
        matches!(self, EntitlementError::DependencyUnavailable(_))
    }
}

impl std::fmt::Display for EntitlementError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for EntitlementError {}

impl From<DomainError> for EntitlementError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::ValidationFailed | ErrorCode::ActivationCodeExists => {
                let field = err
                    .details
                    .get("field")
                    .cloned()
                    .unwrap_or_else(|| "unknown".to_string());
                EntitlementError::ValidationFailed {
                    field,
                    message: err.message,
                }
            }
            ErrorCode::CourseNotFound => EntitlementError::NotFound {
                resource: "Course".to_string(),
                id: err.details.get("id").cloned().unwrap_or_default(),
            },
            ErrorCode::SchoolNotFound => EntitlementError::NotFound {
                resource: "School".to_string(),
                id: err.details.get("id").cloned().unwrap_or_default(),
            },
            ErrorCode::AvailabilityNotFound => EntitlementError::NotFound {
                resource: "Availability".to_string(),
                id: err.details.get("id").cloned().unwrap_or_default(),
            },
            ErrorCode::ActivationCodeNotFound => EntitlementError::NotFound {
                resource: "ActivationCode".to_string(),
                id: err.details.get("id").cloned().unwrap_or_default(),
            },
            ErrorCode::EnrollmentExists => EntitlementError::AlreadyEnrolled,
            ErrorCode::ActivationCodeExhausted => EntitlementError::Exhausted(err.message),
            ErrorCode::Unauthorized => EntitlementError::Unauthorized(err.message),
            ErrorCode::DirectoryUnavailable => EntitlementError::DependencyUnavailable(err.message),
            ErrorCode::CourseNotFree | ErrorCode::DatabaseError | ErrorCode::InternalError => {
                EntitlementError::Infrastructure(err.to_string())
            }
        }
    }
}

impl From<ValidationError> for EntitlementError {
    fn from(err: ValidationError) -> Self {
        EntitlementError::ValidationFailed {
            field: err.field().to_string(),
            message: err.to_string(),
        }
    }
}

impl From<EntitlementError> for DomainError {
    fn from(err: EntitlementError) -> Self {
        DomainError::new(err.code(), err.message())
    }
}
