//! Foundation module - Shared domain primitives.
//!
//! Contains identifiers, timestamps, event plumbing and error types
//! that form the vocabulary of the course entitlement domain.

mod errors;
mod events;
mod ids;
mod timestamp;

pub use errors::{DomainError, ErrorCode, ValidationError};
pub use events::{DomainEvent, EventEnvelope, EventId, EventMetadata};
pub use ids::{ActivationCodeId, ClassId, CourseId, EnrollmentId, ProfileId, SchoolId, UserId};
pub use timestamp::Timestamp;
