//! Directory ports for identity, class membership and school lookup.
//!
//! The portal's user directory, class roster and school registry are owned
//! by other services. These ports are the only way this crate sees them.
//!
//! # Contract
//!
//! Implementations must:
//! - Return `DirectoryError::Unauthorized` for identities the directory rejects
//! - Return `DirectoryError::Unavailable` for transient failures
//! - Never retry internally; retry policy belongs to the caller

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::entitlement::Role;
use crate::domain::foundation::{ClassId, ProfileId, SchoolId, UserId};

/// Raw directory record for one user.
///
/// Fields a role does not use are absent rather than empty strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryEntry {
    pub role: Role,
    #[serde(default)]
    pub school_id: Option<SchoolId>,
    #[serde(default)]
    pub profile_id: Option<ProfileId>,
    #[serde(default)]
    pub class_id: Option<ClassId>,
}

/// Errors reported by directory collaborators.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DirectoryError {
    /// The identity is unknown or rejected.
    #[error("Identity rejected by directory")]
    Unauthorized,

    /// The collaborator could not be reached or timed out.
    #[error("Directory unavailable: {0}")]
    Unavailable(String),

    /// The collaborator answered with data that cannot be used.
    #[error("Malformed directory response: {0}")]
    Malformed(String),
}

impl DirectoryError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable(message.into())
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::Malformed(message.into())
    }
}

/// Resolves a raw user identity into role, school and profile.
#[async_trait]
pub trait DirectoryGateway: Send + Sync {
    async fn resolve_user_context(&self, user_id: &UserId) -> Result<DirectoryEntry, DirectoryError>;
}

/// Looks up the class a student belongs to.
#[async_trait]
pub trait ClassRoster: Send + Sync {
    /// Returns `None` when the student is not placed in any class.
    async fn student_class(&self, profile_id: &ProfileId) -> Result<Option<ClassId>, DirectoryError>;
}

/// Answers whether a school exists.
#[async_trait]
pub trait SchoolRegistry: Send + Sync {
    async fn school_exists(&self, school_id: &SchoolId) -> Result<bool, DirectoryError>;
}
