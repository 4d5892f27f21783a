//! Resolved user context.
//!
//! A tagged union over the roles the portal knows about. Each variant has
//! its own audience rule; there is no shared branching on role strings.

use crate::domain::availability::AvailabilityRecord;
use crate::domain::enrollment::{Subject, SubjectKind};
use crate::domain::foundation::{ClassId, ProfileId, SchoolId};
use serde::{Deserialize, Serialize};

/// Portal role as reported by the directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Teacher,
    Admin,
    Superadmin,
}

/// Who is asking, as far as entitlement decisions are concerned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum UserContext {
    Student {
        school_id: SchoolId,
        profile_id: ProfileId,
        class_id: Option<ClassId>,
    },
    Teacher {
        school_id: SchoolId,
        profile_id: ProfileId,
    },
    Admin {
        school_id: SchoolId,
    },
    Superadmin,
}

impl UserContext {
    pub fn role(&self) -> Role {
        match self {
            UserContext::Student { .. } => Role::Student,
            UserContext::Teacher { .. } => Role::Teacher,
            UserContext::Admin { .. } => Role::Admin,
            UserContext::Superadmin => Role::Superadmin,
        }
    }

    /// School the user belongs to. Superadmins belong to none.
    pub fn school_id(&self) -> Option<&SchoolId> {
        match self {
            UserContext::Student { school_id, .. }
            | UserContext::Teacher { school_id, .. }
            | UserContext::Admin { school_id } => Some(school_id),
            UserContext::Superadmin => None,
        }
    }

    pub fn profile_id(&self) -> Option<&ProfileId> {
        match self {
            UserContext::Student { profile_id, .. } | UserContext::Teacher { profile_id, .. } => {
                Some(profile_id)
            }
            UserContext::Admin { .. } | UserContext::Superadmin => None,
        }
    }

    pub fn is_superadmin(&self) -> bool {
        matches!(self, UserContext::Superadmin)
    }

    /// The ledger subject for students and teachers.
    pub fn subject(&self) -> Option<Subject> {
        match self {
            UserContext::Student {
                school_id,
                profile_id,
                ..
            } => Some(Subject {
                kind: SubjectKind::Student,
                profile_id: profile_id.clone(),
                school_id: school_id.clone(),
            }),
            UserContext::Teacher {
                school_id,
                profile_id,
            } => Some(Subject {
                kind: SubjectKind::Teacher,
                profile_id: profile_id.clone(),
                school_id: school_id.clone(),
            }),
            UserContext::Admin { .. } | UserContext::Superadmin => None,
        }
    }

    /// Returns true if this user may manage assignments of `school_id`.
    pub fn manages_school(&self, school_id: &SchoolId) -> bool {
        match self {
            UserContext::Superadmin => true,
            UserContext::Admin { school_id: own } => own == school_id,
            UserContext::Student { .. } | UserContext::Teacher { .. } => false,
        }
    }

    /// Returns true if `record` makes its course visible to this user.
    pub fn admits(&self, record: &AvailabilityRecord) -> bool {
        match self {
            UserContext::Superadmin => true,
            UserContext::Admin { school_id } => admin_admits(school_id, record),
            UserContext::Teacher { school_id, .. } => teacher_admits(school_id, record),
            UserContext::Student {
                school_id,
                class_id,
                ..
            } => student_admits(school_id, class_id.as_ref(), record),
        }
    }
}

fn admin_admits(school_id: &SchoolId, record: &AvailabilityRecord) -> bool {
    &record.school_id == school_id
}

fn teacher_admits(school_id: &SchoolId, record: &AvailabilityRecord) -> bool {
    &record.school_id == school_id && record.admits_teacher()
}

fn student_admits(
    school_id: &SchoolId,
    class_id: Option<&ClassId>,
    record: &AvailabilityRecord,
) -> bool {
    &record.school_id == school_id && record.admits_student(class_id)
}
