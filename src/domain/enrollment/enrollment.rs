//! Enrollment entity.
//!
//! # Invariants
//!
//! - At most one enrollment per `(course_id, profile_id)`
//! - An existing enrollment is never overwritten, only deleted by unenroll

use crate::domain::foundation::{
    ActivationCodeId, CourseId, EnrollmentId, ProfileId, SchoolId, Timestamp,
};
use serde::{Deserialize, Serialize};

/// Kind of profile an enrollment belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubjectKind {
    Student,
    Teacher,
}

impl SubjectKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubjectKind::Student => "student",
            SubjectKind::Teacher => "teacher",
        }
    }
}

/// How an enrollment came to exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EnrollmentSource {
    SelfEnrolled,
    ActivationCode { code_id: ActivationCodeId },
}

impl EnrollmentSource {
    /// Returns true if the seat was granted by an activation code.
    pub fn is_code_granted(&self) -> bool {
        matches!(self, EnrollmentSource::ActivationCode { .. })
    }

    pub fn code_id(&self) -> Option<ActivationCodeId> {
        match self {
            EnrollmentSource::SelfEnrolled => None,
            EnrollmentSource::ActivationCode { code_id } => Some(*code_id),
        }
    }
}

/// The student or teacher profile acting on the ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subject {
    pub kind: SubjectKind,
    pub profile_id: ProfileId,
    pub school_id: SchoolId,
}

/// A ledger entry granting a profile access to a course.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enrollment {
    pub id: EnrollmentId,
    pub course_id: CourseId,
    pub profile_id: ProfileId,
    pub subject_kind: SubjectKind,
    pub school_id: SchoolId,
    pub source: EnrollmentSource,
    pub enrolled_at: Timestamp,
}

impl Enrollment {
    /// Creates a self-service enrollment into a free course.
    pub fn self_enrolled(course_id: CourseId, subject: &Subject) -> Self {
        Self::for_subject(course_id, subject, EnrollmentSource::SelfEnrolled)
    }

    /// Creates an enrollment granted by an activation code.
    pub fn via_code(course_id: CourseId, subject: &Subject, code_id: ActivationCodeId) -> Self {
        Self::for_subject(
            course_id,
            subject,
            EnrollmentSource::ActivationCode { code_id },
        )
    }

    fn for_subject(course_id: CourseId, subject: &Subject, source: EnrollmentSource) -> Self {
        Self {
            id: EnrollmentId::new(),
            course_id,
            profile_id: subject.profile_id.clone(),
            subject_kind: subject.kind,
            school_id: subject.school_id.clone(),
            source,
            enrolled_at: Timestamp::now(),
        }
    }
}

/// Result of a conditional enrollment write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnrollOutcome {
    /// The enrollment was written.
    Enrolled(Enrollment),
    /// An enrollment for the same course and profile already existed.
    AlreadyEnrolled,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn student() -> Subject {
        Subject {
            kind: SubjectKind::Student,
            profile_id: ProfileId::new("stu-1").unwrap(),
            school_id: SchoolId::new("s-1").unwrap(),
        }
    }

    #[test]
    fn self_enrolled_copies_subject() {
        let course_id = CourseId::new();
        let enrollment = Enrollment::self_enrolled(course_id, &student());

        assert_eq!(enrollment.course_id, course_id);
        assert_eq!(enrollment.profile_id.as_str(), "stu-1");
        assert_eq!(enrollment.subject_kind, SubjectKind::Student);
        assert!(!enrollment.source.is_code_granted());
    }

    #[test]
    fn via_code_records_code_id() {
        let code_id = ActivationCodeId::new();
        let enrollment = Enrollment::via_code(CourseId::new(), &student(), code_id);

        assert!(enrollment.source.is_code_granted());
        assert_eq!(enrollment.source.code_id(), Some(code_id));
    }

    #[test]
    fn source_serializes_with_kind_tag() {
        let json = serde_json::to_value(EnrollmentSource::SelfEnrolled).unwrap();
        assert_eq!(json["kind"], "self_enrolled");
    }
}
