//! Availability records and assignment diffs.

use crate::domain::foundation::{ClassId, CourseId, SchoolId, Timestamp, ValidationError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::Audience;

/// Assignment of one course to one school.
///
/// # Invariants
///
/// - `(course_id, school_id)` is unique
/// - `target_class_id` is only set when `audience` includes students
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityRecord {
    pub course_id: CourseId,
    pub school_id: SchoolId,
    pub audience: Audience,
    pub target_class_id: Option<ClassId>,
    pub assigned_at: Timestamp,
}

impl AvailabilityRecord {
    /// Creates a fresh assignment visible to students and teachers.
    pub fn assign(course_id: CourseId, school_id: SchoolId) -> Self {
        Self {
            course_id,
            school_id,
            audience: Audience::Both,
            target_class_id: None,
            assigned_at: Timestamp::now(),
        }
    }

    /// Changes who the assignment targets.
    ///
    /// A class restriction only applies to students, so it is rejected for a
    /// teacher-only audience.
    pub fn retarget(
        &mut self,
        audience: Audience,
        target_class_id: Option<ClassId>,
    ) -> Result<(), ValidationError> {
        if target_class_id.is_some() && !audience.includes_students() {
            return Err(ValidationError::invalid_format(
                "target_class_id",
                "a class restriction requires an audience that includes students",
            ));
        }
        self.audience = audience;
        self.target_class_id = target_class_id;
        Ok(())
    }

    /// Returns true if a student in `class_id` matches this record.
    ///
    /// A student whose class is unknown only matches unrestricted records.
    pub fn admits_student(&self, class_id: Option<&ClassId>) -> bool {
        if !self.audience.includes_students() {
            return false;
        }
        match &self.target_class_id {
            None => true,
            Some(target) => class_id == Some(target),
        }
    }

    pub fn admits_teacher(&self) -> bool {
        self.audience.includes_teachers()
    }
}

/// Result of resyncing the set of schools a course is assigned to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentDiff {
    /// Schools that received a new record.
    pub added: Vec<SchoolId>,
    /// Schools whose record was deleted.
    pub removed: Vec<SchoolId>,
    /// Schools whose record was kept untouched.
    pub retained: Vec<SchoolId>,
}

impl AssignmentDiff {
    /// Computes the diff between the current and the desired school set.
    pub fn between(current: &[SchoolId], desired: &BTreeSet<SchoolId>) -> Self {
        let current: BTreeSet<&SchoolId> = current.iter().collect();

        let mut diff = AssignmentDiff::default();
        for school in desired {
            if current.contains(school) {
                diff.retained.push(school.clone());
            } else {
                diff.added.push(school.clone());
            }
        }
        for school in current {
            if !desired.contains(school) {
                diff.removed.push(school.clone());
            }
        }
        diff
    }

    /// Number of distinct schools the course is assigned to afterwards.
    pub fn assigned_count(&self) -> usize {
        self.added.len() + self.retained.len()
    }

    pub fn is_noop(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn school(id: &str) -> SchoolId {
        SchoolId::new(id).unwrap()
    }

    fn class(id: &str) -> ClassId {
        ClassId::new(id).unwrap()
    }

    #[test]
    fn assign_defaults_to_both_without_class() {
        let record = AvailabilityRecord::assign(CourseId::new(), school("s-1"));
        assert_eq!(record.audience, Audience::Both);
        assert!(record.target_class_id.is_none());
    }

    #[test]
    fn class_restricted_record_only_admits_that_class() {
        let mut record = AvailabilityRecord::assign(CourseId::new(), school("s-1"));
        record.retarget(Audience::Student, Some(class("C1"))).unwrap();

        assert!(record.admits_student(Some(&class("C1"))));
        assert!(!record.admits_student(Some(&class("C2"))));
        assert!(!record.admits_student(None));
        assert!(!record.admits_teacher());
    }

    #[test]
    fn unrestricted_record_admits_student_without_class() {
        let record = AvailabilityRecord::assign(CourseId::new(), school("s-1"));
        assert!(record.admits_student(None));
    }

    #[test]
    fn retarget_rejects_class_for_teacher_audience() {
        let mut record = AvailabilityRecord::assign(CourseId::new(), school("s-1"));
        let result = record.retarget(Audience::Teacher, Some(class("C1")));

        assert!(result.is_err());
        assert_eq!(record.audience, Audience::Both);
    }

    #[test]
    fn diff_splits_added_removed_retained() {
        let current = vec![school("a"), school("b")];
        let desired: BTreeSet<SchoolId> = [school("b"), school("c")].into_iter().collect();

        let diff = AssignmentDiff::between(&current, &desired);

        assert_eq!(diff.added, vec![school("c")]);
        assert_eq!(diff.removed, vec![school("a")]);
        assert_eq!(diff.retained, vec![school("b")]);
        assert_eq!(diff.assigned_count(), 2);
    }

    #[test]
    fn diff_to_empty_set_removes_everything() {
        let current = vec![school("a"), school("b")];
        let diff = AssignmentDiff::between(&current, &BTreeSet::new());

        assert_eq!(diff.removed.len(), 2);
        assert_eq!(diff.assigned_count(), 0);
    }

    #[test]
    fn identical_sets_are_noop() {
        let current = vec![school("a")];
        let desired: BTreeSet<SchoolId> = [school("a")].into_iter().collect();
        assert!(AssignmentDiff::between(&current, &desired).is_noop());
    }
}
