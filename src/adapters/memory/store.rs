//! In-memory entitlement store.
//!
//! Every port call takes the one lock for its whole duration, so each call
//! is atomic with respect to every other call on the same store.

use async_trait::async_trait;
use std::collections::{BTreeSet, HashMap};
use tokio::sync::RwLock;

use crate::domain::activation::{ActivationCode, RedemptionCode, RedemptionOutcome, SeatUsage};
use crate::domain::availability::{
    AssignmentDiff, Audience, AvailabilityRecord, SchoolSubscription,
};
use crate::domain::catalog::Course;
use crate::domain::enrollment::{EnrollOutcome, Enrollment, Subject};
use crate::domain::foundation::{
    CourseId, DomainError, ErrorCode, ProfileId, SchoolId, Timestamp,
};
use crate::ports::{ActivationCodeVault, AvailabilityRegistry, CourseRepository, EnrollmentLedger};

#[derive(Default)]
struct StoreState {
    courses: HashMap<CourseId, Course>,
    availability: HashMap<(CourseId, SchoolId), AvailabilityRecord>,
    subscriptions: Vec<SchoolSubscription>,
    enrollments: HashMap<(CourseId, ProfileId), Enrollment>,
    codes: HashMap<String, ActivationCode>,
}

impl StoreState {
    fn code_granted_seats(&self, course_id: &CourseId) -> u32 {
        let count = self
            .enrollments
            .values()
            .filter(|e| &e.course_id == course_id && e.source.is_code_granted())
            .count();
        u32::try_from(count).unwrap_or(u32::MAX)
    }
}

/// Store for courses, availability, enrollments and activation codes.
#[derive(Default)]
pub struct InMemoryEntitlementStore {
    state: RwLock<StoreState>,
}

impl InMemoryEntitlementStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a school subscription, as the billing side would.
    pub async fn record_subscription(&self, subscription: SchoolSubscription) {
        let mut state = self.state.write().await;
        state.subscriptions.retain(|s| {
            !(s.school_id == subscription.school_id && s.course_id == subscription.course_id)
        });
        state.subscriptions.push(subscription);
    }

    pub async fn enrollment_count(&self) -> usize {
        self.state.read().await.enrollments.len()
    }
}

#[async_trait]
impl CourseRepository for InMemoryEntitlementStore {
    async fn save(&self, course: &Course) -> Result<(), DomainError> {
        let mut state = self.state.write().await;
        if state.courses.contains_key(&course.id) {
            return Err(DomainError::database(format!(
                "Course {} already exists",
                course.id
            )));
        }
        state.courses.insert(course.id, course.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &CourseId) -> Result<Option<Course>, DomainError> {
        Ok(self.state.read().await.courses.get(id).cloned())
    }

    async fn find_many(&self, ids: &[CourseId]) -> Result<Vec<Course>, DomainError> {
        let state = self.state.read().await;
        Ok(ids
            .iter()
            .filter_map(|id| state.courses.get(id).cloned())
            .collect())
    }

    async fn list_all(&self) -> Result<Vec<Course>, DomainError> {
        Ok(self.state.read().await.courses.values().cloned().collect())
    }
}

#[async_trait]
impl AvailabilityRegistry for InMemoryEntitlementStore {
    async fn records_for_school(
        &self,
        school_id: &SchoolId,
    ) -> Result<Vec<AvailabilityRecord>, DomainError> {
        let state = self.state.read().await;
        let mut records: Vec<AvailabilityRecord> = state
            .availability
            .values()
            .filter(|r| &r.school_id == school_id)
            .cloned()
            .collect();
        records.sort_by(|a, b| a.assigned_at.cmp(&b.assigned_at));
        Ok(records)
    }

    async fn find(
        &self,
        course_id: &CourseId,
        school_id: &SchoolId,
    ) -> Result<Option<AvailabilityRecord>, DomainError> {
        let state = self.state.read().await;
        Ok(state
            .availability
            .get(&(*course_id, school_id.clone()))
            .cloned())
    }

    async fn sync_schools(
        &self,
        course_id: &CourseId,
        schools: &BTreeSet<SchoolId>,
    ) -> Result<AssignmentDiff, DomainError> {
        let mut state = self.state.write().await;

        let current: Vec<SchoolId> = state
            .availability
            .keys()
            .filter(|(c, _)| c == course_id)
            .map(|(_, s)| s.clone())
            .collect();
        let diff = AssignmentDiff::between(&current, schools);

        for school in &diff.removed {
            state.availability.remove(&(*course_id, school.clone()));
        }
        for school in &diff.added {
            state.availability.insert(
                (*course_id, school.clone()),
                AvailabilityRecord::assign(*course_id, school.clone()),
            );
        }
        // A resync replaces the assignment, so retained schools lose their targeting.
        for school in &diff.retained {
            if let Some(record) = state.availability.get_mut(&(*course_id, school.clone())) {
                record.audience = Audience::Both;
                record.target_class_id = None;
            }
        }
        Ok(diff)
    }

    async fn update_targeting(&self, record: &AvailabilityRecord) -> Result<(), DomainError> {
        let mut state = self.state.write().await;
        match state
            .availability
            .get_mut(&(record.course_id, record.school_id.clone()))
        {
            Some(existing) => {
                existing.audience = record.audience;
                existing.target_class_id = record.target_class_id.clone();
                Ok(())
            }
            None => Err(DomainError::new(
                ErrorCode::AvailabilityNotFound,
                format!(
                    "Course {} is not assigned to school {}",
                    record.course_id, record.school_id
                ),
            )),
        }
    }

    async fn subscribed_course_ids(
        &self,
        school_id: &SchoolId,
        now: &Timestamp,
    ) -> Result<Vec<CourseId>, DomainError> {
        let state = self.state.read().await;
        Ok(state
            .subscriptions
            .iter()
            .filter(|s| &s.school_id == school_id && s.is_active_at(now))
            .map(|s| s.course_id)
            .collect())
    }
}

#[async_trait]
impl EnrollmentLedger for InMemoryEntitlementStore {
    async fn enroll(&self, enrollment: &Enrollment) -> Result<EnrollOutcome, DomainError> {
        let mut state = self.state.write().await;
        let key = (enrollment.course_id, enrollment.profile_id.clone());
        if state.enrollments.contains_key(&key) {
            return Ok(EnrollOutcome::AlreadyEnrolled);
        }
        state.enrollments.insert(key, enrollment.clone());
        Ok(EnrollOutcome::Enrolled(enrollment.clone()))
    }

    async fn unenroll(
        &self,
        course_id: &CourseId,
        profile_id: &ProfileId,
    ) -> Result<bool, DomainError> {
        let mut state = self.state.write().await;
        Ok(state
            .enrollments
            .remove(&(*course_id, profile_id.clone()))
            .is_some())
    }

    async fn find(
        &self,
        course_id: &CourseId,
        profile_id: &ProfileId,
    ) -> Result<Option<Enrollment>, DomainError> {
        let state = self.state.read().await;
        Ok(state
            .enrollments
            .get(&(*course_id, profile_id.clone()))
            .cloned())
    }

    async fn enrolled_course_ids(
        &self,
        profile_id: &ProfileId,
    ) -> Result<Vec<CourseId>, DomainError> {
        let state = self.state.read().await;
        Ok(state
            .enrollments
            .values()
            .filter(|e| &e.profile_id == profile_id)
            .map(|e| e.course_id)
            .collect())
    }

    async fn list_for_course(&self, course_id: &CourseId) -> Result<Vec<Enrollment>, DomainError> {
        let state = self.state.read().await;
        let mut enrollments: Vec<Enrollment> = state
            .enrollments
            .values()
            .filter(|e| &e.course_id == course_id)
            .cloned()
            .collect();
        enrollments.sort_by(|a, b| a.enrolled_at.cmp(&b.enrolled_at));
        Ok(enrollments)
    }
}

#[async_trait]
impl ActivationCodeVault for InMemoryEntitlementStore {
    async fn create(&self, code: &ActivationCode) -> Result<(), DomainError> {
        let mut state = self.state.write().await;
        if state.codes.contains_key(code.code.as_str()) {
            return Err(
                DomainError::new(ErrorCode::ActivationCodeExists, "Activation code already exists")
                    .with_detail("field", "code"),
            );
        }
        state.codes.insert(code.code.as_str().to_string(), code.clone());
        Ok(())
    }

    async fn find_by_code(
        &self,
        code: &RedemptionCode,
    ) -> Result<Option<ActivationCode>, DomainError> {
        Ok(self.state.read().await.codes.get(code.as_str()).cloned())
    }

    async fn redeem(
        &self,
        code: &RedemptionCode,
        course_id: &CourseId,
        subject: &Subject,
    ) -> Result<RedemptionOutcome, DomainError> {
        let mut state = self.state.write().await;

        let Some(stored) = state.codes.get(code.as_str()).cloned() else {
            return Ok(RedemptionOutcome::NotFound);
        };
        let Some(course) = state.courses.get(course_id).cloned() else {
            return Ok(RedemptionOutcome::NotFound);
        };

        let usage = SeatUsage {
            code_granted: state.code_granted_seats(course_id),
            already_enrolled: state
                .enrollments
                .contains_key(&(*course_id, subject.profile_id.clone())),
        };

        let outcome = stored.redeem(&course, subject, usage);
        if let RedemptionOutcome::Redeemed { enrollment, code } = &outcome {
            state
                .codes
                .insert(code.code.as_str().to_string(), code.clone());
            state.enrollments.insert(
                (enrollment.course_id, enrollment.profile_id.clone()),
                enrollment.clone(),
            );
        }
        Ok(outcome)
    }
}
