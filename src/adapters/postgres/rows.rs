//! Row types and column codecs shared by the PostgreSQL adapters.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::activation::{ActivationCode, RedemptionCode};
use crate::domain::availability::{Audience, AvailabilityRecord};
use crate::domain::catalog::{Course, CourseScope, Pricing, SubscriptionPlan};
use crate::domain::enrollment::{Enrollment, EnrollmentSource, SubjectKind};
use crate::domain::foundation::{
    ActivationCodeId, ClassId, CourseId, DomainError, EnrollmentId, ProfileId, SchoolId, Timestamp,
    ValidationError,
};

pub(super) const COURSE_COLUMNS: &str = "id, title, description, owner_school_id, pricing_kind, \
     plan, price_cents, max_users_allowed, content_url, created_at, updated_at";

pub(super) const AVAILABILITY_COLUMNS: &str =
    "course_id, school_id, audience, target_class_id, assigned_at";

pub(super) const CODE_COLUMNS: &str =
    "id, code, course_id, school_id, redeemed_count, max_redemptions, created_at";

pub(super) const ENROLLMENT_COLUMNS: &str =
    "id, course_id, profile_id, subject_kind, school_id, activation_code_id, enrolled_at";

/// Database row representation of a course.
#[derive(Debug, sqlx::FromRow)]
pub(super) struct CourseRow {
    id: Uuid,
    title: String,
    description: Option<String>,
    owner_school_id: Option<String>,
    pricing_kind: String,
    plan: Option<String>,
    price_cents: Option<i64>,
    max_users_allowed: Option<i32>,
    content_url: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<CourseRow> for Course {
    type Error = DomainError;

    fn try_from(row: CourseRow) -> Result<Self, Self::Error> {
        let scope = match row.owner_school_id {
            None => CourseScope::Global,
            Some(owner) => CourseScope::School {
                school_id: column(SchoolId::new(owner))?,
            },
        };

        let pricing = match row.pricing_kind.as_str() {
            "free" => Pricing::Free,
            "paid" => Pricing::Paid {
                plan: parse_plan(row.plan.as_deref().unwrap_or_default())?,
                price_cents: row
                    .price_cents
                    .ok_or_else(|| corrupt("paid course without price_cents"))?,
            },
            other => return Err(corrupt(format!("invalid pricing_kind: {}", other))),
        };

        Ok(Course {
            id: CourseId::from_uuid(row.id),
            title: row.title,
            description: row.description,
            scope,
            pricing,
            max_users_allowed: row.max_users_allowed.map(to_u32).transpose()?,
            content_url: row.content_url,
            created_at: Timestamp::from_datetime(row.created_at),
            updated_at: Timestamp::from_datetime(row.updated_at),
        })
    }
}

/// Database row representation of an availability record.
#[derive(Debug, sqlx::FromRow)]
pub(super) struct AvailabilityRow {
    course_id: Uuid,
    school_id: String,
    audience: String,
    target_class_id: Option<String>,
    assigned_at: DateTime<Utc>,
}

impl TryFrom<AvailabilityRow> for AvailabilityRecord {
    type Error = DomainError;

    fn try_from(row: AvailabilityRow) -> Result<Self, Self::Error> {
        Ok(AvailabilityRecord {
            course_id: CourseId::from_uuid(row.course_id),
            school_id: column(SchoolId::new(row.school_id))?,
            audience: parse_audience(&row.audience)?,
            target_class_id: row
                .target_class_id
                .map(|c| column(ClassId::new(c)))
                .transpose()?,
            assigned_at: Timestamp::from_datetime(row.assigned_at),
        })
    }
}

/// Database row representation of an activation code.
#[derive(Debug, sqlx::FromRow)]
pub(super) struct CodeRow {
    id: Uuid,
    code: String,
    course_id: Uuid,
    school_id: Option<String>,
    redeemed_count: i32,
    max_redemptions: i32,
    created_at: DateTime<Utc>,
}

impl TryFrom<CodeRow> for ActivationCode {
    type Error = DomainError;

    fn try_from(row: CodeRow) -> Result<Self, Self::Error> {
        Ok(ActivationCode {
            id: ActivationCodeId::from_uuid(row.id),
            code: column(RedemptionCode::parse(&row.code))?,
            course_id: CourseId::from_uuid(row.course_id),
            school_id: row.school_id.map(|s| column(SchoolId::new(s))).transpose()?,
            redeemed_count: to_u32(row.redeemed_count)?,
            max_redemptions: to_u32(row.max_redemptions)?,
            created_at: Timestamp::from_datetime(row.created_at),
        })
    }
}

/// Database row representation of an enrollment.
#[derive(Debug, sqlx::FromRow)]
pub(super) struct EnrollmentRow {
    id: Uuid,
    course_id: Uuid,
    profile_id: String,
    subject_kind: String,
    school_id: String,
    activation_code_id: Option<Uuid>,
    enrolled_at: DateTime<Utc>,
}

impl TryFrom<EnrollmentRow> for Enrollment {
    type Error = DomainError;

    fn try_from(row: EnrollmentRow) -> Result<Self, Self::Error> {
        let source = match row.activation_code_id {
            None => EnrollmentSource::SelfEnrolled,
            Some(code_id) => EnrollmentSource::ActivationCode {
                code_id: ActivationCodeId::from_uuid(code_id),
            },
        };

        Ok(Enrollment {
            id: EnrollmentId::from_uuid(row.id),
            course_id: CourseId::from_uuid(row.course_id),
            profile_id: column(ProfileId::new(row.profile_id))?,
            subject_kind: parse_subject_kind(&row.subject_kind)?,
            school_id: column(SchoolId::new(row.school_id))?,
            source,
            enrolled_at: Timestamp::from_datetime(row.enrolled_at),
        })
    }
}

/// Converts a list of rows, failing on the first corrupt one.
pub(super) fn convert_all<R, T>(rows: Vec<R>) -> Result<Vec<T>, DomainError>
where
    T: TryFrom<R, Error = DomainError>,
{
    rows.into_iter().map(T::try_from).collect()
}

pub(super) fn parse_plan(s: &str) -> Result<SubscriptionPlan, DomainError> {
    match s {
        "monthly" => Ok(SubscriptionPlan::Monthly),
        "termly" => Ok(SubscriptionPlan::Termly),
        "annual" => Ok(SubscriptionPlan::Annual),
        "lifetime" => Ok(SubscriptionPlan::Lifetime),
        _ => Err(corrupt(format!("invalid plan value: {}", s))),
    }
}

pub(super) fn parse_audience(s: &str) -> Result<Audience, DomainError> {
    match s {
        "student" => Ok(Audience::Student),
        "teacher" => Ok(Audience::Teacher),
        "both" => Ok(Audience::Both),
        _ => Err(corrupt(format!("invalid audience value: {}", s))),
    }
}

pub(super) fn parse_subject_kind(s: &str) -> Result<SubjectKind, DomainError> {
    match s {
        "student" => Ok(SubjectKind::Student),
        "teacher" => Ok(SubjectKind::Teacher),
        _ => Err(corrupt(format!("invalid subject_kind value: {}", s))),
    }
}

/// Column values for a course's pricing: kind, plan, price.
pub(super) fn pricing_columns(pricing: &Pricing) -> (&'static str, Option<&'static str>, Option<i64>) {
    match pricing {
        Pricing::Free => ("free", None, None),
        Pricing::Paid { plan, price_cents } => ("paid", Some(plan.as_str()), Some(*price_cents)),
    }
}

/// Counts are stored as INTEGER.
pub(super) fn to_i32(field: &str, value: u32) -> Result<i32, DomainError> {
    i32::try_from(value).map_err(|_| DomainError::validation(field, "value too large"))
}

fn to_u32(value: i32) -> Result<u32, DomainError> {
    u32::try_from(value).map_err(|_| corrupt(format!("negative count: {}", value)))
}

fn column<T>(value: Result<T, ValidationError>) -> Result<T, DomainError> {
    value.map_err(|e| corrupt(e.to_string()))
}

fn corrupt(message: impl std::fmt::Display) -> DomainError {
    DomainError::database(format!("Corrupt row: {}", message))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_plan_works_for_all_values() {
        for plan in [
            SubscriptionPlan::Monthly,
            SubscriptionPlan::Termly,
            SubscriptionPlan::Annual,
            SubscriptionPlan::Lifetime,
        ] {
            assert_eq!(parse_plan(plan.as_str()).unwrap(), plan);
        }
        assert!(parse_plan("weekly").is_err());
    }

    #[test]
    fn parse_audience_rejects_unknown() {
        assert_eq!(parse_audience("both").unwrap(), Audience::Both);
        assert!(parse_audience("parents").is_err());
    }

    #[test]
    fn pricing_columns_are_consistent() {
        assert_eq!(pricing_columns(&Pricing::Free), ("free", None, None));
        let paid = Pricing::Paid {
            plan: SubscriptionPlan::Termly,
            price_cents: 1_200,
        };
        assert_eq!(pricing_columns(&paid), ("paid", Some("termly"), Some(1_200)));
    }

    #[test]
    fn course_row_maps_school_scope_and_paid_pricing() {
        let now = Utc::now();
        let row = CourseRow {
            id: Uuid::new_v4(),
            title: "Chemistry".to_string(),
            description: None,
            owner_school_id: Some("s-1".to_string()),
            pricing_kind: "paid".to_string(),
            plan: Some("annual".to_string()),
            price_cents: Some(4_900),
            max_users_allowed: Some(30),
            content_url: None,
            created_at: now,
            updated_at: now,
        };

        let course = Course::try_from(row).unwrap();
        assert_eq!(course.scope.owner().map(|s| s.as_str()), Some("s-1"));
        assert_eq!(course.pricing.plan(), Some(SubscriptionPlan::Annual));
        assert_eq!(course.max_users_allowed, Some(30));
    }

    #[test]
    fn paid_row_without_price_is_corrupt() {
        let now = Utc::now();
        let row = CourseRow {
            id: Uuid::new_v4(),
            title: "Chemistry".to_string(),
            description: None,
            owner_school_id: None,
            pricing_kind: "paid".to_string(),
            plan: Some("annual".to_string()),
            price_cents: None,
            max_users_allowed: None,
            content_url: None,
            created_at: now,
            updated_at: now,
        };

        assert!(Course::try_from(row).is_err());
    }

    #[test]
    fn enrollment_row_with_code_is_code_granted() {
        let code_id = Uuid::new_v4();
        let row = EnrollmentRow {
            id: Uuid::new_v4(),
            course_id: Uuid::new_v4(),
            profile_id: "st-1".to_string(),
            subject_kind: "student".to_string(),
            school_id: "s-1".to_string(),
            activation_code_id: Some(code_id),
            enrolled_at: Utc::now(),
        };

        let enrollment = Enrollment::try_from(row).unwrap();
        assert_eq!(
            enrollment.source.code_id(),
            Some(ActivationCodeId::from_uuid(code_id))
        );
    }
}
