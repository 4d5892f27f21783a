//! PostgreSQL implementation of EnrollmentLedger.
//!
//! Uniqueness of `(course_id, profile_id)` is the table constraint; enrolling
//! is a single `INSERT ... ON CONFLICT DO NOTHING`.

use async_trait::async_trait;
use sqlx::{PgPool, Postgres};

use crate::domain::enrollment::{EnrollOutcome, Enrollment};
use crate::domain::foundation::{CourseId, DomainError, ProfileId};
use crate::ports::EnrollmentLedger;

use super::rows::{convert_all, EnrollmentRow, ENROLLMENT_COLUMNS};

pub struct PostgresEnrollmentLedger {
    pool: PgPool,
}

impl PostgresEnrollmentLedger {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Conditionally inserts `enrollment`. Returns false if the profile already
/// held an enrollment for the course.
pub(super) async fn insert_enrollment<'e, E>(
    executor: E,
    enrollment: &Enrollment,
) -> Result<bool, DomainError>
where
    E: sqlx::Executor<'e, Database = Postgres>,
{
    let result = sqlx::query(
        r#"
        INSERT INTO enrollments (
            id, course_id, profile_id, subject_kind, school_id, activation_code_id, enrolled_at
        ) VALUES ($1, $2, $3, $4, $5, $6, $7)
        ON CONFLICT ON CONSTRAINT enrollments_course_profile_key DO NOTHING
        "#,
    )
    .bind(enrollment.id.as_uuid())
    .bind(enrollment.course_id.as_uuid())
    .bind(enrollment.profile_id.as_str())
    .bind(enrollment.subject_kind.as_str())
    .bind(enrollment.school_id.as_str())
    .bind(enrollment.source.code_id().map(|id| *id.as_uuid()))
    .bind(enrollment.enrolled_at.as_datetime())
    .execute(executor)
    .await
    .map_err(|e| DomainError::database(format!("Failed to insert enrollment: {}", e)))?;

    Ok(result.rows_affected() == 1)
}

#[async_trait]
impl EnrollmentLedger for PostgresEnrollmentLedger {
    async fn enroll(&self, enrollment: &Enrollment) -> Result<EnrollOutcome, DomainError> {
        if insert_enrollment(&self.pool, enrollment).await? {
            Ok(EnrollOutcome::Enrolled(enrollment.clone()))
        } else {
            Ok(EnrollOutcome::AlreadyEnrolled)
        }
    }

    async fn unenroll(
        &self,
        course_id: &CourseId,
        profile_id: &ProfileId,
    ) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM enrollments WHERE course_id = $1 AND profile_id = $2")
            .bind(course_id.as_uuid())
            .bind(profile_id.as_str())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::database(format!("Failed to delete enrollment: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }

    async fn find(
        &self,
        course_id: &CourseId,
        profile_id: &ProfileId,
    ) -> Result<Option<Enrollment>, DomainError> {
        let row: Option<EnrollmentRow> = sqlx::query_as(&format!(
            "SELECT {} FROM enrollments WHERE course_id = $1 AND profile_id = $2",
            ENROLLMENT_COLUMNS
        ))
        .bind(course_id.as_uuid())
        .bind(profile_id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to find enrollment: {}", e)))?;

        row.map(Enrollment::try_from).transpose()
    }

    async fn enrolled_course_ids(&self, profile_id: &ProfileId) -> Result<Vec<CourseId>, DomainError> {
        let rows: Vec<(uuid::Uuid,)> =
            sqlx::query_as("SELECT course_id FROM enrollments WHERE profile_id = $1")
                .bind(profile_id.as_str())
                .fetch_all(&self.pool)
                .await
                .map_err(|e| DomainError::database(format!("Failed to load enrollments: {}", e)))?;

        Ok(rows.into_iter().map(|(id,)| CourseId::from_uuid(id)).collect())
    }

    async fn list_for_course(&self, course_id: &CourseId) -> Result<Vec<Enrollment>, DomainError> {
        let rows: Vec<EnrollmentRow> = sqlx::query_as(&format!(
            "SELECT {} FROM enrollments WHERE course_id = $1 ORDER BY enrolled_at, id",
            ENROLLMENT_COLUMNS
        ))
        .bind(course_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to list enrollments: {}", e)))?;

        convert_all(rows)
    }
}
