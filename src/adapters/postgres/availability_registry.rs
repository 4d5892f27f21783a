//! PostgreSQL implementation of AvailabilityRegistry.

use std::collections::BTreeSet;

use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::availability::{AssignmentDiff, AvailabilityRecord};
use crate::domain::foundation::{CourseId, DomainError, ErrorCode, SchoolId, Timestamp};
use crate::ports::AvailabilityRegistry;

use super::rows::{convert_all, AvailabilityRow, AVAILABILITY_COLUMNS};

pub struct PostgresAvailabilityRegistry {
    pool: PgPool,
}

impl PostgresAvailabilityRegistry {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn strings(schools: &[SchoolId]) -> Vec<String> {
    schools.iter().map(|s| s.as_str().to_string()).collect()
}

#[async_trait]
impl AvailabilityRegistry for PostgresAvailabilityRegistry {
    async fn records_for_school(
        &self,
        school_id: &SchoolId,
    ) -> Result<Vec<AvailabilityRecord>, DomainError> {
        let rows: Vec<AvailabilityRow> = sqlx::query_as(&format!(
            "SELECT {} FROM course_availability WHERE school_id = $1",
            AVAILABILITY_COLUMNS
        ))
        .bind(school_id.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to load availability: {}", e)))?;

        convert_all(rows)
    }

    async fn find(
        &self,
        course_id: &CourseId,
        school_id: &SchoolId,
    ) -> Result<Option<AvailabilityRecord>, DomainError> {
        let row: Option<AvailabilityRow> = sqlx::query_as(&format!(
            "SELECT {} FROM course_availability WHERE course_id = $1 AND school_id = $2",
            AVAILABILITY_COLUMNS
        ))
        .bind(course_id.as_uuid())
        .bind(school_id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to find availability: {}", e)))?;

        row.map(AvailabilityRecord::try_from).transpose()
    }

    async fn sync_schools(
        &self,
        course_id: &CourseId,
        schools: &BTreeSet<SchoolId>,
    ) -> Result<AssignmentDiff, DomainError> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            DomainError::database(format!("Failed to start transaction: {}", e))
        })?;

        // Serializes concurrent resyncs of the same course.
        let locked: Option<(uuid::Uuid,)> =
            sqlx::query_as("SELECT id FROM courses WHERE id = $1 FOR UPDATE")
                .bind(course_id.as_uuid())
                .fetch_optional(&mut *tx)
                .await
                .map_err(|e| DomainError::database(format!("Failed to lock course: {}", e)))?;
        if locked.is_none() {
            return Err(DomainError::new(
                ErrorCode::CourseNotFound,
                format!("Course {} not found", course_id),
            )
            .with_detail("id", course_id.to_string()));
        }

        let current: Vec<(String,)> =
            sqlx::query_as("SELECT school_id FROM course_availability WHERE course_id = $1")
                .bind(course_id.as_uuid())
                .fetch_all(&mut *tx)
                .await
                .map_err(|e| DomainError::database(format!("Failed to load assignments: {}", e)))?;
        let current = current
            .into_iter()
            .map(|(s,)| SchoolId::new(s))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| DomainError::database(format!("Corrupt row: {}", e)))?;

        let diff = AssignmentDiff::between(&current, schools);

        if !diff.removed.is_empty() {
            sqlx::query(
                "DELETE FROM course_availability WHERE course_id = $1 AND school_id = ANY($2)",
            )
            .bind(course_id.as_uuid())
            .bind(strings(&diff.removed))
            .execute(&mut *tx)
            .await
            .map_err(|e| DomainError::database(format!("Failed to remove assignments: {}", e)))?;
        }

        if !diff.added.is_empty() {
            sqlx::query(
                r#"
                INSERT INTO course_availability (course_id, school_id, audience, assigned_at)
                SELECT $1, school_id, 'both', $3 FROM UNNEST($2::text[]) AS school_id
                ON CONFLICT ON CONSTRAINT course_availability_course_school_key DO NOTHING
                "#,
            )
            .bind(course_id.as_uuid())
            .bind(strings(&diff.added))
            .bind(Timestamp::now().as_datetime())
            .execute(&mut *tx)
            .await
            .map_err(|e| DomainError::database(format!("Failed to add assignments: {}", e)))?;
        }

        // A resync replaces the assignment, so retained schools lose their targeting.
        if !diff.retained.is_empty() {
            sqlx::query(
                r#"
                UPDATE course_availability SET
                    audience = 'both',
                    target_class_id = NULL
                WHERE course_id = $1 AND school_id = ANY($2)
                "#,
            )
            .bind(course_id.as_uuid())
            .bind(strings(&diff.retained))
            .execute(&mut *tx)
            .await
            .map_err(|e| DomainError::database(format!("Failed to reset assignments: {}", e)))?;
        }

        tx.commit().await.map_err(|e| {
            DomainError::database(format!("Failed to commit transaction: {}", e))
        })?;

        Ok(diff)
    }

    async fn update_targeting(&self, record: &AvailabilityRecord) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE course_availability SET
                audience = $3,
                target_class_id = $4
            WHERE course_id = $1 AND school_id = $2
            "#,
        )
        .bind(record.course_id.as_uuid())
        .bind(record.school_id.as_str())
        .bind(record.audience.as_str())
        .bind(record.target_class_id.as_ref().map(|c| c.as_str()))
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to update availability: {}", e)))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::AvailabilityNotFound,
                format!(
                    "Course {} is not assigned to school {}",
                    record.course_id, record.school_id
                ),
            ));
        }
        Ok(())
    }

    async fn subscribed_course_ids(
        &self,
        school_id: &SchoolId,
        now: &Timestamp,
    ) -> Result<Vec<CourseId>, DomainError> {
        let rows: Vec<(uuid::Uuid,)> = sqlx::query_as(
            r#"
            SELECT course_id FROM school_subscriptions
            WHERE school_id = $1 AND (active_until IS NULL OR active_until > $2)
            "#,
        )
        .bind(school_id.as_str())
        .bind(now.as_datetime())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to load subscriptions: {}", e)))?;

        Ok(rows.into_iter().map(|(id,)| CourseId::from_uuid(id)).collect())
    }
}
