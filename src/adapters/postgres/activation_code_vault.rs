//! PostgreSQL implementation of ActivationCodeVault.
//!
//! Redemption runs in one transaction holding row locks on the course and
//! the code, so concurrent callers are serialized per course and at most
//! one of them can take the last seat.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::activation::{ActivationCode, RedemptionCode, RedemptionOutcome, SeatUsage};
use crate::domain::catalog::Course;
use crate::domain::enrollment::Subject;
use crate::domain::foundation::{CourseId, DomainError, ErrorCode};
use crate::ports::ActivationCodeVault;

use super::enrollment_ledger::insert_enrollment;
use super::rows::{to_i32, CodeRow, CourseRow, CODE_COLUMNS, COURSE_COLUMNS};

pub struct PostgresActivationCodeVault {
    pool: PgPool,
}

impl PostgresActivationCodeVault {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ActivationCodeVault for PostgresActivationCodeVault {
    async fn create(&self, code: &ActivationCode) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO activation_codes (
                id, code, course_id, school_id, redeemed_count, max_redemptions, created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(code.id.as_uuid())
        .bind(code.code.as_str())
        .bind(code.course_id.as_uuid())
        .bind(code.school_id.as_ref().map(|s| s.as_str()))
        .bind(to_i32("redeemed_count", code.redeemed_count)?)
        .bind(to_i32("max_redemptions", code.max_redemptions)?)
        .bind(code.created_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.constraint() == Some("activation_codes_code_key") {
                    return DomainError::new(
                        ErrorCode::ActivationCodeExists,
                        "Activation code already exists",
                    )
                    .with_detail("field", "code");
                }
            }
            DomainError::database(format!("Failed to save activation code: {}", e))
        })?;

        Ok(())
    }

    async fn find_by_code(
        &self,
        code: &RedemptionCode,
    ) -> Result<Option<ActivationCode>, DomainError> {
        let row: Option<CodeRow> = sqlx::query_as(&format!(
            "SELECT {} FROM activation_codes WHERE code = $1",
            CODE_COLUMNS
        ))
        .bind(code.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to find activation code: {}", e)))?;

        row.map(ActivationCode::try_from).transpose()
    }

    async fn redeem(
        &self,
        code: &RedemptionCode,
        course_id: &CourseId,
        subject: &Subject,
    ) -> Result<RedemptionOutcome, DomainError> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            DomainError::database(format!("Failed to start transaction: {}", e))
        })?;

        let course: Option<CourseRow> = sqlx::query_as(&format!(
            "SELECT {} FROM courses WHERE id = $1 FOR UPDATE",
            COURSE_COLUMNS
        ))
        .bind(course_id.as_uuid())
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| DomainError::database(format!("Failed to lock course: {}", e)))?;
        let Some(course) = course.map(Course::try_from).transpose()? else {
            return Ok(RedemptionOutcome::NotFound);
        };

        let stored: Option<CodeRow> = sqlx::query_as(&format!(
            "SELECT {} FROM activation_codes WHERE code = $1 FOR UPDATE",
            CODE_COLUMNS
        ))
        .bind(code.as_str())
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| DomainError::database(format!("Failed to lock activation code: {}", e)))?;
        let Some(stored) = stored.map(ActivationCode::try_from).transpose()? else {
            return Ok(RedemptionOutcome::NotFound);
        };

        let (code_granted, already_enrolled): (i64, bool) = sqlx::query_as(
            r#"
            SELECT
                COUNT(*) FILTER (WHERE activation_code_id IS NOT NULL),
                COALESCE(BOOL_OR(profile_id = $2), FALSE)
            FROM enrollments
            WHERE course_id = $1
            "#,
        )
        .bind(course_id.as_uuid())
        .bind(subject.profile_id.as_str())
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| DomainError::database(format!("Failed to count seats: {}", e)))?;

        let usage = SeatUsage {
            code_granted: u32::try_from(code_granted).unwrap_or(u32::MAX),
            already_enrolled,
        };

        let (enrollment, updated) = match stored.redeem(&course, subject, usage) {
            RedemptionOutcome::Redeemed { enrollment, code } => (enrollment, code),
            other => return Ok(other),
        };

        sqlx::query("UPDATE activation_codes SET redeemed_count = $2 WHERE id = $1")
            .bind(updated.id.as_uuid())
            .bind(to_i32("redeemed_count", updated.redeemed_count)?)
            .execute(&mut *tx)
            .await
            .map_err(|e| DomainError::database(format!("Failed to consume code: {}", e)))?;

        if !insert_enrollment(&mut *tx, &enrollment).await? {
            // A free enrollment landed between the check and the insert.
            return Ok(RedemptionOutcome::AlreadyEnrolled);
        }

        tx.commit().await.map_err(|e| {
            DomainError::database(format!("Failed to commit transaction: {}", e))
        })?;

        Ok(RedemptionOutcome::Redeemed {
            enrollment,
            code: updated,
        })
    }
}
