//! PostgreSQL implementation of CourseRepository.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::catalog::Course;
use crate::domain::foundation::{CourseId, DomainError};
use crate::ports::CourseRepository;

use super::rows::{convert_all, pricing_columns, to_i32, CourseRow, COURSE_COLUMNS};

pub struct PostgresCourseRepository {
    pool: PgPool,
}

impl PostgresCourseRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CourseRepository for PostgresCourseRepository {
    async fn save(&self, course: &Course) -> Result<(), DomainError> {
        let (kind, plan, price_cents) = pricing_columns(&course.pricing);
        let cap = course
            .max_users_allowed
            .map(|cap| to_i32("max_users_allowed", cap))
            .transpose()?;

        sqlx::query(
            r#"
            INSERT INTO courses (
                id, title, description, owner_school_id, pricing_kind, plan, price_cents,
                max_users_allowed, content_url, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            ON CONFLICT (id) DO UPDATE SET
                title = EXCLUDED.title,
                description = EXCLUDED.description,
                owner_school_id = EXCLUDED.owner_school_id,
                pricing_kind = EXCLUDED.pricing_kind,
                plan = EXCLUDED.plan,
                price_cents = EXCLUDED.price_cents,
                max_users_allowed = EXCLUDED.max_users_allowed,
                content_url = EXCLUDED.content_url,
                updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(course.id.as_uuid())
        .bind(&course.title)
        .bind(&course.description)
        .bind(course.scope.owner().map(|s| s.as_str()))
        .bind(kind)
        .bind(plan)
        .bind(price_cents)
        .bind(cap)
        .bind(&course.content_url)
        .bind(course.created_at.as_datetime())
        .bind(course.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to save course: {}", e)))?;

        Ok(())
    }

    async fn find_by_id(&self, id: &CourseId) -> Result<Option<Course>, DomainError> {
        let row: Option<CourseRow> = sqlx::query_as(&format!(
            "SELECT {} FROM courses WHERE id = $1",
            COURSE_COLUMNS
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to find course: {}", e)))?;

        row.map(Course::try_from).transpose()
    }

    async fn find_many(&self, ids: &[CourseId]) -> Result<Vec<Course>, DomainError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let uuids: Vec<Uuid> = ids.iter().map(|id| *id.as_uuid()).collect();

        let rows: Vec<CourseRow> = sqlx::query_as(&format!(
            "SELECT {} FROM courses WHERE id = ANY($1)",
            COURSE_COLUMNS
        ))
        .bind(&uuids)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to load courses: {}", e)))?;

        convert_all(rows)
    }

    async fn list_all(&self) -> Result<Vec<Course>, DomainError> {
        let rows: Vec<CourseRow> = sqlx::query_as(&format!(
            "SELECT {} FROM courses ORDER BY created_at DESC, id",
            COURSE_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to list courses: {}", e)))?;

        convert_all(rows)
    }
}
