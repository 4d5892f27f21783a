//! CreateCourseHandler - Command handler adding a course to the catalog.

use std::sync::Arc;

use crate::domain::catalog::{Course, CourseScope, Pricing};
use crate::domain::entitlement::{EntitlementError, UserContext};
use crate::ports::{CourseRepository, SchoolRegistry};

use super::support::ensure_school_exists;

#[derive(Debug, Clone)]
pub struct CreateCourseCommand {
    pub title: String,
    pub description: Option<String>,
    pub scope: CourseScope,
    pub pricing: Pricing,
    pub max_users_allowed: Option<u32>,
    pub content_url: Option<String>,
    pub ctx: UserContext,
}

pub struct CreateCourseHandler {
    courses: Arc<dyn CourseRepository>,
    schools: Arc<dyn SchoolRegistry>,
}

impl CreateCourseHandler {
    pub fn new(courses: Arc<dyn CourseRepository>, schools: Arc<dyn SchoolRegistry>) -> Self {
        Self { courses, schools }
    }

    pub async fn handle(&self, cmd: CreateCourseCommand) -> Result<Course, EntitlementError> {
        if !cmd.ctx.is_superadmin() {
            return Err(EntitlementError::unauthorized("only superadmins can create courses"));
        }

        let course = Course::new(
            cmd.title,
            cmd.description,
            cmd.scope,
            cmd.pricing,
            cmd.max_users_allowed,
            cmd.content_url,
        )?;

        if let Some(owner) = course.scope.owner() {
            ensure_school_exists(self.schools.as_ref(), owner).await?;
        }

        self.courses.save(&course).await?;

        tracing::info!(
            course_id = %course.id,
            free = course.is_free(),
            "Course created"
        );
        Ok(course)
    }
}
