//! Catalog entry annotated for a single viewer.

use crate::domain::catalog::{Course, CourseScope, Pricing};
use crate::domain::foundation::{CourseId, Timestamp};
use serde::{Deserialize, Serialize};

use super::UserContext;

/// Course metadata plus the viewer's entitlement flags.
///
/// `content_url` is only present when the viewer may open the content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseView {
    pub id: CourseId,
    pub title: String,
    pub description: Option<String>,
    pub scope: CourseScope,
    pub pricing: Pricing,
    pub max_users_allowed: Option<u32>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub is_enrolled: bool,
    pub is_available: bool,
    pub can_self_enroll: bool,
    pub content_url: Option<String>,
}

impl CourseView {
    /// Annotates a course the viewer is allowed to see.
    ///
    /// Superadmins are treated as enrolled in everything.
    pub fn annotate(course: &Course, ctx: &UserContext, is_enrolled: bool) -> Self {
        let is_enrolled = ctx.is_superadmin() || is_enrolled;
        let can_self_enroll = course.is_free() && ctx.subject().is_some() && !is_enrolled;

        Self {
            id: course.id,
            title: course.title.clone(),
            description: course.description.clone(),
            scope: course.scope.clone(),
            pricing: course.pricing,
            max_users_allowed: course.max_users_allowed,
            created_at: course.created_at,
            updated_at: course.updated_at,
            is_enrolled,
            is_available: true,
            can_self_enroll,
            content_url: course.content_for(is_enrolled).map(str::to_string),
        }
    }
}
