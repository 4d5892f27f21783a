//! Course entity.
//!
//! # Invariants
//!
//! - `title` is non-empty
//! - a paid course has a positive price
//! - `max_users_allowed`, when present, is at least 1
//! - `content_url` of a paid course is only handed to entitled users

use crate::domain::foundation::{CourseId, SchoolId, Timestamp, ValidationError};
use serde::{Deserialize, Serialize};

use super::Pricing;

const MAX_TITLE_LENGTH: usize = 200;

/// Who owns a course.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum CourseScope {
    /// Shared catalog course, assignable to any school.
    Global,

    /// Course authored for a single school.
    School { school_id: SchoolId },
}

impl CourseScope {
    /// Returns the owning school of a school-scoped course.
    pub fn owner(&self) -> Option<&SchoolId> {
        match self {
            CourseScope::Global => None,
            CourseScope::School { school_id } => Some(school_id),
        }
    }

    /// Returns true if the course may be assigned to the given school.
    pub fn permits_school(&self, school_id: &SchoolId) -> bool {
        match self {
            CourseScope::Global => true,
            CourseScope::School { school_id: owner } => owner == school_id,
        }
    }
}

/// A course in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub id: CourseId,
    pub title: String,
    pub description: Option<String>,
    pub scope: CourseScope,
    pub pricing: Pricing,

    /// Cap on the total seats grantable through activation codes.
    pub max_users_allowed: Option<u32>,

    /// Opaque content locator.
    pub content_url: Option<String>,

    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Course {
    /// Creates a new course, validating its fields.
    pub fn new(
        title: impl Into<String>,
        description: Option<String>,
        scope: CourseScope,
        pricing: Pricing,
        max_users_allowed: Option<u32>,
        content_url: Option<String>,
    ) -> Result<Self, ValidationError> {
        let title = title.into().trim().to_string();
        if title.is_empty() {
            return Err(ValidationError::empty_field("title"));
        }
        if title.chars().count() > MAX_TITLE_LENGTH {
            return Err(ValidationError::out_of_range(
                "title",
                1,
                MAX_TITLE_LENGTH as i64,
                title.chars().count() as i64,
            ));
        }

        if let Pricing::Paid { price_cents, .. } = pricing {
            if price_cents <= 0 {
                return Err(ValidationError::out_of_range(
                    "price_cents",
                    1,
                    i64::MAX,
                    price_cents,
                ));
            }
        }

        if max_users_allowed == Some(0) {
            return Err(ValidationError::out_of_range(
                "max_users_allowed",
                1,
                u32::MAX as i64,
                0,
            ));
        }

        let description = description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());
        let content_url = content_url
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty());

        let now = Timestamp::now();
        Ok(Self {
            id: CourseId::new(),
            title,
            description,
            scope,
            pricing,
            max_users_allowed,
            content_url,
            created_at: now,
            updated_at: now,
        })
    }

    /// Returns true if anyone who can see the course may enroll for free.
    pub fn is_free(&self) -> bool {
        self.pricing.is_free()
    }

    /// Returns the content locator visible to a viewer.
    ///
    /// Paid content is withheld unless the viewer is entitled.
    pub fn content_for(&self, entitled: bool) -> Option<&str> {
        if self.pricing.is_paid() && !entitled {
            return None;
        }
        self.content_url.as_deref()
    }
}
