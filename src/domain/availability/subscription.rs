//! School subscriptions to paid courses.
//!
//! Written by the billing side; this crate only reads them.

use crate::domain::catalog::SubscriptionPlan;
use crate::domain::foundation::{CourseId, SchoolId, Timestamp};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchoolSubscription {
    pub school_id: SchoolId,
    pub course_id: CourseId,
    pub plan: SubscriptionPlan,

    /// End of the paid period. Absent means open-ended.
    pub active_until: Option<Timestamp>,
}

impl SchoolSubscription {
    /// Returns true if the subscription grants access at `now`.
    pub fn is_active_at(&self, now: &Timestamp) -> bool {
        match &self.active_until {
            None => true,
            Some(until) => until.is_after(now),
        }
    }
}
