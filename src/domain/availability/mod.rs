//! Availability domain module.
//!
//! Per-school assignment of catalog courses, the audience each assignment
//! targets, and school subscriptions to paid courses.

mod audience;
mod record;
mod subscription;

pub use audience::Audience;
pub use record::{AssignmentDiff, AvailabilityRecord};
pub use subscription::SchoolSubscription;
