//! Catalog domain module.
//!
//! Courses in the shared catalog, their scope (global or owned by one
//! school) and their pricing.

mod course;
mod pricing;

pub use course::{Course, CourseScope};
pub use pricing::{Pricing, SubscriptionPlan};
