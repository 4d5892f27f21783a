//! Entitlement command and query handlers.
//!
//! Each handler is a stateless object holding its ports. Writes are single
//! store calls; events are published after the write has committed.

mod assign_course_to_schools;
mod configure_availability;
mod create_activation_code;
mod create_course;
mod enroll_free;
mod get_course_access;
mod list_course_enrollments;
mod redeem_code;
mod resolve_catalog;
mod support;
mod unenroll;

#[cfg(test)]
pub(crate) mod test_support;

pub use assign_course_to_schools::{
    AssignCourseToSchoolsCommand, AssignCourseToSchoolsHandler, AssignCourseToSchoolsResult,
};
pub use configure_availability::{ConfigureAvailabilityCommand, ConfigureAvailabilityHandler};
pub use create_activation_code::{CreateActivationCodeCommand, CreateActivationCodeHandler};
pub use create_course::{CreateCourseCommand, CreateCourseHandler};
pub use enroll_free::{EnrollFreeCommand, EnrollFreeHandler};
pub use get_course_access::{GetCourseAccessHandler, GetCourseAccessQuery};
pub use list_course_enrollments::{ListCourseEnrollmentsHandler, ListCourseEnrollmentsQuery};
pub use redeem_code::{RedeemCodeCommand, RedeemCodeHandler};
pub use resolve_catalog::{ResolveCatalogHandler, ResolveCatalogQuery};
pub use unenroll::{UnenrollCommand, UnenrollHandler, UnenrollResult};
