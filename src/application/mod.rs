//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Following CQRS, it separates command handlers (write) from query handlers (read).

mod context_resolver;
pub mod handlers;

pub use context_resolver::UserContextResolver;
pub use handlers::entitlement::{
    // Queries
    GetCourseAccessHandler, GetCourseAccessQuery,
    ListCourseEnrollmentsHandler, ListCourseEnrollmentsQuery,
    ResolveCatalogHandler, ResolveCatalogQuery,
    // Commands
    AssignCourseToSchoolsCommand, AssignCourseToSchoolsHandler, AssignCourseToSchoolsResult,
    ConfigureAvailabilityCommand, ConfigureAvailabilityHandler,
    CreateActivationCodeCommand, CreateActivationCodeHandler,
    CreateCourseCommand, CreateCourseHandler,
    EnrollFreeCommand, EnrollFreeHandler,
    RedeemCodeCommand, RedeemCodeHandler,
    UnenrollCommand, UnenrollHandler, UnenrollResult,
};
