//! HTTP adapter for course entitlements.

mod dto;
mod handlers;
mod routes;

pub use dto::*;
pub use handlers::{EntitlementApiError, EntitlementAppState};
pub use routes::entitlement_routes;
