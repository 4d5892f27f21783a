//! Entitlement domain module.
//!
//! Resolves what a user may see, enroll in, or already holds, from the
//! catalog, availability and ledger state.
//!
//! # Module Structure
//!
//! - `context` - Resolved user context and audience matching per role
//! - `course_view` - Catalog entry annotated for one viewer
//! - `resolver` - Pure catalog resolution
//! - `errors` - Entitlement error kinds
//! - `events` - Events emitted after successful writes

mod context;
mod course_view;
mod errors;
mod events;
mod resolver;

pub use context::{Role, UserContext};
pub use course_view::CourseView;
pub use errors::EntitlementError;
pub use events::{EntitlementChange, EntitlementEvent};
pub use resolver::{resolve_catalog, visible_course_ids};
