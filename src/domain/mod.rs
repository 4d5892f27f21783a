//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, timestamps, events, errors)
//! - `catalog` - Courses and their pricing
//! - `availability` - Course-to-school assignments and audience targeting
//! - `enrollment` - Ledger entries granting course access
//! - `activation` - Capacity-bounded activation codes
//! - `entitlement` - User contexts, catalog resolution and application errors

pub mod activation;
pub mod availability;
pub mod catalog;
pub mod enrollment;
pub mod entitlement;
pub mod foundation;
