//! In-memory adapters.
//!
//! A single store implementing every store port behind one async lock.
//! Used for local development and tests.

mod store;

pub use store::InMemoryEntitlementStore;
