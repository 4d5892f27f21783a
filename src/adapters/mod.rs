//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `memory` - In-memory entitlement store (development, tests)
//! - `postgres` - PostgreSQL store
//! - `directory` - Directory, class roster and school registry clients
//! - `events` - Event bus implementations
//! - `http` - REST API

pub mod directory;
pub mod events;
pub mod http;
pub mod memory;
pub mod postgres;

pub use directory::{HttpDirectory, HttpDirectoryConfig, InMemoryDirectory};
pub use events::InMemoryEventBus;
pub use memory::InMemoryEntitlementStore;
