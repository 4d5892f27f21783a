//! Directory adapters.
//!
//! - `InMemoryDirectory` - Seeded directory for development and tests
//! - `HttpDirectory` - Client for the portal's directory service

mod http;
mod in_memory;

pub use http::{HttpDirectory, HttpDirectoryConfig};
pub use in_memory::{DirectorySeed, InMemoryDirectory};
