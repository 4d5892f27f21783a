//! Event bus adapters.
//!
//! - `InMemoryEventBus` - In-process publisher that records and logs events

mod in_memory;

pub use in_memory::InMemoryEventBus;
