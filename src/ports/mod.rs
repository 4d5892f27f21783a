//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Store Ports
//!
//! - `CourseRepository` - Course catalog
//! - `AvailabilityRegistry` - Per-school assignments and subscriptions
//! - `EnrollmentLedger` - Who holds access to which course
//! - `ActivationCodeVault` - Capacity-bounded activation codes
//!
//! ## Collaborator Ports
//!
//! - `DirectoryGateway` - Identity to role/school/profile
//! - `ClassRoster` - Student class lookup
//! - `SchoolRegistry` - School existence
//! - `EventPublisher` - Domain event delivery

mod activation_code_vault;
mod availability_registry;
mod course_repository;
mod directory_gateway;
mod enrollment_ledger;
mod event_publisher;

pub use activation_code_vault::ActivationCodeVault;
pub use availability_registry::AvailabilityRegistry;
pub use course_repository::CourseRepository;
pub use directory_gateway::{
    ClassRoster, DirectoryEntry, DirectoryError, DirectoryGateway, SchoolRegistry,
};
pub use enrollment_ledger::EnrollmentLedger;
pub use event_publisher::EventPublisher;
