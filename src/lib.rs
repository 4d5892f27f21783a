//! Course Entitlements - Who can see and open which course.
//!
//! Resolves a school portal user's catalog, records free enrollments,
//! redeems capacity-bounded activation codes and keeps course-to-school
//! assignments in sync.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
