//! Enrollment domain module.
//!
//! Ledger entries recording who holds access to which course and how the
//! access was obtained.

mod enrollment;

pub use enrollment::{EnrollOutcome, Enrollment, EnrollmentSource, Subject, SubjectKind};
