//! Activation code vault port.
//!
//! # Atomicity
//!
//! `redeem` reads the code, the course and the ledger, decides with
//! `ActivationCode::redeem`, and on success increments the code and writes
//! the enrollment together. Concurrent redemptions of the last seat have
//! exactly one winner.

use crate::domain::activation::{ActivationCode, RedemptionCode, RedemptionOutcome};
use crate::domain::enrollment::Subject;
use crate::domain::foundation::{CourseId, DomainError};
use async_trait::async_trait;

#[async_trait]
pub trait ActivationCodeVault: Send + Sync {
    /// Store a new code.
    ///
    /// # Errors
    ///
    /// - `ActivationCodeExists` if the code string is taken
    /// - `DatabaseError` on persistence failure
    async fn create(&self, code: &ActivationCode) -> Result<(), DomainError>;

    async fn find_by_code(&self, code: &RedemptionCode)
        -> Result<Option<ActivationCode>, DomainError>;

    /// Redeem `code` for `course_id` on behalf of `subject`.
    async fn redeem(
        &self,
        code: &RedemptionCode,
        course_id: &CourseId,
        subject: &Subject,
    ) -> Result<RedemptionOutcome, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn activation_code_vault_is_object_safe() {
        fn _accepts_dyn(_vault: &dyn ActivationCodeVault) {}
    }
}
