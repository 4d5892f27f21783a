//! Activation domain module.
//!
//! Capacity-bounded codes that grant paid course access, and the pure
//! decision of whether a redemption succeeds.

mod activation_code;
mod code;

pub use activation_code::{ActivationCode, CodeStatus, RedemptionOutcome, SeatUsage};
pub use code::RedemptionCode;
