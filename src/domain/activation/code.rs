//! Redemption code value object.
//!
//! Codes are case-insensitive and whitespace-tolerant on input. The stored
//! form is trimmed and uppercased.
//!
//! # Validation Rules
//!
//! - 4 to 32 characters after normalization
//! - `A-Z`, `0-9` and single hyphens between groups
//! - no leading, trailing or doubled hyphen

use crate::domain::foundation::ValidationError;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

const MIN_LENGTH: usize = 4;
const MAX_LENGTH: usize = 32;

/// Unambiguous alphabet for generated codes (no 0/O, 1/I).
const ALPHABET: &[u8; 32] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

/// A normalized activation code string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RedemptionCode(String);

impl RedemptionCode {
    /// Normalizes and validates user input.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let normalized = input.trim().to_uppercase();

        if normalized.is_empty() {
            return Err(ValidationError::empty_field("code"));
        }

        let length = normalized.chars().count();
        if !(MIN_LENGTH..=MAX_LENGTH).contains(&length) {
            return Err(ValidationError::out_of_range(
                "code",
                MIN_LENGTH as i64,
                MAX_LENGTH as i64,
                length as i64,
            ));
        }

        if !normalized
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '-')
        {
            return Err(ValidationError::invalid_format(
                "code",
                "letters, digits and hyphens only",
            ));
        }

        if normalized.starts_with('-') || normalized.ends_with('-') || normalized.contains("--") {
            return Err(ValidationError::invalid_format(
                "code",
                "hyphens must separate groups",
            ));
        }

        Ok(Self(normalized))
    }

    /// Generates a fresh `XXXX-XXXX` code.
    pub fn generate() -> Self {
        let bytes = Uuid::new_v4().into_bytes();
        let mut code = String::with_capacity(9);
        for (i, byte) in bytes.iter().take(8).enumerate() {
            if i == 4 {
                code.push('-');
            }
            code.push(ALPHABET[(*byte as usize) % ALPHABET.len()] as char);
        }
        Self(code)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RedemptionCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for RedemptionCode {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<RedemptionCode> for String {
    fn from(code: RedemptionCode) -> Self {
        code.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn parse_normalizes_case_and_whitespace() {
        let code = RedemptionCode::parse("  abcd-1234 ").unwrap();
        assert_eq!(code.as_str(), "ABCD-1234");
    }

    #[test]
    fn parse_rejects_empty() {
        assert!(matches!(
            RedemptionCode::parse("   "),
            Err(ValidationError::EmptyField { .. })
        ));
    }

    #[test]
    fn parse_rejects_too_short() {
        assert!(matches!(
            RedemptionCode::parse("AB1"),
            Err(ValidationError::OutOfRange { .. })
        ));
    }

    #[test]
    fn parse_rejects_symbols() {
        assert!(RedemptionCode::parse("ABCD_1234").is_err());
        assert!(RedemptionCode::parse("ABCD 1234").is_err());
    }

    #[test]
    fn parse_rejects_misplaced_hyphens() {
        assert!(RedemptionCode::parse("-ABCD").is_err());
        assert!(RedemptionCode::parse("ABCD-").is_err());
        assert!(RedemptionCode::parse("AB--CD").is_err());
    }

    #[test]
    fn generated_code_has_expected_shape() {
        let code = RedemptionCode::generate();
        let s = code.as_str();

        assert_eq!(s.len(), 9);
        assert_eq!(&s[4..5], "-");
        assert!(RedemptionCode::parse(s).is_ok());
    }

    #[test]
    fn generated_codes_differ() {
        assert_ne!(RedemptionCode::generate(), RedemptionCode::generate());
    }

    proptest! {
        #[test]
        fn parse_is_idempotent(input in "[a-zA-Z0-9]{4,8}(-[a-zA-Z0-9]{2,8}){0,2}") {
            let once = RedemptionCode::parse(&input).unwrap();
            let twice = RedemptionCode::parse(once.as_str()).unwrap();
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn parse_ignores_case_and_padding(input in "[a-z0-9]{4,12}", pad in " {0,3}") {
            let lower = RedemptionCode::parse(&format!("{pad}{input}{pad}")).unwrap();
            let upper = RedemptionCode::parse(&input.to_uppercase()).unwrap();
            prop_assert_eq!(lower, upper);
        }
    }
}
