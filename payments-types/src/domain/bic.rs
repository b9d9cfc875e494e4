//! ISO 9362 Business Identifier Code (BIC / SWIFT code).
//!
//! `AAAA BB CC (DDD)`: institution, country, location, optional branch
//! (`XXX` = head office). Example: `BNPAFRPP`.

use std::fmt;

use crate::error::DomainError;

const INSTITUTION_END: usize = 4;
const COUNTRY_END: usize = 6;
const LOCATION_END: usize = 8;
const WITH_BRANCH_LEN: usize = 11;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Bic(String);

impl Bic {
    /// Cleans (trim, uppercase) and validates an 8 or 11 character BIC.
    pub fn create(value: &str) -> Result<Self, DomainError> {
        let cleaned = value.trim().to_uppercase();

        if cleaned.is_empty() {
            return Err(DomainError::validation("BIC cannot be empty").with("value", cleaned));
        }
        if !has_valid_format(&cleaned) {
            return Err(
                DomainError::validation("Invalid BIC format (ISO 9362)").with("value", cleaned)
            );
        }

        Ok(Self(cleaned))
    }

    pub fn institution_code(&self) -> &str {
        &self.0[..INSTITUTION_END]
    }

    pub fn country_code(&self) -> &str {
        &self.0[INSTITUTION_END..COUNTRY_END]
    }

    pub fn location_code(&self) -> &str {
        &self.0[COUNTRY_END..LOCATION_END]
    }

    pub fn branch_code(&self) -> Option<&str> {
        self.0.get(LOCATION_END..).filter(|branch| !branch.is_empty())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Bic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// `^[A-Z]{4}[A-Z]{2}[A-Z0-9]{2}([A-Z0-9]{3})?$`
fn has_valid_format(value: &str) -> bool {
    let bytes = value.as_bytes();
    if bytes.len() != LOCATION_END && bytes.len() != WITH_BRANCH_LEN {
        return false;
    }
    let alnum = |b: &u8| b.is_ascii_uppercase() || b.is_ascii_digit();
    bytes[..COUNTRY_END].iter().all(u8::is_ascii_uppercase)
        && bytes[COUNTRY_END..].iter().all(alnum)
}
