//! End-to-end identifier of a credit transfer (`<PmtId><EndToEndId>`).
//!
//! Assigned by the initiating party and passed on unchanged through
//! pain.001 → pacs.008 → pacs.002. Max 35 characters; `NOTPROVIDED` when absent.

use std::fmt;

use crate::error::DomainError;

const MAX_LENGTH: usize = 35;
const NOT_PROVIDED: &str = "NOTPROVIDED";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EndToEndId(String);

impl EndToEndId {
    pub fn create(value: &str) -> Result<Self, DomainError> {
        let cleaned = value.trim();

        if cleaned.is_empty() {
            return Err(
                DomainError::validation("EndToEndId cannot be empty").with("value", cleaned)
            );
        }
        if cleaned.chars().count() > MAX_LENGTH {
            return Err(DomainError::validation(format!(
                "EndToEndId cannot exceed {} characters (ISO 20022)",
                MAX_LENGTH
            ))
            .with("value", cleaned));
        }

        Ok(Self(cleaned.to_string()))
    }

    /// The ISO 20022 sentinel used when the client supplied no identifier.
    pub fn not_provided() -> Self {
        Self(NOT_PROVIDED.to_string())
    }

    pub fn is_provided(&self) -> bool {
        self.0 != NOT_PROVIDED
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EndToEndId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
