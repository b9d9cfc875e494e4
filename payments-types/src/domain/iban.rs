//! ISO 13616 International Bank Account Number.
//!
//! Format: 2 letters (country) + 2 check digits + 4-30 alphanumeric (BBAN),
//! e.g. `FR7630006000011234567890189`. Appears in `<DbtrAcct>` / `<CdtrAcct>`.

use std::fmt;

use crate::error::DomainError;

const CHECK_DIGITS_END: usize = 4;
const MIN_BBAN_LEN: usize = 4;
const MAX_BBAN_LEN: usize = 30;

/// Validated IBAN, stored uppercase without whitespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Iban(String);

impl Iban {
    /// Cleans (strip whitespace, uppercase), then checks format and MOD-97 checksum.
    pub fn create(value: &str) -> Result<Self, DomainError> {
        let cleaned: String = value
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_uppercase();

        if cleaned.is_empty() {
            return Err(DomainError::validation("IBAN cannot be empty").with("value", cleaned));
        }
        if !has_valid_format(&cleaned) {
            return Err(
                DomainError::validation("Invalid IBAN format (ISO 13616)").with("value", cleaned)
            );
        }
        if mod97(&cleaned) != 1 {
            return Err(DomainError::validation("Invalid IBAN checksum").with("value", cleaned));
        }

        Ok(Self(cleaned))
    }

    /// ISO 3166-1 country prefix.
    pub fn country_code(&self) -> &str {
        &self.0[..2]
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Iban {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// `^[A-Z]{2}\d{2}[A-Z0-9]{4,30}$`
fn has_valid_format(value: &str) -> bool {
    let bytes = value.as_bytes();
    let bban_len = bytes.len().saturating_sub(CHECK_DIGITS_END);
    if !(MIN_BBAN_LEN..=MAX_BBAN_LEN).contains(&bban_len) {
        return false;
    }
    bytes[..2].iter().all(u8::is_ascii_uppercase)
        && bytes[2..4].iter().all(u8::is_ascii_digit)
        && bytes[4..]
            .iter()
            .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit())
}

/// ISO 7064 MOD 97-10 over the rearranged IBAN.
///
/// The first four characters move to the tail and letters expand to 10..=35.
/// The remainder is folded digit by digit so no big integer is needed.
/// Expects input that already passed `has_valid_format`.
fn mod97(value: &str) -> u32 {
    let (head, tail) = value.split_at(CHECK_DIGITS_END);
    tail.bytes().chain(head.bytes()).fold(0u32, |rem, b| {
        if b.is_ascii_digit() {
            (rem * 10 + u32::from(b - b'0')) % 97
        } else {
            (rem * 100 + u32::from(b - b'A') + 10) % 97
        }
    })
}
