//! Monetary amount with an ISO 4217 currency.
//!
//! ISO 20022 amounts allow up to 18 digits (integer + fraction), e.g.
//! `<IntrBkSttlmAmt Ccy="EUR">12500.00</IntrBkSttlmAmt>`.

use std::fmt;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

const MAX_ISO20022_DIGITS: usize = 18;
const DISPLAY_DECIMALS: u32 = 2;

/// ISO 4217 alphabetic currency code (three uppercase letters).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Currency(String);

impl Currency {
    /// Cleans (trim, uppercase) and validates a currency code.
    pub fn parse(value: &str) -> Result<Self, DomainError> {
        let cleaned = value.trim().to_uppercase();
        if cleaned.len() != 3 || !cleaned.bytes().all(|b| b.is_ascii_uppercase()) {
            return Err(DomainError::validation("Invalid ISO 4217 currency code")
                .with("currency", cleaned));
        }
        Ok(Self(cleaned))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Currency {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Currency::parse(&value)
    }
}

impl From<Currency> for String {
    fn from(currency: Currency) -> Self {
        currency.0
    }
}

/// Immutable monetary value. Every operation returns a new instance.
///
/// Equality is structural and numeric on the amount (`10.5 EUR == 10.50 EUR`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Money {
    amount: Decimal,
    currency: Currency,
}

impl Money {
    /// Creates a validated Money value.
    ///
    /// # Validation
    /// - amount must not be negative
    /// - at most 18 significant digits
    /// - currency must be a 3-letter code (after trim/uppercase)
    pub fn create(amount: Decimal, currency: &str) -> Result<Self, DomainError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(DomainError::validation("Amount cannot be negative")
                .with("amount", amount.to_string()));
        }

        let digits = digit_count(amount);
        if digits > MAX_ISO20022_DIGITS {
            return Err(DomainError::validation(format!(
                "Amount exceeds ISO 20022 maximum of {} digits",
                MAX_ISO20022_DIGITS
            ))
            .with("amount", amount.to_string()));
        }

        let currency = Currency::parse(currency)?;
        Ok(Self { amount, currency })
    }

    /// Wraps an amount derived from validated amounts without re-checking it.
    ///
    /// A sum of valid amounts (the control sum) may exceed the 18-digit cap that
    /// `create` enforces on a single amount.
    pub(crate) fn from_validated(amount: Decimal, currency: Currency) -> Self {
        Self { amount, currency }
    }

    /// Zero amount in the given currency.
    pub fn zero(currency: Currency) -> Self {
        Self {
            amount: Decimal::ZERO,
            currency,
        }
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn currency(&self) -> &Currency {
        &self.currency
    }

    /// Adds two amounts of the same currency.
    pub fn add(&self, other: &Money) -> Result<Money, DomainError> {
        self.assert_same_currency(other)?;
        let amount = self.amount.checked_add(other.amount).ok_or_else(|| {
            DomainError::validation("Addition overflows the supported amount range")
                .with("left", self.amount.to_string())
                .with("right", other.amount.to_string())
        })?;
        Ok(Money {
            amount,
            currency: self.currency.clone(),
        })
    }

    /// Subtracts an amount of the same currency; the result may not go negative.
    pub fn subtract(&self, other: &Money) -> Result<Money, DomainError> {
        self.assert_same_currency(other)?;
        if self.amount < other.amount {
            return Err(
                DomainError::validation("Subtraction would result in negative amount")
                    .with("left", self.amount.to_string())
                    .with("right", other.amount.to_string()),
            );
        }
        Ok(Money {
            amount: self.amount - other.amount,
            currency: self.currency.clone(),
        })
    }

    fn assert_same_currency(&self, other: &Money) -> Result<(), DomainError> {
        if self.currency != other.currency {
            return Err(
                DomainError::validation("Cannot operate on different currencies")
                    .with("left", self.currency.as_str())
                    .with("right", other.currency.as_str()),
            );
        }
        Ok(())
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Half-up on exact midpoints: 0.125 prints as 0.13.
        let mut rounded = self
            .amount
            .round_dp_with_strategy(DISPLAY_DECIMALS, RoundingStrategy::MidpointAwayFromZero);
        rounded.rescale(DISPLAY_DECIMALS);
        write!(f, "{} {}", self.currency, rounded)
    }
}

/// Counts the significant digits of an amount, ignoring the decimal point.
fn digit_count(amount: Decimal) -> usize {
    amount
        .normalize()
        .abs()
        .to_string()
        .chars()
        .filter(char::is_ascii_digit)
        .count()
}
