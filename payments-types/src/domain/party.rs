//! Debtor (`<Dbtr>`) or creditor (`<Cdtr>`) of a payment.

use crate::domain::{Bic, Iban};
use crate::dto::PartyPrimitives;
use crate::error::DomainError;

const MAX_NAME_LENGTH: usize = 140;

/// Name + account + agent (bank) + country. A value object: equality is
/// structural over all four fields.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Party {
    name: String,
    account: Iban,
    agent: Bic,
    country: String,
}

impl Party {
    /// Validates name, country, account and agent in that order; the first failure wins.
    pub fn create(props: PartyPrimitives) -> Result<Self, DomainError> {
        let name = props.name.trim();
        if name.is_empty() {
            return Err(DomainError::validation("Party name is required").with("name", name));
        }
        if name.chars().count() > MAX_NAME_LENGTH {
            return Err(DomainError::validation(format!(
                "Party name cannot exceed {} characters (ISO 20022)",
                MAX_NAME_LENGTH
            ))
            .with("name", name));
        }

        let country = props.country.trim().to_uppercase();
        if country.len() != 2 || !country.bytes().all(|b| b.is_ascii_uppercase()) {
            return Err(
                DomainError::validation("Country must be ISO 3166-1 alpha-2")
                    .with("country", country),
            );
        }

        Ok(Self {
            name: name.to_string(),
            account: Iban::create(&props.account)?,
            agent: Bic::create(&props.agent)?,
            country,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn account(&self) -> &Iban {
        &self.account
    }

    pub fn agent(&self) -> &Bic {
        &self.agent
    }

    pub fn country(&self) -> &str {
        &self.country
    }

    pub fn to_primitives(&self) -> PartyPrimitives {
        PartyPrimitives {
            name: self.name.clone(),
            account: self.account.to_string(),
            agent: self.agent.to_string(),
            country: self.country.clone(),
        }
    }
}
