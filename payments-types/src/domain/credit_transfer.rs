//! A single transaction line within a payment (`<CdtTrfTxInf>`).

use crate::domain::{CreditTransferId, EndToEndId, Money, Party};
use crate::dto::{CreateCreditTransferInput, CreditTransferPrimitives, PartyPrimitives};
use crate::error::DomainError;

/// Unstructured remittance information (`<RmtInf><Ustrd>`) limit.
const MAX_REMITTANCE_LENGTH: usize = 140;

/// Entity owned by a `Payment`; identity is its own id. The debtor lives on the payment.
#[derive(Debug, Clone, PartialEq)]
pub struct CreditTransfer {
    id: CreditTransferId,
    end_to_end_id: EndToEndId,
    amount: Money,
    creditor: Party,
    remittance_info: Option<String>,
}

impl CreditTransfer {
    /// Builds a new transfer with a freshly generated id.
    pub fn create(input: CreateCreditTransferInput) -> Result<Self, DomainError> {
        validate_remittance_info(input.remittance_info.as_deref())?;

        Ok(Self {
            id: CreditTransferId::generate(),
            end_to_end_id: EndToEndId::create(&input.end_to_end_id)?,
            amount: Money::create(input.amount, &input.currency)?,
            creditor: Party::create(PartyPrimitives {
                name: input.creditor_name,
                account: input.creditor_iban,
                agent: input.creditor_bic,
                country: input.creditor_country,
            })?,
            remittance_info: input.remittance_info,
        })
    }

    /// Rehydrates a stored transfer, keeping its id.
    pub fn from_primitives(primitives: CreditTransferPrimitives) -> Result<Self, DomainError> {
        validate_remittance_info(primitives.remittance_info.as_deref())?;

        Ok(Self {
            id: CreditTransferId::parse(&primitives.id)?,
            end_to_end_id: EndToEndId::create(&primitives.end_to_end_id)?,
            amount: Money::create(primitives.amount, &primitives.currency)?,
            creditor: Party::create(primitives.creditor)?,
            remittance_info: primitives.remittance_info,
        })
    }

    pub fn id(&self) -> CreditTransferId {
        self.id
    }

    pub fn end_to_end_id(&self) -> &EndToEndId {
        &self.end_to_end_id
    }

    pub fn amount(&self) -> &Money {
        &self.amount
    }

    pub fn creditor(&self) -> &Party {
        &self.creditor
    }

    pub fn remittance_info(&self) -> Option<&str> {
        self.remittance_info.as_deref()
    }

    pub fn to_primitives(&self) -> CreditTransferPrimitives {
        CreditTransferPrimitives {
            id: self.id.to_string(),
            end_to_end_id: self.end_to_end_id.to_string(),
            amount: self.amount.amount(),
            currency: self.amount.currency().to_string(),
            creditor: self.creditor.to_primitives(),
            remittance_info: self.remittance_info.clone(),
        }
    }
}

fn validate_remittance_info(remittance_info: Option<&str>) -> Result<(), DomainError> {
    match remittance_info {
        Some(info) if info.chars().count() > MAX_REMITTANCE_LENGTH => Err(DomainError::validation(
            format!(
                "Remittance info cannot exceed {} characters (ISO 20022)",
                MAX_REMITTANCE_LENGTH
            ),
        )
        .with("remittanceInfo", info)),
        _ => Ok(()),
    }
}
