//! Plain-data shapes crossing the domain boundary.
//!
//! Inputs feed the factories; primitives are the flattened, serializable form used
//! by persistence adapters (`to_primitives` / `from_primitives`).

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::{PaymentStatus, ServiceLevel};

// ─────────────────────────────────────────────────────────────────────────────
// Inputs
// ─────────────────────────────────────────────────────────────────────────────

/// One transaction line of a payment to create.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCreditTransferInput {
    pub amount: Decimal,
    pub currency: String,
    pub creditor_name: String,
    pub creditor_iban: String,
    pub creditor_bic: String,
    pub creditor_country: String,
    pub end_to_end_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remittance_info: Option<String>,
}

/// Debtor details of a payment to create.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DebtorInput {
    pub name: String,
    pub iban: String,
    pub bic: String,
    pub country: String,
}

/// Everything needed to initiate a payment (pain.001).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePaymentInput {
    pub credit_transfers: Vec<CreateCreditTransferInput>,
    pub debtor: DebtorInput,
    pub requested_execution_date: NaiveDate,
    pub service_level: ServiceLevel,
}

// ─────────────────────────────────────────────────────────────────────────────
// Primitives
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartyPrimitives {
    pub name: String,
    pub account: String,
    pub agent: String,
    pub country: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditTransferPrimitives {
    pub id: String,
    pub end_to_end_id: String,
    pub amount: Decimal,
    pub currency: String,
    pub creditor: PartyPrimitives,
    pub remittance_info: Option<String>,
}

/// Flattened `Payment`. Dates are ISO-8601 strings: full timestamp for
/// `creation_date_time`, date-only for execution and settlement dates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentPrimitives {
    pub id: String,
    pub message_id: String,
    pub creation_date_time: String,
    pub status: PaymentStatus,
    pub service_level: ServiceLevel,
    pub requested_execution_date: String,
    pub debtor: PartyPrimitives,
    pub credit_transfers: Vec<CreditTransferPrimitives>,
    pub number_of_transactions: usize,
    pub control_sum: Decimal,
    pub currency: String,
    pub settlement_date: Option<String>,
    pub rejection_reason: Option<String>,
}
