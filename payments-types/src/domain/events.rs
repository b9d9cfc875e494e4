//! Domain events of the payment lifecycle.
//!
//! Each event records one transition. In ISO 20022 terms:
//! - `PaymentInitiated`: pain.001 sent to the bank
//! - `PaymentCleared`: pacs.002 with `<TxSts>ACCC`
//! - `PaymentSettled`: pacs.002 with `<TxSts>ACSC`
//! - `PaymentRejected`: pacs.002 with `<TxSts>RJCT` and `<Rsn><Cd>`
//!
//! Events are queued on the aggregate and drained by the caller; the aggregate never publishes.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::PaymentId;
use super::money::Currency;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentInitiated {
    #[serde(with = "payment_id_str")]
    pub payment_id: PaymentId,
    pub occurred_at: DateTime<Utc>,
    pub debtor_name: String,
    pub total_amount: Decimal,
    pub currency: Currency,
    pub number_of_transfers: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentCleared {
    #[serde(with = "payment_id_str")]
    pub payment_id: PaymentId,
    pub occurred_at: DateTime<Utc>,
    pub clearing_reference: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentSettled {
    #[serde(with = "payment_id_str")]
    pub payment_id: PaymentId,
    pub occurred_at: DateTime<Utc>,
    pub settlement_date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRejected {
    #[serde(with = "payment_id_str")]
    pub payment_id: PaymentId,
    pub occurred_at: DateTime<Utc>,
    pub reason_code: String,
}

/// Any event raised by the `Payment` aggregate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "eventType")]
pub enum PaymentEvent {
    #[serde(rename = "payment.initiated")]
    Initiated(PaymentInitiated),
    #[serde(rename = "payment.cleared")]
    Cleared(PaymentCleared),
    #[serde(rename = "payment.settled")]
    Settled(PaymentSettled),
    #[serde(rename = "payment.rejected")]
    Rejected(PaymentRejected),
}

impl PaymentEvent {
    pub fn event_type(&self) -> &'static str {
        match self {
            PaymentEvent::Initiated(_) => "payment.initiated",
            PaymentEvent::Cleared(_) => "payment.cleared",
            PaymentEvent::Settled(_) => "payment.settled",
            PaymentEvent::Rejected(_) => "payment.rejected",
        }
    }

    pub fn payment_id(&self) -> PaymentId {
        match self {
            PaymentEvent::Initiated(e) => e.payment_id,
            PaymentEvent::Cleared(e) => e.payment_id,
            PaymentEvent::Settled(e) => e.payment_id,
            PaymentEvent::Rejected(e) => e.payment_id,
        }
    }

    pub fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            PaymentEvent::Initiated(e) => e.occurred_at,
            PaymentEvent::Cleared(e) => e.occurred_at,
            PaymentEvent::Settled(e) => e.occurred_at,
            PaymentEvent::Rejected(e) => e.occurred_at,
        }
    }
}

mod payment_id_str {
    use serde::{Deserialize, Deserializer, Serializer};

    use crate::domain::PaymentId;

    pub fn serialize<S: Serializer>(id: &PaymentId, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(id)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<PaymentId, D::Error> {
        let raw = String::deserialize(deserializer)?;
        PaymentId::parse(&raw).map_err(serde::de::Error::custom)
    }
}
