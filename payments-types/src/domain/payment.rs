//! Payment aggregate root (ISO 20022 pain.001 `CustomerCreditTransferInitiation`).
//!
//! ```text
//! <CstmrCdtTrfInitn>
//!   <GrpHdr>        → message_id, creation_date_time, number_of_transactions, control_sum
//!   <PmtInf>        → debtor, service_level, requested_execution_date
//!     <CdtTrfTxInf> → credit_transfers
//! ```
//!
//! Invariants, checked at construction and on every transition:
//! 1. at least one credit transfer
//! 2. every transfer uses the same currency
//! 3. the requested execution date is not before today (UTC) at creation
//! 4. status only moves along `Initiated → Cleared → Settled`, with `Rejected`
//!    reachable from `Initiated` or `Cleared`

use std::collections::BTreeSet;

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use rand::Rng;
use rust_decimal::Decimal;

use crate::domain::events::{
    PaymentCleared, PaymentEvent, PaymentInitiated, PaymentRejected, PaymentSettled,
};
use crate::domain::{
    CreditTransfer, Currency, Money, Party, PaymentId, PaymentStatus, ServiceLevel,
};
use crate::dto::{CreatePaymentInput, PartyPrimitives, PaymentPrimitives};
use crate::error::DomainError;

const ISO_DATE_FORMAT: &str = "%Y-%m-%d";
const MESSAGE_ID_PREFIX: &str = "MSG";
const MESSAGE_ID_RANDOM_LEN: usize = 8;
const MESSAGE_ID_MAX_LEN: usize = 35;
const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

#[derive(Debug, Clone)]
pub struct Payment {
    id: PaymentId,
    message_id: String,
    creation_date_time: DateTime<Utc>,
    status: PaymentStatus,
    service_level: ServiceLevel,
    requested_execution_date: NaiveDate,
    debtor: Party,
    credit_transfers: Vec<CreditTransfer>,
    settlement_date: Option<NaiveDate>,
    rejection_reason: Option<String>,
    domain_events: Vec<PaymentEvent>,
}

impl Payment {
    // ─────────────────────────────────────────────────────────────────────────────
    // Factories
    // ─────────────────────────────────────────────────────────────────────────────

    /// Initiates a new payment, queuing one `PaymentInitiated` event.
    pub fn create(input: CreatePaymentInput) -> Result<Self, DomainError> {
        Self::create_at(input, Utc::now())
    }

    /// Same as [`Payment::create`] with an explicit clock reading.
    ///
    /// "Today" for the execution-date check is the UTC date of `now`.
    pub fn create_at(input: CreatePaymentInput, now: DateTime<Utc>) -> Result<Self, DomainError> {
        if input.credit_transfers.is_empty() {
            return Err(DomainError::validation(
                "A payment must contain at least one credit transfer",
            ));
        }

        let today = now.date_naive();
        if input.requested_execution_date < today {
            return Err(
                DomainError::validation("Requested execution date cannot be in the past")
                    .with(
                        "requestedExecutionDate",
                        format_date(input.requested_execution_date),
                    )
                    .with("today", format_date(today)),
            );
        }

        let credit_transfers = input
            .credit_transfers
            .into_iter()
            .map(CreditTransfer::create)
            .collect::<Result<Vec<_>, _>>()?;

        ensure_single_currency(&credit_transfers)?;

        let debtor = Party::create(PartyPrimitives {
            name: input.debtor.name,
            account: input.debtor.iban,
            agent: input.debtor.bic,
            country: input.debtor.country,
        })?;

        let mut payment = Self {
            id: PaymentId::generate(),
            message_id: generate_message_id(now),
            creation_date_time: now,
            status: PaymentStatus::Initiated,
            service_level: input.service_level,
            requested_execution_date: input.requested_execution_date,
            debtor,
            credit_transfers,
            settlement_date: None,
            rejection_reason: None,
            domain_events: Vec::new(),
        };

        let initiated = PaymentEvent::Initiated(PaymentInitiated {
            payment_id: payment.id,
            occurred_at: now,
            debtor_name: payment.debtor.name().to_string(),
            total_amount: payment.control_sum(),
            currency: payment.currency().clone(),
            number_of_transfers: payment.number_of_transactions(),
        });
        payment.domain_events.push(initiated);

        Ok(payment)
    }

    /// Rehydrates a stored payment. No event is queued.
    ///
    /// Every value object is re-validated, and the stored group-header totals
    /// (`numberOfTransactions`, `controlSum`, `currency`) must match the transfers.
    /// The execution date is not compared with today.
    pub fn from_primitives(primitives: PaymentPrimitives) -> Result<Self, DomainError> {
        let id = PaymentId::parse(&primitives.id)?;
        let message_id = validate_message_id(primitives.message_id)?;
        let creation_date_time =
            parse_timestamp("creationDateTime", &primitives.creation_date_time)?;
        let requested_execution_date =
            parse_date("requestedExecutionDate", &primitives.requested_execution_date)?;
        let settlement_date = primitives
            .settlement_date
            .as_deref()
            .map(|raw| parse_date("settlementDate", raw))
            .transpose()?;

        let debtor = Party::create(primitives.debtor)?;
        let credit_transfers = primitives
            .credit_transfers
            .into_iter()
            .map(CreditTransfer::from_primitives)
            .collect::<Result<Vec<_>, _>>()?;

        if credit_transfers.is_empty() {
            return Err(DomainError::validation(
                "A payment must contain at least one credit transfer",
            )
            .with("id", primitives.id));
        }
        ensure_single_currency(&credit_transfers)?;

        let status = primitives.status;
        if (status == PaymentStatus::Settled) != settlement_date.is_some() {
            return Err(DomainError::validation(
                "Settlement date must be present exactly when the payment is settled",
            )
            .with("status", status.code())
            .with("settlementDate", primitives.settlement_date));
        }
        if (status == PaymentStatus::Rejected) != primitives.rejection_reason.is_some() {
            return Err(DomainError::validation(
                "Rejection reason must be present exactly when the payment is rejected",
            )
            .with("status", status.code())
            .with("rejectionReason", primitives.rejection_reason));
        }

        let payment = Self {
            id,
            message_id,
            creation_date_time,
            status,
            service_level: primitives.service_level,
            requested_execution_date,
            debtor,
            credit_transfers,
            settlement_date,
            rejection_reason: primitives.rejection_reason,
            domain_events: Vec::new(),
        };

        payment.verify_group_header(
            primitives.number_of_transactions,
            primitives.control_sum,
            &primitives.currency,
        )?;

        Ok(payment)
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────────

    pub fn id(&self) -> PaymentId {
        self.id
    }

    /// `<GrpHdr><MsgId>`, format `MSG-<epoch-ms>-<8 base36 chars>` for new payments.
    pub fn message_id(&self) -> &str {
        &self.message_id
    }

    pub fn creation_date_time(&self) -> DateTime<Utc> {
        self.creation_date_time
    }

    pub fn status(&self) -> PaymentStatus {
        self.status
    }

    pub fn service_level(&self) -> ServiceLevel {
        self.service_level
    }

    pub fn requested_execution_date(&self) -> NaiveDate {
        self.requested_execution_date
    }

    pub fn debtor(&self) -> &Party {
        &self.debtor
    }

    /// Read-only view of the transfers; copying it out cannot affect the aggregate.
    pub fn credit_transfers(&self) -> &[CreditTransfer] {
        &self.credit_transfers
    }

    pub fn settlement_date(&self) -> Option<NaiveDate> {
        self.settlement_date
    }

    pub fn rejection_reason(&self) -> Option<&str> {
        self.rejection_reason.as_deref()
    }

    /// Events queued since creation or the last drain.
    pub fn domain_events(&self) -> &[PaymentEvent] {
        &self.domain_events
    }

    pub fn clear_domain_events(&mut self) {
        self.domain_events.clear();
    }

    /// Drains the event queue.
    pub fn take_domain_events(&mut self) -> Vec<PaymentEvent> {
        std::mem::take(&mut self.domain_events)
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Group header totals (derived, never stored)
    // ─────────────────────────────────────────────────────────────────────────────

    /// `<NbOfTxs>`
    pub fn number_of_transactions(&self) -> usize {
        self.credit_transfers.len()
    }

    /// `<CtrlSum>`: sum of all transfer amounts.
    pub fn control_sum(&self) -> Decimal {
        self.credit_transfers
            .iter()
            .map(|ct| ct.amount().amount())
            .sum()
    }

    /// Common currency of all transfers.
    pub fn currency(&self) -> &Currency {
        // Non-empty: enforced by both `create_at` and `from_primitives`.
        self.credit_transfers[0].amount().currency()
    }

    pub fn total_amount(&self) -> Money {
        Money::from_validated(self.control_sum(), self.currency().clone())
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Transitions
    // ─────────────────────────────────────────────────────────────────────────────

    /// Interbank clearing confirmed (pacs.002 `ACCC`). `Initiated → Cleared`.
    pub fn mark_as_cleared(&mut self, clearing_reference: &str) -> Result<(), DomainError> {
        self.assert_status(PaymentStatus::Initiated, "clear")?;

        if clearing_reference.trim().is_empty() {
            return Err(DomainError::validation("Clearing reference is required")
                .with("clearingReference", clearing_reference));
        }

        self.status = PaymentStatus::Cleared;
        self.domain_events.push(PaymentEvent::Cleared(PaymentCleared {
            payment_id: self.id,
            occurred_at: Utc::now(),
            clearing_reference: clearing_reference.to_string(),
        }));
        Ok(())
    }

    /// Funds credited to the beneficiary (pacs.002 `ACSC`). `Cleared → Settled`.
    pub fn mark_as_settled(&mut self, settlement_date: NaiveDate) -> Result<(), DomainError> {
        self.assert_status(PaymentStatus::Cleared, "settle")?;

        self.status = PaymentStatus::Settled;
        self.settlement_date = Some(settlement_date);
        self.domain_events.push(PaymentEvent::Settled(PaymentSettled {
            payment_id: self.id,
            occurred_at: Utc::now(),
            settlement_date,
        }));
        Ok(())
    }

    /// Rejected with an ISO 20022 reason code (pacs.002 `RJCT`, e.g. `AC01`, `AM04`).
    /// `Initiated | Cleared → Rejected`.
    ///
    /// Any non-blank code is accepted; it is not checked against the external code list.
    pub fn reject(&mut self, reason_code: &str) -> Result<(), DomainError> {
        if !matches!(
            self.status,
            PaymentStatus::Initiated | PaymentStatus::Cleared
        ) {
            return Err(DomainError::invalid_transition("reject", self.status, None));
        }

        if reason_code.trim().is_empty() {
            return Err(DomainError::validation("Rejection reason code is required")
                .with("reasonCode", reason_code));
        }

        self.status = PaymentStatus::Rejected;
        self.rejection_reason = Some(reason_code.to_string());
        self.domain_events.push(PaymentEvent::Rejected(PaymentRejected {
            payment_id: self.id,
            occurred_at: Utc::now(),
            reason_code: reason_code.to_string(),
        }));
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Serialization
    // ─────────────────────────────────────────────────────────────────────────────

    pub fn to_primitives(&self) -> PaymentPrimitives {
        PaymentPrimitives {
            id: self.id.to_string(),
            message_id: self.message_id.clone(),
            creation_date_time: self
                .creation_date_time
                .to_rfc3339_opts(SecondsFormat::Millis, true),
            status: self.status,
            service_level: self.service_level,
            requested_execution_date: format_date(self.requested_execution_date),
            debtor: self.debtor.to_primitives(),
            credit_transfers: self
                .credit_transfers
                .iter()
                .map(CreditTransfer::to_primitives)
                .collect(),
            number_of_transactions: self.number_of_transactions(),
            control_sum: self.control_sum(),
            currency: self.currency().to_string(),
            settlement_date: self.settlement_date.map(format_date),
            rejection_reason: self.rejection_reason.clone(),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Internals
    // ─────────────────────────────────────────────────────────────────────────────

    fn assert_status(
        &self,
        expected: PaymentStatus,
        action: &'static str,
    ) -> Result<(), DomainError> {
        if self.status != expected {
            return Err(DomainError::invalid_transition(
                action,
                self.status,
                Some(expected),
            ));
        }
        Ok(())
    }

    fn verify_group_header(
        &self,
        number_of_transactions: usize,
        control_sum: Decimal,
        currency: &str,
    ) -> Result<(), DomainError> {
        if number_of_transactions != self.number_of_transactions() {
            return Err(DomainError::validation(
                "Number of transactions does not match the credit transfers",
            )
            .with("expected", self.number_of_transactions())
            .with("actual", number_of_transactions));
        }
        if control_sum != self.control_sum() {
            return Err(DomainError::validation(
                "Control sum does not match the total of the credit transfers",
            )
            .with("expected", self.control_sum().to_string())
            .with("actual", control_sum.to_string()));
        }
        if currency.trim().to_uppercase() != self.currency().as_str() {
            return Err(
                DomainError::validation("Currency does not match the credit transfers")
                    .with("expected", self.currency().as_str())
                    .with("actual", currency),
            );
        }
        Ok(())
    }
}

fn ensure_single_currency(credit_transfers: &[CreditTransfer]) -> Result<(), DomainError> {
    let currencies: BTreeSet<&str> = credit_transfers
        .iter()
        .map(|ct| ct.amount().currency().as_str())
        .collect();

    if currencies.len() > 1 {
        return Err(DomainError::validation(
            "All credit transfers in a payment must use the same currency",
        )
        .with("currencies", currencies.into_iter().collect::<Vec<_>>()));
    }
    Ok(())
}

fn generate_message_id(now: DateTime<Utc>) -> String {
    let mut rng = rand::rng();
    let random: String = (0..MESSAGE_ID_RANDOM_LEN)
        .map(|_| char::from(BASE36[rng.random_range(0..BASE36.len())]))
        .collect();
    format!("{}-{}-{}", MESSAGE_ID_PREFIX, now.timestamp_millis(), random)
}

/// `<MsgId>` is `Max35Text`.
fn validate_message_id(message_id: String) -> Result<String, DomainError> {
    let trimmed = message_id.trim();
    if trimmed.is_empty() || trimmed.chars().count() > MESSAGE_ID_MAX_LEN {
        return Err(DomainError::validation("Message id must be 1 to 35 characters")
            .with("messageId", message_id));
    }
    Ok(message_id)
}

fn format_date(date: NaiveDate) -> String {
    date.format(ISO_DATE_FORMAT).to_string()
}

fn parse_date(field: &str, raw: &str) -> Result<NaiveDate, DomainError> {
    NaiveDate::parse_from_str(raw, ISO_DATE_FORMAT).map_err(|_| {
        DomainError::validation("Invalid ISO-8601 date").with(field, raw)
    })
}

fn parse_timestamp(field: &str, raw: &str) -> Result<DateTime<Utc>, DomainError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|_| DomainError::validation("Invalid ISO-8601 timestamp").with(field, raw))
}

#[cfg(test)]
#[path = "payment_tests.rs"]
mod tests;
