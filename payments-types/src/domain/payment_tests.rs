//! Payment aggregate unit tests.

use chrono::{Duration, TimeZone};
use rust_decimal_macros::dec;

use super::*;
use crate::dto::{CreateCreditTransferInput, DebtorInput};

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 16, 9, 30, 0).unwrap()
}

fn transfer(amount: Decimal, currency: &str, e2e: &str) -> CreateCreditTransferInput {
    CreateCreditTransferInput {
        amount,
        currency: currency.into(),
        creditor_name: "Jane Doe".into(),
        creditor_iban: "FR7630006000011234567890189".into(),
        creditor_bic: "BNPAFRPP".into(),
        creditor_country: "FR".into(),
        end_to_end_id: e2e.into(),
        remittance_info: None,
    }
}

fn input(transfers: Vec<CreateCreditTransferInput>) -> CreatePaymentInput {
    CreatePaymentInput {
        credit_transfers: transfers,
        debtor: DebtorInput {
            name: "John Doe".into(),
            iban: "DE89370400440532013000".into(),
            bic: "COBADEFFXXX".into(),
            country: "DE".into(),
        },
        requested_execution_date: now().date_naive() + Duration::days(1),
        service_level: ServiceLevel::Sepa,
    }
}

fn payment() -> Payment {
    Payment::create_at(input(vec![transfer(dec!(1000), "EUR", "E2E-001")]), now()).unwrap()
}

fn cleared_payment() -> Payment {
    let mut p = payment();
    p.mark_as_cleared("CLR-2026-001").unwrap();
    p
}

#[test]
fn test_create_payment() {
    let p = payment();

    assert_eq!(p.status(), PaymentStatus::Initiated);
    assert_eq!(p.service_level(), ServiceLevel::Sepa);
    assert_eq!(p.debtor().name(), "John Doe");
    assert_eq!(p.number_of_transactions(), 1);
    assert_eq!(p.control_sum(), dec!(1000));
    assert_eq!(p.currency().as_str(), "EUR");
    assert_eq!(p.creation_date_time(), now());
    assert!(p.settlement_date().is_none());
    assert!(p.rejection_reason().is_none());
}

#[test]
fn test_message_id_format() {
    let p = payment();
    let parts: Vec<&str> = p.message_id().split('-').collect();

    assert_eq!(parts.len(), 3);
    assert_eq!(parts[0], "MSG");
    assert_eq!(parts[1], now().timestamp_millis().to_string());
    assert_eq!(parts[2].len(), 8);
    assert!(parts[2].bytes().all(|b| BASE36.contains(&b)));
}

#[test]
fn test_control_sum_and_total_amount() {
    let p = Payment::create_at(
        input(vec![
            transfer(dec!(1000), "EUR", "E2E-001"),
            transfer(dec!(500), "EUR", "E2E-002"),
        ]),
        now(),
    )
    .unwrap();

    assert_eq!(p.number_of_transactions(), 2);
    assert_eq!(p.control_sum(), dec!(1500));
    assert_eq!(p.total_amount().amount(), dec!(1500));
    assert_eq!(p.total_amount().to_string(), "EUR 1500.00");
}

#[test]
fn test_control_sum_may_exceed_single_amount_digits() {
    let big = dec!(9999999999999999.99);
    let p = Payment::create_at(
        input(vec![
            transfer(big, "EUR", "E2E-001"),
            transfer(big, "EUR", "E2E-002"),
        ]),
        now(),
    )
    .unwrap();

    assert_eq!(p.total_amount().amount(), dec!(19999999999999999.98));
    assert!(Money::create(p.control_sum(), "EUR").is_err());
    assert!(Payment::from_primitives(p.to_primitives()).is_ok());
}

#[test]
fn test_empty_transfers_rejected() {
    let err = Payment::create_at(input(vec![]), now()).unwrap_err();
    assert!(err.is_validation());
}

#[test]
fn test_mixed_currencies_rejected() {
    let err = Payment::create_at(
        input(vec![
            transfer(dec!(1000), "EUR", "E2E-001"),
            transfer(dec!(500), "USD", "E2E-002"),
        ]),
        now(),
    )
    .unwrap_err();

    assert!(err.is_validation());
    assert_eq!(err.payload()["currencies"], serde_json::json!(["EUR", "USD"]));
}

#[test]
fn test_currency_comparison_uses_cleaned_codes() {
    let p = Payment::create_at(
        input(vec![
            transfer(dec!(1), "eur", "E2E-001"),
            transfer(dec!(2), " EUR ", "E2E-002"),
        ]),
        now(),
    );
    assert!(p.is_ok());
}

#[test]
fn test_execution_date_today_accepted_yesterday_rejected() {
    let mut today = input(vec![transfer(dec!(1), "EUR", "E2E-001")]);
    today.requested_execution_date = now().date_naive();
    assert!(Payment::create_at(today, now()).is_ok());

    let mut yesterday = input(vec![transfer(dec!(1), "EUR", "E2E-001")]);
    yesterday.requested_execution_date = now().date_naive() - Duration::days(1);
    let err = Payment::create_at(yesterday, now()).unwrap_err();
    assert!(err.is_validation());
    assert_eq!(err.payload()["requestedExecutionDate"], "2026-10-15");
}

#[test]
fn test_invalid_debtor_rejected() {
    let mut bad = input(vec![transfer(dec!(1), "EUR", "E2E-001")]);
    bad.debtor.iban = "DE89370400440532013001".into();
    assert!(Payment::create_at(bad, now()).unwrap_err().is_validation());
}

#[test]
fn test_initiated_event_queued_once() {
    let p = Payment::create_at(
        input(vec![
            transfer(dec!(1000), "EUR", "E2E-001"),
            transfer(dec!(500), "EUR", "E2E-002"),
        ]),
        now(),
    )
    .unwrap();

    let events = p.domain_events();
    assert_eq!(events.len(), 1);
    match &events[0] {
        PaymentEvent::Initiated(e) => {
            assert_eq!(e.payment_id, p.id());
            assert_eq!(e.debtor_name, "John Doe");
            assert_eq!(e.total_amount, dec!(1500));
            assert_eq!(e.currency.as_str(), "EUR");
            assert_eq!(e.number_of_transfers, 2);
        }
        other => panic!("unexpected event {:?}", other),
    }
}

#[test]
fn test_mark_as_cleared() {
    let mut p = payment();
    p.mark_as_cleared("CLR-2026-001").unwrap();

    assert_eq!(p.status(), PaymentStatus::Cleared);
    assert_eq!(p.domain_events().len(), 2);
    assert!(matches!(
        &p.domain_events()[1],
        PaymentEvent::Cleared(e) if e.clearing_reference == "CLR-2026-001"
    ));
}

#[test]
fn test_clear_twice_is_invalid_transition() {
    let mut p = cleared_payment();
    let err = p.mark_as_cleared("CLR-2").unwrap_err();

    assert!(err.is_invalid_transition());
    assert_eq!(err.payload()["currentStatus"], "ACCC");
    assert_eq!(err.payload()["expectedStatus"], "ACSP");
    assert_eq!(p.domain_events().len(), 2);
}

#[test]
fn test_blank_clearing_reference_is_validation_error() {
    let mut p = payment();
    let err = p.mark_as_cleared("   ").unwrap_err();

    assert!(err.is_validation());
    assert_eq!(p.status(), PaymentStatus::Initiated);
    assert_eq!(p.domain_events().len(), 1);
}

#[test]
fn test_status_guard_runs_before_field_guard() {
    let mut p = cleared_payment();
    assert!(p.mark_as_cleared("").unwrap_err().is_invalid_transition());
}

#[test]
fn test_settle_before_clear_is_invalid_transition() {
    let mut p = payment();
    let err = p
        .mark_as_settled(NaiveDate::from_ymd_opt(2026, 10, 17).unwrap())
        .unwrap_err();

    assert!(err.is_invalid_transition());
    assert_eq!(err.payload()["currentStatus"], "ACSP");
    assert_eq!(err.payload()["expectedStatus"], "ACCC");
    assert!(p.settlement_date().is_none());
}

#[test]
fn test_mark_as_settled() {
    let mut p = cleared_payment();
    let date = NaiveDate::from_ymd_opt(2026, 10, 17).unwrap();
    p.mark_as_settled(date).unwrap();

    assert_eq!(p.status(), PaymentStatus::Settled);
    assert_eq!(p.settlement_date(), Some(date));
    assert!(matches!(
        p.domain_events().last(),
        Some(PaymentEvent::Settled(e)) if e.settlement_date == date
    ));
}

#[test]
fn test_reject_from_initiated_and_cleared() {
    let mut initiated = payment();
    initiated.reject("AC01").unwrap();
    assert_eq!(initiated.status(), PaymentStatus::Rejected);
    assert_eq!(initiated.rejection_reason(), Some("AC01"));

    let mut cleared = cleared_payment();
    cleared.reject("AM04").unwrap();
    assert_eq!(cleared.status(), PaymentStatus::Rejected);
    assert!(matches!(
        cleared.domain_events().last(),
        Some(PaymentEvent::Rejected(e)) if e.reason_code == "AM04"
    ));
}

#[test]
fn test_reject_from_terminal_states_fails() {
    let mut settled = cleared_payment();
    settled
        .mark_as_settled(NaiveDate::from_ymd_opt(2026, 10, 17).unwrap())
        .unwrap();
    let err = settled.reject("AC01").unwrap_err();
    assert!(err.is_invalid_transition());
    assert_eq!(err.payload()["currentStatus"], "ACSC");
    assert!(!err.payload().contains_key("expectedStatus"));

    let mut rejected = payment();
    rejected.reject("AC01").unwrap();
    assert!(rejected.reject("AC04").unwrap_err().is_invalid_transition());
    assert_eq!(rejected.rejection_reason(), Some("AC01"));
}

#[test]
fn test_reject_requires_reason() {
    let mut p = payment();
    assert!(p.reject(" ").unwrap_err().is_validation());
    assert_eq!(p.status(), PaymentStatus::Initiated);
}

#[test]
fn test_reject_accepts_unlisted_codes() {
    let mut p = payment();
    assert!(p.reject("ZZ99").is_ok());
}

#[test]
fn test_clear_domain_events_keeps_state() {
    let mut p = cleared_payment();
    p.clear_domain_events();

    assert!(p.domain_events().is_empty());
    assert_eq!(p.status(), PaymentStatus::Cleared);
}

#[test]
fn test_take_domain_events_drains() {
    let mut p = cleared_payment();
    let drained = p.take_domain_events();

    assert_eq!(drained.len(), 2);
    assert_eq!(drained[0].event_type(), "payment.initiated");
    assert_eq!(drained[1].event_type(), "payment.cleared");
    assert!(p.domain_events().is_empty());
}

#[test]
fn test_credit_transfers_copy_is_detached() {
    let p = Payment::create_at(
        input(vec![
            transfer(dec!(1000), "EUR", "E2E-001"),
            transfer(dec!(500), "EUR", "E2E-002"),
        ]),
        now(),
    )
    .unwrap();

    let mut copy = p.credit_transfers().to_vec();
    copy.clear();

    assert_eq!(p.credit_transfers().len(), 2);
    assert_eq!(p.control_sum(), dec!(1500));
}

#[test]
fn test_to_primitives_shape() {
    let mut p = cleared_payment();
    p.mark_as_settled(NaiveDate::from_ymd_opt(2026, 10, 17).unwrap())
        .unwrap();
    let prim = p.to_primitives();

    assert_eq!(prim.id, p.id().to_string());
    assert_eq!(prim.creation_date_time, "2026-10-16T09:30:00.000Z");
    assert_eq!(prim.requested_execution_date, "2026-10-17");
    assert_eq!(prim.settlement_date.as_deref(), Some("2026-10-17"));
    assert_eq!(prim.status, PaymentStatus::Settled);
    assert_eq!(prim.number_of_transactions, 1);
    assert_eq!(prim.control_sum, dec!(1000));
    assert_eq!(prim.currency, "EUR");
    assert_eq!(prim.debtor.account, "DE89370400440532013000");
    assert_eq!(prim.credit_transfers[0].end_to_end_id, "E2E-001");
}

#[test]
fn test_from_primitives_round_trip_without_events() {
    let p = cleared_payment();
    let prim = p.to_primitives();
    let restored = Payment::from_primitives(prim.clone()).unwrap();

    assert!(restored.domain_events().is_empty());
    assert_eq!(restored.id(), p.id());
    assert_eq!(restored.status(), PaymentStatus::Cleared);
    assert_eq!(restored.to_primitives(), prim);
}

#[test]
fn test_from_primitives_allows_past_execution_date() {
    let mut prim = payment().to_primitives();
    prim.requested_execution_date = "2020-01-01".into();
    assert!(Payment::from_primitives(prim).is_ok());
}

#[test]
fn test_from_primitives_detects_control_sum_mismatch() {
    let mut prim = payment().to_primitives();
    prim.control_sum = dec!(999.99);

    let err = Payment::from_primitives(prim).unwrap_err();
    assert!(err.is_validation());
    assert_eq!(err.payload()["actual"], "999.99");
}

#[test]
fn test_from_primitives_detects_count_and_currency_mismatch() {
    let mut prim = payment().to_primitives();
    prim.number_of_transactions = 2;
    assert!(Payment::from_primitives(prim).is_err());

    let mut prim = payment().to_primitives();
    prim.currency = "USD".into();
    assert!(Payment::from_primitives(prim).is_err());
}

#[test]
fn test_from_primitives_rejects_empty_and_inconsistent_records() {
    let mut empty = payment().to_primitives();
    empty.credit_transfers.clear();
    empty.number_of_transactions = 0;
    assert!(Payment::from_primitives(empty).is_err());

    let mut settled_without_date = payment().to_primitives();
    settled_without_date.status = PaymentStatus::Settled;
    assert!(Payment::from_primitives(settled_without_date).is_err());

    let mut reason_without_rejection = payment().to_primitives();
    reason_without_rejection.rejection_reason = Some("AC01".into());
    assert!(Payment::from_primitives(reason_without_rejection).is_err());
}

#[test]
fn test_from_primitives_rejects_bad_dates_and_ids() {
    let mut bad_date = payment().to_primitives();
    bad_date.requested_execution_date = "17/10/2026".into();
    assert!(Payment::from_primitives(bad_date).is_err());

    let mut bad_ts = payment().to_primitives();
    bad_ts.creation_date_time = "yesterday".into();
    assert!(Payment::from_primitives(bad_ts).is_err());

    let mut bad_id = payment().to_primitives();
    bad_id.id = "9b2c6f1e-8d4a-4f3b-9c2d-1a2b3c4d5e6f".into();
    assert!(Payment::from_primitives(bad_id).is_err());

    let mut bad_msg = payment().to_primitives();
    bad_msg.message_id = "M".repeat(36);
    assert!(Payment::from_primitives(bad_msg).is_err());
}
