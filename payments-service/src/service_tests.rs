//! PaymentService unit tests.

#[cfg(test)]
pub(crate) mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicBool, Ordering};

    use async_trait::async_trait;
    use chrono::{Days, NaiveDate, Utc};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    use payments_types::{
        AppError, CreateCreditTransferInput, CreatePaymentInput, DebtorInput, DomainError,
        EventPublisher, Payment, PaymentEvent, PaymentId, PaymentPrimitives, PaymentRepository,
        PaymentStatus, PublishError, RepoError, ServiceLevel,
    };

    use crate::{PaymentService, TracingPublisher};

    /// Simple in-memory repository for testing the service layer.
    pub struct MockRepo {
        payments: Mutex<HashMap<PaymentId, PaymentPrimitives>>,
        fail_saves: AtomicBool,
    }

    impl MockRepo {
        pub fn new() -> Self {
            Self {
                payments: Mutex::new(HashMap::new()),
                fail_saves: AtomicBool::new(false),
            }
        }

        fn stored_status(&self, id: PaymentId) -> Option<PaymentStatus> {
            self.payments.lock().unwrap().get(&id).map(|p| p.status)
        }
    }

    #[async_trait]
    impl PaymentRepository for MockRepo {
        async fn save(&self, payment: &Payment) -> Result<(), RepoError> {
            if self.fail_saves.load(Ordering::SeqCst) {
                return Err(RepoError::Database("disk full".into()));
            }
            self.payments
                .lock()
                .unwrap()
                .insert(payment.id(), payment.to_primitives());
            Ok(())
        }

        async fn find_by_id(&self, id: PaymentId) -> Result<Option<Payment>, RepoError> {
            let stored = self.payments.lock().unwrap().get(&id).cloned();
            Ok(stored.map(Payment::from_primitives).transpose()?)
        }

        async fn list(&self) -> Result<Vec<Payment>, RepoError> {
            let stored: Vec<PaymentPrimitives> =
                self.payments.lock().unwrap().values().cloned().collect();
            Ok(stored
                .into_iter()
                .map(Payment::from_primitives)
                .collect::<Result<Vec<_>, DomainError>>()?)
        }
    }

    /// Publisher that records what it was given, or fails on demand.
    pub struct RecordingPublisher {
        events: Mutex<Vec<PaymentEvent>>,
        fail: AtomicBool,
    }

    impl RecordingPublisher {
        pub fn new() -> Self {
            Self {
                events: Mutex::new(Vec::new()),
                fail: AtomicBool::new(false),
            }
        }

        fn event_types(&self) -> Vec<&'static str> {
            self.events
                .lock()
                .unwrap()
                .iter()
                .map(PaymentEvent::event_type)
                .collect()
        }
    }

    #[async_trait]
    impl EventPublisher for RecordingPublisher {
        async fn publish(&self, events: &[PaymentEvent]) -> Result<(), PublishError> {
            if self.fail.load(Ordering::SeqCst) {
                return Err(PublishError::Unavailable("broker down".into()));
            }
            self.events.lock().unwrap().extend_from_slice(events);
            Ok(())
        }
    }

    type Service = PaymentService<MockRepo, RecordingPublisher>;

    fn setup_service() -> Service {
        PaymentService::new(MockRepo::new(), RecordingPublisher::new())
    }

    fn tomorrow() -> NaiveDate {
        Utc::now().date_naive() + Days::new(1)
    }

    fn input(amounts: &[Decimal]) -> CreatePaymentInput {
        CreatePaymentInput {
            credit_transfers: amounts
                .iter()
                .enumerate()
                .map(|(i, amount)| CreateCreditTransferInput {
                    amount: *amount,
                    currency: "EUR".into(),
                    creditor_name: "Jane Doe".into(),
                    creditor_iban: "FR7630006000011234567890189".into(),
                    creditor_bic: "BNPAFRPP".into(),
                    creditor_country: "FR".into(),
                    end_to_end_id: format!("E2E-{:03}", i + 1),
                    remittance_info: None,
                })
                .collect(),
            debtor: DebtorInput {
                name: "John Doe".into(),
                iban: "DE89370400440532013000".into(),
                bic: "COBADEFFXXX".into(),
                country: "DE".into(),
            },
            requested_execution_date: tomorrow(),
            service_level: ServiceLevel::Sepa,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Creation
    // ─────────────────────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_create_payment_success() {
        let service = setup_service();

        let payment = service
            .create_payment(input(&[dec!(1000), dec!(500)]))
            .await
            .unwrap();

        assert_eq!(payment.status(), PaymentStatus::Initiated);
        assert_eq!(payment.control_sum(), dec!(1500));
        assert!(payment.domain_events().is_empty());
        assert_eq!(
            service.repo().stored_status(payment.id()),
            Some(PaymentStatus::Initiated)
        );
        assert_eq!(service.publisher().event_types(), ["payment.initiated"]);
    }

    #[tokio::test]
    async fn test_create_payment_validation_error() {
        let service = setup_service();
        let mut bad = input(&[dec!(10)]);
        bad.debtor.iban = "FR7630006000011234567890188".into();

        let result = service.create_payment(bad).await;

        assert!(matches!(
            result,
            Err(AppError::Domain(DomainError::Validation { .. }))
        ));
        assert!(service.repo().list().await.unwrap().is_empty());
        assert!(service.publisher().event_types().is_empty());
    }

    #[tokio::test]
    async fn test_create_payment_save_failure_publishes_nothing() {
        let service = setup_service();
        service.repo().fail_saves.store(true, Ordering::SeqCst);

        let result = service.create_payment(input(&[dec!(10)])).await;

        assert!(matches!(result, Err(AppError::Internal(_))));
        assert!(service.publisher().event_types().is_empty());
    }

    #[tokio::test]
    async fn test_publish_failure_does_not_fail_the_call() {
        let service = setup_service();
        service.publisher().fail.store(true, Ordering::SeqCst);

        let payment = service.create_payment(input(&[dec!(10)])).await.unwrap();

        assert_eq!(
            service.repo().stored_status(payment.id()),
            Some(PaymentStatus::Initiated)
        );
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Queries
    // ─────────────────────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_get_payment_not_found() {
        let service = setup_service();

        let result = service.get_payment(PaymentId::generate()).await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_list_payments() {
        let service = setup_service();
        service.create_payment(input(&[dec!(1)])).await.unwrap();
        service.create_payment(input(&[dec!(2)])).await.unwrap();

        let payments = service.list_payments().await.unwrap();

        assert_eq!(payments.len(), 2);
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Transitions
    // ─────────────────────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_clear_then_settle() {
        let service = setup_service();
        let created = service.create_payment(input(&[dec!(10)])).await.unwrap();

        service
            .mark_as_cleared(created.id(), "CLR-001")
            .await
            .unwrap();
        let settled = service
            .mark_as_settled(created.id(), tomorrow())
            .await
            .unwrap();

        assert_eq!(settled.status(), PaymentStatus::Settled);
        assert_eq!(settled.settlement_date(), Some(tomorrow()));
        assert_eq!(
            service.repo().stored_status(created.id()),
            Some(PaymentStatus::Settled)
        );
        assert_eq!(
            service.publisher().event_types(),
            ["payment.initiated", "payment.cleared", "payment.settled"]
        );
    }

    #[tokio::test]
    async fn test_settle_before_clearing_is_invalid_transition() {
        let service = setup_service();
        let created = service.create_payment(input(&[dec!(10)])).await.unwrap();

        let result = service.mark_as_settled(created.id(), tomorrow()).await;

        assert!(matches!(
            result,
            Err(AppError::Domain(DomainError::InvalidTransition {
                current_status: PaymentStatus::Initiated,
                ..
            }))
        ));
        assert_eq!(
            service.repo().stored_status(created.id()),
            Some(PaymentStatus::Initiated)
        );
        assert_eq!(service.publisher().event_types(), ["payment.initiated"]);
    }

    #[tokio::test]
    async fn test_reject_cleared_payment() {
        let service = setup_service();
        let created = service.create_payment(input(&[dec!(10)])).await.unwrap();
        service
            .mark_as_cleared(created.id(), "CLR-001")
            .await
            .unwrap();

        let rejected = service.reject(created.id(), "AM04").await.unwrap();

        assert_eq!(rejected.status(), PaymentStatus::Rejected);
        assert_eq!(rejected.rejection_reason(), Some("AM04"));
        assert!(matches!(
            service.reject(created.id(), "AM04").await,
            Err(AppError::Domain(DomainError::InvalidTransition { .. }))
        ));
    }

    #[tokio::test]
    async fn test_blank_reference_is_validation_error() {
        let service = setup_service();
        let created = service.create_payment(input(&[dec!(10)])).await.unwrap();

        let result = service.mark_as_cleared(created.id(), "   ").await;

        assert!(matches!(
            result,
            Err(AppError::Domain(DomainError::Validation { .. }))
        ));
    }

    #[tokio::test]
    async fn test_transition_on_missing_payment() {
        let service = setup_service();

        let result = service.reject(PaymentId::generate(), "AC01").await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_tracing_publisher_delegates() {
        let service = PaymentService::new(
            MockRepo::new(),
            TracingPublisher::new(RecordingPublisher::new()),
        );

        service.create_payment(input(&[dec!(10)])).await.unwrap();

        assert_eq!(
            service.publisher().inner().event_types(),
            ["payment.initiated"]
        );
    }
}
