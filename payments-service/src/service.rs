//! Payment Application Service
//!
//! Orchestrates the `Payment` aggregate through the repository and publisher ports.
//! Contains NO infrastructure logic - load, transition, save, publish.

use chrono::NaiveDate;
use tracing::{info, warn};

use payments_types::{
    AppError, CreatePaymentInput, EventPublisher, Payment, PaymentId, PaymentRepository,
};

/// Application service for payment operations.
///
/// Generic over `R: PaymentRepository` and `P: EventPublisher` - adapters are
/// injected at compile time.
pub struct PaymentService<R: PaymentRepository, P: EventPublisher> {
    repo: R,
    publisher: P,
}

impl<R: PaymentRepository, P: EventPublisher> PaymentService<R, P> {
    /// Creates a new payment service with the given adapters.
    pub fn new(repo: R, publisher: P) -> Self {
        Self { repo, publisher }
    }

    /// Returns a reference to the underlying repository.
    pub fn repo(&self) -> &R {
        &self.repo
    }

    /// Returns a reference to the underlying publisher.
    pub fn publisher(&self) -> &P {
        &self.publisher
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Initiation
    // ─────────────────────────────────────────────────────────────────────────────

    /// Validates and stores a new payment in status `ACSP`.
    #[tracing::instrument(skip_all, fields(transfers = input.credit_transfers.len()))]
    pub async fn create_payment(&self, input: CreatePaymentInput) -> Result<Payment, AppError> {
        let payment = Payment::create(input)?;
        info!(
            payment_id = %payment.id(),
            message_id = payment.message_id(),
            control_sum = %payment.control_sum(),
            currency = %payment.currency(),
            "payment initiated"
        );
        self.persist(payment).await
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Queries
    // ─────────────────────────────────────────────────────────────────────────────

    /// Gets a payment by ID.
    pub async fn get_payment(&self, id: PaymentId) -> Result<Payment, AppError> {
        self.repo
            .find_by_id(id)
            .await
            .map_err(Into::into)
            .and_then(|opt| opt.ok_or_else(|| AppError::NotFound(format!("Payment {}", id))))
    }

    /// Lists all payments, newest first.
    pub async fn list_payments(&self) -> Result<Vec<Payment>, AppError> {
        self.repo.list().await.map_err(Into::into)
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Status transitions
    // ─────────────────────────────────────────────────────────────────────────────

    /// `ACSP -> ACCC`.
    #[tracing::instrument(skip(self, id), fields(payment_id = %id))]
    pub async fn mark_as_cleared(
        &self,
        id: PaymentId,
        clearing_reference: &str,
    ) -> Result<Payment, AppError> {
        let mut payment = self.get_payment(id).await?;
        payment.mark_as_cleared(clearing_reference)?;
        info!(clearing_reference, "payment cleared");
        self.persist(payment).await
    }

    /// `ACCC -> ACSC`.
    #[tracing::instrument(skip(self, id), fields(payment_id = %id))]
    pub async fn mark_as_settled(
        &self,
        id: PaymentId,
        settlement_date: NaiveDate,
    ) -> Result<Payment, AppError> {
        let mut payment = self.get_payment(id).await?;
        payment.mark_as_settled(settlement_date)?;
        info!(%settlement_date, "payment settled");
        self.persist(payment).await
    }

    /// `ACSP | ACCC -> RJCT`.
    #[tracing::instrument(skip(self, id), fields(payment_id = %id))]
    pub async fn reject(&self, id: PaymentId, reason_code: &str) -> Result<Payment, AppError> {
        let mut payment = self.get_payment(id).await?;
        payment.reject(reason_code)?;
        info!(reason_code, "payment rejected");
        self.persist(payment).await
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Helpers
    // ─────────────────────────────────────────────────────────────────────────────

    /// Saves the aggregate, then drains and publishes its events.
    ///
    /// The state change is durable once `save` returns, so a publish failure is
    /// only logged.
    async fn persist(&self, mut payment: Payment) -> Result<Payment, AppError> {
        self.repo.save(&payment).await?;

        let events = payment.take_domain_events();
        if events.is_empty() {
            return Ok(payment);
        }

        if let Err(e) = self.publisher.publish(&events).await {
            warn!(
                payment_id = %payment.id(),
                dropped = events.len(),
                error = %e,
                "failed to publish payment events"
            );
        }

        Ok(payment)
    }
}
