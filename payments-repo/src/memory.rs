//! In-memory adapters.
//!
//! Payments are stored in their primitive form and rehydrated on every read, so
//! a load here goes through the same `from_primitives` checks as a database load.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use dashmap::DashMap;

use payments_types::{
    EventPublisher, Payment, PaymentEvent, PaymentId, PaymentPrimitives, PaymentRepository,
    PublishError, RepoError,
};

// ─────────────────────────────────────────────────────────────────────────────
// Payment repository
// ─────────────────────────────────────────────────────────────────────────────

/// `PaymentRepository` backed by a concurrent map. Clones share the same store.
#[derive(Debug, Clone, Default)]
pub struct InMemoryPaymentRepository {
    payments: Arc<DashMap<PaymentId, PaymentPrimitives>>,
}

impl InMemoryPaymentRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.payments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.payments.is_empty()
    }
}

#[async_trait]
impl PaymentRepository for InMemoryPaymentRepository {
    async fn save(&self, payment: &Payment) -> Result<(), RepoError> {
        self.payments.insert(payment.id(), payment.to_primitives());
        Ok(())
    }

    async fn find_by_id(&self, id: PaymentId) -> Result<Option<Payment>, RepoError> {
        // Clone out of the shard guard before rehydrating.
        let stored = self.payments.get(&id).map(|entry| entry.value().clone());
        stored
            .map(Payment::from_primitives)
            .transpose()
            .map_err(RepoError::Domain)
    }

    async fn list(&self) -> Result<Vec<Payment>, RepoError> {
        let mut stored: Vec<PaymentPrimitives> = self
            .payments
            .iter()
            .map(|entry| entry.value().clone())
            .collect();

        // RFC 3339 UTC timestamps with fixed precision sort lexically; v7 ids break ties.
        stored.sort_by(|a, b| {
            b.creation_date_time
                .cmp(&a.creation_date_time)
                .then_with(|| b.id.cmp(&a.id))
        });

        stored
            .into_iter()
            .map(|p| Payment::from_primitives(p).map_err(RepoError::Domain))
            .collect()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Outbox
// ─────────────────────────────────────────────────────────────────────────────

/// `EventPublisher` that appends every published event to a shared list.
#[derive(Debug, Clone, Default)]
pub struct InMemoryOutbox {
    events: Arc<Mutex<Vec<PaymentEvent>>>,
}

impl InMemoryOutbox {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything published so far, oldest first.
    pub fn events(&self) -> Vec<PaymentEvent> {
        match self.events.lock() {
            Ok(events) => events.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Events published for one payment, oldest first.
    pub fn events_for(&self, payment_id: PaymentId) -> Vec<PaymentEvent> {
        self.events()
            .into_iter()
            .filter(|e| e.payment_id() == payment_id)
            .collect()
    }
}

#[async_trait]
impl EventPublisher for InMemoryOutbox {
    async fn publish(&self, events: &[PaymentEvent]) -> Result<(), PublishError> {
        let mut guard = self
            .events
            .lock()
            .map_err(|e| PublishError::Unavailable(e.to_string()))?;
        guard.extend_from_slice(events);
        Ok(())
    }
}
