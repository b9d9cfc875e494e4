//! Domain event publisher port.
//!
//! The aggregate only queues events. Whoever drains them hands them to a
//! publisher: an outbox table, a log, a message bus.

use crate::domain::PaymentEvent;

/// Error type for event publication.
#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    #[error("Publisher unavailable: {0}")]
    Unavailable(String),

    #[error("Event could not be encoded: {0}")]
    Encoding(String),
}

/// Port trait for delivering drained domain events.
#[async_trait::async_trait]
pub trait EventPublisher: Send + Sync + 'static {
    /// Delivers events in the order they were raised.
    async fn publish(&self, events: &[PaymentEvent]) -> Result<(), PublishError>;
}
