//! Publisher decorator that logs every drained event before delegating.

use async_trait::async_trait;
use tracing::info;

use payments_types::{EventPublisher, PaymentEvent, PublishError};

/// Wraps another `EventPublisher` and emits one `info` record per event.
pub struct TracingPublisher<P> {
    inner: P,
}

impl<P: EventPublisher> TracingPublisher<P> {
    pub fn new(inner: P) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &P {
        &self.inner
    }
}

#[async_trait]
impl<P: EventPublisher> EventPublisher for TracingPublisher<P> {
    async fn publish(&self, events: &[PaymentEvent]) -> Result<(), PublishError> {
        for event in events {
            info!(
                event_type = event.event_type(),
                payment_id = %event.payment_id(),
                occurred_at = %event.occurred_at(),
                "domain event"
            );
        }
        self.inner.publish(events).await
    }
}
