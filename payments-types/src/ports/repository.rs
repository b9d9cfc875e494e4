//! Repository port trait.
//!
//! The domain never loads or stores itself; adapters (in-memory, SQLite)
//! implement this trait on top of `Payment::to_primitives` / `from_primitives`.

use crate::domain::{Payment, PaymentId};
use crate::error::RepoError;

/// Persistence port for the `Payment` aggregate, keyed by its id.
///
/// Implementations own transactional isolation: one `save` writes one aggregate
/// atomically. Callers hold at most one in-flight mutation per id.
#[async_trait::async_trait]
pub trait PaymentRepository: Send + Sync + 'static {
    /// Inserts or replaces the stored state of the aggregate.
    ///
    /// Queued domain events are not persisted here; see `EventPublisher`.
    async fn save(&self, payment: &Payment) -> Result<(), RepoError>;

    /// Loads a payment, or `None` if no payment has this id.
    async fn find_by_id(&self, id: PaymentId) -> Result<Option<Payment>, RepoError>;

    /// Lists all payments, most recently created first.
    async fn list(&self) -> Result<Vec<Payment>, RepoError>;
}
