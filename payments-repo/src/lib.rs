//! # Payments Repository
//!
//! Concrete adapters for the payment ports: the in-memory store is always
//! available, SQLite is behind the `sqlite` feature. `build_repo` picks one
//! from a database URL.

use async_trait::async_trait;
use payments_types::{
    EventPublisher, Payment, PaymentEvent, PaymentId, PaymentRepository, PublishError, RepoError,
};

pub mod memory;
#[cfg(feature = "sqlite")]
pub mod sqlite;


pub use memory::{InMemoryOutbox, InMemoryPaymentRepository};
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteRepo;

/// URL scheme selecting the in-memory adapter.
pub const MEMORY_URL: &str = "memory://";

/// Unified repository wrapper over the available adapters.
///
/// Implements both ports, so a single value serves as repository and outbox.
/// Clones share the underlying store.
#[derive(Debug, Clone)]
pub enum Repo {
    Memory {
        payments: InMemoryPaymentRepository,
        outbox: InMemoryOutbox,
    },
    #[cfg(feature = "sqlite")]
    Sqlite(SqliteRepo),
}

/// Build and initialize a repository from a database URL.
///
/// ```ignore
/// let repo = build_repo("memory://").await?;
///
/// // With the `sqlite` feature
/// let repo = build_repo("sqlite://data/payments.db").await?;
/// ```
pub async fn build_repo(database_url: &str) -> anyhow::Result<Repo> {
    Repo::new(database_url).await
}

impl Repo {
    pub async fn new(database_url: &str) -> anyhow::Result<Self> {
        if database_url == MEMORY_URL {
            tracing::info!("using in-memory repository");
            return Ok(Self::memory());
        }

        if database_url.starts_with("sqlite:") {
            return Self::sqlite(database_url).await;
        }

        anyhow::bail!("Unsupported database URL: {database_url}")
    }

    /// Fresh, empty in-memory store.
    pub fn memory() -> Self {
        Self::Memory {
            payments: InMemoryPaymentRepository::new(),
            outbox: InMemoryOutbox::new(),
        }
    }

    #[cfg(feature = "sqlite")]
    async fn sqlite(database_url: &str) -> anyhow::Result<Self> {
        tracing::info!("using sqlite repository");
        Ok(Self::Sqlite(SqliteRepo::new(database_url).await?))
    }

    #[cfg(not(feature = "sqlite"))]
    async fn sqlite(_database_url: &str) -> anyhow::Result<Self> {
        anyhow::bail!("SQLite support is not compiled in; enable the `sqlite` feature")
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Port delegation
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait]
impl PaymentRepository for Repo {
    async fn save(&self, payment: &Payment) -> Result<(), RepoError> {
        match self {
            Repo::Memory { payments, .. } => payments.save(payment).await,
            #[cfg(feature = "sqlite")]
            Repo::Sqlite(repo) => repo.save(payment).await,
        }
    }

    async fn find_by_id(&self, id: PaymentId) -> Result<Option<Payment>, RepoError> {
        match self {
            Repo::Memory { payments, .. } => payments.find_by_id(id).await,
            #[cfg(feature = "sqlite")]
            Repo::Sqlite(repo) => repo.find_by_id(id).await,
        }
    }

    async fn list(&self) -> Result<Vec<Payment>, RepoError> {
        match self {
            Repo::Memory { payments, .. } => payments.list().await,
            #[cfg(feature = "sqlite")]
            Repo::Sqlite(repo) => repo.list().await,
        }
    }
}

#[async_trait]
impl EventPublisher for Repo {
    async fn publish(&self, events: &[PaymentEvent]) -> Result<(), PublishError> {
        match self {
            Repo::Memory { outbox, .. } => outbox.publish(events).await,
            #[cfg(feature = "sqlite")]
            Repo::Sqlite(repo) => repo.publish(events).await,
        }
    }
}
