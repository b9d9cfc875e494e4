//! SQLite repository adapter.
//!
//! Each payment is one row holding its primitives as JSON, with the id, message
//! id and status lifted into columns. Published events go to `payment_events`.
#![allow(clippy::collapsible_if)]

use std::str::FromStr;

use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{FromRow, SqlitePool};
use uuid::Uuid;

use payments_types::{
    EventPublisher, Payment, PaymentEvent, PaymentId, PaymentPrimitives, PaymentRepository,
    PublishError, RepoError,
};

const MIGRATIONS: [&str; 2] = [
    include_str!("../migrations/0001_create_payments.sql"),
    include_str!("../migrations/0002_create_payment_events.sql"),
];

// ─────────────────────────────────────────────────────────────────────────────
// Rows
// ─────────────────────────────────────────────────────────────────────────────

#[derive(FromRow)]
struct DbPayment {
    payload: String,
}

impl DbPayment {
    fn into_domain(self) -> Result<Payment, RepoError> {
        let primitives: PaymentPrimitives = serde_json::from_str(&self.payload)?;
        Ok(Payment::from_primitives(primitives)?)
    }
}

#[derive(FromRow)]
struct DbPaymentEvent {
    payload: String,
}

// ─────────────────────────────────────────────────────────────────────────────
// SQLite Repository
// ─────────────────────────────────────────────────────────────────────────────

/// SQLite repository implementation. Clones share the connection pool.
#[derive(Debug, Clone)]
pub struct SqliteRepo {
    pool: SqlitePool,
}

impl SqliteRepo {
    /// Connects and applies the schema.
    pub async fn new(database_url: &str) -> anyhow::Result<Self> {
        let in_memory = database_url.contains(":memory:");

        // Ensure on-disk SQLite target directory exists.
        if let Some(path) = database_url.strip_prefix("sqlite://") {
            let path = path.split('?').next().unwrap_or(path);
            if !in_memory {
                if let Some(parent) = std::path::Path::new(path).parent() {
                    if !parent.as_os_str().is_empty() {
                        tokio::fs::create_dir_all(parent).await?;
                    }
                }
            }
        }

        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);

        // Every connection to `:memory:` opens its own database.
        let max_connections = if in_memory { 1 } else { 5 };
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await?;

        let repo = Self { pool };
        repo.create_schema().await?;
        tracing::debug!(database_url, "sqlite repository ready");
        Ok(repo)
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Applies the bundled migrations. Idempotent.
    pub async fn create_schema(&self) -> Result<(), RepoError> {
        for ddl in MIGRATIONS {
            sqlx::raw_sql(ddl)
                .execute(&self.pool)
                .await
                .map_err(|e| RepoError::Database(e.to_string()))?;
        }
        Ok(())
    }

    /// Outbox rows for one payment, in publication order.
    pub async fn events_for(&self, payment_id: PaymentId) -> Result<Vec<PaymentEvent>, RepoError> {
        let rows: Vec<DbPaymentEvent> = sqlx::query_as(
            r#"SELECT payload FROM payment_events
               WHERE payment_id = ?
               ORDER BY occurred_at ASC, id ASC"#,
        )
        .bind(payment_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepoError::Database(e.to_string()))?;

        rows.into_iter()
            .map(|row| serde_json::from_str(&row.payload).map_err(RepoError::from))
            .collect()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Repository implementation
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait]
impl PaymentRepository for SqliteRepo {
    async fn save(&self, payment: &Payment) -> Result<(), RepoError> {
        let primitives = payment.to_primitives();
        let payload = serde_json::to_string(&primitives)?;
        let now = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);

        sqlx::query(
            r#"INSERT INTO payments (id, message_id, status, payload, created_at, updated_at)
               VALUES (?, ?, ?, ?, ?, ?)
               ON CONFLICT (id) DO UPDATE SET
                   status = excluded.status,
                   payload = excluded.payload,
                   updated_at = excluded.updated_at"#,
        )
        .bind(&primitives.id)
        .bind(&primitives.message_id)
        .bind(primitives.status.code())
        .bind(&payload)
        .bind(&primitives.creation_date_time)
        .bind(&now)
        .execute(&self.pool)
        .await
        .map_err(|e| RepoError::Database(e.to_string()))?;

        tracing::debug!(payment_id = %primitives.id, status = %primitives.status, "payment saved");
        Ok(())
    }

    async fn find_by_id(&self, id: PaymentId) -> Result<Option<Payment>, RepoError> {
        let row: Option<DbPayment> = sqlx::query_as(r#"SELECT payload FROM payments WHERE id = ?"#)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepoError::Database(e.to_string()))?;

        row.map(DbPayment::into_domain).transpose()
    }

    async fn list(&self) -> Result<Vec<Payment>, RepoError> {
        let rows: Vec<DbPayment> =
            sqlx::query_as(r#"SELECT payload FROM payments ORDER BY created_at DESC, id DESC"#)
                .fetch_all(&self.pool)
                .await
                .map_err(|e| RepoError::Database(e.to_string()))?;

        rows.into_iter().map(DbPayment::into_domain).collect()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Outbox implementation
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait]
impl EventPublisher for SqliteRepo {
    async fn publish(&self, events: &[PaymentEvent]) -> Result<(), PublishError> {
        if events.is_empty() {
            return Ok(());
        }

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| PublishError::Unavailable(e.to_string()))?;

        for event in events {
            let payload =
                serde_json::to_string(event).map_err(|e| PublishError::Encoding(e.to_string()))?;

            sqlx::query(
                r#"INSERT INTO payment_events (id, payment_id, event_type, payload, occurred_at)
                   VALUES (?, ?, ?, ?, ?)"#,
            )
            .bind(Uuid::now_v7().to_string())
            .bind(event.payment_id().to_string())
            .bind(event.event_type())
            .bind(&payload)
            .bind(
                event
                    .occurred_at()
                    .to_rfc3339_opts(SecondsFormat::Millis, true),
            )
            .execute(&mut *tx)
            .await
            .map_err(|e| PublishError::Unavailable(e.to_string()))?;
        }

        tx.commit()
            .await
            .map_err(|e| PublishError::Unavailable(e.to_string()))?;
        Ok(())
    }
}
