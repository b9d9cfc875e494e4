//! # Payments Types
//!
//! Domain model and port traits for ISO 20022 credit-transfer payments
//! (pain.001 initiation, pacs.002 status reports).
//! This crate has ZERO IO dependencies - only data structures,
//! business rules, and trait definitions.
//!
//! ## Architecture
//!
//! This crate represents the **innermost core** of the hexagonal architecture:
//! - `domain/` - Value objects (Money, Iban, Bic, EndToEndId, Party), the
//!   CreditTransfer entity, the Payment aggregate and its events
//! - `ports/` - Trait definitions that adapters must implement
//! - `dto/` - Inputs and flattened primitives crossing the boundary
//! - `error/` - Domain, repository and application error types

pub mod domain;
pub mod dto;
pub mod error;
pub mod ports;

// Re-export commonly used types
pub use domain::{
    Bic, CreditTransfer, CreditTransferId, Currency, EndToEndId, Iban, Money, Party, Payment,
    PaymentEvent, PaymentId, PaymentStatus, ServiceLevel,
};
pub use dto::*;
pub use error::{AppError, DomainError, ErrorPayload, RepoError};
pub use ports::{EventPublisher, PaymentRepository, PublishError};
