//! Port traits (interfaces for adapters).
//!
//! These are the contracts that adapters must implement.
//! The application layer depends on these traits, not concrete implementations.

mod events;
mod repository;

pub use events::{EventPublisher, PublishError};
pub use repository::PaymentRepository;
