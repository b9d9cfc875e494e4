//! # Payments Service
//!
//! Application layer for ISO 20022 payments.
//!
//! ## Architecture
//!
//! - `service/` - Application service (load, transition, save, publish)
//! - `publisher/` - Logging decorator for event publishers
//!
//! The service is generic over `R: PaymentRepository` and `P: EventPublisher`,
//! allowing different adapters to be injected.

pub mod publisher;
pub mod service;

#[cfg(test)]
mod service_tests;

pub use publisher::TracingPublisher;
pub use service::PaymentService;
