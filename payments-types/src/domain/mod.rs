//! Domain model of the payment bounded context.

pub mod bic;
pub mod credit_transfer;
pub mod end_to_end_id;
pub mod events;
pub mod iban;
pub mod id;
pub mod money;
pub mod party;
pub mod payment;
pub mod status;

pub use bic::Bic;
pub use credit_transfer::CreditTransfer;
pub use end_to_end_id::EndToEndId;
pub use events::{PaymentCleared, PaymentEvent, PaymentInitiated, PaymentRejected, PaymentSettled};
pub use iban::Iban;
pub use id::{CreditTransferId, PaymentId};
pub use money::{Currency, Money};
pub use party::Party;
pub use payment::Payment;
pub use status::{PaymentStatus, ServiceLevel};
