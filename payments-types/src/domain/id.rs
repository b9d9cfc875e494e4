//! Time-ordered (UUID v7) identifiers for aggregates and entities.

use uuid::{Uuid, Variant};

use crate::error::DomainError;

const REQUIRED_VERSION: usize = 7;

/// Parses a UUID string and checks it is an RFC 4122 version 7 value.
fn parse_v7(value: &str) -> Result<Uuid, DomainError> {
    let uuid = Uuid::parse_str(value).map_err(|_| invalid_uuid(value))?;
    check_v7(uuid).map_err(|_| invalid_uuid(value))
}

fn check_v7(uuid: Uuid) -> Result<Uuid, DomainError> {
    if uuid.get_variant() != Variant::RFC4122 || uuid.get_version_num() != REQUIRED_VERSION {
        return Err(invalid_uuid(&uuid.to_string()));
    }
    Ok(uuid)
}

fn invalid_uuid(value: &str) -> DomainError {
    DomainError::validation(format!("Invalid UUID {} format", REQUIRED_VERSION))
        .with("value", value)
}

macro_rules! uuid_v7_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(Uuid);

        impl $name {
            /// Generates a new time-ordered identifier.
            pub fn generate() -> Self {
                Self(Uuid::now_v7())
            }

            /// Rehydrates an identifier from its string form.
            pub fn parse(value: &str) -> Result<Self, DomainError> {
                parse_v7(value).map(Self)
            }

            /// Wraps an existing UUID, rejecting anything but version 7.
            pub fn from_uuid(uuid: Uuid) -> Result<Self, DomainError> {
                check_v7(uuid).map(Self)
            }

            /// Returns the underlying UUID.
            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse(s)
            }
        }
    };
}

uuid_v7_id!(
    /// Identity of a `Payment` aggregate.
    PaymentId
);

uuid_v7_id!(
    /// Identity of a `CreditTransfer` entity within a payment.
    CreditTransferId
);
