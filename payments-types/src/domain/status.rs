//! Payment status and service level, encoded with their ISO 20022 codes.

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Payment status, aligned with the `<TxSts>` codes of pacs.002.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentStatus {
    /// ACSP: accepted, settlement in process
    #[serde(rename = "ACSP")]
    Initiated,
    /// PDNG: awaiting processing (e.g. screening in progress)
    #[serde(rename = "PDNG")]
    Pending,
    /// ACWC: accepted after screening, possibly modified
    #[serde(rename = "ACWC")]
    Screened,
    /// ACCC: cleared between banks
    #[serde(rename = "ACCC")]
    Cleared,
    /// ACSC: settled on the creditor's account
    #[serde(rename = "ACSC")]
    Settled,
    /// RJCT: rejected
    #[serde(rename = "RJCT")]
    Rejected,
}

impl PaymentStatus {
    pub fn code(&self) -> &'static str {
        match self {
            PaymentStatus::Initiated => "ACSP",
            PaymentStatus::Pending => "PDNG",
            PaymentStatus::Screened => "ACWC",
            PaymentStatus::Cleared => "ACCC",
            PaymentStatus::Settled => "ACSC",
            PaymentStatus::Rejected => "RJCT",
        }
    }

    /// No transition leaves a terminal status.
    pub fn is_terminal(&self) -> bool {
        matches!(self, PaymentStatus::Settled | PaymentStatus::Rejected)
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

impl std::str::FromStr for PaymentStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ACSP" => Ok(PaymentStatus::Initiated),
            "PDNG" => Ok(PaymentStatus::Pending),
            "ACWC" => Ok(PaymentStatus::Screened),
            "ACCC" => Ok(PaymentStatus::Cleared),
            "ACSC" => Ok(PaymentStatus::Settled),
            "RJCT" => Ok(PaymentStatus::Rejected),
            _ => Err(DomainError::validation("Unknown payment status").with("status", s)),
        }
    }
}

/// Service level (`<PmtTpInf><SvcLvl><Cd>`): the route the payment takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ServiceLevel {
    /// SEPA Credit Transfer, eurozone, D+1
    #[serde(rename = "SEPA")]
    Sepa,
    /// Urgent / priority, same day
    #[serde(rename = "URGP")]
    Urgent,
    /// Non-urgent
    #[serde(rename = "NURG")]
    Normal,
    /// SWIFT gpi
    #[serde(rename = "G001")]
    SwiftGpi,
}

impl ServiceLevel {
    pub fn code(&self) -> &'static str {
        match self {
            ServiceLevel::Sepa => "SEPA",
            ServiceLevel::Urgent => "URGP",
            ServiceLevel::Normal => "NURG",
            ServiceLevel::SwiftGpi => "G001",
        }
    }
}

impl std::fmt::Display for ServiceLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

impl std::str::FromStr for ServiceLevel {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SEPA" => Ok(ServiceLevel::Sepa),
            "URGP" => Ok(ServiceLevel::Urgent),
            "NURG" => Ok(ServiceLevel::Normal),
            "G001" => Ok(ServiceLevel::SwiftGpi),
            _ => Err(DomainError::validation("Unknown service level").with("serviceLevel", s)),
        }
    }
}
