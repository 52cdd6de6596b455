use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// identifier of the booking a payment plan belongs to
pub type BookingId = Uuid;

/// installment position in the three-part plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InstallmentKind {
    /// advance payment, due when the booking is made
    First,
    /// main payment ahead of the event
    Second,
    /// balance settled after the event
    Final,
}

impl InstallmentKind {
    /// every kind, in schedule order
    pub const ALL: [InstallmentKind; 3] = [
        InstallmentKind::First,
        InstallmentKind::Second,
        InstallmentKind::Final,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            InstallmentKind::First => "FIRST",
            InstallmentKind::Second => "SECOND",
            InstallmentKind::Final => "FINAL",
        }
    }
}

impl fmt::Display for InstallmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// payment record status, owned by the persistence layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    /// awaiting payment
    #[default]
    Pending,
    Paid,
    Overdue,
    Refunded,
}

/// which side of the notice period a cancellation landed on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RefundTier {
    /// enough notice, total refunded
    Full,
    /// short notice or after the event, cancellation fee retained
    Partial,
}
