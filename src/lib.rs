pub mod booking;
pub mod config;
pub mod decimal;
pub mod errors;
pub mod payments;
pub mod types;

// re-export key types
pub use booking::{BookingPaymentPlan, BookingQuote, PaymentRecord, ServiceLineItem};
pub use config::{DueDateRule, InstallmentTerm, PaymentPolicy, RefundPolicy, RoundingPolicy};
pub use decimal::{Money, Percentage};
pub use errors::{PaymentError, Result};
pub use payments::{
    compute_cancellation_refund, compute_cancellation_refund_now, compute_installment_schedule,
    parse_calendar_date, InstallmentSchedule, InstallmentScheduler, PaymentScheduleItem,
    RefundCalculator, RefundQuote,
};
pub use types::{BookingId, InstallmentKind, PaymentStatus, RefundTier};

// re-export external dependencies that users will need
pub use chrono;
pub use hourglass_rs::{SafeTimeProvider, TimeSource};
pub use rust_decimal::Decimal;
pub use uuid::Uuid;
