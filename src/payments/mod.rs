pub mod refund;
pub mod schedule;

use chrono::{DateTime, NaiveDate, Utc};
use hourglass_rs::SafeTimeProvider;
use tracing::warn;

use crate::decimal::Money;
use crate::errors::{PaymentError, Result};

pub use refund::{RefundCalculator, RefundQuote};
pub use schedule::{InstallmentSchedule, InstallmentScheduler, PaymentScheduleItem};

/// Split a booking total into the standard FIRST / SECOND / FINAL installments.
///
/// FIRST is due on the time provider's current UTC date, SECOND five days before
/// `event_date` and FINAL the day after it. Amounts are left unrounded; see
/// [`InstallmentSchedule::rounded`].
pub fn compute_installment_schedule(
    total_amount: Money,
    event_date: NaiveDate,
    time_provider: &SafeTimeProvider,
) -> Result<InstallmentSchedule> {
    InstallmentScheduler::standard().calculate(total_amount, event_date, time_provider)
}

/// Refund owed when a booking is cancelled on `cancellation_date`.
///
/// Full refund with at least seven days' notice, 80% otherwise. A cancellation on
/// or after the event date always gets the 80% refund.
pub fn compute_cancellation_refund(
    total_amount: Money,
    cancellation_date: NaiveDate,
    event_date: NaiveDate,
) -> Result<Money> {
    RefundCalculator::standard()
        .quote(total_amount, cancellation_date, event_date)
        .map(|quote| quote.refund_amount)
}

/// refund for a cancellation made today according to the time provider
pub fn compute_cancellation_refund_now(
    total_amount: Money,
    event_date: NaiveDate,
    time_provider: &SafeTimeProvider,
) -> Result<Money> {
    RefundCalculator::standard()
        .quote_now(total_amount, event_date, time_provider)
        .map(|quote| quote.refund_amount)
}

/// Parse a calendar date from `YYYY-MM-DD` or an RFC 3339 timestamp.
///
/// Timestamps are reduced to their UTC calendar day.
pub fn parse_calendar_date(input: &str) -> Result<NaiveDate> {
    let input = input.trim();
    if input.is_empty() {
        return Err(PaymentError::InvalidDate {
            message: "empty date".to_string(),
        });
    }

    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        return Ok(date);
    }

    DateTime::parse_from_rfc3339(input)
        .map(|dt| dt.with_timezone(&Utc).date_naive())
        .map_err(|e| {
            warn!(input, error = %e, "rejected date");
            PaymentError::InvalidDate {
                message: format!("{:?} is not a calendar date: {}", input, e),
            }
        })
}

pub(crate) fn ensure_non_negative(amount: Money) -> Result<Money> {
    if amount.is_negative() {
        warn!(%amount, "rejected negative amount");
        return Err(PaymentError::NegativeAmount { amount });
    }
    Ok(amount)
}
