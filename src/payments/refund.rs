use chrono::NaiveDate;
use hourglass_rs::SafeTimeProvider;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{PaymentPolicy, RefundPolicy};
use crate::decimal::Money;
use crate::errors::Result;
use crate::types::RefundTier;

use super::ensure_non_negative;

/// refund owed for a cancelled booking
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefundQuote {
    pub total_amount: Money,
    pub cancellation_date: NaiveDate,
    pub event_date: NaiveDate,
    /// negative once the event has started
    pub days_until_event: i64,
    pub tier: RefundTier,
    pub refund_amount: Money,
    pub cancellation_fee: Money,
}

impl RefundQuote {
    /// round refund and fee to the currency's minor unit, keeping refund + fee == total
    pub fn rounded(&self, scale: u32) -> RefundQuote {
        let total_amount = self.total_amount.round_to_minor(scale);
        let refund_amount = self.refund_amount.round_to_minor(scale);

        RefundQuote {
            total_amount,
            refund_amount,
            cancellation_fee: total_amount - refund_amount,
            ..self.clone()
        }
    }

    pub fn is_full_refund(&self) -> bool {
        self.tier == RefundTier::Full
    }
}

/// applies the cancellation refund rule
#[derive(Debug, Clone, Copy)]
pub struct RefundCalculator {
    policy: RefundPolicy,
}

impl RefundCalculator {
    pub fn new(policy: RefundPolicy) -> Result<Self> {
        policy.validate()?;
        Ok(Self { policy })
    }

    pub fn standard() -> Self {
        Self {
            policy: PaymentPolicy::standard().refund,
        }
    }

    /// Quote the refund for a cancellation made on `cancellation_date`.
    ///
    /// Days are counted as a signed calendar-day difference. Anything short of the
    /// notice period refunds the late-cancellation share, and that includes
    /// cancelling on the event day or after it.
    pub fn quote(
        &self,
        total_amount: Money,
        cancellation_date: NaiveDate,
        event_date: NaiveDate,
    ) -> Result<RefundQuote> {
        let total_amount = ensure_non_negative(total_amount)?;
        let days_until_event = (event_date - cancellation_date).num_days();

        let (tier, refund_amount) = if days_until_event < self.policy.full_refund_notice_days as i64 {
            (
                RefundTier::Partial,
                total_amount.portion(self.policy.late_cancellation_refund),
            )
        } else {
            (RefundTier::Full, total_amount)
        };

        debug!(
            total = %total_amount,
            %cancellation_date,
            %event_date,
            days_until_event,
            ?tier,
            refund = %refund_amount,
            "computed cancellation refund"
        );

        Ok(RefundQuote {
            total_amount,
            cancellation_date,
            event_date,
            days_until_event,
            tier,
            refund_amount,
            cancellation_fee: total_amount - refund_amount,
        })
    }

    /// quote a cancellation made today according to the time provider
    pub fn quote_now(
        &self,
        total_amount: Money,
        event_date: NaiveDate,
        time_provider: &SafeTimeProvider,
    ) -> Result<RefundQuote> {
        self.quote(total_amount, time_provider.now().date_naive(), event_date)
    }
}

impl Default for RefundCalculator {
    fn default() -> Self {
        Self::standard()
    }
}
