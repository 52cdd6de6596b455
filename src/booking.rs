use chrono::NaiveDate;
use hourglass_rs::SafeTimeProvider;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::PaymentPolicy;
use crate::decimal::Money;
use crate::errors::{PaymentError, Result};
use crate::payments::{InstallmentScheduler, RefundCalculator, RefundQuote};
use crate::types::{BookingId, InstallmentKind, PaymentStatus};

/// a priced service selected for an event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceLineItem {
    pub service: String,
    pub unit_price: Money,
    pub quantity: u32,
}

impl ServiceLineItem {
    pub fn new(service: impl Into<String>, unit_price: Money) -> Self {
        Self {
            service: service.into(),
            unit_price,
            quantity: 1,
        }
    }

    pub fn with_quantity(mut self, quantity: u32) -> Self {
        self.quantity = quantity;
        self
    }

    /// unit price times quantity
    pub fn line_total(&self) -> Result<Money> {
        if self.unit_price.is_negative() {
            return Err(PaymentError::InvalidLineItem {
                service: self.service.clone(),
                message: format!("price must not be negative, got {}", self.unit_price),
            });
        }
        if self.quantity == 0 {
            return Err(PaymentError::InvalidLineItem {
                service: self.service.clone(),
                message: "quantity must be at least 1".to_string(),
            });
        }

        self.unit_price
            .checked_mul(Decimal::from(self.quantity))
            .ok_or(PaymentError::AmountOverflow)
    }
}

/// services selected for a booking
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingQuote {
    pub items: Vec<ServiceLineItem>,
}

impl BookingQuote {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_item(mut self, item: ServiceLineItem) -> Self {
        self.items.push(item);
        self
    }

    pub fn add_item(&mut self, item: ServiceLineItem) {
        self.items.push(item);
    }

    /// booking total; zero when no services are priced yet
    pub fn total(&self) -> Result<Money> {
        self.items.iter().try_fold(Money::ZERO, |acc, item| {
            acc.checked_add(item.line_total()?)
                .ok_or(PaymentError::AmountOverflow)
        })
    }
}

/// payment row handed to the persistence layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentRecord {
    pub booking_id: BookingId,
    pub kind: InstallmentKind,
    pub amount: Money,
    pub due_date: NaiveDate,
    pub status: PaymentStatus,
}

impl PaymentRecord {
    /// still pending with its due date behind `today`
    pub fn is_past_due(&self, today: NaiveDate) -> bool {
        self.status == PaymentStatus::Pending && self.due_date < today
    }
}

/// payment records created alongside a new booking
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingPaymentPlan {
    pub booking_id: BookingId,
    pub total_amount: Money,
    pub event_date: NaiveDate,
    pub records: [PaymentRecord; 3],
}

impl BookingPaymentPlan {
    /// schedule a booking total and round it into pending payment records
    pub fn create(
        booking_id: BookingId,
        total_amount: Money,
        event_date: NaiveDate,
        policy: &PaymentPolicy,
        time_provider: &SafeTimeProvider,
    ) -> Result<Self> {
        let scheduler = InstallmentScheduler::new(policy.clone())?;
        let schedule = scheduler
            .calculate(total_amount, event_date, time_provider)?
            .rounded(policy.rounding.minor_unit_scale);

        let records = schedule.items.clone().map(|item| PaymentRecord {
            booking_id,
            kind: item.kind,
            amount: item.amount,
            due_date: item.due_date,
            status: PaymentStatus::Pending,
        });

        info!(
            %booking_id,
            total = %schedule.total_amount,
            %event_date,
            "created booking payment plan"
        );

        Ok(Self {
            booking_id,
            total_amount: schedule.total_amount,
            event_date,
            records,
        })
    }

    /// create the plan from the booking's selected services
    pub fn from_quote(
        booking_id: BookingId,
        quote: &BookingQuote,
        event_date: NaiveDate,
        policy: &PaymentPolicy,
        time_provider: &SafeTimeProvider,
    ) -> Result<Self> {
        let total_amount = quote.total()?;
        Self::create(booking_id, total_amount, event_date, policy, time_provider)
    }

    pub fn record(&self, kind: InstallmentKind) -> &PaymentRecord {
        match kind {
            InstallmentKind::First => &self.records[0],
            InstallmentKind::Second => &self.records[1],
            InstallmentKind::Final => &self.records[2],
        }
    }

    /// records still pending with a due date behind `today`
    pub fn past_due(&self, today: NaiveDate) -> Vec<&PaymentRecord> {
        self.records.iter().filter(|r| r.is_past_due(today)).collect()
    }

    /// refund owed if the booking is cancelled on `cancellation_date`
    pub fn cancellation_refund(
        &self,
        cancellation_date: NaiveDate,
        policy: &PaymentPolicy,
    ) -> Result<RefundQuote> {
        let quote = RefundCalculator::new(policy.refund)?.quote(
            self.total_amount,
            cancellation_date,
            self.event_date,
        )?;

        info!(
            booking_id = %self.booking_id,
            refund = %quote.refund_amount,
            days_until_event = quote.days_until_event,
            "quoted booking cancellation"
        );

        Ok(quote.rounded(policy.rounding.minor_unit_scale))
    }

    /// refund owed if the booking is cancelled today
    pub fn cancellation_refund_now(
        &self,
        policy: &PaymentPolicy,
        time_provider: &SafeTimeProvider,
    ) -> Result<RefundQuote> {
        self.cancellation_refund(time_provider.now().date_naive(), policy)
    }

    pub fn to_json_pretty(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|e| format!("JSON error: {}", e))
    }

    /// short alias for json output
    pub fn json(&self) -> String {
        self.to_json_pretty()
    }
}
