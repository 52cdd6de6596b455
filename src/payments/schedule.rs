use chrono::NaiveDate;
use hourglass_rs::SafeTimeProvider;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::PaymentPolicy;
use crate::decimal::{Money, Percentage};
use crate::errors::Result;
use crate::types::InstallmentKind;

use super::ensure_non_negative;

/// one installment of a booking's payment plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentScheduleItem {
    pub kind: InstallmentKind,
    pub amount: Money,
    pub due_date: NaiveDate,
    pub percentage_of_total: Percentage,
}

/// three-installment plan for a booking total
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallmentSchedule {
    pub total_amount: Money,
    pub event_date: NaiveDate,
    pub computed_on: NaiveDate,
    pub items: [PaymentScheduleItem; 3],
}

impl InstallmentSchedule {
    pub fn item(&self, kind: InstallmentKind) -> &PaymentScheduleItem {
        match kind {
            InstallmentKind::First => &self.items[0],
            InstallmentKind::Second => &self.items[1],
            InstallmentKind::Final => &self.items[2],
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &PaymentScheduleItem> {
        self.items.iter()
    }

    /// sum of installment amounts
    pub fn total_scheduled(&self) -> Money {
        self.items.iter().map(|i| i.amount).sum()
    }

    /// Round every amount to the currency's minor unit.
    ///
    /// Rounds the running total rather than each installment, so the rounded
    /// amounts always add up to the rounded booking total and none goes negative.
    pub fn rounded(&self, scale: u32) -> InstallmentSchedule {
        let mut items = self.items.clone();
        let mut running = Money::ZERO;
        let mut rounded_so_far = Money::ZERO;

        for item in items.iter_mut() {
            running += item.amount;
            let rounded_running = running.round_to_minor(scale);
            item.amount = rounded_running - rounded_so_far;
            rounded_so_far = rounded_running;
        }

        InstallmentSchedule {
            total_amount: self.total_amount.round_to_minor(scale),
            event_date: self.event_date,
            computed_on: self.computed_on,
            items,
        }
    }

    pub fn to_json_pretty(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|e| format!("JSON error: {}", e))
    }

    /// short alias for json output
    pub fn json(&self) -> String {
        self.to_json_pretty()
    }
}

/// splits a booking total into installments according to a payment policy
#[derive(Debug, Clone)]
pub struct InstallmentScheduler {
    policy: PaymentPolicy,
}

impl InstallmentScheduler {
    pub fn new(policy: PaymentPolicy) -> Result<Self> {
        policy.validate()?;
        Ok(Self { policy })
    }

    /// scheduler for the standard Choice Menu policy
    pub fn standard() -> Self {
        Self {
            policy: PaymentPolicy::standard(),
        }
    }

    pub fn policy(&self) -> &PaymentPolicy {
        &self.policy
    }

    /// compute the schedule, taking the booking date from the time provider
    pub fn calculate(
        &self,
        total_amount: Money,
        event_date: NaiveDate,
        time_provider: &SafeTimeProvider,
    ) -> Result<InstallmentSchedule> {
        let today = time_provider.now().date_naive();
        self.calculate_on(total_amount, event_date, today)
    }

    /// compute the schedule for a known booking date
    pub fn calculate_on(
        &self,
        total_amount: Money,
        event_date: NaiveDate,
        booking_date: NaiveDate,
    ) -> Result<InstallmentSchedule> {
        let total_amount = ensure_non_negative(total_amount)?;
        let first_term = self.policy.term(InstallmentKind::First);
        let second_term = self.policy.term(InstallmentKind::Second);
        let final_term = self.policy.term(InstallmentKind::Final);

        let first_amount = total_amount.portion(first_term.share);
        let second_amount = total_amount.portion(second_term.share);
        // remainder keeps the plan summing to the total at internal precision
        let final_amount = total_amount - first_amount - second_amount;

        let items = [
            PaymentScheduleItem {
                kind: first_term.kind,
                amount: first_amount,
                due_date: first_term.due.resolve(booking_date, event_date)?,
                percentage_of_total: first_term.share,
            },
            PaymentScheduleItem {
                kind: second_term.kind,
                amount: second_amount,
                due_date: second_term.due.resolve(booking_date, event_date)?,
                percentage_of_total: second_term.share,
            },
            PaymentScheduleItem {
                kind: final_term.kind,
                amount: final_amount,
                due_date: final_term.due.resolve(booking_date, event_date)?,
                percentage_of_total: final_term.share,
            },
        ];

        debug!(
            total = %total_amount,
            %event_date,
            %booking_date,
            first = %items[0].amount,
            second = %items[1].amount,
            last = %items[2].amount,
            "computed installment schedule"
        );

        Ok(InstallmentSchedule {
            total_amount,
            event_date,
            computed_on: booking_date,
            items,
        })
    }
}

impl Default for InstallmentScheduler {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DueDateRule;
    use crate::errors::PaymentError;
    use chrono::{Duration, TimeZone, Utc};
    use hourglass_rs::TimeSource;
    use proptest::prelude::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_standard_split() {
        let scheduler = InstallmentScheduler::standard();
        let schedule = scheduler
            .calculate_on(Money::from_major(50_000), date(2024, 12, 25), date(2024, 11, 1))
            .unwrap();

        assert_eq!(schedule.item(InstallmentKind::First).amount, Money::from_major(10_000));
        assert_eq!(schedule.item(InstallmentKind::Second).amount, Money::from_major(25_000));
        assert_eq!(schedule.item(InstallmentKind::Final).amount, Money::from_major(15_000));
        assert_eq!(schedule.computed_on, date(2024, 11, 1));
    }

    #[test]
    fn test_booking_date_follows_time_provider() {
        let time = SafeTimeProvider::new(TimeSource::Test(
            Utc.with_ymd_and_hms(2024, 11, 1, 23, 59, 59).unwrap()
        ));
        let control = time.test_control().unwrap();
        let scheduler = InstallmentScheduler::standard();

        let schedule = scheduler
            .calculate(Money::from_major(1_000), date(2024, 12, 25), &time)
            .unwrap();
        assert_eq!(schedule.item(InstallmentKind::First).due_date, date(2024, 11, 1));

        control.advance(Duration::seconds(1));
        let schedule = scheduler
            .calculate(Money::from_major(1_000), date(2024, 12, 25), &time)
            .unwrap();
        assert_eq!(schedule.item(InstallmentKind::First).due_date, date(2024, 11, 2));
    }

    #[test]
    fn test_fractional_total_sums_exactly() {
        let total = Money::from_str_exact("1234.57").unwrap();
        let schedule = InstallmentScheduler::standard()
            .calculate_on(total, date(2025, 3, 1), date(2025, 1, 1))
            .unwrap();

        assert_eq!(schedule.items[0].amount, Money::from_str_exact("246.914").unwrap());
        assert_eq!(schedule.items[1].amount, Money::from_str_exact("617.285").unwrap());
        assert_eq!(schedule.items[2].amount, Money::from_str_exact("370.371").unwrap());
        assert_eq!(schedule.total_scheduled(), total);
    }

    #[test]
    fn test_deserialized_total_sums_exactly() {
        let total: Money = serde_json::from_str(r#""0.123456789""#).unwrap();
        let schedule = InstallmentScheduler::standard()
            .calculate_on(total, date(2025, 3, 1), date(2025, 1, 1))
            .unwrap();

        assert_eq!(schedule.total_amount, Money::from_str_exact("0.12345679").unwrap());
        assert_eq!(schedule.total_scheduled(), schedule.total_amount);
    }

    #[test]
    fn test_rounded_schedule() {
        let total = Money::from_str_exact("100.01").unwrap();
        let schedule = InstallmentScheduler::standard()
            .calculate_on(total, date(2025, 3, 1), date(2025, 1, 1))
            .unwrap()
            .rounded(2);

        assert_eq!(schedule.items[0].amount, Money::from_str_exact("20.00").unwrap());
        assert_eq!(schedule.items[1].amount, Money::from_str_exact("50.01").unwrap());
        assert_eq!(schedule.items[2].amount, Money::from_str_exact("30.00").unwrap());
        assert_eq!(schedule.total_scheduled(), total);
    }

    #[test]
    fn test_rounded_schedule_of_one_minor_unit() {
        let total = Money::from_str_exact("0.01").unwrap();
        let schedule = InstallmentScheduler::standard()
            .calculate_on(total, date(2025, 3, 1), date(2025, 1, 1))
            .unwrap()
            .rounded(2);

        assert_eq!(schedule.items[0].amount, Money::ZERO);
        assert_eq!(schedule.items[1].amount, total);
        assert_eq!(schedule.items[2].amount, Money::ZERO);
    }

    #[test]
    fn test_custom_policy() {
        let mut policy = PaymentPolicy::standard();
        policy.installments[0].share = Percentage::from_percentage(10);
        policy.installments[1].share = Percentage::from_percentage(60);
        policy.installments[1].due = DueDateRule::OnEvent;
        let scheduler = InstallmentScheduler::new(policy).unwrap();

        let schedule = scheduler
            .calculate_on(Money::from_major(1_000), date(2025, 6, 10), date(2025, 5, 1))
            .unwrap();

        assert_eq!(schedule.items[0].amount, Money::from_major(100));
        assert_eq!(schedule.items[1].amount, Money::from_major(600));
        assert_eq!(schedule.items[1].due_date, date(2025, 6, 10));
        assert_eq!(schedule.items[2].amount, Money::from_major(300));
    }

    #[test]
    fn test_invalid_policy_is_rejected() {
        let mut policy = PaymentPolicy::standard();
        policy.installments[0].share = Percentage::from_percentage(30);

        let err = InstallmentScheduler::new(policy).unwrap_err();
        assert!(matches!(err, PaymentError::InvalidConfiguration { .. }));
    }

    #[test]
    fn test_event_date_at_calendar_edge() {
        let err = InstallmentScheduler::standard()
            .calculate_on(Money::from_major(100), NaiveDate::MAX, date(2025, 1, 1))
            .unwrap_err();
        assert!(matches!(err, PaymentError::DateOutOfRange { .. }));
        assert!(err.is_invalid_argument());
    }

    #[test]
    fn test_schedule_json() {
        let schedule = InstallmentScheduler::standard()
            .calculate_on(Money::from_major(100_000), date(2024, 12, 25), date(2024, 11, 1))
            .unwrap();

        let value: serde_json::Value = serde_json::from_str(&schedule.json()).unwrap();
        assert_eq!(value["items"][0]["kind"], "FIRST");
        assert_eq!(value["items"][1]["due_date"], "2024-12-20");
        assert_eq!(value["items"][2]["due_date"], "2024-12-26");
    }

    proptest! {
        #[test]
        fn prop_installments_sum_to_total(cents in 0i64..1_000_000_000_000i64) {
            let total = Money::from_minor(cents, 2);
            let schedule = InstallmentScheduler::standard()
                .calculate_on(total, date(2025, 6, 1), date(2025, 1, 1))
                .unwrap();

            prop_assert_eq!(schedule.total_scheduled(), total);
            prop_assert!(schedule.items.iter().all(|i| !i.amount.is_negative()));

            let percentages: Vec<_> = schedule
                .items
                .iter()
                .map(|i| i.percentage_of_total)
                .collect();
            prop_assert_eq!(
                percentages,
                vec![
                    Percentage::from_percentage(20),
                    Percentage::from_percentage(50),
                    Percentage::from_percentage(30),
                ]
            );
        }

        #[test]
        fn prop_rounded_installments_sum_to_rounded_total(
            units in 0i64..10_000_000_000i64,
            scale in 0u32..5u32,
        ) {
            let total = Money::from_minor(units, 4);
            let rounded = InstallmentScheduler::standard()
                .calculate_on(total, date(2025, 6, 1), date(2025, 1, 1))
                .unwrap()
                .rounded(scale);

            prop_assert_eq!(rounded.total_scheduled(), total.round_to_minor(scale));
            prop_assert!(rounded.items.iter().all(|i| !i.amount.is_negative()));
        }
    }
}
