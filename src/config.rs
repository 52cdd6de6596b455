use chrono::{Days, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::decimal::{Percentage, PRECISION};
use crate::errors::{PaymentError, Result};
use crate::types::InstallmentKind;

/// payment policy applied to every booking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentPolicy {
    pub installments: [InstallmentTerm; 3],
    pub refund: RefundPolicy,
    pub rounding: RoundingPolicy,
}

/// one installment of the plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstallmentTerm {
    pub kind: InstallmentKind,
    pub share: Percentage,
    pub due: DueDateRule,
}

/// when an installment falls due
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum DueDateRule {
    /// the day the schedule is computed
    OnBooking,
    /// a number of days before the event starts
    BeforeEvent { days: u32 },
    /// the event's start date
    OnEvent,
    /// a number of days after the event starts
    AfterEvent { days: u32 },
}

impl DueDateRule {
    /// resolve to a calendar date
    pub fn resolve(&self, booking_date: NaiveDate, event_date: NaiveDate) -> Result<NaiveDate> {
        match *self {
            DueDateRule::OnBooking => Ok(booking_date),
            DueDateRule::OnEvent => Ok(event_date),
            DueDateRule::BeforeEvent { days } => event_date
                .checked_sub_days(Days::new(days as u64))
                .ok_or(PaymentError::DateOutOfRange {
                    date: event_date,
                    offset_days: -(days as i64),
                }),
            DueDateRule::AfterEvent { days } => event_date
                .checked_add_days(Days::new(days as u64))
                .ok_or(PaymentError::DateOutOfRange {
                    date: event_date,
                    offset_days: days as i64,
                }),
        }
    }
}

/// cancellation refund terms
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RefundPolicy {
    /// minimum days between cancellation and event for a full refund
    pub full_refund_notice_days: u32,
    /// share refunded when notice is shorter, or the event has started
    pub late_cancellation_refund: Percentage,
}

/// rounding applied where amounts leave the crate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundingPolicy {
    /// decimal places of the currency's minor unit
    pub minor_unit_scale: u32,
}

impl RefundPolicy {
    /// refund share must stay within 0%..=100% of the total
    pub fn validate(&self) -> Result<()> {
        let refund = self.late_cancellation_refund.as_decimal();
        if refund < Decimal::ZERO || refund > Decimal::ONE {
            return Err(PaymentError::InvalidConfiguration {
                message: format!(
                    "late cancellation refund must be between 0% and 100%, got {}",
                    self.late_cancellation_refund
                ),
            });
        }
        Ok(())
    }
}

impl PaymentPolicy {
    /// Choice Menu's booking policy: 20% on booking, 50% five days before the
    /// event, 30% the day after; full refund with a week's notice, 80% otherwise
    pub fn standard() -> Self {
        Self {
            installments: [
                InstallmentTerm {
                    kind: InstallmentKind::First,
                    share: Percentage::from_percentage(20),
                    due: DueDateRule::OnBooking,
                },
                InstallmentTerm {
                    kind: InstallmentKind::Second,
                    share: Percentage::from_percentage(50),
                    due: DueDateRule::BeforeEvent { days: 5 },
                },
                InstallmentTerm {
                    kind: InstallmentKind::Final,
                    share: Percentage::from_percentage(30),
                    due: DueDateRule::AfterEvent { days: 1 },
                },
            ],
            refund: RefundPolicy {
                full_refund_notice_days: 7,
                late_cancellation_refund: Percentage::from_percentage(80),
            },
            rounding: RoundingPolicy {
                minor_unit_scale: 2,
            },
        }
    }

    /// load and validate a policy from json
    pub fn from_json(json: &str) -> Result<Self> {
        let policy: PaymentPolicy =
            serde_json::from_str(json).map_err(|e| PaymentError::InvalidConfiguration {
                message: e.to_string(),
            })?;
        policy.validate()?;
        Ok(policy)
    }

    pub fn to_json_pretty(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|e| format!("JSON error: {}", e))
    }

    /// check structural invariants of the policy
    pub fn validate(&self) -> Result<()> {
        for (term, expected) in self.installments.iter().zip(InstallmentKind::ALL) {
            if term.kind != expected {
                return Err(PaymentError::InvalidConfiguration {
                    message: format!(
                        "installments must be ordered FIRST, SECOND, FINAL; found {} where {} was expected",
                        term.kind, expected
                    ),
                });
            }
            if term.share.is_negative() {
                return Err(PaymentError::InvalidConfiguration {
                    message: format!("{} share must not be negative: {}", term.kind, term.share),
                });
            }
        }

        let total: Percentage = self.installments.iter().map(|t| t.share).sum();
        if total != Percentage::FULL {
            return Err(PaymentError::InvalidConfiguration {
                message: format!("installment shares must sum to 100%, got {}", total),
            });
        }

        self.refund.validate()?;

        if self.rounding.minor_unit_scale > PRECISION {
            return Err(PaymentError::InvalidConfiguration {
                message: format!(
                    "minor unit scale {} exceeds internal precision {}",
                    self.rounding.minor_unit_scale, PRECISION
                ),
            });
        }

        Ok(())
    }

    pub fn term(&self, kind: InstallmentKind) -> &InstallmentTerm {
        match kind {
            InstallmentKind::First => &self.installments[0],
            InstallmentKind::Second => &self.installments[1],
            InstallmentKind::Final => &self.installments[2],
        }
    }
}

impl Default for PaymentPolicy {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_standard_policy_is_valid() {
        let policy = PaymentPolicy::standard();
        policy.validate().unwrap();

        assert_eq!(policy.term(InstallmentKind::Second).share.as_percentage(), dec!(50));
        assert_eq!(policy.refund.full_refund_notice_days, 7);
        assert_eq!(policy, PaymentPolicy::default());
    }

    #[test]
    fn test_policy_json_round_trip() {
        let policy = PaymentPolicy::standard();
        let json = policy.to_json_pretty();
        assert!(json.contains("\"before_event\""));

        let loaded = PaymentPolicy::from_json(&json).unwrap();
        assert_eq!(loaded, policy);
    }

    #[test]
    fn test_rejects_shares_not_summing_to_full() {
        let mut policy = PaymentPolicy::standard();
        policy.installments[2].share = Percentage::from_percentage(20);

        let err = policy.validate().unwrap_err();
        assert!(matches!(err, PaymentError::InvalidConfiguration { .. }));
        assert!(!err.is_invalid_argument());
    }

    #[test]
    fn test_rejects_out_of_order_installments() {
        let mut policy = PaymentPolicy::standard();
        policy.installments.swap(1, 2);

        assert!(policy.validate().is_err());
    }

    #[test]
    fn test_rejects_refund_above_full() {
        let mut policy = PaymentPolicy::standard();
        policy.refund.late_cancellation_refund = Percentage::from_percentage(120);

        assert!(policy.validate().is_err());
    }

    #[test]
    fn test_refund_policy_bounds() {
        let mut refund = PaymentPolicy::standard().refund;
        refund.validate().unwrap();

        refund.late_cancellation_refund = Percentage::FULL;
        refund.validate().unwrap();

        refund.late_cancellation_refund = Percentage::from_decimal(dec!(-0.1));
        let err = refund.validate().unwrap_err();
        assert!(matches!(err, PaymentError::InvalidConfiguration { .. }));
    }

    #[test]
    fn test_rejects_excess_rounding_scale() {
        let mut policy = PaymentPolicy::standard();
        policy.rounding.minor_unit_scale = 12;

        assert!(policy.validate().is_err());
    }

    #[test]
    fn test_malformed_json_is_configuration_error() {
        let err = PaymentPolicy::from_json("{ not json").unwrap_err();
        assert!(matches!(err, PaymentError::InvalidConfiguration { .. }));
    }

    #[test]
    fn test_due_date_rules() {
        let booked = date(2024, 11, 1);
        let event = date(2024, 12, 25);

        assert_eq!(DueDateRule::OnBooking.resolve(booked, event).unwrap(), booked);
        assert_eq!(DueDateRule::OnEvent.resolve(booked, event).unwrap(), event);
        assert_eq!(
            DueDateRule::BeforeEvent { days: 5 }.resolve(booked, event).unwrap(),
            date(2024, 12, 20)
        );
        assert_eq!(
            DueDateRule::AfterEvent { days: 1 }.resolve(booked, event).unwrap(),
            date(2024, 12, 26)
        );

        // crosses a month and year boundary
        assert_eq!(
            DueDateRule::BeforeEvent { days: 5 }.resolve(booked, date(2025, 1, 2)).unwrap(),
            date(2024, 12, 28)
        );
    }

    #[test]
    fn test_due_date_out_of_range() {
        let err = DueDateRule::AfterEvent { days: 1 }
            .resolve(NaiveDate::MIN, NaiveDate::MAX)
            .unwrap_err();
        assert!(matches!(err, PaymentError::DateOutOfRange { offset_days: 1, .. }));
    }
}
