/// custom policy - load payment terms from json
use choice_menu_payments::chrono::NaiveDate;
use choice_menu_payments::{InstallmentScheduler, Money, PaymentPolicy};

const POLICY: &str = r#"{
    "installments": [
        { "kind": "FIRST",  "share": "0.25", "due": { "rule": "on_booking" } },
        { "kind": "SECOND", "share": "0.50", "due": { "rule": "before_event", "days": 10 } },
        { "kind": "FINAL",  "share": "0.25", "due": { "rule": "on_event" } }
    ],
    "refund": { "full_refund_notice_days": 14, "late_cancellation_refund": "0.5" },
    "rounding": { "minor_unit_scale": 0 }
}"#;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let policy = PaymentPolicy::from_json(POLICY)?;
    let scheduler = InstallmentScheduler::new(policy)?;

    let booked_on = NaiveDate::from_ymd_opt(2025, 2, 1).ok_or("invalid booking date")?;
    let event_date = NaiveDate::from_ymd_opt(2025, 4, 12).ok_or("invalid event date")?;

    let schedule = scheduler
        .calculate_on(Money::from_major(99_999), event_date, booked_on)?
        .rounded(scheduler.policy().rounding.minor_unit_scale);
    println!("{}", schedule.json());

    Ok(())
}
