/// quick start - schedule a booking and quote a cancellation
use choice_menu_payments::chrono::NaiveDate;
use choice_menu_payments::{
    compute_cancellation_refund, compute_installment_schedule, Money, SafeTimeProvider, TimeSource,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let time = SafeTimeProvider::new(TimeSource::System);
    let event_date = NaiveDate::from_ymd_opt(2026, 12, 25).ok_or("invalid event date")?;

    // Rs 100,000 booking
    let schedule = compute_installment_schedule(Money::from_major(100_000), event_date, &time)?;
    println!("{}", schedule.rounded(2).json());

    // cancelled ten days out
    let cancelled_on = NaiveDate::from_ymd_opt(2026, 12, 15).ok_or("invalid cancellation date")?;
    let refund = compute_cancellation_refund(Money::from_major(100_000), cancelled_on, event_date)?;
    println!("refund: {}", refund);

    Ok(())
}
