/// time control - deterministic booking dates with a controlled clock
use choice_menu_payments::chrono::{Duration, NaiveDate, TimeZone, Utc};
use choice_menu_payments::{InstallmentScheduler, Money, SafeTimeProvider, TimeSource};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== time control example ===\n");

    let time = SafeTimeProvider::new(TimeSource::Test(
        Utc.with_ymd_and_hms(2024, 11, 1, 9, 0, 0).unwrap()
    ));
    let controller = time.test_control().unwrap();

    let scheduler = InstallmentScheduler::standard();
    let event_date = NaiveDate::from_ymd_opt(2024, 12, 25).ok_or("invalid event date")?;

    let schedule = scheduler.calculate(Money::from_major(250_000), event_date, &time)?;
    println!("booked on {}", time.now().format("%Y-%m-%d"));
    for item in schedule.iter() {
        println!("  {:<6} {:>10} due {}", item.kind, item.amount, item.due_date);
    }

    // the advance installment follows the clock, the others follow the event
    controller.advance(Duration::days(14));
    let schedule = scheduler.calculate(Money::from_major(250_000), event_date, &time)?;
    println!("\nbooked on {}", time.now().format("%Y-%m-%d"));
    for item in schedule.iter() {
        println!("  {:<6} {:>10} due {}", item.kind, item.amount, item.due_date);
    }

    Ok(())
}
