/// cancellation - refund tiers as the event approaches
use choice_menu_payments::chrono::{Duration, NaiveDate, TimeZone, Utc};
use choice_menu_payments::{
    BookingPaymentPlan, BookingQuote, Money, PaymentPolicy, SafeTimeProvider, ServiceLineItem,
    TimeSource, Uuid,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let time = SafeTimeProvider::new(TimeSource::Test(
        Utc.with_ymd_and_hms(2024, 12, 1, 12, 0, 0).unwrap()
    ));
    let controller = time.test_control().unwrap();
    let policy = PaymentPolicy::standard();

    let quote = BookingQuote::new()
        .with_item(ServiceLineItem::new("Tent Service", Money::from_major(60_000)))
        .with_item(ServiceLineItem::new("Catering", Money::from_major(800)).with_quantity(50));

    let event_date = NaiveDate::from_ymd_opt(2024, 12, 25).ok_or("invalid event date")?;
    let plan = BookingPaymentPlan::from_quote(Uuid::new_v4(), &quote, event_date, &policy, &time)?;
    println!("booking total: {}", plan.total_amount);

    for _ in 0..6 {
        let refund = plan.cancellation_refund_now(&policy, &time)?;
        println!(
            "{}: {:>3} days out, {:?} refund {} (fee {})",
            refund.cancellation_date,
            refund.days_until_event,
            refund.tier,
            refund.refund_amount,
            refund.cancellation_fee,
        );
        controller.advance(Duration::days(5));
    }

    Ok(())
}
