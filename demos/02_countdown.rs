/// countdown - watch an unpaid order approach auto-cancellation with controlled time
use chrono::{Duration, TimeZone, Utc};
use order_billing_rs::{BillingEngine, SafeTimeProvider, TimeSource};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let start = Utc.with_ymd_and_hms(2026, 3, 2, 12, 0, 0).unwrap();
    let time = SafeTimeProvider::new(TimeSource::Test(start));
    let controller = time.test_control().unwrap();

    let engine = BillingEngine::default();
    let mut order = engine.order_from_json(
        r#"{ "id": 3003, "status": "pending_platform_fee", "amount_due_to_platform": "150.00" }"#,
    )?;
    order.payment_due_at_utc = Some(start + Duration::minutes(150));

    for _ in 0..4 {
        let countdown = engine.countdown_with(&order, &time);
        println!(
            "{}  display={:?} expired={}",
            time.now().format("%H:%M"),
            countdown.display,
            countdown.is_expired
        );
        controller.advance(Duration::minutes(50));
    }

    Ok(())
}
