/// quick start - quote a one-time prepaid order against a wallet balance
use order_billing_rs::{BillingEngine, Currency, Money, UserBalance};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let engine = BillingEngine::default();

    // order as the backend returns it
    let order = engine.order_from_json(
        r#"{
            "id": 1001,
            "status": "pending_platform_payment",
            "service_type": "boarding",
            "currency": "RUB",
            "agreed_price": "1000.00",
            "discount_amount": "100.00",
            "payment_due_at_utc": "2030-01-01T00:00:00Z"
        }"#,
    )?;

    let balance = UserBalance::new(Money::from_major(500, Currency::RUB));
    let quote = engine.quote(&order, &balance, true)?;

    println!("due now:      {}", quote.amounts.platform_due_now.format_with_symbol());
    println!("from balance: {}", quote.allocation.from_balance.format_with_symbol());
    println!("from card:    {}", quote.allocation.from_card.format_with_symbol());
    println!("card needed:  {}", quote.allocation.card_required);
    println!("{}", quote.json());

    Ok(())
}
