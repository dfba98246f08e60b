/// recurring fee-only order - pick the failed period and pay it
use order_billing_rs::payments::{PaymentIntent, PaymentIntentSubmitter, SubmissionOutcome};
use order_billing_rs::wire::{Listing, PaymentMethodRecord};
use order_billing_rs::{default_card, BillingEngine, Currency, Money, UserBalance};

/// stands in for the real gateway client
struct ThreeDsGateway;

impl PaymentIntentSubmitter for ThreeDsGateway {
    fn submit(&self, intent: &PaymentIntent) -> order_billing_rs::Result<SubmissionOutcome> {
        if intent.allocation.card_required {
            Ok(SubmissionOutcome::ConfirmationNeeded {
                confirmation_url: format!("https://pay.example/3ds/{}", intent.intent_id),
            })
        } else {
            Ok(SubmissionOutcome::Completed)
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let engine = BillingEngine::default();
    let order = engine.order_from_json(
        r#"{
            "id": 2002,
            "status": "recurring_payment_failed",
            "schedule_type": "recurring",
            "payment_flow_type": "platform_fee_only",
            "agreed_price": "2000.00",
            "billing_periods": { "data": [
                { "id": 1, "period_start": "2026-03-02T00:00:00Z", "period_end": "2026-03-09T00:00:00Z",
                  "status": "paid", "gross_amount": "500.00", "discount_amount": "0.00",
                  "amount_due_from_client": "50.00", "amount_payable_directly_to_worker": "450.00" },
                { "id": 2, "period_start": "2026-03-09T00:00:00Z", "period_end": "2026-03-16T00:00:00Z",
                  "status": "payment_failed", "gross_amount": "500.00", "discount_amount": "0.00",
                  "amount_due_from_client": "50.00", "amount_payable_directly_to_worker": "450.00" },
                { "id": 3, "period_start": "2026-03-16T00:00:00Z", "period_end": "2026-03-23T00:00:00Z",
                  "status": "pending_payment", "gross_amount": "500.00", "discount_amount": "0.00",
                  "amount_due_from_client": "50.00", "amount_payable_directly_to_worker": "450.00" }
            ]}
        }"#,
    )?;

    let cards: Listing<PaymentMethodRecord> = serde_json::from_str(
        r#"{ "data": [
            { "id": 11, "brand": "mir", "last4": "0042", "exp_month": 4, "exp_year": 2029, "status": "inactive", "is_default": true },
            { "id": 12, "brand": "visa", "last4": "4242", "exp_month": 9, "exp_year": 2028, "status": "active" }
        ]}"#,
    )?;
    let cards: Vec<_> = cards
        .into_vec()
        .into_iter()
        .map(PaymentMethodRecord::into_method)
        .collect();

    let balance = UserBalance::new(Money::from_major(20, Currency::RUB));
    let quote = engine.quote(&order, &balance, true)?;

    println!("flow:            {}", quote.flow);
    println!("period:          {:?}", quote.amounts.period_id);
    println!("label:           {}", quote.amounts.due_label.key());
    println!("booking fee now: {}", quote.amounts.platform_due_now);
    println!("sitter later:    {}", quote.amounts.direct_to_worker_later);
    println!("sitter total:    {}", quote.total_payable_directly_to_worker);

    let card = default_card(&cards).map(|c| c.id);
    println!("preselected card: {:?}", card);

    match engine.pay(&ThreeDsGateway, &quote, &cards, card)? {
        SubmissionOutcome::Completed => println!("paid"),
        SubmissionOutcome::ConfirmationNeeded { confirmation_url } => {
            println!("redirect to {}", confirmation_url)
        }
    }

    Ok(())
}
