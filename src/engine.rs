use chrono::{DateTime, Utc};
use hourglass_rs::SafeTimeProvider;
use serde::Serialize;
use tracing::{debug, info};

use crate::config::EngineConfig;
use crate::countdown::{Countdown, DueCountdown};
use crate::decimal::Money;
use crate::errors::Result;
use crate::order::Order;
use crate::payments::{
    allocate, resolve_payment_flow, submit_intent, Allocation, AmountBreakdown, AmountCalculator,
    PaymentCopy, PaymentIntent, PaymentIntentSubmitter, SubmissionOutcome,
};
use crate::types::{CardId, OrderId, PaymentFlow};
use crate::validation::validate_order_for;
use crate::wallet::{PaymentMethod, UserBalance};
use crate::wire::OrderRecord;

/// everything a payment screen needs for one order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaymentQuote {
    pub order_id: OrderId,
    pub flow: PaymentFlow,
    pub copy: PaymentCopy,
    pub amounts: AmountBreakdown,
    pub allocation: Allocation,
    pub use_balance: bool,
    pub is_payment_due: bool,
    /// across every period, for the "pay the sitter directly" notice
    pub total_payable_directly_to_worker: Money,
}

impl PaymentQuote {
    pub fn json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|e| format!("JSON error: {}", e))
    }
}

/// the single entry point used by every call site
///
/// Stateless apart from its configuration, so one engine can be shared across
/// threads and requests.
#[derive(Debug, Clone)]
pub struct BillingEngine {
    config: EngineConfig,
    calculator: AmountCalculator,
    countdown: DueCountdown,
}

impl Default for BillingEngine {
    fn default() -> Self {
        Self::from_valid_config(EngineConfig::default())
    }
}

impl BillingEngine {
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::from_valid_config(config))
    }

    fn from_valid_config(config: EngineConfig) -> Self {
        info!(
            default_currency = %config.default_currency,
            period_selection = ?config.period_selection,
            strict = config.strict_validation,
            "billing engine configured"
        );
        Self {
            calculator: AmountCalculator::new(config.period_selection),
            countdown: DueCountdown::new(config.countdown.clone()),
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// decode a backend order record using this engine's defaults
    pub fn order_from_json(&self, json: &str) -> Result<Order> {
        OrderRecord::from_json(json)?.into_order(&self.config)
    }

    pub fn resolve_flow(&self, order: &Order) -> PaymentFlow {
        resolve_payment_flow(order)
    }

    /// resolve the flow and compute amounts; never fails
    pub fn calculate(&self, order: &Order) -> AmountBreakdown {
        let flow = self.resolve_flow(order);
        self.calculator.calculate(order, flow)
    }

    /// flow, amounts and wallet/card split in one call
    pub fn quote(
        &self,
        order: &Order,
        balance: &UserBalance,
        use_balance: bool,
    ) -> Result<PaymentQuote> {
        if self.config.strict_validation {
            validate_order_for(order, self.config.period_selection)?;
        }

        let amounts = self.calculate(order);
        let allocation = allocate(amounts.platform_due_now, balance.amount, use_balance)?;

        debug!(
            order_id = order.id,
            due = %amounts.platform_due_now,
            card_required = allocation.card_required,
            "payment quoted"
        );

        Ok(PaymentQuote {
            order_id: order.id,
            flow: amounts.flow,
            copy: amounts.flow.copy(),
            allocation,
            use_balance,
            is_payment_due: order.is_payment_due(),
            total_payable_directly_to_worker: order.total_payable_directly_to_worker(),
            amounts,
        })
    }

    pub fn countdown(&self, order: &Order, now: DateTime<Utc>) -> Countdown {
        self.countdown.evaluate(order.payment_due_at_utc, now, order.status)
    }

    pub fn countdown_with(&self, order: &Order, time_provider: &SafeTimeProvider) -> Countdown {
        self.countdown.evaluate_with(order.payment_due_at_utc, time_provider, order.status)
    }

    /// build the submitter request for a quote
    pub fn prepare_intent(
        &self,
        quote: &PaymentQuote,
        cards: &[PaymentMethod],
        selected: Option<CardId>,
    ) -> Result<PaymentIntent> {
        PaymentIntent::prepare(quote.order_id, quote.allocation, quote.use_balance, cards, selected)
    }

    /// prepare and hand the intent to the external submitter
    pub fn pay<S: PaymentIntentSubmitter + ?Sized>(
        &self,
        submitter: &S,
        quote: &PaymentQuote,
        cards: &[PaymentMethod],
        selected: Option<CardId>,
    ) -> Result<SubmissionOutcome> {
        let intent = self.prepare_intent(quote, cards, selected)?;
        submit_intent(submitter, &intent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decimal::Currency;
    use crate::errors::BillingError;
    use crate::order::fixtures::{order, recurring, rub};
    use crate::types::{BillingPeriodStatus::*, CardStatus, OrderStatus};
    use crate::wallet::fixtures::card;
    use chrono::{Duration, TimeZone};
    use hourglass_rs::TimeSource;
    use std::sync::Arc;
    use std::thread;

    struct AlwaysCompletes;

    impl PaymentIntentSubmitter for AlwaysCompletes {
        fn submit(&self, _intent: &PaymentIntent) -> Result<SubmissionOutcome> {
            Ok(SubmissionOutcome::Completed)
        }
    }

    fn wallet(major: i64) -> UserBalance {
        UserBalance::new(rub(major))
    }

    #[test]
    fn test_quote_prepay_with_partial_balance() {
        let mut o = order(OrderStatus::PendingPlatformPayment);
        o.agreed_price = rub(1000);
        o.discount_amount = rub(100);

        let quote = BillingEngine::default().quote(&o, &wallet(500), true).unwrap();
        assert_eq!(quote.flow, PaymentFlow::PlatformPrepay);
        assert_eq!(quote.amounts.platform_due_now, rub(900));
        assert_eq!(quote.allocation.from_balance, rub(500));
        assert_eq!(quote.allocation.from_card, rub(400));
        assert!(quote.allocation.card_required);
        assert!(quote.is_payment_due);
        assert_eq!(quote.copy.title_key, "orders.paymentTitle");
    }

    #[test]
    fn test_quote_fee_only_recurring() {
        let mut fee_only =
            recurring(OrderStatus::RecurringPaymentFailed, &[Paid, PaymentFailed, PendingPayment]);
        fee_only.payment_flow_type = Some(PaymentFlow::PlatformFeeOnly);

        let quote = BillingEngine::default().quote(&fee_only, &wallet(1000), true).unwrap();
        assert_eq!(quote.amounts.period_id, Some(2));
        assert_eq!(quote.amounts.platform_due_now, rub(50));
        assert_eq!(quote.amounts.direct_to_worker_later, rub(450));
        assert!(quote.amounts.is_overdue());
        assert!(!quote.allocation.card_required);
        assert_eq!(quote.total_payable_directly_to_worker, rub(1350));
    }

    #[test]
    fn test_strict_engine_rejects_malformed_order() {
        let mut o = recurring(OrderStatus::InProgress, &[PendingPayment]);
        o.billing_periods[0].gross_amount = rub(-1);

        let lenient = BillingEngine::default();
        assert!(lenient.quote(&o, &wallet(0), true).is_ok());

        let strict = BillingEngine::new(EngineConfig::strict()).unwrap();
        assert!(matches!(
            strict.quote(&o, &wallet(0), true),
            Err(BillingError::Validation { .. })
        ));
    }

    #[test]
    fn test_strict_engine_quotes_fee_only_period_without_client_amount() {
        let mut o = recurring(OrderStatus::PendingPlatformFee, &[Paid, PendingPayment]);
        o.billing_periods[1].amount_due_from_client = None;
        o.billing_periods.swap(0, 1);

        let strict = BillingEngine::new(EngineConfig::strict()).unwrap();
        let quote = strict.quote(&o, &wallet(0), false).unwrap();
        assert_eq!(quote.flow, PaymentFlow::PlatformFeeOnly);
        assert_eq!(quote.amounts.period_id, Some(2));
        assert_eq!(quote.amounts.platform_due_now, rub(50));
        assert_eq!(quote.amounts.direct_to_worker_later, rub(450));
    }

    #[test]
    fn test_pay_requires_card_when_balance_short() {
        let engine = BillingEngine::default();
        let o = order(OrderStatus::PendingPlatformPayment);
        let quote = engine.quote(&o, &wallet(100), true).unwrap();
        let cards = vec![card(1, CardStatus::Active, true)];

        assert!(matches!(
            engine.pay(&AlwaysCompletes, &quote, &cards, None),
            Err(BillingError::CardRequired { .. })
        ));
        assert_eq!(
            engine.pay(&AlwaysCompletes, &quote, &cards, Some(1)).unwrap(),
            SubmissionOutcome::Completed
        );
    }

    #[test]
    fn test_balance_in_other_currency_fails_quote() {
        let o = order(OrderStatus::PendingPlatformPayment);
        let usd = UserBalance::new(Money::from_major(10, Currency::USD));
        assert!(matches!(
            BillingEngine::default().quote(&o, &usd, true),
            Err(BillingError::CurrencyMismatch { .. })
        ));
    }

    #[test]
    fn test_countdown_through_engine() {
        let now = Utc.with_ymd_and_hms(2026, 3, 2, 12, 0, 0).unwrap();
        let mut o = order(OrderStatus::PendingPlatformPayment);
        o.payment_due_at_utc = Some(now + Duration::minutes(90));

        let engine = BillingEngine::default();
        assert_eq!(engine.countdown(&o, now).display.as_deref(), Some("1ч 30мин"));

        let time = SafeTimeProvider::new(TimeSource::Test(now + Duration::hours(2)));
        assert!(engine.countdown_with(&o, &time).is_expired);
    }

    #[test]
    fn test_order_from_json_end_to_end() {
        let engine = BillingEngine::default();
        let o = engine
            .order_from_json(
                r#"{
                    "id": 5,
                    "status": "pending_platform_payment",
                    "agreed_price": "2000.00",
                    "discount_amount": "0.00",
                    "billing_periods": { "data": [] }
                }"#,
            )
            .unwrap();

        let quote = engine.quote(&o, &wallet(0), false).unwrap();
        assert_eq!(quote.amounts.platform_due_now, rub(2000));
        assert!(quote.json().contains("\"platform_due_now\""));
    }

    #[test]
    fn test_shared_engine_is_deterministic_across_threads() {
        let engine = Arc::new(BillingEngine::default());
        let o = Arc::new(recurring(OrderStatus::InProgress, &[Paid, PendingPayment]));
        let expected = engine.calculate(&o);

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let engine = Arc::clone(&engine);
                let o = Arc::clone(&o);
                thread::spawn(move || engine.calculate(&o))
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap(), expected);
        }
    }
}
