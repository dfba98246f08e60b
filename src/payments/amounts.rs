use serde::Serialize;
use tracing::debug;

use crate::config::PeriodSelection;
use crate::decimal::Money;
use crate::order::{amount_in, BillingPeriod, Order};
use crate::types::{BillingPeriodId, PaymentFlow};

/// display classification of an amount due; never changes the numbers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DueLabel {
    Due,
    /// order already past `PendingWorker`, even if the deadline has not passed
    Overdue,
}

impl DueLabel {
    pub fn key(&self) -> &'static str {
        match self {
            DueLabel::Due => "orders.paymentDue",
            DueLabel::Overdue => "orders.paymentOverdue",
        }
    }

    pub fn is_overdue(&self) -> bool {
        matches!(self, DueLabel::Overdue)
    }
}

/// what is owed right now and what is settled with the sitter later
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AmountBreakdown {
    pub flow: PaymentFlow,
    /// the unresolved period the amounts came from, `None` for order-level fallbacks
    pub period_id: Option<BillingPeriodId>,
    pub gross_amount: Money,
    pub discount_amount: Money,
    /// owed to the platform now, never negative
    pub platform_due_now: Money,
    pub direct_to_worker_later: Money,
    pub due_label: DueLabel,
}

impl AmountBreakdown {
    pub fn is_overdue(&self) -> bool {
        self.due_label.is_overdue()
    }

    pub fn has_platform_payment(&self) -> bool {
        self.platform_due_now.is_positive()
    }
}

/// amount calculator
///
/// Pure and infallible: missing or foreign-currency amounts count as zero and
/// the platform amount is clamped at zero. Malformed orders should be rejected
/// by `validation::validate_order` before the result is shown.
#[derive(Debug, Clone, Copy, Default)]
pub struct AmountCalculator {
    selection: PeriodSelection,
}

impl AmountCalculator {
    pub fn new(selection: PeriodSelection) -> Self {
        Self { selection }
    }

    pub fn calculate(&self, order: &Order, flow: PaymentFlow) -> AmountBreakdown {
        let currency = order.currency;
        let zero = Money::zero(currency);
        let period = order.select_unresolved_period(self.selection);

        let (platform_due_now, direct_to_worker_later) = match (flow, period) {
            (PaymentFlow::PlatformPrepay, Some(p)) => (client_due(p, order), zero),
            (PaymentFlow::PlatformPrepay, None) => (order.net_price(), zero),
            (PaymentFlow::PlatformFeeOnly, Some(p)) => {
                let fee = p
                    .effective_client_due()
                    .map(|m| amount_in(m, currency, "amount_due_from_client"))
                    .unwrap_or(zero);
                let later = amount_in(
                    p.amount_payable_directly_to_worker,
                    currency,
                    "amount_payable_directly_to_worker",
                );
                (fee, later)
            }
            (PaymentFlow::PlatformFeeOnly, None) => (
                amount_in(order.amount_due_to_platform, currency, "amount_due_to_platform"),
                zero,
            ),
            // the platform collects nothing, order-level fields are authoritative
            (PaymentFlow::DirectToWorker, _) => (zero, order.net_price().clamp_non_negative()),
        };

        let (gross_amount, discount_amount) = match period {
            Some(p) => (
                amount_in(p.gross_amount, currency, "gross_amount"),
                amount_in(p.discount_amount, currency, "discount_amount"),
            ),
            None => (
                amount_in(order.agreed_price, currency, "agreed_price"),
                amount_in(order.discount_amount, currency, "discount_amount"),
            ),
        };

        let due_label = if order.status.is_overdue_classification() {
            DueLabel::Overdue
        } else {
            DueLabel::Due
        };

        let breakdown = AmountBreakdown {
            flow,
            period_id: period.map(|p| p.id),
            gross_amount,
            discount_amount,
            platform_due_now: platform_due_now.clamp_non_negative(),
            direct_to_worker_later,
            due_label,
        };

        debug!(
            order_id = order.id,
            flow = %flow,
            period_id = ?breakdown.period_id,
            platform_due_now = %breakdown.platform_due_now,
            direct_to_worker_later = %breakdown.direct_to_worker_later,
            "amounts calculated"
        );
        breakdown
    }
}

fn client_due(period: &BillingPeriod, order: &Order) -> Money {
    period
        .amount_due_from_client
        .map(|m| amount_in(m, order.currency, "amount_due_from_client"))
        .unwrap_or_else(|| Money::zero(order.currency))
}

/// calculate with the default (as-supplied) period selection
pub fn calculate_amounts(order: &Order, flow: PaymentFlow) -> AmountBreakdown {
    AmountCalculator::default().calculate(order, flow)
}
