use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::config::PeriodSelection;
use crate::decimal::{Currency, Money};
use crate::errors::Result;
use crate::types::{
    BillingPeriodId, BillingPeriodStatus, OrderId, OrderStatus, PaymentFlow, ScheduleType,
};

/// order snapshot supplied by the backend of record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub status: OrderStatus,
    pub service_type: String,
    pub schedule_type: ScheduleType,
    pub currency: Currency,
    pub agreed_price: Money,
    pub discount_amount: Money,
    /// order-level fallback for fee-only orders without periods
    pub amount_due_to_platform: Money,
    /// `None` on historical orders created before the field existed
    pub payment_flow_type: Option<PaymentFlow>,
    pub payment_due_at_utc: Option<DateTime<Utc>>,
    /// ascending by `period_start`; the supplier owns this ordering
    pub billing_periods: Vec<BillingPeriod>,
}

/// one interval of a recurring order, with its own payment status
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillingPeriod {
    pub id: BillingPeriodId,
    pub period_start: DateTime<Utc>,
    pub period_end: DateTime<Utc>,
    pub status: BillingPeriodStatus,
    pub gross_amount: Money,
    pub discount_amount: Money,
    pub amount_due_from_client: Option<Money>,
    pub amount_due_to_platform: Option<Money>,
    pub amount_payable_directly_to_worker: Money,
}

impl BillingPeriod {
    pub fn is_unresolved(&self) -> bool {
        self.status.is_unresolved()
    }

    /// gross minus discount; fails when the two are in different currencies
    pub fn net_amount(&self) -> Result<Money> {
        self.gross_amount.checked_sub(self.discount_amount)
    }

    /// what the client pays through the platform for this period, falling back
    /// to the platform fee when the client share is not reported
    pub fn effective_client_due(&self) -> Option<Money> {
        self.amount_due_from_client.or(self.amount_due_to_platform)
    }

    /// `gross - discount == client due + payable_directly_to_worker`
    pub fn balance_identity_holds(&self) -> bool {
        let due = self
            .effective_client_due()
            .unwrap_or_else(|| Money::zero(self.gross_amount.currency()));
        let split = due.checked_add(self.amount_payable_directly_to_worker);
        matches!((self.net_amount(), split), (Ok(n), Ok(s)) if n == s)
    }
}

impl Order {
    /// first unresolved period in supplier order
    pub fn unresolved_period(&self) -> Option<&BillingPeriod> {
        self.billing_periods.iter().find(|p| p.is_unresolved())
    }

    /// unresolved period under the configured selection policy
    pub fn select_unresolved_period(&self, selection: PeriodSelection) -> Option<&BillingPeriod> {
        match selection {
            PeriodSelection::AsSupplied => self.unresolved_period(),
            // min_by_key keeps the first of equal keys, matching a stable sort
            PeriodSelection::SortByStart => self
                .billing_periods
                .iter()
                .filter(|p| p.is_unresolved())
                .min_by_key(|p| p.period_start),
        }
    }

    /// badge shown on the order card
    pub fn is_payment_due(&self) -> bool {
        self.unresolved_period().is_some() || self.status.is_payment_blocking()
    }

    pub fn is_chronologically_ordered(&self) -> bool {
        self.billing_periods
            .windows(2)
            .all(|w| w[0].period_start <= w[1].period_start)
    }

    /// agreed price minus discount, not clamped
    pub fn net_price(&self) -> Money {
        amount_in(self.agreed_price, self.currency, "agreed_price")
            - amount_in(self.discount_amount, self.currency, "discount_amount")
    }

    /// everything the client settles with the sitter outside the platform, across all periods
    pub fn total_payable_directly_to_worker(&self) -> Money {
        self.billing_periods
            .iter()
            .map(|p| {
                amount_in(
                    p.amount_payable_directly_to_worker,
                    self.currency,
                    "amount_payable_directly_to_worker",
                )
            })
            .fold(Money::zero(self.currency), |acc, m| acc + m)
    }
}

/// amounts in a foreign currency count as zero, like any other malformed field
pub(crate) fn amount_in(amount: Money, currency: Currency, field: &str) -> Money {
    if amount.currency() == currency {
        amount
    } else {
        warn!(
            field,
            expected = %currency,
            found = %amount.currency(),
            "amount in unexpected currency treated as zero"
        );
        Money::zero(currency)
    }
}
