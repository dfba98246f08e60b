//! strict order validation
//!
//! The amount calculator never fails and substitutes zero for anything it
//! cannot use. This layer is the other half of that contract: it reports every
//! malformed field so callers can refuse to show a quote built on bad data.

use tracing::warn;

use crate::config::PeriodSelection;
use crate::decimal::{Currency, Money};
use crate::errors::{BillingError, Result, ValidationError};
use crate::order::{BillingPeriod, Order};
use crate::types::ScheduleType;

/// collect every problem with an order
pub fn collect_violations(order: &Order) -> Vec<ValidationError> {
    collect_violations_for(order, PeriodSelection::AsSupplied)
}

/// collect problems that matter under a period selection policy
///
/// Period ordering is only a violation when the supplier's order is trusted;
/// `SortByStart` picks the right period regardless.
pub fn collect_violations_for(order: &Order, selection: PeriodSelection) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let currency = order.currency;

    check_amount(&mut errors, "agreed_price", order.agreed_price, currency);
    check_amount(&mut errors, "discount_amount", order.discount_amount, currency);
    check_amount(&mut errors, "amount_due_to_platform", order.amount_due_to_platform, currency);

    if order.discount_amount.currency() == currency
        && order.agreed_price.currency() == currency
        && order.discount_amount.amount_minor_units() > order.agreed_price.amount_minor_units()
    {
        errors.push(ValidationError::new(
            "discount_amount",
            "discount exceeds agreed price",
        ));
    }

    if order.schedule_type == ScheduleType::Recurring && order.billing_periods.is_empty() {
        errors.push(ValidationError::new(
            "billing_periods",
            "recurring orders must carry billing periods",
        ));
    }

    if selection == PeriodSelection::AsSupplied {
        for (i, pair) in order.billing_periods.windows(2).enumerate() {
            if pair[1].period_start < pair[0].period_start {
                errors.push(ValidationError::new(
                    format!("billing_periods[{}].period_start", i + 1),
                    "periods must be ascending by period_start",
                ));
            }
        }
    }

    for (i, period) in order.billing_periods.iter().enumerate() {
        check_period(&mut errors, i, period, currency);
    }

    errors
}

/// reject an order with any violation
pub fn validate_order(order: &Order) -> Result<()> {
    validate_order_for(order, PeriodSelection::AsSupplied)
}

pub fn validate_order_for(order: &Order, selection: PeriodSelection) -> Result<()> {
    let errors = collect_violations_for(order, selection);
    if errors.is_empty() {
        return Ok(());
    }

    warn!(order_id = order.id, violations = errors.len(), "order failed validation");
    Err(BillingError::Validation { errors })
}

fn check_period(
    errors: &mut Vec<ValidationError>,
    index: usize,
    period: &BillingPeriod,
    currency: Currency,
) {
    let field = |name: &str| format!("billing_periods[{}].{}", index, name);

    if period.period_end < period.period_start {
        errors.push(ValidationError::new(field("period_end"), "ends before it starts"));
    }

    check_amount(errors, &field("gross_amount"), period.gross_amount, currency);
    check_amount(errors, &field("discount_amount"), period.discount_amount, currency);
    check_amount(
        errors,
        &field("amount_payable_directly_to_worker"),
        period.amount_payable_directly_to_worker,
        currency,
    );
    if let Some(due) = period.amount_due_from_client {
        check_amount(errors, &field("amount_due_from_client"), due, currency);
    }
    if let Some(fee) = period.amount_due_to_platform {
        check_amount(errors, &field("amount_due_to_platform"), fee, currency);
    }

    if period.amount_due_from_client.is_none() && period.amount_due_to_platform.is_none() {
        errors.push(ValidationError::new(
            field("amount_due_from_client"),
            "no client or platform amount supplied",
        ));
    }

    if !period.balance_identity_holds() {
        errors.push(ValidationError::new(
            field("amount_due_from_client"),
            "gross - discount must equal due from client + payable directly to worker",
        ));
    }
}

fn check_amount(errors: &mut Vec<ValidationError>, field: &str, amount: Money, currency: Currency) {
    if amount.currency() != currency {
        errors.push(ValidationError::new(
            field,
            format!("currency {} differs from order currency {}", amount.currency(), currency),
        ));
    }
    if amount.is_negative() {
        errors.push(ValidationError::new(field, "must not be negative"));
    }
}
