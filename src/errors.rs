use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::decimal::{Currency, Money};
use crate::types::{BillingPeriodStatus, CardId, OrderStatus};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum BillingError {
    #[error("currency mismatch: expected {expected}, found {found}")]
    CurrencyMismatch {
        expected: Currency,
        found: Currency,
    },

    #[error("invalid currency code: {code}")]
    InvalidCurrency {
        code: String,
    },

    #[error("invalid amount: {value}")]
    InvalidAmount {
        value: String,
    },

    #[error("amount overflow: {value} does not fit in minor units")]
    AmountOverflow {
        value: String,
    },

    #[error("unknown order status: {value}")]
    UnknownOrderStatus {
        value: String,
    },

    #[error("unknown billing period status: {value}")]
    UnknownPeriodStatus {
        value: String,
    },

    #[error("unknown payment flow: {value}")]
    UnknownPaymentFlow {
        value: String,
    },

    #[error("invalid order transition: {from:?} -> {to:?}")]
    InvalidOrderTransition {
        from: OrderStatus,
        to: OrderStatus,
    },

    #[error("invalid billing period transition: {from:?} -> {to:?}")]
    InvalidPeriodTransition {
        from: BillingPeriodStatus,
        to: BillingPeriodStatus,
    },

    #[error("payment method not found: {id}")]
    CardNotFound {
        id: CardId,
    },

    #[error("payment method {id} is not active")]
    CardInactive {
        id: CardId,
    },

    #[error("card required: {amount} must be charged to a card but none is selected")]
    CardRequired {
        amount: Money,
    },

    #[error("malformed record: {message}")]
    Decode {
        message: String,
    },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration {
        message: String,
    },

    #[error("order failed validation: {}", ValidationErrors(.errors))]
    Validation {
        errors: Vec<ValidationError>,
    },

    #[error("payment submission failed: {message}")]
    Submission {
        message: String,
        retryable: bool,
    },
}

impl BillingError {
    /// whether re-fetching the order and retrying could succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            BillingError::Submission { retryable, .. } => *retryable,
            _ => false,
        }
    }
}

/// a single problem found by the strict validator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

struct ValidationErrors<'a>(&'a [ValidationError]);

impl fmt::Display for ValidationErrors<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, err) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{}", err)?;
        }
        Ok(())
    }
}

pub type Result<T> = std::result::Result<T, BillingError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_message_lists_every_field() {
        let err = BillingError::Validation {
            errors: vec![
                ValidationError::new("agreed_price", "must not be negative"),
                ValidationError::new("billing_periods[1].period_start", "out of order"),
            ],
        };

        assert_eq!(
            err.to_string(),
            "order failed validation: agreed_price: must not be negative; billing_periods[1].period_start: out of order"
        );
    }

    #[test]
    fn test_only_submission_errors_retry() {
        let submission = BillingError::Submission {
            message: "gateway timeout".to_string(),
            retryable: true,
        };
        assert!(submission.is_retryable());
        assert!(!BillingError::CardInactive { id: 7 }.is_retryable());
    }
}
