use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::BillingError;

/// backend identifier of an order
pub type OrderId = u64;

/// backend identifier of a billing period
pub type BillingPeriodId = u64;

/// backend identifier of a saved card
pub type CardId = u64;

/// order lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// waiting for a sitter to accept
    PendingWorker,
    /// sitter found, client must prepay the full amount
    PendingPlatformPayment,
    /// sitter found, client must pay the booking fee
    PendingPlatformFee,
    Confirmed,
    InProgress,
    Completed,
    /// a recurring period charge failed
    RecurringPaymentFailed,
    Disputed,
    CanceledClient,
    CanceledWorker,
    CanceledAdmin,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 11] = [
        OrderStatus::PendingWorker,
        OrderStatus::PendingPlatformPayment,
        OrderStatus::PendingPlatformFee,
        OrderStatus::Confirmed,
        OrderStatus::InProgress,
        OrderStatus::Completed,
        OrderStatus::RecurringPaymentFailed,
        OrderStatus::Disputed,
        OrderStatus::CanceledClient,
        OrderStatus::CanceledWorker,
        OrderStatus::CanceledAdmin,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::PendingWorker => "pending_worker",
            OrderStatus::PendingPlatformPayment => "pending_platform_payment",
            OrderStatus::PendingPlatformFee => "pending_platform_fee",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::InProgress => "in_progress",
            OrderStatus::Completed => "completed",
            OrderStatus::RecurringPaymentFailed => "recurring_payment_failed",
            OrderStatus::Disputed => "disputed",
            OrderStatus::CanceledClient => "canceled_client",
            OrderStatus::CanceledWorker => "canceled_worker",
            OrderStatus::CanceledAdmin => "canceled_admin",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = BillingError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_lowercase();
        OrderStatus::ALL
            .into_iter()
            .find(|s| s.as_str() == normalized)
            .ok_or_else(|| BillingError::UnknownOrderStatus {
                value: value.to_string(),
            })
    }
}

/// billing period lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BillingPeriodStatus {
    PendingPayment,
    PaymentFailed,
    Paid,
    TasksCompleted,
    PayoutPending,
    PayoutComplete,
}

impl BillingPeriodStatus {
    pub const ALL: [BillingPeriodStatus; 6] = [
        BillingPeriodStatus::PendingPayment,
        BillingPeriodStatus::PaymentFailed,
        BillingPeriodStatus::Paid,
        BillingPeriodStatus::TasksCompleted,
        BillingPeriodStatus::PayoutPending,
        BillingPeriodStatus::PayoutComplete,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BillingPeriodStatus::PendingPayment => "pending_payment",
            BillingPeriodStatus::PaymentFailed => "payment_failed",
            BillingPeriodStatus::Paid => "paid",
            BillingPeriodStatus::TasksCompleted => "tasks_completed",
            BillingPeriodStatus::PayoutPending => "payout_pending",
            BillingPeriodStatus::PayoutComplete => "payout_complete",
        }
    }
}

impl fmt::Display for BillingPeriodStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BillingPeriodStatus {
    type Err = BillingError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_lowercase();
        BillingPeriodStatus::ALL
            .into_iter()
            .find(|s| s.as_str() == normalized)
            .ok_or_else(|| BillingError::UnknownPeriodStatus {
                value: value.to_string(),
            })
    }
}

/// who gets paid through the platform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentFlow {
    /// client pays the full cost to the platform up front
    PlatformPrepay,
    /// client pays a booking fee, the rest goes to the sitter directly
    PlatformFeeOnly,
    /// sitter is paid entirely outside the platform
    DirectToWorker,
}

impl PaymentFlow {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentFlow::PlatformPrepay => "platform_prepay",
            PaymentFlow::PlatformFeeOnly => "platform_fee_only",
            PaymentFlow::DirectToWorker => "direct_to_worker",
        }
    }
}

impl fmt::Display for PaymentFlow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentFlow {
    type Err = BillingError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "platform_prepay" => Ok(PaymentFlow::PlatformPrepay),
            "platform_fee_only" => Ok(PaymentFlow::PlatformFeeOnly),
            "direct_to_worker" => Ok(PaymentFlow::DirectToWorker),
            _ => Err(BillingError::UnknownPaymentFlow {
                value: value.to_string(),
            }),
        }
    }
}

/// one-off visit or a subscription-like recurring service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScheduleType {
    #[default]
    OneTime,
    Recurring,
}

/// saved card status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardStatus {
    #[default]
    Active,
    Inactive,
}
