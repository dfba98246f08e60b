//! backend record shapes and their lenient conversion into domain types
//!
//! The order API returns amounts as decimal strings (sometimes numbers, null or
//! garbage), wraps nested lists in `{"data": [...]}` and may omit currency.
//! Numeric problems become zero with a warning; unknown statuses, flows and
//! currency codes are errors because no neutral value exists for them.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::str::FromStr;
use tracing::warn;

use crate::config::EngineConfig;
use crate::decimal::{Currency, Money};
use crate::errors::{BillingError, Result};
use crate::order::{BillingPeriod, Order};
use crate::types::{
    BillingPeriodId, BillingPeriodStatus, CardId, CardStatus, OrderId, OrderStatus, PaymentFlow,
    ScheduleType,
};
use crate::wallet::{PaymentMethod, UserBalance};

/// an amount as the backend sends it
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawAmount {
    Text(String),
    Number(serde_json::Number),
}

impl RawAmount {
    fn to_money(&self, currency: Currency) -> Result<Money> {
        match self {
            RawAmount::Text(s) => Money::parse(s, currency),
            RawAmount::Number(n) => {
                let text = n.to_string();
                let value = Decimal::from_str(&text)
                    .or_else(|_| Decimal::from_scientific(&text))
                    .map_err(|_| BillingError::InvalidAmount { value: text.clone() })?;
                Money::from_decimal(value, currency)
            }
        }
    }
}

/// nested lists arrive either bare or as `{"data": [...]}`
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Listing<T> {
    Wrapped { data: Vec<T> },
    Bare(Vec<T>),
}

impl<T> Listing<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            Listing::Wrapped { data } => data,
            Listing::Bare(items) => items,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct OrderRecord {
    pub id: OrderId,
    pub status: String,
    #[serde(default)]
    pub service_type: Option<String>,
    #[serde(default)]
    pub schedule_type: Option<String>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub agreed_price: Option<RawAmount>,
    #[serde(default)]
    pub discount_amount: Option<RawAmount>,
    #[serde(default)]
    pub amount_due_to_platform: Option<RawAmount>,
    #[serde(default)]
    pub payment_flow_type: Option<String>,
    #[serde(default)]
    pub payment_due_at_utc: Option<DateTime<Utc>>,
    #[serde(default)]
    pub billing_periods: Option<Listing<BillingPeriodRecord>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BillingPeriodRecord {
    pub id: BillingPeriodId,
    pub period_start: DateTime<Utc>,
    pub period_end: DateTime<Utc>,
    pub status: String,
    #[serde(default)]
    pub gross_amount: Option<RawAmount>,
    #[serde(default)]
    pub discount_amount: Option<RawAmount>,
    #[serde(default)]
    pub amount_due_from_client: Option<RawAmount>,
    #[serde(default)]
    pub amount_due_to_platform: Option<RawAmount>,
    #[serde(default)]
    pub amount_payable_directly_to_worker: Option<RawAmount>,
    /// older backends send the worker share under this key
    #[serde(default)]
    pub amount_payable_directly: Option<RawAmount>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BalanceRecord {
    #[serde(default)]
    pub amount: Option<RawAmount>,
    #[serde(default)]
    pub currency: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PaymentMethodRecord {
    pub id: CardId,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub last4: Option<String>,
    #[serde(default)]
    pub exp_month: Option<u8>,
    #[serde(default)]
    pub exp_year: Option<u16>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub is_default: bool,
}

impl OrderRecord {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| BillingError::Decode {
            message: e.to_string(),
        })
    }

    pub fn into_order(self, config: &EngineConfig) -> Result<Order> {
        let currency = resolve_currency(self.currency.as_deref(), config.default_currency)?;
        let status = OrderStatus::from_str(&self.status)?;
        let payment_flow_type = match self.payment_flow_type.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(flow) => Some(PaymentFlow::from_str(flow)?),
        };
        let schedule_type = match self.schedule_type.as_deref().map(str::trim) {
            Some("recurring") => ScheduleType::Recurring,
            _ => ScheduleType::OneTime,
        };

        let billing_periods = self
            .billing_periods
            .map(Listing::into_vec)
            .unwrap_or_default()
            .into_iter()
            .map(|p| p.into_period(currency))
            .collect::<Result<Vec<_>>>()?;

        Ok(Order {
            id: self.id,
            status,
            service_type: self.service_type.unwrap_or_default(),
            schedule_type,
            currency,
            agreed_price: lenient(self.agreed_price.as_ref(), currency, "agreed_price"),
            discount_amount: lenient(self.discount_amount.as_ref(), currency, "discount_amount"),
            amount_due_to_platform: lenient(
                self.amount_due_to_platform.as_ref(),
                currency,
                "amount_due_to_platform",
            ),
            payment_flow_type,
            payment_due_at_utc: self.payment_due_at_utc,
            billing_periods,
        })
    }
}

impl BillingPeriodRecord {
    pub fn into_period(self, currency: Currency) -> Result<BillingPeriod> {
        Ok(BillingPeriod {
            id: self.id,
            period_start: self.period_start,
            period_end: self.period_end,
            status: BillingPeriodStatus::from_str(&self.status)?,
            gross_amount: lenient(self.gross_amount.as_ref(), currency, "gross_amount"),
            discount_amount: lenient(self.discount_amount.as_ref(), currency, "discount_amount"),
            amount_due_from_client: optional(
                self.amount_due_from_client.as_ref(),
                currency,
                "amount_due_from_client",
            ),
            amount_due_to_platform: optional(
                self.amount_due_to_platform.as_ref(),
                currency,
                "amount_due_to_platform",
            ),
            amount_payable_directly_to_worker: optional(
                self.amount_payable_directly_to_worker.as_ref(),
                currency,
                "amount_payable_directly_to_worker",
            )
            .or_else(|| {
                optional(
                    self.amount_payable_directly.as_ref(),
                    currency,
                    "amount_payable_directly",
                )
            })
            .unwrap_or_else(|| Money::zero(currency)),
        })
    }
}

impl BalanceRecord {
    pub fn into_balance(self, config: &EngineConfig) -> Result<UserBalance> {
        let currency = resolve_currency(self.currency.as_deref(), config.default_currency)?;
        Ok(UserBalance::new(lenient(self.amount.as_ref(), currency, "balance.amount")))
    }
}

impl PaymentMethodRecord {
    /// a missing status means active; any value other than "active" is inactive
    pub fn into_method(self) -> PaymentMethod {
        let status = match self.status.as_deref().map(str::trim) {
            Some("active") | None => CardStatus::Active,
            Some(_) => CardStatus::Inactive,
        };
        PaymentMethod {
            id: self.id,
            brand: self.brand.unwrap_or_default(),
            last4: self.last4.unwrap_or_default(),
            exp_month: self.exp_month.unwrap_or_default(),
            exp_year: self.exp_year.unwrap_or_default(),
            status,
            is_default: self.is_default,
        }
    }
}

fn resolve_currency(code: Option<&str>, default: Currency) -> Result<Currency> {
    match code.map(str::trim) {
        None | Some("") => Ok(default),
        Some(code) => Currency::new(code),
    }
}

/// missing, empty or unparsable amounts become zero
fn lenient(raw: Option<&RawAmount>, currency: Currency, field: &str) -> Money {
    optional(raw, currency, field).unwrap_or_else(|| Money::zero(currency))
}

/// `None` only when the field is absent or blank; garbage becomes zero
fn optional(raw: Option<&RawAmount>, currency: Currency, field: &str) -> Option<Money> {
    let raw = raw?;
    if matches!(raw, RawAmount::Text(s) if s.trim().is_empty()) {
        return None;
    }
    match raw.to_money(currency) {
        Ok(m) => Some(m),
        Err(e) => {
            warn!(field, error = %e, "unparsable amount treated as zero");
            Some(Money::zero(currency))
        }
    }
}
