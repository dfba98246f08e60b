use serde::{Deserialize, Serialize};

use crate::decimal::Currency;
use crate::errors::{BillingError, Result};

/// how the unresolved billing period is picked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeriodSelection {
    /// trust the supplier's ascending `period_start` order
    #[default]
    AsSupplied,
    /// order by `period_start` before picking, ties keep supplier order
    SortByStart,
}

/// countdown rendering
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountdownConfig {
    pub hours_suffix: String,
    pub minutes_suffix: String,
}

impl Default for CountdownConfig {
    fn default() -> Self {
        Self {
            hours_suffix: "ч".to_string(),
            minutes_suffix: "мин".to_string(),
        }
    }
}

/// engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// used when an order record carries no currency
    pub default_currency: Currency,
    pub period_selection: PeriodSelection,
    pub countdown: CountdownConfig,
    /// reject malformed orders before quoting instead of substituting zeros
    pub strict_validation: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_currency: Currency::RUB,
            period_selection: PeriodSelection::AsSupplied,
            countdown: CountdownConfig::default(),
            strict_validation: false,
        }
    }
}

impl EngineConfig {
    /// validates before quoting and never trusts supplier ordering; period order
    /// is then a selection concern, not a validation failure
    pub fn strict() -> Self {
        Self {
            period_selection: PeriodSelection::SortByStart,
            strict_validation: true,
            ..Self::default()
        }
    }

    /// load from json, missing keys take their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let config: EngineConfig =
            serde_json::from_str(json).map_err(|e| BillingError::InvalidConfiguration {
                message: e.to_string(),
            })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.countdown.hours_suffix.trim().is_empty()
            || self.countdown.minutes_suffix.trim().is_empty()
        {
            return Err(BillingError::InvalidConfiguration {
                message: "countdown suffixes must not be empty".to_string(),
            });
        }
        Ok(())
    }
}
