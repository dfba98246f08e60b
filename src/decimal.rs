use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, AddAssign, Sub, SubAssign};
use std::str::FromStr;

use crate::errors::{BillingError, Result};

/// three-letter currency code, stored inline so money stays `Copy`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Currency([u8; 3]);

impl Currency {
    pub const RUB: Currency = Currency(*b"RUB");
    pub const USD: Currency = Currency(*b"USD");
    pub const EUR: Currency = Currency(*b"EUR");
    pub const KZT: Currency = Currency(*b"KZT");

    /// parse a code, case-insensitive
    pub fn new(code: &str) -> Result<Self> {
        let trimmed = code.trim();
        let bytes = trimmed.as_bytes();
        if bytes.len() != 3 || !bytes.iter().all(u8::is_ascii_alphabetic) {
            return Err(BillingError::InvalidCurrency {
                code: code.to_string(),
            });
        }
        let mut upper = [0u8; 3];
        for (dst, src) in upper.iter_mut().zip(bytes) {
            *dst = src.to_ascii_uppercase();
        }
        Ok(Currency(upper))
    }

    pub fn code(&self) -> &str {
        // only ascii letters are ever stored
        std::str::from_utf8(&self.0).unwrap_or("???")
    }

    /// number of minor-unit digits (kopecks, cents)
    pub fn minor_exponent(&self) -> u32 {
        match &self.0 {
            b"JPY" | b"KRW" | b"VND" | b"CLP" | b"ISK" => 0,
            b"BHD" | b"KWD" | b"OMR" | b"JOD" | b"TND" => 3,
            _ => 2,
        }
    }

    /// display symbol, falls back to the code
    pub fn symbol(&self) -> &str {
        match &self.0 {
            b"RUB" => "₽",
            b"USD" => "$",
            b"EUR" => "€",
            b"KZT" => "₸",
            _ => self.code(),
        }
    }
}

impl Default for Currency {
    fn default() -> Self {
        Currency::RUB
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Currency {
    type Err = BillingError;

    fn from_str(s: &str) -> Result<Self> {
        Currency::new(s)
    }
}

impl TryFrom<String> for Currency {
    type Error = BillingError;

    fn try_from(value: String) -> Result<Self> {
        Currency::new(&value)
    }
}

impl From<Currency> for String {
    fn from(c: Currency) -> Self {
        c.code().to_string()
    }
}

/// fixed-point money: an integer count of minor units plus its currency
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Money {
    amount_minor_units: i64,
    currency: Currency,
}

impl Money {
    pub const fn zero(currency: Currency) -> Self {
        Money {
            amount_minor_units: 0,
            currency,
        }
    }

    /// create from minor amount (kopecks, cents)
    pub const fn from_minor(amount_minor_units: i64, currency: Currency) -> Self {
        Money {
            amount_minor_units,
            currency,
        }
    }

    /// create from whole units (roubles, dollars)
    pub fn from_major(amount: i64, currency: Currency) -> Self {
        let factor = 10_i64.pow(currency.minor_exponent());
        Money::from_minor(amount.saturating_mul(factor), currency)
    }

    /// create from a decimal, rounding half away from zero to the currency's minor unit
    pub fn from_decimal(value: Decimal, currency: Currency) -> Result<Self> {
        let exponent = currency.minor_exponent();
        let mut rounded =
            value.round_dp_with_strategy(exponent, RoundingStrategy::MidpointAwayFromZero);
        rounded.rescale(exponent);
        let minor = i64::try_from(rounded.mantissa()).map_err(|_| BillingError::AmountOverflow {
            value: value.to_string(),
        })?;
        Ok(Money::from_minor(minor, currency))
    }

    /// parse a decimal string such as "1500.50"
    pub fn parse(s: &str, currency: Currency) -> Result<Self> {
        let value = Decimal::from_str(s.trim()).map_err(|_| BillingError::InvalidAmount {
            value: s.to_string(),
        })?;
        Money::from_decimal(value, currency)
    }

    pub fn amount_minor_units(&self) -> i64 {
        self.amount_minor_units
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }

    /// exact decimal view, scaled to the currency exponent
    pub fn as_decimal(&self) -> Decimal {
        Decimal::new(self.amount_minor_units, self.currency.minor_exponent())
    }

    pub fn is_zero(&self) -> bool {
        self.amount_minor_units == 0
    }

    /// strictly greater than zero
    pub fn is_positive(&self) -> bool {
        self.amount_minor_units > 0
    }

    pub fn is_negative(&self) -> bool {
        self.amount_minor_units < 0
    }

    /// negative values become zero
    pub fn clamp_non_negative(self) -> Self {
        Money::from_minor(self.amount_minor_units.max(0), self.currency)
    }

    pub fn checked_add(self, other: Money) -> Result<Self> {
        self.ensure_same_currency(&other)?;
        let sum = self
            .amount_minor_units
            .checked_add(other.amount_minor_units)
            .ok_or_else(|| BillingError::AmountOverflow {
                value: format!("{} + {}", self, other),
            })?;
        Ok(Money::from_minor(sum, self.currency))
    }

    pub fn checked_sub(self, other: Money) -> Result<Self> {
        self.ensure_same_currency(&other)?;
        let diff = self
            .amount_minor_units
            .checked_sub(other.amount_minor_units)
            .ok_or_else(|| BillingError::AmountOverflow {
                value: format!("{} - {}", self, other),
            })?;
        Ok(Money::from_minor(diff, self.currency))
    }

    /// smaller of two amounts in the same currency
    pub fn checked_min(self, other: Money) -> Result<Self> {
        self.ensure_same_currency(&other)?;
        Ok(if other.amount_minor_units < self.amount_minor_units {
            other
        } else {
            self
        })
    }

    pub fn ensure_same_currency(&self, other: &Money) -> Result<()> {
        if self.currency != other.currency {
            return Err(BillingError::CurrencyMismatch {
                expected: self.currency,
                found: other.currency,
            });
        }
        Ok(())
    }

    /// "900.00 ₽"
    pub fn format_with_symbol(&self) -> String {
        format!("{} {}", self.as_decimal(), self.currency.symbol())
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.as_decimal(), self.currency)
    }
}

// amounts in different currencies are unordered
impl PartialOrd for Money {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if self.currency != other.currency {
            return None;
        }
        Some(self.amount_minor_units.cmp(&other.amount_minor_units))
    }
}

/// same-currency arithmetic only; mixing currencies panics in debug builds,
/// so amounts from outside the crate go through `checked_add`/`checked_sub`
impl Add for Money {
    type Output = Money;

    fn add(self, other: Money) -> Money {
        debug_assert_eq!(self.currency, other.currency, "adding mixed currencies");
        Money::from_minor(
            self.amount_minor_units.saturating_add(other.amount_minor_units),
            self.currency,
        )
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, other: Money) {
        *self = *self + other;
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, other: Money) -> Money {
        debug_assert_eq!(self.currency, other.currency, "subtracting mixed currencies");
        Money::from_minor(
            self.amount_minor_units.saturating_sub(other.amount_minor_units),
            self.currency,
        )
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, other: Money) {
        *self = *self - other;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_backend_strings() {
        let m = Money::parse("1500.50", Currency::RUB).unwrap();
        assert_eq!(m.amount_minor_units(), 150_050);
        assert_eq!(m.to_string(), "1500.50 RUB");

        let whole = Money::parse("900", Currency::RUB).unwrap();
        assert_eq!(whole, Money::from_major(900, Currency::RUB));
    }

    #[test]
    fn test_rounds_half_away_from_zero() {
        let m = Money::from_decimal(dec!(10.005), Currency::USD).unwrap();
        assert_eq!(m.amount_minor_units(), 1001);

        let neg = Money::from_decimal(dec!(-10.005), Currency::USD).unwrap();
        assert_eq!(neg.amount_minor_units(), -1001);
    }

    #[test]
    fn test_zero_exponent_currency() {
        let yen = Currency::new("jpy").unwrap();
        let m = Money::parse("1200", yen).unwrap();
        assert_eq!(m.amount_minor_units(), 1200);
        assert_eq!(m.as_decimal(), dec!(1200));
    }

    #[test]
    fn test_invalid_inputs() {
        assert!(Money::parse("twelve", Currency::RUB).is_err());
        assert!(Currency::new("RUBL").is_err());
        assert!(Currency::new("R1B").is_err());
        assert!(Money::from_decimal(dec!(100000000000000000000), Currency::RUB).is_err());
    }

    #[test]
    fn test_clamp_non_negative() {
        let negative = Money::from_major(-5, Currency::RUB);
        assert_eq!(negative.clamp_non_negative(), Money::zero(Currency::RUB));

        let positive = Money::from_major(5, Currency::RUB);
        assert_eq!(positive.clamp_non_negative(), positive);
    }

    #[test]
    fn test_checked_ops_reject_mixed_currency() {
        let rub = Money::from_major(1, Currency::RUB);
        let usd = Money::from_major(1, Currency::USD);

        assert!(matches!(
            rub.checked_add(usd),
            Err(BillingError::CurrencyMismatch { .. })
        ));
        assert!(rub.checked_min(usd).is_err());
        assert_eq!(rub.partial_cmp(&usd), None);
    }

    #[test]
    fn test_checked_overflow() {
        let max = Money::from_minor(i64::MAX, Currency::RUB);
        let one = Money::from_minor(1, Currency::RUB);
        assert!(matches!(
            max.checked_add(one),
            Err(BillingError::AmountOverflow { .. })
        ));
    }

    #[test]
    fn test_symbol_formatting() {
        let m = Money::from_minor(90_000, Currency::RUB);
        assert_eq!(m.format_with_symbol(), "900.00 ₽");

        let gbp = Currency::new("GBP").unwrap();
        assert_eq!(Money::from_minor(150, gbp).format_with_symbol(), "1.50 GBP");
    }

    #[test]
    fn test_serde_shape() {
        let m = Money::from_minor(5_000, Currency::RUB);
        let json = serde_json::to_value(m).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "amount_minor_units": 5000, "currency": "RUB" })
        );

        let back: Money = serde_json::from_value(json).unwrap();
        assert_eq!(back, m);
    }
}
