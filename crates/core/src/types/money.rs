//! Money amounts and currency display.
//!
//! Amounts are kept in the currency's major unit (naira, not kobo) as
//! `rust_decimal::Decimal`, which is what the backend sends. Paystack wants
//! minor units, see [`Money::to_minor_units`].

use core::fmt;

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

/// Errors that can occur when building a [`Money`] value.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum MoneyError {
    /// Amount is negative where only non-negative amounts make sense.
    #[error("amount cannot be negative")]
    Negative,
    /// Amount does not fit into minor units.
    #[error("amount is too large")]
    Overflow,
}

/// ISO 4217 currency codes accepted by the marketplace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    NGN,
    GHS,
    KES,
    ZAR,
    USD,
}

impl CurrencyCode {
    /// Display symbol for the currency.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::NGN => "₦",
            Self::GHS => "GH₵",
            Self::KES => "KSh",
            Self::ZAR => "R",
            Self::USD => "$",
        }
    }

    /// ISO code as a string.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::NGN => "NGN",
            Self::GHS => "GHS",
            Self::KES => "KES",
            Self::ZAR => "ZAR",
            Self::USD => "USD",
        }
    }
}

/// A non-negative amount with currency information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    /// Amount in the currency's major unit.
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency_code: CurrencyCode,
}

impl Money {
    /// Create a new amount.
    ///
    /// # Errors
    ///
    /// Returns [`MoneyError::Negative`] for negative amounts.
    pub fn new(amount: Decimal, currency_code: CurrencyCode) -> Result<Self, MoneyError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(MoneyError::Negative);
        }
        Ok(Self {
            amount,
            currency_code,
        })
    }

    /// Zero in the given currency.
    #[must_use]
    pub const fn zero(currency_code: CurrencyCode) -> Self {
        Self {
            amount: Decimal::ZERO,
            currency_code,
        }
    }

    /// Amount in minor units (kobo for NGN), rounded half-up to 2 decimals.
    ///
    /// # Errors
    ///
    /// Returns [`MoneyError::Overflow`] if the value does not fit in an `i64`.
    pub fn to_minor_units(&self) -> Result<i64, MoneyError> {
        round_cents(self.amount)
            .checked_mul(Decimal::ONE_HUNDRED)
            .and_then(|minor| minor.to_i64())
            .ok_or(MoneyError::Overflow)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_currency(self.amount, self.currency_code))
    }
}

fn round_cents(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Format an amount for display, e.g. `₦1,234,500.00`.
///
/// Two decimal places, comma thousands separators, the sign ahead of the
/// symbol for negative amounts (refunds, settlement adjustments).
#[must_use]
pub fn format_currency(amount: Decimal, currency: CurrencyCode) -> String {
    let rounded = round_cents(amount);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let text = format!("{:.2}", rounded.abs());
    let (whole, fraction) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if negative { "-" } else { "" };
    format!("{sign}{}{grouped}.{fraction}", currency.symbol())
}
