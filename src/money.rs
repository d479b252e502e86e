// Exact monetary amounts.
//
// Amounts are carried as integer minor units tagged with their currency;
// the aggregate used for control sums rescales every term to a common
// denominator with integer arithmetic. No floating point anywhere.

use std::fmt;

use rust_decimal::Decimal;

/// ISO 4217 currency code with its minor-unit digit count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Currency {
    /// Swiss Franc
    CHF,
    /// Euro
    EUR,
    /// US Dollar
    USD,
    /// British Pound
    GBP,
    /// Japanese Yen
    JPY,
    /// Danish Krone
    DKK,
    /// Norwegian Krone
    NOK,
    /// Swedish Krona
    SEK,
    /// Kuwaiti Dinar
    KWD,
}

impl Currency {
    /// ISO 4217 code
    pub fn code(&self) -> &'static str {
        match self {
            Currency::CHF => "CHF",
            Currency::EUR => "EUR",
            Currency::USD => "USD",
            Currency::GBP => "GBP",
            Currency::JPY => "JPY",
            Currency::DKK => "DKK",
            Currency::NOK => "NOK",
            Currency::SEK => "SEK",
            Currency::KWD => "KWD",
        }
    }

    /// Number of minor-unit digits
    pub fn decimals(&self) -> u32 {
        match self {
            Currency::JPY => 0,
            Currency::KWD => 3,
            _ => 2,
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A currency-tagged amount in minor units.
///
/// Immutable; there is no in-place arithmetic. Sums are formed through
/// [`AggregateMoney`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Money {
    currency: Currency,
    minor_units: i64,
}

impl Money {
    pub fn new(currency: Currency, minor_units: i64) -> Self {
        Self {
            currency,
            minor_units,
        }
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }

    pub fn minor_units(&self) -> i64 {
        self.minor_units
    }

    /// Decimal string with the currency's exact minor-unit digit count,
    /// e.g. `1300.00` for CHF 1300.00 and `300.001` for KWD 300.001.
    pub fn format(&self) -> String {
        Decimal::new(self.minor_units, self.currency.decimals()).to_string()
    }
}

/// Sum of amounts across possibly different currencies.
///
/// Used for the `CtrlSum` reporting total, which adds every transaction
/// amount regardless of currency. The scale grows to the maximum
/// minor-unit digit count seen so far; every term is rescaled to that
/// denominator by integer multiplication before adding, so summing CHF
/// and KWD amounts yields a three-decimal total without drift.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AggregateMoney {
    minor_units: i128,
    decimals: u32,
}

impl AggregateMoney {
    pub fn zero() -> Self {
        Self {
            minor_units: 0,
            decimals: 0,
        }
    }

    /// Returns a new aggregate with `addend` included.
    pub fn plus(&self, addend: Money) -> Self {
        Self::combine(
            self.minor_units,
            self.decimals,
            addend.minor_units() as i128,
            addend.currency().decimals(),
        )
    }

    /// Returns a new aggregate combining two aggregates.
    pub fn merge(&self, other: &AggregateMoney) -> Self {
        Self::combine(
            self.minor_units,
            self.decimals,
            other.minor_units,
            other.decimals,
        )
    }

    fn combine(units_a: i128, decimals_a: u32, units_b: i128, decimals_b: u32) -> Self {
        let decimals = decimals_a.max(decimals_b);
        let scaled_a = units_a * 10i128.pow(decimals - decimals_a);
        let scaled_b = units_b * 10i128.pow(decimals - decimals_b);
        Self {
            minor_units: scaled_a + scaled_b,
            decimals,
        }
    }

    /// Decimal string using the accumulated minor-unit digit count.
    pub fn format(&self) -> String {
        Decimal::from_i128_with_scale(self.minor_units, self.decimals).to_string()
    }
}
