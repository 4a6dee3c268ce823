//! Completed conversion record.

use std::fmt;

use chrono::{DateTime, Utc};
use rupeeconv_common::{format_usd, Amount, ExchangeRate, Unit};
use rust_decimal::Decimal;
use serde::Serialize;

/// A completed INR to USD conversion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Conversion {
    /// Amount as entered.
    pub amount: Amount,
    /// Unit the amount was entered in.
    pub unit: Unit,
    /// Amount scaled to rupees.
    pub rupees: Decimal,
    /// Dollar value, rounded to cents.
    pub usd: Decimal,
    /// Rate used for conversion.
    pub rate: ExchangeRate,
    /// When the conversion was executed.
    pub executed_at: DateTime<Utc>,
}

impl Conversion {
    /// Create a new conversion record.
    pub fn new(amount: Amount, unit: Unit, rupees: Decimal, usd: Decimal, rate: ExchangeRate) -> Self {
        Self {
            amount,
            unit,
            rupees,
            usd,
            rate,
            executed_at: Utc::now(),
        }
    }

    /// Result line shown to the user, e.g. `5 lakhs = $6,000.00 USD`.
    pub fn message(&self) -> String {
        format!("{} {} = ${} USD", self.amount, self.unit.label(), format_usd(self.usd))
    }
}

impl fmt::Display for Conversion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}
