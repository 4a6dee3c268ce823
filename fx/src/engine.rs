//! INR to USD conversion engine.

use rupeeconv_common::{Amount, ExchangeRate, Unit, ValidationError, ValidationResult};
use rust_decimal::RoundingStrategy;
use tracing::debug;

use crate::conversion::Conversion;

/// Decimal places of the USD result.
pub const USD_DECIMAL_PLACES: u32 = 2;

/// Stateless converter from rupee amounts to dollars.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConversionEngine;

impl ConversionEngine {
    pub fn new() -> Self {
        Self
    }

    /// Validate raw input and convert.
    ///
    /// The amount is checked before the unit, so an empty amount with an
    /// unknown unit reports the amount.
    pub fn convert(
        &self,
        amount_text: &str,
        unit_text: &str,
        rate: &ExchangeRate,
    ) -> ValidationResult<Conversion> {
        let amount = Amount::parse(amount_text)?;
        let unit: Unit = unit_text.parse()?;
        self.convert_amount(amount, unit, rate)
    }

    /// Convert an already parsed amount.
    pub fn convert_amount(
        &self,
        amount: Amount,
        unit: Unit,
        rate: &ExchangeRate,
    ) -> ValidationResult<Conversion> {
        let rupees = amount
            .value()
            .checked_mul(unit.multiplier())
            .ok_or_else(|| ValidationError::AmountOutOfRange(amount.to_string()))?;

        let usd = rate
            .quote()
            .to_usd(rupees)
            .ok_or_else(|| ValidationError::AmountOutOfRange(amount.to_string()))?
            .round_dp_with_strategy(USD_DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero);

        let conversion = Conversion::new(amount, unit, rupees, usd, rate.clone());

        debug!(
            amount = %amount,
            unit = %unit,
            origin = %rate.origin(),
            usd = %usd,
            "Conversion completed"
        );

        Ok(conversion)
    }
}
