//! Amount, unit and exchange rate types.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{ValidationError, ValidationResult};
use crate::format::format_grouped;

/// Rupees per US dollar used when no live rate is available.
pub const FALLBACK_INR_PER_USD: u32 = 82;

/// Rupees in one lakh.
pub const RUPEES_PER_LAKH: u32 = 100_000;

/// Rupees in one crore.
pub const RUPEES_PER_CRORE: u32 = 10_000_000;

/// A positive rupee amount as typed by the user, before unit scaling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Amount(Decimal);

impl Amount {
    /// Create an amount, rejecting zero and negative values.
    pub fn new(value: Decimal) -> ValidationResult<Self> {
        if value <= Decimal::ZERO {
            return Err(ValidationError::invalid_amount(value.to_string()));
        }
        Ok(Self(value))
    }

    /// Parse raw input text.
    ///
    /// Accepts plain decimals and scientific notation, with surrounding
    /// whitespace. Anything else, including `NaN`, infinities and digit
    /// separators, is an invalid amount. A positive number the decimal type
    /// cannot hold is out of range rather than invalid.
    pub fn parse(input: &str) -> ValidationResult<Self> {
        let trimmed = input.trim();
        let literal =
            NumericLiteral::scan(trimmed).ok_or_else(|| ValidationError::invalid_amount(input))?;
        if literal.negative || !literal.has_nonzero_digit {
            return Err(ValidationError::invalid_amount(input));
        }

        let unsigned = trimmed.trim_start_matches('+').to_ascii_lowercase();
        let normalized = if unsigned.starts_with('.') {
            format!("0{unsigned}")
        } else {
            unsigned
        };
        let value = Decimal::from_str(&normalized)
            .or_else(|_| Decimal::from_scientific(&normalized))
            .map_err(|_| ValidationError::AmountOutOfRange(trimmed.to_string()))?;

        // Digits beyond 28 places may round away to zero.
        if value <= Decimal::ZERO {
            return Err(ValidationError::AmountOutOfRange(trimmed.to_string()));
        }
        Ok(Self(value))
    }

    /// Get the decimal value.
    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", format_grouped(self.0, 0, 3))
    }
}

impl FromStr for Amount {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Shape of a decimal literal: `[+-]digits[.digits][e[+-]digits]`.
struct NumericLiteral {
    negative: bool,
    has_nonzero_digit: bool,
}

impl NumericLiteral {
    fn scan(text: &str) -> Option<Self> {
        let mut chars = text.chars().peekable();
        let negative = match chars.peek() {
            Some('-') => {
                chars.next();
                true
            }
            Some('+') => {
                chars.next();
                false
            }
            _ => false,
        };

        let mut mantissa_digits = 0;
        let mut has_nonzero_digit = false;
        let mut seen_point = false;
        while let Some(&c) = chars.peek() {
            match c {
                '0'..='9' => {
                    mantissa_digits += 1;
                    has_nonzero_digit |= c != '0';
                }
                '.' if !seen_point => seen_point = true,
                _ => break,
            }
            chars.next();
        }
        if mantissa_digits == 0 {
            return None;
        }

        if matches!(chars.peek(), Some('e') | Some('E')) {
            chars.next();
            if matches!(chars.peek(), Some('+') | Some('-')) {
                chars.next();
            }
            let mut exponent_digits = 0;
            while chars.peek().is_some_and(|c| c.is_ascii_digit()) {
                exponent_digits += 1;
                chars.next();
            }
            if exponent_digits == 0 {
                return None;
            }
        }

        if chars.next().is_some() {
            return None;
        }
        Some(Self {
            negative,
            has_nonzero_digit,
        })
    }
}

/// Indian numbering unit the amount is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    Rupees,
    #[default]
    Lakhs,
    Crores,
}

impl Unit {
    /// All selectable units, in display order.
    pub const ALL: [Unit; 3] = [Unit::Rupees, Unit::Lakhs, Unit::Crores];

    /// Rupees represented by one of this unit.
    pub fn multiplier(&self) -> Decimal {
        match self {
            Unit::Rupees => Decimal::ONE,
            Unit::Lakhs => Decimal::from(RUPEES_PER_LAKH),
            Unit::Crores => Decimal::from(RUPEES_PER_CRORE),
        }
    }

    /// Lowercase label used in result strings.
    pub fn label(&self) -> &'static str {
        match self {
            Unit::Rupees => "rupees",
            Unit::Lakhs => "lakhs",
            Unit::Crores => "crores",
        }
    }

    /// Option text shown in the selector.
    pub fn display_name(&self) -> &'static str {
        match self {
            Unit::Rupees => "Rupees",
            Unit::Lakhs => "Lakhs",
            Unit::Crores => "Crores",
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Unit {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rupees" | "rupee" => Ok(Unit::Rupees),
            "lakhs" | "lakh" => Ok(Unit::Lakhs),
            "crores" | "crore" => Ok(Unit::Crores),
            _ => Err(ValidationError::UnknownUnit(s.to_string())),
        }
    }
}

/// A rate value together with the convention it is quoted in.
///
/// The two conventions are kept apart: a USD-per-INR rate multiplies, an
/// INR-per-USD rate divides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "convention", content = "value", rename_all = "snake_case")]
pub enum RateQuote {
    /// 1 INR = r USD.
    UsdPerInr(Decimal),
    /// 1 USD = r INR.
    InrPerUsd(Decimal),
}

impl RateQuote {
    /// The raw quoted number.
    pub fn value(&self) -> Decimal {
        match self {
            RateQuote::UsdPerInr(r) | RateQuote::InrPerUsd(r) => *r,
        }
    }

    /// Dollars for one rupee. Zero for a zero quote.
    pub fn usd_per_inr(&self) -> Decimal {
        match self {
            RateQuote::UsdPerInr(r) => *r,
            RateQuote::InrPerUsd(r) => Decimal::ONE.checked_div(*r).unwrap_or_default(),
        }
    }

    /// Rupees for one dollar. Zero for a zero quote.
    pub fn inr_per_usd(&self) -> Decimal {
        match self {
            RateQuote::UsdPerInr(r) => Decimal::ONE.checked_div(*r).unwrap_or_default(),
            RateQuote::InrPerUsd(r) => *r,
        }
    }

    /// Convert a rupee amount to dollars. `None` on overflow.
    pub fn to_usd(&self, rupees: Decimal) -> Option<Decimal> {
        match self {
            RateQuote::UsdPerInr(r) => rupees.checked_mul(*r),
            RateQuote::InrPerUsd(r) => rupees.checked_div(*r),
        }
    }
}

impl fmt::Display for RateQuote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RateQuote::UsdPerInr(r) => write!(f, "1 INR = {} USD", r),
            RateQuote::InrPerUsd(r) => write!(f, "1 USD = {} INR", r),
        }
    }
}

/// Where the rate in use came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RateOrigin {
    /// Fetched from the rate service.
    Live,
    /// Substituted after a failed fetch.
    Fallback,
    /// Configured constant, never fetched.
    Fixed,
}

impl fmt::Display for RateOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RateOrigin::Live => write!(f, "live"),
            RateOrigin::Fallback => write!(f, "fallback"),
            RateOrigin::Fixed => write!(f, "fixed"),
        }
    }
}

/// A positive INR/USD exchange rate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExchangeRate {
    quote: RateQuote,
    origin: RateOrigin,
    as_of: DateTime<Utc>,
}

impl ExchangeRate {
    /// Create a rate stamped with the current time.
    pub fn new(quote: RateQuote, origin: RateOrigin) -> ValidationResult<Self> {
        if quote.value() <= Decimal::ZERO {
            return Err(ValidationError::InvalidRate(quote.value().to_string()));
        }
        Ok(Self {
            quote,
            origin,
            as_of: Utc::now(),
        })
    }

    /// Live USD-per-INR rate as reported by the rate service.
    pub fn live(usd_per_inr: Decimal) -> ValidationResult<Self> {
        Self::new(RateQuote::UsdPerInr(usd_per_inr), RateOrigin::Live)
    }

    /// The 1/82 USD-per-INR rate used after a failed fetch.
    pub fn fallback() -> Self {
        Self {
            quote: RateQuote::UsdPerInr(Decimal::ONE / Decimal::from(FALLBACK_INR_PER_USD)),
            origin: RateOrigin::Fallback,
            as_of: Utc::now(),
        }
    }

    /// The flat 82 INR-per-USD rate of the fixed-rate widget.
    pub fn fixed() -> Self {
        Self {
            quote: RateQuote::InrPerUsd(Decimal::from(FALLBACK_INR_PER_USD)),
            origin: RateOrigin::Fixed,
            as_of: Utc::now(),
        }
    }

    pub fn quote(&self) -> RateQuote {
        self.quote
    }

    pub fn origin(&self) -> RateOrigin {
        self.origin
    }

    /// When the rate was obtained.
    pub fn as_of(&self) -> DateTime<Utc> {
        self.as_of
    }

    /// Rupees for one dollar.
    pub fn inr_per_usd(&self) -> Decimal {
        self.quote.inr_per_usd()
    }

    /// Dollars for one rupee.
    pub fn usd_per_inr(&self) -> Decimal {
        self.quote.usd_per_inr()
    }
}

impl fmt::Display for ExchangeRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.quote, self.origin)
    }
}
