//! en-US number formatting with thousands separators.

use rust_decimal::{Decimal, RoundingStrategy};

/// Format a decimal with `,` grouping.
///
/// The value is rounded half away from zero to `max_fraction` digits, trailing
/// zeros are trimmed, then the fraction is padded back to `min_fraction` digits.
pub fn format_grouped(value: Decimal, min_fraction: u32, max_fraction: u32) -> String {
    let max_fraction = max_fraction.max(min_fraction);
    let rounded = value.round_dp_with_strategy(max_fraction, RoundingStrategy::MidpointAwayFromZero);

    let text = rounded.abs().to_string();
    let (int_part, frac_part) = match text.split_once('.') {
        Some((int_part, frac_part)) => (int_part, frac_part),
        None => (text.as_str(), ""),
    };

    let mut fraction = frac_part.trim_end_matches('0').to_string();
    while fraction.len() < min_fraction as usize {
        fraction.push('0');
    }

    let mut out = String::with_capacity(text.len() + int_part.len() / 3 + 2);
    if rounded.is_sign_negative() && !rounded.is_zero() {
        out.push('-');
    }
    out.push_str(&group_digits(int_part));
    if !fraction.is_empty() {
        out.push('.');
        out.push_str(&fraction);
    }
    out
}

/// Format a USD amount: grouping and exactly two fraction digits.
pub fn format_usd(value: Decimal) -> String {
    format_grouped(value, 2, 2)
}

fn group_digits(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
