use serde::{Deserialize, Serialize};

/// Narrow no-break space between a number and its ticker.
const NARROW_NBSP: char = '\u{202F}';

/// A token amount as an integer quantity of atomic units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Amount {
    /// Decimal digits, no sign, no separator.
    pub quantity: String,
    pub fractional_digits: u32,
    pub token_ticker: String,
}

impl Amount {
    pub fn new(quantity: impl Into<String>, fractional_digits: u32, ticker: impl Into<String>) -> Self {
        Self {
            quantity: quantity.into(),
            fractional_digits,
            token_ticker: ticker.into(),
        }
    }
}

/// Formats as `whole.fraction TICKER` with trailing fractional zeros trimmed
/// (at least one fractional digit is kept).
pub fn print_amount(amount: &Amount) -> String {
    let digits = amount.fractional_digits as usize;
    let quantity = amount.quantity.trim_start_matches('0');
    let (whole, fraction) = if quantity.len() > digits {
        quantity.split_at(quantity.len() - digits)
    } else {
        ("", quantity)
    };
    let whole = if whole.is_empty() { "0" } else { whole };
    let padded = format!("{:0>width$}", fraction, width = digits);
    let trimmed = padded.trim_end_matches('0');
    let trimmed = if trimmed.is_empty() { "0" } else { trimmed };
    format!("{}.{}{}{}", whole, trimmed, NARROW_NBSP, amount.token_ticker)
}
