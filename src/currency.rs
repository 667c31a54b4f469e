//! Currency display
//!
//! Catalogue prices are quoted in USD and shown to shoppers in Indian rupees.

use rust_decimal::{Decimal, RoundingStrategy};
use rusty_money::{
    Money,
    iso::{self, Currency},
};

/// Default number of rupees per US dollar.
pub const DEFAULT_INR_RATE: Decimal = Decimal::from_parts(83, 0, 0, false, 0);

/// Formats catalogue prices for display.
#[derive(Debug, Clone, Copy)]
pub struct PriceFormatter {
    rate: Decimal,
    currency: &'static Currency,
}

impl Default for PriceFormatter {
    fn default() -> Self {
        Self::new(DEFAULT_INR_RATE)
    }
}

impl PriceFormatter {
    /// Creates a rupee formatter with the given conversion rate.
    pub fn new(rate: Decimal) -> Self {
        Self {
            rate,
            currency: iso::INR,
        }
    }

    /// Returns the conversion rate.
    pub fn rate(&self) -> Decimal {
        self.rate
    }

    /// Converts a catalogue price into display currency.
    pub fn convert(&self, price: Decimal) -> Money<'static, Currency> {
        Money::from_decimal(price.saturating_mul(self.rate), self.currency)
    }

    /// Formats `price` as whole rupees with Indian digit grouping, e.g. `₹1,23,504`.
    pub fn format(&self, price: Decimal) -> String {
        let amount = self
            .convert(price)
            .amount()
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);

        let sign = if amount.is_sign_negative() && !amount.is_zero() {
            "-"
        } else {
            ""
        };

        let digits = amount.abs().trunc().to_string();

        format!("{sign}{}{}", self.currency.symbol, group_indian(&digits))
    }

    /// Formats a price range label: `Under ₹x` without an upper bound, `₹a - ₹b` otherwise.
    pub fn format_range(&self, min: Decimal, max: Option<Decimal>) -> String {
        match max {
            None => format!("Under {}", self.format(min)),
            Some(max) => format!("{} - {}", self.format(min), self.format(max)),
        }
    }
}

/// Groups a run of ASCII digits the Indian way: the last three together, then pairs.
fn group_indian(digits: &str) -> String {
    let chars: Vec<char> = digits.chars().collect();
    let head_len = chars.len().saturating_sub(3);
    let (head, tail) = chars.split_at(head_len);

    let mut groups: Vec<String> = head
        .rchunks(2)
        .rev()
        .map(|chunk| chunk.iter().collect())
        .collect();

    groups.push(tail.iter().collect());

    groups.join(",")
}
