//! Pricing

use rust_decimal::Decimal;

use crate::items::LineItem;

/// Returns `unit_price * quantity`, saturating at the largest representable amount.
pub fn line_total(unit_price: Decimal, quantity: u32) -> Decimal {
    unit_price.saturating_mul(Decimal::from(quantity))
}

/// Calculates the total price of a list of line items.
///
/// An empty list totals zero.
pub fn total_price(items: &[LineItem]) -> Decimal {
    items
        .iter()
        .fold(Decimal::ZERO, |acc, item| acc.saturating_add(item.line_total()))
}
