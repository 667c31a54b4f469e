//! Cart
//!
//! An ordered list of line items with at most one row per [`LineItemKey`](crate::items::LineItemKey).
//! Every operation returns a new cart and leaves the receiver untouched.

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

use crate::{
    items::{LineItem, clamp_quantity},
    pricing::total_price,
};

pub mod store;

pub use store::CartStore;

/// Errors related to cart mutation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CartError {
    /// No line item exists at the given index (index, cart length).
    #[error("Item {0} not found in cart of {1} items")]
    ItemNotFound(usize, usize),
}

/// Cart
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<LineItem>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a cart from arbitrary rows, merging rows that share an identity key.
    ///
    /// The first occurrence of a key keeps its position; later occurrences add their quantity
    /// to it.
    pub fn from_items(items: impl IntoIterator<Item = LineItem>) -> Self {
        items
            .into_iter()
            .fold(Self::new(), |cart, item| cart.with_item(item))
    }

    /// Returns a cart with `candidate` merged in.
    ///
    /// If a row with the same product, size and colour exists its quantity grows by the
    /// candidate's quantity; otherwise the candidate is appended.
    #[must_use]
    pub fn with_item(&self, candidate: LineItem) -> Self {
        let mut items = self.items.clone();

        match items.iter_mut().find(|item| item.key() == candidate.key()) {
            Some(existing) => existing.add_quantity(candidate.quantity()),
            None => items.push(candidate),
        }

        Self { items }
    }

    /// Returns a cart with the quantity at `index` replaced, clamped to at least one.
    ///
    /// # Errors
    ///
    /// Returns a [`CartError::ItemNotFound`] if `index` is out of range.
    pub fn with_quantity(&self, index: usize, quantity: i64) -> Result<Self, CartError> {
        self.map_item(index, |item| item.set_quantity(clamp_quantity(quantity)))
    }

    /// Returns a cart with `delta` added to the quantity at `index`, clamped to at least one.
    ///
    /// # Errors
    ///
    /// Returns a [`CartError::ItemNotFound`] if `index` is out of range.
    pub fn with_quantity_adjusted(&self, index: usize, delta: i64) -> Result<Self, CartError> {
        self.map_item(index, |item| {
            let adjusted = i64::from(item.quantity()).saturating_add(delta);

            item.set_quantity(clamp_quantity(adjusted));
        })
    }

    /// Returns a cart without the row at `index`.
    ///
    /// # Errors
    ///
    /// Returns a [`CartError::ItemNotFound`] if `index` is out of range.
    pub fn without_item(&self, index: usize) -> Result<Self, CartError> {
        self.check_index(index)?;

        let items = self
            .items
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != index)
            .map(|(_, item)| item.clone())
            .collect();

        Ok(Self { items })
    }

    /// Sum of `unit_price * quantity` over all rows; zero when empty.
    pub fn total(&self) -> Decimal {
        total_price(&self.items)
    }

    /// Sum of quantities over all rows.
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity())).sum()
    }

    /// Get a line item by its index.
    ///
    /// # Errors
    ///
    /// Returns a [`CartError::ItemNotFound`] if the item is not found.
    pub fn get_item(&self, index: usize) -> Result<&LineItem, CartError> {
        self.items
            .get(index)
            .ok_or(CartError::ItemNotFound(index, self.items.len()))
    }

    /// Returns the index of the row sharing `item`'s identity key.
    pub fn position_of(&self, item: &LineItem) -> Option<usize> {
        self.items.iter().position(|row| row.key() == item.key())
    }

    /// Iterate over the rows in display order.
    pub fn iter(&self) -> impl Iterator<Item = &LineItem> {
        self.items.iter()
    }

    /// Returns the rows as a slice.
    pub fn as_slice(&self) -> &[LineItem] {
        &self.items
    }

    /// Get the number of rows in the cart.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the cart is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn check_index(&self, index: usize) -> Result<(), CartError> {
        if index < self.items.len() {
            Ok(())
        } else {
            Err(CartError::ItemNotFound(index, self.items.len()))
        }
    }

    fn map_item(&self, index: usize, f: impl FnOnce(&mut LineItem)) -> Result<Self, CartError> {
        let mut items = self.items.clone();
        let item = items
            .get_mut(index)
            .ok_or(CartError::ItemNotFound(index, self.items.len()))?;

        f(item);

        Ok(Self { items })
    }
}

impl<'de> Deserialize<'de> for Cart {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let items = Vec::<LineItem>::deserialize(deserializer)?;

        Ok(Self::from_items(items))
    }
}

impl<'a> IntoIterator for &'a Cart {
    type Item = &'a LineItem;
    type IntoIter = std::slice::Iter<'a, LineItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::{items::Variant, products::ProductId};

    use super::*;

    fn item(id: &str, price: i64, quantity: u32) -> LineItem {
        LineItem::new(ProductId::from(id), id.to_uppercase(), Decimal::from(price))
            .with_quantity(quantity)
    }

    fn sized(id: &str, size: &str, color: &str) -> LineItem {
        item(id, 10, 1).with_variant(Variant::new(Some(size), Some(color)))
    }

    fn ids(cart: &Cart) -> Vec<&str> {
        cart.iter().map(|item| item.product_id().as_str()).collect()
    }

    #[test]
    fn new_cart_is_empty() {
        let cart = Cart::new();

        assert!(cart.is_empty());
        assert_eq!(cart.len(), 0);
        assert_eq!(cart.total(), Decimal::ZERO);
        assert_eq!(cart.item_count(), 0);
    }

    #[test]
    fn adding_new_identity_appends() {
        let cart = Cart::new().with_item(item("a", 10, 1));
        let before_total = cart.total();

        let cart = cart.with_item(item("b", 25, 2));

        assert_eq!(cart.len(), 2);
        assert_eq!(cart.total(), before_total + Decimal::from(50));
        assert_eq!(ids(&cart), vec!["a", "b"]);
    }

    #[test]
    fn adding_existing_identity_merges_quantity() -> TestResult {
        let cart = Cart::new().with_item(item("a", 10, 1));

        let cart = cart.with_item(item("a", 10, 2));

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.get_item(0)?.quantity(), 3);
        assert_eq!(cart.total(), Decimal::from(30));

        Ok(())
    }

    #[test]
    fn different_size_or_colour_is_a_separate_row() {
        let cart = Cart::new()
            .with_item(sized("a", "M", "black"))
            .with_item(sized("a", "L", "black"))
            .with_item(sized("a", "M", "white"))
            .with_item(sized("a", "M", "black"));

        assert_eq!(cart.len(), 3);
        assert_eq!(cart.item_count(), 4);
    }

    #[test]
    fn with_item_leaves_receiver_untouched() {
        let original = Cart::new().with_item(item("a", 10, 1));

        let _updated = original.with_item(item("a", 10, 1));

        assert_eq!(original.item_count(), 1);
    }

    #[test]
    fn with_quantity_clamps_to_one() -> TestResult {
        let cart = Cart::new().with_item(item("a", 10, 4));

        let cart = cart.with_quantity(0, -5)?;

        assert_eq!(cart.get_item(0)?.quantity(), 1);

        Ok(())
    }

    #[test]
    fn with_quantity_out_of_range_errors() {
        let cart = Cart::new().with_item(item("a", 10, 1));

        assert_eq!(cart.with_quantity(3, 2), Err(CartError::ItemNotFound(3, 1)));
    }

    #[test]
    fn adjusting_below_one_clamps() -> TestResult {
        let cart = Cart::new().with_item(item("a", 10, 2));

        let cart = cart.with_quantity_adjusted(0, -1)?;
        assert_eq!(cart.get_item(0)?.quantity(), 1);

        let cart = cart.with_quantity_adjusted(0, -1)?;
        assert_eq!(cart.get_item(0)?.quantity(), 1);

        let cart = cart.with_quantity_adjusted(0, 1)?;
        assert_eq!(cart.get_item(0)?.quantity(), 2);

        Ok(())
    }

    #[test]
    fn without_item_preserves_order() -> TestResult {
        let cart = Cart::new()
            .with_item(item("a", 1, 1))
            .with_item(item("b", 1, 1))
            .with_item(item("c", 1, 1));

        let cart = cart.without_item(1)?;

        assert_eq!(ids(&cart), vec!["a", "c"]);

        Ok(())
    }

    #[test]
    fn removing_last_item_yields_empty_cart() -> TestResult {
        let cart = Cart::new().with_item(item("a", 1, 1));

        let cart = cart.without_item(0)?;

        assert!(cart.is_empty());
        assert_eq!(cart, Cart::new());

        Ok(())
    }

    #[test]
    fn total_sums_line_totals() {
        let cart = Cart::new()
            .with_item(item("a", 10, 2))
            .with_item(item("b", 7, 3));

        assert_eq!(cart.total(), Decimal::from(41));
    }

    #[test]
    fn from_items_merges_duplicates_in_order() -> TestResult {
        let cart = Cart::from_items([item("a", 5, 1), item("b", 5, 1), item("a", 5, 2)]);

        assert_eq!(ids(&cart), vec!["a", "b"]);
        assert_eq!(cart.get_item(0)?.quantity(), 3);

        Ok(())
    }

    #[test]
    fn deserialising_normalises_rows() -> TestResult {
        let json = r#"[
            {"product_id": "a", "name": "A", "price": 10, "quantity": 1},
            {"product_id": "a", "name": "A", "price": 10, "quantity": 0}
        ]"#;

        let cart: Cart = serde_json::from_str(json)?;

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.get_item(0)?.quantity(), 2);

        Ok(())
    }

    #[test]
    fn position_of_finds_matching_identity() {
        let cart = Cart::new()
            .with_item(sized("a", "M", "black"))
            .with_item(sized("b", "M", "black"));

        assert_eq!(cart.position_of(&sized("b", "M", "black")), Some(1));
        assert_eq!(cart.position_of(&sized("b", "S", "black")), None);
    }
}
