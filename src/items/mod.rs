//! Items
//!
//! Cart line items and their identity key.

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

use crate::{pricing::line_total, products::ProductId};

/// Size and colour selection of a line item.
///
/// Empty strings are treated as "no selection", so `""` and an absent value identify the same
/// variant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Variant {
    #[serde(
        default,
        deserialize_with = "non_empty",
        skip_serializing_if = "Option::is_none"
    )]
    size: Option<String>,

    #[serde(
        default,
        deserialize_with = "non_empty",
        skip_serializing_if = "Option::is_none"
    )]
    color: Option<String>,
}

impl Variant {
    /// Creates a variant from an optional size and colour.
    pub fn new(size: Option<&str>, color: Option<&str>) -> Self {
        Self {
            size: size.and_then(normalise),
            color: color.and_then(normalise),
        }
    }

    /// Returns the selected size.
    pub fn size(&self) -> Option<&str> {
        self.size.as_deref()
    }

    /// Returns the selected colour.
    pub fn color(&self) -> Option<&str> {
        self.color.as_deref()
    }

    /// Returns `true` when neither size nor colour is selected.
    pub fn is_unspecified(&self) -> bool {
        self.size.is_none() && self.color.is_none()
    }
}

fn normalise(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

fn non_empty<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;

    Ok(value.filter(|v| !v.is_empty()))
}

fn clamped_quantity<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = i64::deserialize(deserializer)?;

    Ok(clamp_quantity(raw))
}

/// Clamps a requested quantity into the valid `1..=u32::MAX` range.
pub fn clamp_quantity(quantity: i64) -> u32 {
    u32::try_from(quantity.max(1)).unwrap_or(u32::MAX)
}

/// Identity of a line item: two items with equal keys are the same purchasable thing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LineItemKey<'a> {
    product: &'a ProductId,
    variant: &'a Variant,
}

/// One row of a cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    product_id: ProductId,
    name: String,
    #[serde(rename = "price", with = "rust_decimal::serde::float")]
    unit_price: Decimal,
    #[serde(deserialize_with = "clamped_quantity")]
    quantity: u32,
    #[serde(
        rename = "image",
        default,
        deserialize_with = "non_empty",
        skip_serializing_if = "Option::is_none"
    )]
    image: Option<String>,
    #[serde(flatten)]
    variant: Variant,
}

impl LineItem {
    /// Creates a line item with a quantity of one and no variant.
    pub fn new(product_id: ProductId, name: impl Into<String>, unit_price: Decimal) -> Self {
        Self {
            product_id,
            name: name.into(),
            unit_price,
            quantity: 1,
            image: None,
            variant: Variant::default(),
        }
    }

    /// Sets the quantity, clamped to at least one.
    #[must_use]
    pub fn with_quantity(mut self, quantity: u32) -> Self {
        self.quantity = quantity.max(1);
        self
    }

    /// Sets the image reference.
    #[must_use]
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = normalise(&image.into());
        self
    }

    /// Sets the variant.
    #[must_use]
    pub fn with_variant(mut self, variant: Variant) -> Self {
        self.variant = variant;
        self
    }

    /// Returns the identity key of the item.
    pub fn key(&self) -> LineItemKey<'_> {
        LineItemKey {
            product: &self.product_id,
            variant: &self.variant,
        }
    }

    /// Returns the product id.
    pub fn product_id(&self) -> &ProductId {
        &self.product_id
    }

    /// Returns the display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the unit price.
    pub fn unit_price(&self) -> Decimal {
        self.unit_price
    }

    /// Returns the quantity (always at least one).
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Returns the image reference.
    pub fn image(&self) -> Option<&str> {
        self.image.as_deref()
    }

    /// Returns the variant.
    pub fn variant(&self) -> &Variant {
        &self.variant
    }

    /// Returns `unit_price * quantity`.
    pub fn line_total(&self) -> Decimal {
        line_total(self.unit_price, self.quantity)
    }

    pub(crate) fn set_quantity(&mut self, quantity: u32) {
        self.quantity = quantity.max(1);
    }

    pub(crate) fn add_quantity(&mut self, quantity: u32) {
        self.quantity = self.quantity.saturating_add(quantity).max(1);
    }
}
