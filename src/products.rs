//! Products
//!
//! Read-only catalogue entries as served by the storefront backend. Payloads are parsed into
//! typed values here, at the boundary, so the rest of the crate never handles loose JSON.

use std::{fmt, str::FromStr};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use thiserror::Error;
use tracing::warn;

use crate::items::{LineItem, Variant};

/// Errors raised while parsing product payloads.
#[derive(Debug, Error)]
pub enum ProductError {
    /// The payload was not valid JSON, or its top level was not an array.
    #[error("invalid product payload: {0}")]
    Json(#[from] serde_json::Error),

    /// The payload was not valid YAML, or its top level was not a sequence.
    #[error("invalid product fixture: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// A product carried a negative price.
    #[error("product {0} has a negative price")]
    NegativePrice(ProductId),

    /// A gender value outside of `men`, `women` and `unisex`.
    #[error("unknown gender: {0}")]
    UnknownGender(String),
}

/// Opaque product identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(String);

impl ProductId {
    /// Creates a product id from any string-like value.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProductId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl FromStr for ProductId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

/// Opaque brand identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BrandId(String);

impl BrandId {
    /// Creates a brand id from any string-like value.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BrandId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BrandId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl FromStr for BrandId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

/// Target audience of a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    /// Menswear.
    Men,

    /// Womenswear.
    Women,

    /// Suitable for anyone.
    Unisex,
}

impl Gender {
    /// The wire name of the gender.
    pub fn as_str(self) -> &'static str {
        match self {
            Gender::Men => "men",
            Gender::Women => "women",
            Gender::Unisex => "unisex",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Gender {
    type Err = ProductError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "men" => Ok(Gender::Men),
            "women" => Ok(Gender::Women),
            "unisex" => Ok(Gender::Unisex),
            other => Err(ProductError::UnknownGender(other.to_string())),
        }
    }
}

/// Product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Product identity (`_id` in backend payloads).
    #[serde(alias = "_id")]
    pub id: ProductId,

    /// Display name, used for free-text search.
    pub name: String,

    /// Unit price in catalogue currency.
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,

    /// Image references, primary first.
    #[serde(default)]
    pub images: Vec<String>,

    /// Owning brand.
    pub brand_id: BrandId,

    /// Target audience, when the backend supplies one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,

    /// Category name.
    pub category: String,

    /// Optional sub-category name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subcategory: Option<String>,

    /// Optional long description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Units in stock.
    #[serde(default)]
    pub stock: u32,

    /// Available sizes.
    #[serde(default)]
    pub sizes: SmallVec<[String; 5]>,

    /// Available colours.
    #[serde(default)]
    pub colors: SmallVec<[String; 5]>,
}

impl Product {
    /// Returns `true` when at least one unit is in stock.
    pub fn in_stock(&self) -> bool {
        self.stock > 0
    }

    /// Returns the first image, if any.
    pub fn primary_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }

    /// Builds a cart candidate for this product in the given variant.
    pub fn line_item(&self, variant: Variant, quantity: u32) -> LineItem {
        let item = LineItem::new(self.id.clone(), self.name.clone(), self.price)
            .with_quantity(quantity)
            .with_variant(variant);

        match self.primary_image() {
            Some(image) => item.with_image(image),
            None => item,
        }
    }

    fn validate(self) -> Result<Self, ProductError> {
        if self.price < Decimal::ZERO {
            return Err(ProductError::NegativePrice(self.id));
        }

        Ok(self)
    }
}

/// Parses a JSON array of products.
///
/// Entries that do not describe a valid product are dropped and logged.
///
/// # Errors
///
/// Returns a [`ProductError::Json`] if the payload is not a JSON array.
pub fn parse_products(json: &str) -> Result<Vec<Product>, ProductError> {
    let entries: Vec<serde_json::Value> = serde_json::from_str(json)?;

    Ok(collect_valid(entries))
}

/// Parses a YAML sequence of products.
///
/// Entries that do not describe a valid product are dropped and logged.
///
/// # Errors
///
/// Returns a [`ProductError::Yaml`] if the document is not a YAML sequence.
pub fn parse_products_yaml(yaml: &str) -> Result<Vec<Product>, ProductError> {
    let entries: Vec<serde_json::Value> = serde_norway::from_str(yaml)?;

    Ok(collect_valid(entries))
}

fn collect_valid(entries: Vec<serde_json::Value>) -> Vec<Product> {
    entries
        .into_iter()
        .enumerate()
        .filter_map(|(index, entry)| {
            match serde_json::from_value::<Product>(entry)
                .map_err(ProductError::from)
                .and_then(Product::validate)
            {
                Ok(product) => Some(product),
                Err(error) => {
                    warn!(index, %error, "dropping invalid product");
                    None
                }
            }
        })
        .collect()
}
