//! Catalogue filter
//!
//! Derives the displayed product list from a full collection and the shopper's current
//! [`FilterState`]. Filtering is a stable, AND-combined predicate chain applied in a fixed order:
//! search query, brand, gender, category, then price band.

use serde::{Deserialize, Serialize};

use crate::products::{BrandId, Gender, Product};

mod price_band;

pub use price_band::{PriceBand, PriceBandError};

/// The literal used for an unselected filter axis.
pub const ALL: &str = "all";

/// Active catalogue filters.
///
/// `None` on an axis means "all". Serialises with the literal `"all"` for unselected axes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterState {
    /// Brand restriction.
    #[serde(with = "all_or", default)]
    pub brand_id: Option<BrandId>,

    /// Gender restriction.
    #[serde(with = "all_or", default)]
    pub gender: Option<Gender>,

    /// Category restriction.
    #[serde(with = "all_or", default)]
    pub category: Option<String>,

    /// Price band restriction.
    #[serde(default)]
    pub price_band: PriceBand,

    /// Case-insensitive substring matched against product names; empty matches everything.
    #[serde(default)]
    pub query: String,
}

impl FilterState {
    /// Restrict to products whose name contains `query`.
    #[must_use]
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        self
    }

    /// Restrict to a single brand.
    #[must_use]
    pub fn with_brand(mut self, brand: BrandId) -> Self {
        self.brand_id = Some(brand);
        self
    }

    /// Restrict to a single gender.
    #[must_use]
    pub fn with_gender(mut self, gender: Gender) -> Self {
        self.gender = Some(gender);
        self
    }

    /// Restrict to a single category.
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Restrict to a price band.
    #[must_use]
    pub fn with_price_band(mut self, band: PriceBand) -> Self {
        self.price_band = band;
        self
    }

    /// Returns `true` when no axis restricts the collection.
    pub fn is_identity(&self) -> bool {
        self.query.is_empty()
            && self.brand_id.is_none()
            && self.gender.is_none()
            && self.category.is_none()
            && self.price_band == PriceBand::All
    }
}

/// Parses a filter axis value, mapping [`ALL`] to `None`.
///
/// # Errors
///
/// Propagates the parse error of `T`.
pub fn parse_selection<T: std::str::FromStr>(value: &str) -> Result<Option<T>, T::Err> {
    if value == ALL {
        Ok(None)
    } else {
        value.parse().map(Some)
    }
}

mod all_or {
    use std::{fmt::Display, str::FromStr};

    use serde::{Deserialize, Deserializer, Serializer, de};

    use super::{ALL, parse_selection};

    #[expect(clippy::ref_option, reason = "signature required by serde `with`")]
    pub(super) fn serialize<T, S>(value: &Option<T>, serializer: S) -> Result<S::Ok, S::Error>
    where
        T: Display,
        S: Serializer,
    {
        match value {
            Some(value) => serializer.collect_str(value),
            None => serializer.serialize_str(ALL),
        }
    }

    pub(super) fn deserialize<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
    where
        T: FromStr,
        T::Err: Display,
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;

        parse_selection(&raw).map_err(de::Error::custom)
    }
}

/// Iterates over the products of `products` that satisfy `filter`, in input order.
pub fn matching<'a>(
    products: &'a [Product],
    filter: &'a FilterState,
) -> impl Iterator<Item = &'a Product> + 'a {
    let query = filter.query.to_lowercase();

    products
        .iter()
        .filter(move |p| query.is_empty() || p.name.to_lowercase().contains(&query))
        .filter(move |p| filter.brand_id.as_ref().is_none_or(|brand| &p.brand_id == brand))
        .filter(move |p| filter.gender.is_none_or(|gender| p.gender == Some(gender)))
        .filter(move |p| {
            filter
                .category
                .as_ref()
                .is_none_or(|category| &p.category == category)
        })
        .filter(move |p| filter.price_band.contains(p.price))
}

/// Returns the products of `products` that satisfy `filter`, in input order.
pub fn apply(products: &[Product], filter: &FilterState) -> Vec<Product> {
    matching(products, filter).cloned().collect()
}

/// A product collection as seen by a screen: either still loading, or loaded (possibly empty).
#[derive(Debug, Clone, Default, PartialEq)]
pub enum ProductListing {
    /// Products have not arrived yet.
    #[default]
    NotLoaded,

    /// Products are available; an empty list is a genuine empty result.
    Loaded(Vec<Product>),
}

impl ProductListing {
    /// Returns the filtered listing; a listing that is not loaded stays not loaded.
    #[must_use]
    pub fn filtered(&self, filter: &FilterState) -> Self {
        match self {
            ProductListing::NotLoaded => ProductListing::NotLoaded,
            ProductListing::Loaded(products) => ProductListing::Loaded(apply(products, filter)),
        }
    }

    /// Returns the products if loaded.
    pub fn products(&self) -> Option<&[Product]> {
        match self {
            ProductListing::NotLoaded => None,
            ProductListing::Loaded(products) => Some(products),
        }
    }

    /// Returns `true` once products have been loaded.
    pub fn is_loaded(&self) -> bool {
        matches!(self, ProductListing::Loaded(_))
    }

    /// Returns `true` for a loaded listing with no products.
    pub fn is_empty_result(&self) -> bool {
        matches!(self, ProductListing::Loaded(products) if products.is_empty())
    }
}

impl From<Vec<Product>> for ProductListing {
    fn from(products: Vec<Product>) -> Self {
        ProductListing::Loaded(products)
    }
}
