//! Skyriting prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    cart::{Cart, CartError, CartStore},
    catalog::{FilterState, PriceBand, ProductListing, apply, matching},
    currency::PriceFormatter,
    items::{LineItem, Variant},
    orders::{CheckoutError, OrderDraft, PaymentMethod, ShippingAddress},
    products::{BrandId, Gender, Product, ProductError, ProductId, parse_products},
    session::Session,
    storage::{FileStorage, MemoryStorage, Storage, StorageError},
};
