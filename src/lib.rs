//! Skyriting
//!
//! Cart and catalogue-filter engine for the Skyriting storefront client: a persistent cart keyed
//! by product, size and colour, and a stable multi-axis product filter.

pub mod cart;
pub mod catalog;
pub mod currency;
pub mod items;
pub mod orders;
pub mod prelude;
pub mod pricing;
pub mod products;
pub mod session;
pub mod storage;
