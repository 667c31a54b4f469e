//! Orders
//!
//! Translates a cart into the order payload accepted by the storefront backend. Placing the order
//! is left to the caller; once the backend accepts it the cart should be cleared.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{cart::Cart, products::ProductId};

/// Errors raised while building an order from a cart.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CheckoutError {
    /// A shipping address field was left blank.
    #[error("missing shipping detail: {0}")]
    MissingShippingDetails(&'static str),

    /// The cart has no items.
    #[error("cannot check out an empty cart")]
    EmptyCart,
}

/// Delivery address.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingAddress {
    /// Street and house number.
    pub street: String,

    /// City.
    pub city: String,

    /// Postal code.
    pub pincode: String,
}

impl ShippingAddress {
    /// Creates an address.
    pub fn new(
        street: impl Into<String>,
        city: impl Into<String>,
        pincode: impl Into<String>,
    ) -> Self {
        Self {
            street: street.into(),
            city: city.into(),
            pincode: pincode.into(),
        }
    }

    fn validate(&self) -> Result<(), CheckoutError> {
        [
            ("street", &self.street),
            ("city", &self.city),
            ("pincode", &self.pincode),
        ]
        .into_iter()
        .find(|(_, value)| value.trim().is_empty())
        .map_or(Ok(()), |(field, _)| {
            Err(CheckoutError::MissingShippingDetails(field))
        })
    }
}

/// How the order will be paid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    /// Placeholder payment accepted without a gateway.
    #[default]
    Mock,

    /// Razorpay gateway.
    Razorpay,
}

impl PaymentMethod {
    /// Backend route that accepts orders paid this way.
    pub fn endpoint(self) -> &'static str {
        match self {
            PaymentMethod::Mock => "/api/orders",
            PaymentMethod::Razorpay => "/api/orders/create-payment",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaymentMethod::Mock => f.write_str("mock"),
            PaymentMethod::Razorpay => f.write_str("razorpay"),
        }
    }
}

/// One order line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    /// Ordered product.
    pub product_id: ProductId,

    /// Units ordered.
    pub quantity: u32,

    /// Unit price at the time of ordering.
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
}

/// Order payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderDraft {
    /// Order lines, in cart order.
    pub items: Vec<OrderLine>,

    /// Cart total.
    #[serde(with = "rust_decimal::serde::float")]
    pub total_amount: Decimal,

    /// Delivery address.
    pub shipping_address: ShippingAddress,

    /// Payment method.
    pub payment_method: PaymentMethod,
}

impl OrderDraft {
    /// Builds an order from `cart`.
    ///
    /// # Errors
    ///
    /// - [`CheckoutError::MissingShippingDetails`]: an address field is blank.
    /// - [`CheckoutError::EmptyCart`]: the cart has no items.
    pub fn from_cart(
        cart: &Cart,
        shipping_address: ShippingAddress,
        payment_method: PaymentMethod,
    ) -> Result<Self, CheckoutError> {
        shipping_address.validate()?;

        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let items = cart
            .iter()
            .map(|item| OrderLine {
                product_id: item.product_id().clone(),
                quantity: item.quantity(),
                price: item.unit_price(),
            })
            .collect();

        Ok(Self {
            items,
            total_amount: cart.total(),
            shipping_address,
            payment_method,
        })
    }

    /// Backend route this order should be posted to.
    pub fn endpoint(&self) -> &'static str {
        self.payment_method.endpoint()
    }
}
