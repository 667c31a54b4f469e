//! Table output for the CLI.

use std::io;

use skyriting::{cart::Cart, currency::PriceFormatter, products::Product};
use tabled::{
    builder::Builder,
    settings::{
        Alignment, Color, Style,
        object::{Columns, Rows},
    },
};

pub(crate) fn write_cart(
    out: &mut impl io::Write,
    cart: &Cart,
    formatter: &PriceFormatter,
) -> io::Result<()> {
    if cart.is_empty() {
        return writeln!(out, "Your cart is empty");
    }

    let mut builder = Builder::default();

    builder.push_record(["#", "Item", "Size", "Color", "Qty", "Price", "Line Total"]);

    for (index, item) in cart.iter().enumerate() {
        builder.push_record([
            index.to_string(),
            item.name().to_string(),
            item.variant().size().unwrap_or("-").to_string(),
            item.variant().color().unwrap_or("-").to_string(),
            item.quantity().to_string(),
            formatter.format(item.unit_price()),
            formatter.format(item.line_total()),
        ]);
    }

    let mut table = builder.build();

    table.with(Style::modern_rounded());
    table.modify(Rows::first(), Color::BOLD);
    table.modify(Columns::new(4..7), Alignment::right());

    writeln!(out, "{table}")?;
    writeln!(
        out,
        "Total: {} ({} items)",
        formatter.format(cart.total()),
        cart.item_count()
    )
}

pub(crate) fn write_products(
    out: &mut impl io::Write,
    products: &[Product],
    formatter: &PriceFormatter,
) -> io::Result<()> {
    if products.is_empty() {
        return writeln!(out, "No products match the current filters");
    }

    let mut builder = Builder::default();

    builder.push_record(["Id", "Name", "Brand", "Gender", "Category", "Price", "Stock"]);

    for product in products {
        builder.push_record([
            product.id.to_string(),
            product.name.clone(),
            product.brand_id.to_string(),
            product
                .gender
                .map_or_else(|| "-".to_string(), |gender| gender.to_string()),
            product.category.clone(),
            formatter.format(product.price),
            product.stock.to_string(),
        ]);
    }

    let mut table = builder.build();

    table.with(Style::modern_rounded());
    table.modify(Rows::first(), Color::BOLD);
    table.modify(Columns::new(5..7), Alignment::right());

    writeln!(out, "{table}")?;
    writeln!(out, "{} products", products.len())
}
