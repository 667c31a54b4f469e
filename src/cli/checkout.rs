use std::io::{self, Write};

use clap::Args;
use skyriting::orders::{OrderDraft, PaymentMethod, ShippingAddress};
use tracing::info;

use super::Context;

#[derive(Debug, Args)]
pub(crate) struct CheckoutArgs {
    /// Street and house number
    #[arg(long)]
    street: String,

    /// City
    #[arg(long)]
    city: String,

    /// Postal code
    #[arg(long)]
    pincode: String,

    /// Payment method
    #[arg(long, value_enum, default_value_t = PaymentMethod::Mock)]
    payment_method: PaymentMethod,
}

pub(crate) async fn run(context: &Context, args: CheckoutArgs) -> Result<(), String> {
    let cart = context.cart_store().await.snapshot().await;
    let address = ShippingAddress::new(args.street, args.city, args.pincode);

    let order = OrderDraft::from_cart(&cart, address, args.payment_method)
        .map_err(|error| error.to_string())?;

    if context.session().token().await.is_none() {
        return Err("please login to continue".to_string());
    }

    info!(
        lines = order.items.len(),
        payment_method = %order.payment_method,
        "prepared order"
    );

    write_order(&mut io::stdout().lock(), &order)
        .map_err(|error| format!("failed to write order: {error}"))
}

fn write_order(out: &mut impl Write, order: &OrderDraft) -> io::Result<()> {
    writeln!(out, "POST {}", order.endpoint())?;
    serde_json::to_writer_pretty(&mut *out, order)?;
    writeln!(out)
}
