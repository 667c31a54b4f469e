use std::io;

use clap::{Args, Subcommand};
use rust_decimal::Decimal;
use skyriting::{
    cart::CartStore,
    items::{LineItem, Variant},
    products::ProductId,
};

use super::{Context, render};

#[derive(Debug, Args)]
pub(crate) struct CartCommand {
    #[command(subcommand)]
    command: CartSubcommand,
}

#[derive(Debug, Subcommand)]
enum CartSubcommand {
    /// Show the cart
    List,
    /// Add an item, merging with an existing row of the same product, size and colour
    Add(LineItemArgs),
    /// Replace the whole cart with a single item
    BuyNow(LineItemArgs),
    /// Set the quantity of a row (values below one are clamped)
    Set(SetQuantityArgs),
    /// Change the quantity of a row by a delta (never below one)
    Adjust(AdjustQuantityArgs),
    /// Remove a row
    Remove(RemoveArgs),
    /// Empty the cart
    Clear,
}

#[derive(Debug, Args)]
struct LineItemArgs {
    /// Product id
    #[arg(long)]
    product_id: String,

    /// Display name
    #[arg(long)]
    name: String,

    /// Unit price in catalogue currency
    #[arg(long)]
    price: Decimal,

    /// Units to add
    #[arg(long, default_value_t = 1)]
    quantity: u32,

    /// Selected size
    #[arg(long)]
    size: Option<String>,

    /// Selected colour
    #[arg(long)]
    color: Option<String>,

    /// Image reference
    #[arg(long)]
    image: Option<String>,
}

impl LineItemArgs {
    fn into_line_item(self) -> LineItem {
        let item = LineItem::new(ProductId::new(self.product_id), self.name, self.price)
            .with_quantity(self.quantity)
            .with_variant(Variant::new(self.size.as_deref(), self.color.as_deref()));

        match self.image {
            Some(image) => item.with_image(image),
            None => item,
        }
    }
}

#[derive(Debug, Args)]
struct SetQuantityArgs {
    /// Row index as shown by `cart list`
    #[arg(long)]
    index: usize,

    /// New quantity
    #[arg(long, allow_negative_numbers = true)]
    quantity: i64,
}

#[derive(Debug, Args)]
struct AdjustQuantityArgs {
    /// Row index as shown by `cart list`
    #[arg(long)]
    index: usize,

    /// Amount to add; negative to decrement
    #[arg(long, allow_negative_numbers = true)]
    delta: i64,
}

#[derive(Debug, Args)]
struct RemoveArgs {
    /// Row index as shown by `cart list`
    #[arg(long)]
    index: usize,
}

pub(crate) async fn run(context: &Context, command: CartCommand) -> Result<(), String> {
    let store = context.cart_store().await;

    let cart = match command.command {
        CartSubcommand::List => store.snapshot().await,
        CartSubcommand::Add(args) => store.add_item(args.into_line_item()).await,
        CartSubcommand::BuyNow(args) => store.replace(args.into_line_item()).await,
        CartSubcommand::Set(args) => {
            require_index(&store, args.index).await?;
            store.set_quantity(args.index, args.quantity).await
        }
        CartSubcommand::Adjust(args) => {
            require_index(&store, args.index).await?;
            store.adjust_quantity(args.index, args.delta).await
        }
        CartSubcommand::Remove(args) => {
            require_index(&store, args.index).await?;
            store.remove_item(args.index).await
        }
        CartSubcommand::Clear => store.clear().await,
    };

    render::write_cart(&mut io::stdout().lock(), &cart, &context.formatter)
        .map_err(|error| format!("failed to write cart: {error}"))
}

async fn require_index(store: &CartStore, index: usize) -> Result<(), String> {
    store
        .snapshot()
        .await
        .get_item(index)
        .map(|_| ())
        .map_err(|error| error.to_string())
}
