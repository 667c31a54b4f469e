use std::sync::Arc;

use clap::{Parser, Subcommand};
use skyriting::{
    cart::CartStore,
    currency::PriceFormatter,
    session::Session,
    storage::{FileStorage, Storage},
};

use crate::config::{LoggingConfig, StoreConfig};

mod cart;
mod catalog;
mod checkout;
mod render;
mod session;

#[derive(Debug, Parser)]
#[command(name = "skyriting", about = "Skyriting cart and catalogue client", long_about = None)]
pub(crate) struct Cli {
    #[command(flatten)]
    pub(crate) logging: LoggingConfig,

    #[command(flatten)]
    store: StoreConfig,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Inspect and edit the cart
    Cart(cart::CartCommand),
    /// Filter a product catalogue
    Catalog(catalog::CatalogCommand),
    /// Build the order payload for the current cart
    Checkout(checkout::CheckoutArgs),
    /// Manage the signed-in session
    Session(session::SessionCommand),
}

impl Cli {
    pub(crate) async fn run(self) -> Result<(), String> {
        let context = Context::new(&self.store);

        match self.command {
            Commands::Cart(command) => cart::run(&context, command).await,
            Commands::Catalog(command) => catalog::run(&context, command).await,
            Commands::Checkout(args) => checkout::run(&context, args).await,
            Commands::Session(command) => session::run(&context, command).await,
        }
    }
}

/// Shared handles for a single command invocation.
pub(crate) struct Context {
    storage: Arc<dyn Storage>,
    formatter: PriceFormatter,
}

impl Context {
    fn new(config: &StoreConfig) -> Self {
        Self {
            storage: Arc::new(FileStorage::new(config.data_dir.clone())),
            formatter: PriceFormatter::new(config.inr_rate),
        }
    }

    async fn cart_store(&self) -> CartStore {
        CartStore::open(Arc::clone(&self.storage)).await
    }

    fn session(&self) -> Session {
        Session::new(Arc::clone(&self.storage))
    }
}
