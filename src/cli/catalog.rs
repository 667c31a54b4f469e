use std::{
    io,
    path::{Path, PathBuf},
};

use clap::{Args, Subcommand};
use skyriting::{
    catalog::{ALL, FilterState, PriceBand, apply, parse_selection},
    products::{BrandId, Gender, Product, parse_products, parse_products_yaml},
};
use tracing::info;

use super::{Context, render};

#[derive(Debug, Args)]
pub(crate) struct CatalogCommand {
    #[command(subcommand)]
    command: CatalogSubcommand,
}

#[derive(Debug, Subcommand)]
enum CatalogSubcommand {
    /// Filter a product list read from a JSON or YAML file
    Filter(FilterArgs),
}

#[derive(Debug, Args)]
struct FilterArgs {
    /// Product list (`.json`, `.yaml` or `.yml`)
    #[arg(long)]
    file: PathBuf,

    /// Brand id, or `all`
    #[arg(long, default_value = ALL)]
    brand: String,

    /// men, women, unisex, or `all`
    #[arg(long, default_value = ALL)]
    gender: String,

    /// Category name, or `all`
    #[arg(long, default_value = ALL)]
    category: String,

    /// under50, 50-100, over100, or `all`
    #[arg(long, default_value = ALL)]
    price_band: PriceBand,

    /// Case-insensitive name search
    #[arg(long, default_value = "")]
    query: String,
}

impl FilterArgs {
    fn filter_state(&self) -> Result<FilterState, String> {
        let brand_id =
            parse_selection::<BrandId>(&self.brand).map_err(|error| error.to_string())?;
        let gender = parse_selection::<Gender>(&self.gender).map_err(|error| error.to_string())?;
        let category =
            parse_selection::<String>(&self.category).map_err(|error| error.to_string())?;

        Ok(FilterState {
            brand_id,
            gender,
            category,
            price_band: self.price_band,
            query: self.query.clone(),
        })
    }
}

pub(crate) async fn run(context: &Context, command: CatalogCommand) -> Result<(), String> {
    match command.command {
        CatalogSubcommand::Filter(args) => filter(context, args).await,
    }
}

async fn filter(context: &Context, args: FilterArgs) -> Result<(), String> {
    let filter = args.filter_state()?;
    let products = read_products(&args.file).await?;

    let filtered = apply(&products, &filter);

    info!(
        total = products.len(),
        matched = filtered.len(),
        "filtered catalogue"
    );

    render::write_products(&mut io::stdout().lock(), &filtered, &context.formatter)
        .map_err(|error| format!("failed to write products: {error}"))
}

async fn read_products(path: &Path) -> Result<Vec<Product>, String> {
    let contents = tokio::fs::read_to_string(path)
        .await
        .map_err(|error| format!("failed to read {}: {error}", path.display()))?;

    let is_yaml = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"));

    let parsed = if is_yaml {
        parse_products_yaml(&contents)
    } else {
        parse_products(&contents)
    };

    parsed.map_err(|error| format!("failed to parse {}: {error}", path.display()))
}
