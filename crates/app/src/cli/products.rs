use clap::{Args, Subcommand};
use percolate_core::money::format_usd;
use uuid::Uuid;

use percolate_app::{
    context::AppContext,
    domain::catalogue::{CatalogueService, models::ProductFilter},
};

#[derive(Debug, Args)]
pub(crate) struct ProductsCommand {
    #[command(subcommand)]
    command: ProductsSubcommand,
}

#[derive(Debug, Subcommand)]
enum ProductsSubcommand {
    /// List available products
    List(ListArgs),
    /// List categories in display order
    Categories(CategoriesArgs),
}

#[derive(Debug, Args)]
struct ListArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL")]
    database_url: String,

    /// Only show products in this category
    #[arg(long)]
    category: Option<Uuid>,

    /// Case-insensitive search over name and description
    #[arg(long)]
    search: Option<String>,
}

#[derive(Debug, Args)]
struct CategoriesArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL")]
    database_url: String,
}

pub(crate) async fn run(command: ProductsCommand) -> Result<(), String> {
    match command.command {
        ProductsSubcommand::List(args) => list(args).await,
        ProductsSubcommand::Categories(args) => categories(args).await,
    }
}

async fn list(args: ListArgs) -> Result<(), String> {
    let ctx = AppContext::from_database_url(&args.database_url)
        .await
        .map_err(|e| e.to_string())?;

    let products = ctx
        .catalogue
        .list_products(ProductFilter {
            category: args.category,
            search: args.search,
        })
        .await
        .map_err(|e| e.to_string())?;

    for product in products {
        println!(
            "{}  {:>10}  {}",
            product.id,
            format_usd(product.price),
            product.name
        );
    }

    Ok(())
}

async fn categories(args: CategoriesArgs) -> Result<(), String> {
    let ctx = AppContext::from_database_url(&args.database_url)
        .await
        .map_err(|e| e.to_string())?;

    let categories = ctx
        .catalogue
        .list_categories()
        .await
        .map_err(|e| e.to_string())?;

    for category in categories {
        println!("{}  {}", category.id, category.name);
    }

    Ok(())
}
