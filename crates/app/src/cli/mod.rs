use clap::{Parser, Subcommand};

mod db;
mod orders;
mod products;
mod settings;

#[derive(Debug, Parser)]
#[command(name = "percolate-app", about = "Percolate CLI", long_about = None)]
pub(crate) struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    Orders(orders::OrdersCommand),
    Products(products::ProductsCommand),
    Settings(settings::SettingsCommand),
    Db(db::DbCommand),
}

impl Cli {
    pub(crate) async fn run(self) -> Result<(), String> {
        match self.command {
            Commands::Orders(command) => orders::run(command).await,
            Commands::Products(command) => products::run(command).await,
            Commands::Settings(command) => settings::run(command).await,
            Commands::Db(command) => db::run(command).await,
        }
    }
}
