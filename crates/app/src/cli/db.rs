use clap::{Args, Subcommand};

use percolate_app::database;

#[derive(Debug, Args)]
pub(crate) struct DbCommand {
    #[command(subcommand)]
    command: DbSubcommand,
}

#[derive(Debug, Subcommand)]
enum DbSubcommand {
    /// Apply pending schema migrations
    Migrate(MigrateArgs),
}

#[derive(Debug, Args)]
struct MigrateArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL")]
    database_url: String,
}

pub(crate) async fn run(command: DbCommand) -> Result<(), String> {
    match command.command {
        DbSubcommand::Migrate(args) => migrate(args).await,
    }
}

async fn migrate(args: MigrateArgs) -> Result<(), String> {
    let pool = database::connect(&args.database_url)
        .await
        .map_err(|e| e.to_string())?;

    sqlx::migrate!("../../migrations")
        .run(&pool)
        .await
        .map_err(|e| e.to_string())?;

    println!("migrations applied");

    Ok(())
}
