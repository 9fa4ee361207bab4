use clap::{Args, Subcommand};

use percolate_app::{context::AppContext, domain::settings::SettingsService};

#[derive(Debug, Args)]
pub(crate) struct SettingsCommand {
    #[command(subcommand)]
    command: SettingsSubcommand,
}

#[derive(Debug, Subcommand)]
enum SettingsSubcommand {
    /// List all store settings
    List(ListArgs),
    /// Replace the value of a setting
    Set(SetArgs),
}

#[derive(Debug, Args)]
struct ListArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL")]
    database_url: String,
}

#[derive(Debug, Args)]
struct SetArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL")]
    database_url: String,

    /// Setting key, e.g. `cafe_name`
    key: String,

    /// New value
    value: String,
}

pub(crate) async fn run(command: SettingsCommand) -> Result<(), String> {
    match command.command {
        SettingsSubcommand::List(args) => list(args).await,
        SettingsSubcommand::Set(args) => set(args).await,
    }
}

async fn list(args: ListArgs) -> Result<(), String> {
    let ctx = AppContext::from_database_url(&args.database_url)
        .await
        .map_err(|e| e.to_string())?;

    let settings = ctx.settings.list_settings().await.map_err(|e| e.to_string())?;

    for setting in settings {
        println!(
            "{:<16} {}",
            setting.key,
            setting.value.as_deref().unwrap_or("")
        );
    }

    Ok(())
}

async fn set(args: SetArgs) -> Result<(), String> {
    let ctx = AppContext::from_database_url(&args.database_url)
        .await
        .map_err(|e| e.to_string())?;

    ctx.settings
        .update_setting(&args.key, &args.value)
        .await
        .map_err(|e| e.to_string())?;

    println!("setting {} updated", args.key);

    Ok(())
}
