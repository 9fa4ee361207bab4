use clap::{Args, Subcommand};
use percolate_core::{money::format_usd, status::OrderStatus};
use uuid::Uuid;

use percolate_app::{context::AppContext, domain::orders::OrdersService};

#[derive(Debug, Args)]
pub(crate) struct OrdersCommand {
    #[command(subcommand)]
    command: OrdersSubcommand,
}

#[derive(Debug, Subcommand)]
enum OrdersSubcommand {
    /// List orders, newest first
    List(ListArgs),
    /// Show one order with its line items
    Show(ShowArgs),
    /// Move an order to a new status
    SetStatus(SetStatusArgs),
    /// Show counts per status and gross revenue
    Stats(StatsArgs),
}

#[derive(Debug, Args)]
struct ListArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL")]
    database_url: String,

    /// Only show orders with this status
    #[arg(long)]
    status: Option<OrderStatus>,
}

#[derive(Debug, Args)]
struct ShowArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL")]
    database_url: String,

    /// Order UUID
    order: Uuid,
}

#[derive(Debug, Args)]
struct SetStatusArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL")]
    database_url: String,

    /// Order UUID
    order: Uuid,

    /// New status
    status: OrderStatus,
}

#[derive(Debug, Args)]
struct StatsArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL")]
    database_url: String,
}

pub(crate) async fn run(command: OrdersCommand) -> Result<(), String> {
    match command.command {
        OrdersSubcommand::List(args) => list(args).await,
        OrdersSubcommand::Show(args) => show(args).await,
        OrdersSubcommand::SetStatus(args) => set_status(args).await,
        OrdersSubcommand::Stats(args) => stats(args).await,
    }
}

async fn list(args: ListArgs) -> Result<(), String> {
    let ctx = AppContext::from_database_url(&args.database_url)
        .await
        .map_err(|e| e.to_string())?;

    let orders = ctx
        .orders
        .list_orders(args.status)
        .await
        .map_err(|e| e.to_string())?;

    for order in orders {
        println!(
            "{}  {:9}  {:>10}  {}",
            order.id,
            order.status,
            format_usd(order.total_amount),
            order.customer_name
        );
    }

    Ok(())
}

async fn show(args: ShowArgs) -> Result<(), String> {
    let ctx = AppContext::from_database_url(&args.database_url)
        .await
        .map_err(|e| e.to_string())?;

    let detail = ctx
        .orders
        .get_order(args.order)
        .await
        .map_err(|e| e.to_string())?;

    let order = &detail.order;

    println!("order        {}", order.id);
    println!("status       {}", order.status);
    println!("customer     {} ({})", order.customer_name, order.phone);
    println!("total        {}", format_usd(order.total_amount));

    if let Some(notes) = &order.notes {
        println!("notes        {notes}");
    }

    println!("placed at    {}", order.created_at);
    println!();

    for line in &detail.lines {
        println!(
            "  {} x{:<3} {:>10}",
            line.product_name,
            line.quantity,
            format_usd(line.line_total)
        );
    }

    Ok(())
}

async fn set_status(args: SetStatusArgs) -> Result<(), String> {
    let ctx = AppContext::from_database_url(&args.database_url)
        .await
        .map_err(|e| e.to_string())?;

    let order = ctx
        .orders
        .update_status(args.order, args.status)
        .await
        .map_err(|e| e.to_string())?;

    println!("order {} is now {}", order.id, order.status);

    Ok(())
}

async fn stats(args: StatsArgs) -> Result<(), String> {
    let ctx = AppContext::from_database_url(&args.database_url)
        .await
        .map_err(|e| e.to_string())?;

    let stats = ctx.orders.stats().await.map_err(|e| e.to_string())?;

    println!("pending      {}", stats.pending);
    println!("preparing    {}", stats.preparing);
    println!("ready        {}", stats.ready);
    println!("completed    {}", stats.completed);
    println!("cancelled    {}", stats.cancelled);
    println!("revenue      {}", format_usd(stats.gross_revenue));

    Ok(())
}
