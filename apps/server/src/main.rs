use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use parley_config::load as load_config;
use parley_database::UserRepository;
use parley_gateway::{create_router, GatewayState};
use parley_runtime::{telemetry, BackendServices};
use sqlx::Row;
use tokio::net::TcpListener;
use tracing::info;

#[derive(Parser)]
#[command(name = "parley-server")]
#[command(about = "Parley chat backend (serves by default)")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the WebSocket server (default)
    Serve,
    /// Seed the database with demo users
    SeedData,
    /// Dump users, conversations and messages from the database
    DumpData,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => run_server().await,
        Commands::SeedData => seed_data().await,
        Commands::DumpData => dump_data().await,
    }
}

async fn run_server() -> anyhow::Result<()> {
    telemetry::init_tracing().context("failed to initialise tracing")?;

    info!("starting Parley backend");

    let config = load_config().context("failed to load configuration")?;

    let services = BackendServices::initialise(&config)
        .await
        .context("failed to initialise backend services")?;

    let state = GatewayState::new(
        services.db_pool.clone(),
        Duration::from_secs(config.store.request_timeout_seconds),
    );
    let app = create_router(state);

    let address = format!("{}:{}", config.http.address, config.http.port);
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind http listener on {address}"))?;

    info!(%address, "websocket server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(parley_runtime::shutdown_signal())
        .await
        .context("http server error")?;

    info!("backend shut down");
    Ok(())
}

async fn seed_data() -> anyhow::Result<()> {
    telemetry::init_tracing().context("failed to initialise tracing")?;

    info!("seeding database with demo users");

    let config = load_config().context("failed to load configuration")?;

    let services = BackendServices::initialise(&config)
        .await
        .context("failed to initialise backend services")?;

    let users = UserRepository::new(services.db_pool.clone());
    for (first_name, last_name) in [
        ("Maria", "Garcia"),
        ("James", "Smith"),
        ("Ana", "Silva"),
    ] {
        let user = users
            .create(first_name, last_name)
            .await
            .with_context(|| format!("failed to insert demo user {first_name} {last_name}"))?;
        println!("created user {}: {} {}", user.id, user.first_name, user.last_name);
    }

    println!("Run 'dump-data' to see the inserted data");
    Ok(())
}

async fn dump_data() -> anyhow::Result<()> {
    telemetry::init_tracing().context("failed to initialise tracing")?;

    let config = load_config().context("failed to load configuration")?;

    let services = BackendServices::initialise(&config)
        .await
        .context("failed to initialise backend services")?;

    println!("=== USERS ===");
    let users = sqlx::query("SELECT id, first_name, last_name, created_at FROM users ORDER BY id")
        .fetch_all(&services.db_pool)
        .await
        .context("failed to fetch users")?;
    if users.is_empty() {
        println!("No users found");
    }
    for row in users {
        let id: i64 = row.get("id");
        let first_name: String = row.get("first_name");
        let last_name: String = row.get("last_name");
        let created_at: String = row.get("created_at");
        println!("{:<5} {:<15} {:<15} {}", id, first_name, last_name, created_at);
    }

    println!("\n=== CONVERSATIONS ===");
    let conversations = sqlx::query(
        "SELECT id, name, description, creator_id, created_at FROM conversations ORDER BY id",
    )
    .fetch_all(&services.db_pool)
    .await
    .context("failed to fetch conversations")?;
    if conversations.is_empty() {
        println!("No conversations found");
    }
    for row in conversations {
        let id: i64 = row.get("id");
        let name: String = row.get("name");
        let creator_id: i64 = row.get("creator_id");
        let created_at: String = row.get("created_at");
        println!("{:<5} {:<30} creator={:<5} {}", id, name, creator_id, created_at);
    }

    println!("\n=== MESSAGES ===");
    let messages = sqlx::query(
        "SELECT id, conversation_id, sender_id, content, created_at \
         FROM chat_messages ORDER BY created_at, id",
    )
    .fetch_all(&services.db_pool)
    .await
    .context("failed to fetch messages")?;
    if messages.is_empty() {
        println!("No messages found");
    }
    for row in messages {
        let id: i64 = row.get("id");
        let conversation_id: i64 = row.get("conversation_id");
        let sender_id: i64 = row.get("sender_id");
        let content: String = row.get("content");
        let content_display = truncate_display(&content);
        println!(
            "{:<5} conv={:<5} sender={:<5} {}",
            id, conversation_id, sender_id, content_display
        );
    }

    Ok(())
}

/// Shorten message content for one-line table output. Counts characters,
/// not bytes, so multi-byte content never splits a code point.
fn truncate_display(content: &str) -> String {
    const MAX_CHARS: usize = 47;
    if content.chars().count() <= MAX_CHARS {
        return content.to_string();
    }
    let cut: String = content.chars().take(MAX_CHARS - 3).collect();
    format!("{cut}...")
}
