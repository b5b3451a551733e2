//! getVolunteer Backend - server and migration CLI

use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use getvolunteer_backend::{create_app, db, AppState, Config};

#[derive(Parser)]
#[command(name = "getvolunteer-server")]
#[command(version, about = "getVolunteer Backend API server")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP server (default)
    Serve {
        /// Apply pending migrations before serving
        #[arg(long)]
        migrate: bool,
    },

    /// Manage database schema migrations
    Migrate {
        #[command(subcommand)]
        action: MigrateAction,
    },
}

#[derive(Subcommand)]
enum MigrateAction {
    /// Apply all pending migrations
    Run,
    /// Revert the most recently applied migration
    Revert,
    /// List migrations and whether they are applied
    Info,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();

    // Load configuration
    let config = Config::load().context("failed to load configuration")?;

    match cli.command.unwrap_or(Command::Serve { migrate: false }) {
        Command::Serve { migrate } => serve(config, migrate).await,
        Command::Migrate { action } => run_migrate(config, action).await,
    }
}

fn init_tracing() {
    let json = std::env::var("APP_ENV").is_ok_and(|env| env == "production");

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "getvolunteer_server=debug,getvolunteer_backend=debug,tower_http=debug,sqlx=warn"
                    .into()
            }),
        )
        .with(json.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!json).then(|| tracing_subscriber::fmt::layer()))
        .init();
}

async fn serve(config: Config, migrate: bool) -> anyhow::Result<()> {
    tracing::info!("Starting getVolunteer Backend API");
    tracing::info!("Environment: {}", config.environment);

    if !config.matching_enabled() {
        tracing::info!("GOOGLE_API_KEY not set; volunteer matching integration disabled");
    }

    // Create database connection pool
    tracing::info!("Connecting to database...");
    let db_pool = db::connect(&config.database)
        .await
        .context("failed to connect to database")?;

    tracing::info!("Database connection established");

    // Run migrations in development or on request
    if migrate || config.is_development() {
        tracing::info!("Running database migrations...");
        db::run_migrations(&db_pool).await?;
        tracing::info!("Migrations completed");
    }

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("invalid server address")?;

    // Create application state
    let state = AppState {
        db: db_pool,
        config: Arc::new(config),
    };

    // Build application
    let app = create_app(state);

    // Start server
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shut down");

    Ok(())
}

async fn run_migrate(config: Config, action: MigrateAction) -> anyhow::Result<()> {
    let db_pool = db::connect(&config.database)
        .await
        .context("failed to connect to database")?;

    match action {
        MigrateAction::Run => {
            db::run_migrations(&db_pool).await?;
            tracing::info!("Migrations applied");
        }
        MigrateAction::Revert => match db::revert_last_migration(&db_pool).await? {
            Some(version) => tracing::info!(version, "Reverted migration"),
            None => tracing::info!("No applied migrations to revert"),
        },
        MigrateAction::Info => {
            for status in db::migration_status(&db_pool).await? {
                println!(
                    "{} {:<14} {}",
                    if status.applied { "[x]" } else { "[ ]" },
                    status.version,
                    status.description
                );
            }
        }
    }

    db_pool.close().await;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
