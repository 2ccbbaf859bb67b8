//! OmniBase media collection tracker

use anyhow::Result;
use clap::Parser;
use omnibase_common::config;
use omnibase_ui::{build_router, AppState};
use tracing::info;

/// Command-line arguments for omnibase-ui
#[derive(Parser, Debug)]
#[command(name = "omnibase-ui")]
#[command(about = "Personal media collection tracker")]
#[command(version)]
struct Args {
    /// Port to listen on
    #[arg(short, long, default_value = "16969", env = "OMNIBASE_PORT")]
    port: u16,

    /// Root folder holding the database and translation files
    #[arg(short, long)]
    root_folder: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!(
        "Starting OmniBase (omnibase-ui) v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let args = Args::parse();

    let root_folder = config::resolve_root_folder(args.root_folder.as_deref());
    config::ensure_root_folder(&root_folder)?;
    info!("Root folder: {}", root_folder.display());

    let db_path = config::database_path(&root_folder);
    info!("Database path: {}", db_path.display());
    let pool = omnibase_common::db::init_database_pool(&db_path).await?;
    info!("✓ Database ready");

    let state = AppState::new(pool, root_folder);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", args.port)).await?;
    info!("omnibase-ui listening on http://0.0.0.0:{}", args.port);
    info!("Health check: http://127.0.0.1:{}/health", args.port);

    axum::serve(listener, app).await?;

    Ok(())
}
