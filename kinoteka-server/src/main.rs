use std::{path::PathBuf, sync::Arc};

use anyhow::Context;
use clap::Parser;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use kinoteka_config::Config;
use kinoteka_core::database;
use kinoteka_server::{AppState, create_api_router};

#[derive(Debug, Parser)]
#[command(name = "kinoteka-server", about = "Movie catalog and community API")]
struct Cli {
    /// Path to the TOML config file.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,sqlx=warn")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref()).context("loading configuration")?;

    let pool = database::connect(&config.database.url, config.database.max_connections)
        .await
        .context("connecting to postgres")?;
    database::MIGRATOR
        .run(&pool)
        .await
        .context("running migrations")?;

    let bind = config.server.bind;
    let state = AppState::new(pool, Arc::new(config));
    let app = create_api_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let listener = tokio::net::TcpListener::bind(bind)
        .await
        .with_context(|| format!("binding {bind}"))?;
    tracing::info!(%bind, "listening");
    axum::serve(listener, app).await.context("serving")?;
    Ok(())
}
