use std::time::Duration;

use migration::{Migrator, MigratorTrait};
use photo_contest::config::Config;
use photo_contest::services::{media::MediaStore, Repository};
use photo_contest::{create_routes, AppState};
use sea_orm::{ConnectOptions, Database};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("photo_contest=info,tower_http=info")),
        )
        .init();

    let config = Config::from_env()?;

    let busy_timeout = Duration::from_secs(config.sqlite_busy_timeout_secs);
    let mut opts = ConnectOptions::new(config.database_url.as_str());
    // Submissions keep their write transaction open while rendering.
    opts.map_sqlx_sqlite_opts(move |o| o.busy_timeout(busy_timeout));
    let db = Database::connect(opts).await?;
    Migrator::up(&db, None).await?;
    tracing::info!("migrations applied");

    MediaStore::new(config.media_dir.clone()).ensure_root().await?;
    MediaStore::new(config.release_dir.clone()).ensure_root().await?;

    let bind_address = config.bind_address.clone();
    let state = AppState::new(Repository::new(db), config);
    let app = create_routes(state);

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to install ctrl-c handler");
    }
    tracing::info!("shutting down");
}
