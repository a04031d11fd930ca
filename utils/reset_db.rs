use migration::{Migrator, MigratorTrait};
use sea_orm::Database;
use tracing_subscriber::EnvFilter;

/// Drops every table through the migrator and re-applies all migrations.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let database_url = std::env::var("DATABASE_URL").map_err(|_| "DATABASE_URL must be set")?;
    let db = Database::connect(database_url.as_str()).await?;

    Migrator::reset(&db).await?;
    tracing::info!("all tables dropped");
    Migrator::up(&db, None).await?;
    tracing::info!("database reset successfully");
    Ok(())
}
