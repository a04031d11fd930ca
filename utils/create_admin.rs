use clap::Parser;
use migration::{Migrator, MigratorTrait};
use photo_contest::entities::user::Role;
use photo_contest::services::users::NewUser;
use photo_contest::services::Repository;
use sea_orm::Database;
use tracing_subscriber::EnvFilter;

/// Creates an administrator account, or promotes an existing one.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Email address used to log in
    #[arg(long)]
    email: String,

    /// Legal name; contest entries are signed with it
    #[arg(long)]
    name: String,

    #[arg(long, default_value = "OO")]
    state: String,

    #[arg(long, default_value_t = 18)]
    age: i32,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let database_url = std::env::var("DATABASE_URL").map_err(|_| "DATABASE_URL must be set")?;
    let db = Database::connect(database_url.as_str()).await?;
    Migrator::up(&db, None).await?;
    let repo = Repository::new(db);

    if let Some(existing) = repo.user_by_email(&args.email).await? {
        let promoted = repo.set_role(existing.id, Role::Admin).await?;
        tracing::info!(user_id = promoted.id, email = %promoted.email, "promoted to admin");
        return Ok(());
    }

    let password = rpassword::prompt_password("Password: ")?;
    let password_confirm = rpassword::prompt_password("Confirm password: ")?;

    let created = repo
        .create_user(NewUser {
            name: args.name,
            email: args.email,
            password,
            password_confirm,
            street: "-".to_string(),
            city: "-".to_string(),
            state: args.state,
            zip: "-".to_string(),
            phone: "-".to_string(),
            age: args.age,
            gender: "-".to_string(),
            ethnicity: "pn".to_string(),
            other_ethnicity: None,
            role: Role::Admin,
        })
        .await?;
    tracing::info!(user_id = created.id, email = %created.email, "admin created");
    Ok(())
}
