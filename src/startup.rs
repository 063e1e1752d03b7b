use tracing_subscriber::EnvFilter;

use crate::{config::Config, error::AppError};

/// Connects to the database and runs pending migrations.
///
/// # Arguments
/// - `config` - Application configuration containing the database URL
///
/// # Returns
/// - `Ok(DatabaseConnection)` - Connected database with migrations applied
/// - `Err(AppError::DbErr)` - Failed to connect to database or run migrations
pub async fn connect_to_database(config: &Config) -> Result<sea_orm::DatabaseConnection, AppError> {
    use migration::{Migrator, MigratorTrait};
    use sea_orm::{ConnectOptions, Database};

    let mut opt = ConnectOptions::new(&config.database_url);
    opt.sqlx_logging(false);

    let db = Database::connect(opt).await?;

    Migrator::up(&db, None).await?;

    tracing::info!("Connected to database and applied migrations");

    Ok(db)
}

/// Loads `.env` and builds the configuration from the environment.
pub fn load_config() -> Result<Config, AppError> {
    dotenvy::dotenv().ok();

    Config::from_env()
}

/// Installs the global tracing subscriber.
///
/// The filter comes from `RUST_LOG` and defaults to `info`. Calling this more than once
/// keeps the first subscriber.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
