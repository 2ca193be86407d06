use crate::ServiceError;
use crate::config::ServiceConfig;
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use tracing::info;

/// Opens the process-wide connection pool.
pub async fn connect(config: &ServiceConfig) -> Result<DatabaseConnection, ServiceError> {
    let db = Database::connect(
        ConnectOptions::new(&config.database_url)
            .max_connections(config.database_max_connections)
            .sqlx_logging(false)
            .to_owned(),
    )
    .await?;

    Ok(db)
}

pub async fn run_migrations(db: &DatabaseConnection) -> Result<(), ServiceError> {
    info!("Running database migrations...");
    Migrator::up(db, None).await?;
    info!("Migrations completed successfully");

    Ok(())
}
