use common::config::ServiceConfig;
use common::logger::{create_child_logger, init_root_logger};
use common::{ServiceError, db, seed};
use slog::{Logger, error, info};
use std::process::ExitCode;

async fn run(logger: &Logger) -> Result<(), ServiceError> {
    let settings = ServiceConfig::new()?;
    info!(logger, "Loaded settings: {:?}", settings);

    let db = db::connect(&settings).await?;
    db::run_migrations(&db).await?;

    let result = seed::run(&db, logger).await;
    db.close().await?;

    result?;
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let root = init_root_logger();
    let logger = create_child_logger(&root, "seed");

    match run(&logger).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(logger, "Seeding failed: {}", e);
            ExitCode::FAILURE
        }
    }
}
