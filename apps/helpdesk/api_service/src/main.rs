use actix_web::{App, HttpServer, middleware::Logger, web};
use common::api::{self, AppState};
use common::config::ServiceConfig;
use common::{ServiceError, db};
use tracing::info;

#[actix_web::main]
async fn main() -> Result<(), ServiceError> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let settings = ServiceConfig::new()?;
    info!("Starting helpdesk API with settings: {:?}", settings);

    let db = db::connect(&settings).await?;
    if settings.run_migrations {
        db::run_migrations(&db).await?;
    }

    let state = web::Data::new(AppState::new(db.clone()));
    let (host, port) = settings.bind_address();

    info!("Server running on http://{}:{}", host, port);
    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(Logger::default())
            .configure(api::configure)
    })
    .bind((host, port))?
    .run()
    .await?;

    info!("Server stopped, closing database connection");
    db.close().await?;

    Ok(())
}
