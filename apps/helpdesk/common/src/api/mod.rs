pub mod error;
pub mod messages;
pub mod tickets;
pub mod users;

pub use error::ApiError;

use actix_web::error::{JsonPayloadError, PathError, QueryPayloadError};
use actix_web::{HttpRequest, HttpResponse, web};
use chrono::Utc;
use sea_orm::DatabaseConnection;
use serde_json::json;
use tracing::warn;

/// Shared by every handler; the connection pool is opened once at startup.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
}

impl AppState {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .app_data(web::PathConfig::default().error_handler(path_error_handler))
        .app_data(web::QueryConfig::default().error_handler(query_error_handler))
        .route("/health", web::get().to(health_check))
        .service(
            web::scope("/api")
                .service(
                    web::resource("/users")
                        .route(web::post().to(users::create_user))
                        .route(web::get().to(users::list_users)),
                )
                .service(
                    web::resource("/tickets")
                        .route(web::get().to(tickets::list_tickets))
                        .route(web::post().to(tickets::create_ticket)),
                )
                .service(
                    web::resource("/tickets/{id}/status")
                        .route(web::patch().to(tickets::update_ticket_status)),
                )
                .service(
                    web::resource("/tickets/{id}/messages")
                        .route(web::post().to(messages::add_message))
                        .route(web::get().to(messages::list_messages)),
                ),
        );
}

async fn health_check(state: web::Data<AppState>) -> HttpResponse {
    match state.db.ping().await {
        Ok(()) => HttpResponse::Ok().json(json!({
            "status": "healthy",
            "timestamp": Utc::now()
        })),
        Err(e) => {
            warn!("Health check could not reach the database: {:?}", e);
            HttpResponse::ServiceUnavailable().json(json!({
                "status": "degraded",
                "timestamp": Utc::now()
            }))
        }
    }
}

/// Absent, `null`, and `""` all count as a missing field.
pub(crate) fn required(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// `userId: 0` means "no user", the same as leaving the field out.
pub(crate) fn optional_id(value: Option<i32>) -> Option<i32> {
    value.filter(|id| *id != 0)
}

fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    warn!("Rejected request body: {}", err);
    ApiError::BadRequest("Invalid JSON body").into()
}

fn path_error_handler(err: PathError, _req: &HttpRequest) -> actix_web::Error {
    warn!("Rejected path parameter: {}", err);
    ApiError::BadRequest("Invalid ticket id").into()
}

fn query_error_handler(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    warn!("Rejected query string: {}", err);
    ApiError::BadRequest("Invalid query string").into()
}

#[cfg(test)]
macro_rules! test_app {
    ($db:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data(actix_web::web::Data::new($crate::api::AppState::new($db.clone())))
                .configure($crate::api::configure),
        )
        .await
    };
}

#[cfg(test)]
pub(crate) use test_app;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::testing::memory_db;
    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use serde_json::Value;

    #[test]
    fn test_required_rejects_empty_values() {
        assert_eq!(required(None), None);
        assert_eq!(required(Some(String::new())), None);
        assert_eq!(required(Some("Eli".into())), Some("Eli".to_string()));
    }

    #[test]
    fn test_optional_id_treats_zero_as_absent() {
        assert_eq!(optional_id(None), None);
        assert_eq!(optional_id(Some(0)), None);
        assert_eq!(optional_id(Some(3)), Some(3));
    }

    #[actix_web::test]
    async fn test_health_endpoint() {
        let db = memory_db().await;
        let app = test_app!(db);

        let resp = actix_test::call_service(&app, actix_test::TestRequest::get().uri("/health").to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: Value = actix_test::read_body_json(resp).await;
        assert_eq!(body["status"], "healthy");
    }

    #[actix_web::test]
    async fn test_malformed_json_is_bad_request() {
        let db = memory_db().await;
        let app = test_app!(db);

        let req = actix_test::TestRequest::post()
            .uri("/api/users")
            .insert_header(("content-type", "application/json"))
            .set_payload("{\"name\": ")
            .to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: Value = actix_test::read_body_json(resp).await;
        assert_eq!(body["error"], "Invalid JSON body");
    }
}
