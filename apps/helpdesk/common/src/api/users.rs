use super::{ApiError, AppState, required};
use crate::store;
use actix_web::{HttpResponse, web};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
}

pub async fn create_user(
    state: web::Data<AppState>,
    body: web::Json<CreateUserRequest>,
) -> Result<HttpResponse, ApiError> {
    let body = body.into_inner();
    let (Some(name), Some(email)) = (required(body.name), required(body.email)) else {
        return Err(ApiError::BadRequest("Name and email are required"));
    };

    // Duplicate emails surface as a constraint violation from the store.
    let user = store::create_user(&state.db, name, email)
        .await
        .map_err(ApiError::internal("Failed to create user"))?;

    Ok(HttpResponse::Created().json(user))
}

pub async fn list_users(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let users = store::list_users(&state.db)
        .await
        .map_err(ApiError::internal("Failed to fetch users"))?;

    Ok(HttpResponse::Ok().json(users))
}
