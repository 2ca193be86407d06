use super::{ApiError, AppState, optional_id, required};
use crate::store;
use actix_web::{HttpResponse, web};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddMessageRequest {
    pub content: Option<String>,
    pub user_id: Option<i32>,
}

pub async fn add_message(
    state: web::Data<AppState>,
    path: web::Path<i32>,
    body: web::Json<AddMessageRequest>,
) -> Result<HttpResponse, ApiError> {
    let ticket_id = path.into_inner();
    let body = body.into_inner();
    let Some(content) = required(body.content) else {
        return Err(ApiError::BadRequest("Message content is required"));
    };

    let ticket = store::find_ticket(&state.db, ticket_id)
        .await
        .map_err(ApiError::internal("Failed to add message"))?;
    if ticket.is_none() {
        return Err(ApiError::NotFound("Ticket not found"));
    }

    let message = store::create_message(&state.db, ticket_id, content, optional_id(body.user_id))
        .await
        .map_err(ApiError::internal("Failed to add message"))?;

    Ok(HttpResponse::Created().json(message))
}

/// An unknown ticket id yields an empty list, not a 404.
pub async fn list_messages(
    state: web::Data<AppState>,
    path: web::Path<i32>,
) -> Result<HttpResponse, ApiError> {
    let messages = store::list_messages(&state.db, path.into_inner())
        .await
        .map_err(ApiError::internal("Failed to fetch messages"))?;

    Ok(HttpResponse::Ok().json(messages))
}
