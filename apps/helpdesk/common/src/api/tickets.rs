use super::{ApiError, AppState, optional_id, required};
use crate::store::{self, TicketFilter};
use actix_web::{HttpResponse, web};
use serde::Deserialize;

/// Raw query string; `userId` is parsed by hand so an empty value means "no filter".
#[derive(Debug, Default, Deserialize)]
pub struct TicketQuery {
    pub status: Option<String>,
    #[serde(rename = "userId")]
    pub user_id: Option<String>,
}

impl TryFrom<TicketQuery> for TicketFilter {
    type Error = ApiError;

    fn try_from(query: TicketQuery) -> Result<Self, Self::Error> {
        let user_id = match required(query.user_id) {
            Some(raw) => Some(
                raw.trim()
                    .parse::<i32>()
                    .map_err(|_| ApiError::BadRequest("userId must be an integer"))?,
            ),
            None => None,
        };

        Ok(TicketFilter {
            status: required(query.status),
            user_id,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTicketRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub user_id: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: Option<String>,
}

pub async fn list_tickets(
    state: web::Data<AppState>,
    query: web::Query<TicketQuery>,
) -> Result<HttpResponse, ApiError> {
    let filter = TicketFilter::try_from(query.into_inner())?;

    let tickets = store::list_tickets(&state.db, filter)
        .await
        .map_err(ApiError::internal("Failed to fetch tickets"))?;

    Ok(HttpResponse::Ok().json(tickets))
}

pub async fn create_ticket(
    state: web::Data<AppState>,
    body: web::Json<CreateTicketRequest>,
) -> Result<HttpResponse, ApiError> {
    let body = body.into_inner();
    let (Some(title), Some(description)) = (required(body.title), required(body.description))
    else {
        return Err(ApiError::BadRequest("Title and description are required"));
    };

    let ticket = store::create_ticket(&state.db, title, description, optional_id(body.user_id))
        .await
        .map_err(ApiError::internal("Failed to create ticket"))?;

    Ok(HttpResponse::Created().json(ticket))
}

pub async fn update_ticket_status(
    state: web::Data<AppState>,
    path: web::Path<i32>,
    body: web::Json<UpdateStatusRequest>,
) -> Result<HttpResponse, ApiError> {
    let ticket_id = path.into_inner();
    let Some(status) = required(body.into_inner().status) else {
        return Err(ApiError::BadRequest("Status is required"));
    };

    let updated = store::update_ticket_status(&state.db, ticket_id, status)
        .await
        .map_err(ApiError::internal("Failed to update ticket status"))?;

    Ok(HttpResponse::Ok().json(updated))
}
