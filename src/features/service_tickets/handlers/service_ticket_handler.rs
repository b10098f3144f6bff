use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::{AppJson, AppPath, AppQuery};
use crate::features::auth::model::AuthContext;
use crate::features::service_tickets::dtos::{
    CreateServiceTicketDto, ListServiceTicketsQuery, ServiceTicketResponseDto,
    UpdateServiceTicketDto,
};
use crate::features::service_tickets::services::ServiceTicketService;

/// Open a service ticket for the calling customer
#[utoipa::path(
    post,
    path = "/servicetickets",
    request_body = CreateServiceTicketDto,
    responses(
        (status = 201, description = "Service ticket created", body = ServiceTicketResponseDto),
        (status = 400, description = "Missing or malformed fields"),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "Caller has no customer profile")
    ),
    security(("bearer_auth" = [])),
    tag = "service-tickets"
)]
pub async fn create_service_ticket(
    ctx: AuthContext,
    State(service): State<Arc<ServiceTicketService>>,
    AppJson(dto): AppJson<CreateServiceTicketDto>,
) -> Result<(StatusCode, Json<ServiceTicketResponseDto>)> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    // presence checked by validate()
    let ticket = service
        .create(
            &ctx,
            dto.description.unwrap_or_default(),
            dto.emergency.unwrap_or_default(),
        )
        .await?;
    Ok((StatusCode::CREATED, Json(ticket)))
}

/// List service tickets visible to the caller
#[utoipa::path(
    get,
    path = "/servicetickets",
    params(ListServiceTicketsQuery),
    responses(
        (status = 200, description = "Tickets visible to the caller", body = Vec<ServiceTicketResponseDto>),
        (status = 401, description = "Not authenticated")
    ),
    security(("bearer_auth" = [])),
    tag = "service-tickets"
)]
pub async fn list_service_tickets(
    ctx: AuthContext,
    State(service): State<Arc<ServiceTicketService>>,
    AppQuery(pairs): AppQuery<Vec<(String, String)>>,
) -> Result<Json<Vec<ServiceTicketResponseDto>>> {
    let query = ListServiceTicketsQuery::from_pairs(pairs);
    let tickets = service.list(&ctx, &query).await?;
    Ok(Json(tickets))
}

/// Get service ticket by ID
#[utoipa::path(
    get,
    path = "/servicetickets/{id}",
    params(
        ("id" = i64, Path, description = "Service ticket ID")
    ),
    responses(
        (status = 200, description = "Service ticket found", body = ServiceTicketResponseDto),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "Service ticket not found or id is not numeric")
    ),
    security(("bearer_auth" = [])),
    tag = "service-tickets"
)]
pub async fn get_service_ticket(
    _ctx: AuthContext,
    State(service): State<Arc<ServiceTicketService>>,
    AppPath(id): AppPath<i64>,
) -> Result<Json<ServiceTicketResponseDto>> {
    let ticket = service.get_by_id(id).await?;
    Ok(Json(ticket))
}

/// Assign an employee to a service ticket
#[utoipa::path(
    put,
    path = "/servicetickets/{id}",
    params(
        ("id" = i64, Path, description = "Service ticket ID")
    ),
    request_body = UpdateServiceTicketDto,
    responses(
        (status = 204, description = "Employee assigned"),
        (status = 400, description = "Missing or malformed employee id"),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "Service ticket or employee not found")
    ),
    security(("bearer_auth" = [])),
    tag = "service-tickets"
)]
pub async fn update_service_ticket(
    _ctx: AuthContext,
    State(service): State<Arc<ServiceTicketService>>,
    AppPath(id): AppPath<i64>,
    AppJson(dto): AppJson<UpdateServiceTicketDto>,
) -> Result<StatusCode> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    service
        .assign_employee(id, dto.employee.unwrap_or_default())
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Delete a service ticket
#[utoipa::path(
    delete,
    path = "/servicetickets/{id}",
    params(
        ("id" = i64, Path, description = "Service ticket ID")
    ),
    responses(
        (status = 204, description = "Service ticket deleted"),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "Service ticket not found or id is not numeric")
    ),
    security(("bearer_auth" = [])),
    tag = "service-tickets"
)]
pub async fn delete_service_ticket(
    _ctx: AuthContext,
    State(service): State<Arc<ServiceTicketService>>,
    AppPath(id): AppPath<i64>,
) -> Result<StatusCode> {
    service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
