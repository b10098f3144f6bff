use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::service_tickets::handlers;
use crate::features::service_tickets::services::ServiceTicketService;

/// Create routes for the service tickets feature
///
/// Note: every route expects an `AuthContext` installed by the auth middleware
pub fn routes(service: Arc<ServiceTicketService>) -> Router {
    Router::new()
        .route(
            "/servicetickets",
            get(handlers::list_service_tickets).post(handlers::create_service_ticket),
        )
        .route(
            "/servicetickets/{id}",
            get(handlers::get_service_ticket)
                .put(handlers::update_service_ticket)
                .delete(handlers::delete_service_ticket),
        )
        .with_state(service)
}
