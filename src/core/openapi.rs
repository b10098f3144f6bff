use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::core::config::SwaggerConfig;
use crate::features::health;
use crate::features::service_tickets::{dtos as tickets_dtos, handlers as tickets_handlers};
use crate::shared::types::ApiResponse;

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        tickets_handlers::create_service_ticket,
        tickets_handlers::list_service_tickets,
        tickets_handlers::get_service_ticket,
        tickets_handlers::update_service_ticket,
        tickets_handlers::delete_service_ticket,
    ),
    components(
        schemas(
            health::HealthDto,
            ApiResponse<health::HealthDto>,
            tickets_dtos::CreateServiceTicketDto,
            tickets_dtos::UpdateServiceTicketDto,
            tickets_dtos::TicketCustomerDto,
            tickets_dtos::TicketEmployeeDto,
            tickets_dtos::ServiceTicketResponseDto,
        )
    ),
    tags(
        (name = "health", description = "Service health"),
        (name = "service-tickets", description = "Repair service tickets"),
    ),
    modifiers(&SecurityAddon),
    info(
        title = "Repairs API",
        version = "0.1.0",
        description = "Repair shop service ticket API",
    )
)]
pub struct ApiDoc;

/// Adds Bearer JWT security scheme to OpenAPI spec
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Build the document with title/version/description taken from config
pub fn build(config: &SwaggerConfig) -> utoipa::openapi::OpenApi {
    let mut openapi = ApiDoc::openapi();
    openapi.info.title = config.title.clone();
    openapi.info.version = config.version.clone();
    openapi.info.description = Some(config.description.clone());
    openapi
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_documents_ticket_routes() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/servicetickets"));
        assert!(doc.paths.paths.contains_key("/servicetickets/{id}"));
        assert!(doc.paths.paths.contains_key("/health"));
    }

    #[test]
    fn test_build_applies_config() {
        let doc = build(&SwaggerConfig {
            title: "Shop".to_string(),
            version: "9.9.9".to_string(),
            description: "desc".to_string(),
        });
        assert_eq!(doc.info.title, "Shop");
        assert_eq!(doc.info.version, "9.9.9");
        assert_eq!(doc.info.description.as_deref(), Some("desc"));
    }
}
