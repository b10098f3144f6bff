use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::features::service_tickets::models::ServiceTicketRow;

/// `status` value that narrows a listing to completed tickets
pub const STATUS_DONE: &str = "done";

/// Request body for opening a ticket.
///
/// The owning customer always comes from the caller's identity; a
/// `customer` key in the body is ignored.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateServiceTicketDto {
    #[validate(required(message = "description is required"))]
    pub description: Option<String>,

    #[validate(required(message = "emergency is required"))]
    pub emergency: Option<bool>,
}

/// Request body for assigning an employee
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateServiceTicketDto {
    /// Employee id
    #[validate(required(message = "employee is required"))]
    pub employee: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams, ToSchema)]
pub struct ListServiceTicketsQuery {
    /// `done` keeps only completed tickets; other values are ignored
    pub status: Option<String>,
}

impl ListServiceTicketsQuery {
    /// Build from raw query pairs. A repeated `status` key resolves to its
    /// last value; unrelated keys are ignored.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let status = pairs
            .into_iter()
            .filter(|(key, _)| key == "status")
            .map(|(_, value)| value)
            .last();

        Self { status }
    }

    pub fn completed_only(&self) -> bool {
        self.status.as_deref() == Some(STATUS_DONE)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct TicketCustomerDto {
    pub id: i64,
    pub full_name: String,
    pub address: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct TicketEmployeeDto {
    pub id: i64,
    pub full_name: String,
    pub specialty: String,
}

/// Ticket with its customer and employee expanded one level deep
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ServiceTicketResponseDto {
    pub id: i64,
    pub customer: TicketCustomerDto,
    pub employee: Option<TicketEmployeeDto>,
    pub description: String,
    pub emergency: bool,
    pub date_completed: Option<DateTime<Utc>>,
}

impl From<ServiceTicketRow> for ServiceTicketResponseDto {
    fn from(row: ServiceTicketRow) -> Self {
        let employee = match (row.employee_id, row.employee_full_name, row.employee_specialty) {
            (Some(id), Some(full_name), Some(specialty)) => Some(TicketEmployeeDto {
                id,
                full_name,
                specialty,
            }),
            _ => None,
        };

        Self {
            id: row.id,
            customer: TicketCustomerDto {
                id: row.customer_id,
                full_name: row.customer_full_name,
                address: row.customer_address,
            },
            employee,
            description: row.description,
            emergency: row.emergency,
            date_completed: row.date_completed,
        }
    }
}
