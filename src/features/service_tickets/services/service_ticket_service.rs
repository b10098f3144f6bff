use std::sync::Arc;

use crate::core::error::{AppError, Result};
use crate::features::auth::model::AuthContext;
use crate::features::service_tickets::dtos::{ListServiceTicketsQuery, ServiceTicketResponseDto};
use crate::features::service_tickets::models::{NewServiceTicket, TicketFilter};
use crate::features::service_tickets::repositories::ServiceTicketRepository;

fn ticket_not_found(id: i64) -> AppError {
    AppError::NotFound(format!("Service ticket '{}' not found", id))
}

/// Service for service ticket operations
pub struct ServiceTicketService {
    repository: Arc<dyn ServiceTicketRepository>,
}

impl ServiceTicketService {
    pub fn new(repository: Arc<dyn ServiceTicketRepository>) -> Self {
        Self { repository }
    }

    /// Open a ticket on behalf of the calling customer
    pub async fn create(
        &self,
        ctx: &AuthContext,
        description: String,
        emergency: bool,
    ) -> Result<ServiceTicketResponseDto> {
        let customer = self
            .repository
            .find_customer_by_user(ctx.user_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("No customer profile for user '{}'", ctx.user_id))
            })?;

        let row = self
            .repository
            .insert(NewServiceTicket {
                customer_id: customer.id,
                description,
                emergency,
            })
            .await?;

        tracing::info!(
            "Service ticket created: id={}, customer={}, emergency={}",
            row.id,
            customer.id,
            emergency
        );

        Ok(row.into())
    }

    /// Tickets visible to the caller: all of them for staff, otherwise only
    /// the caller's own.
    pub async fn list(
        &self,
        ctx: &AuthContext,
        query: &ListServiceTicketsQuery,
    ) -> Result<Vec<ServiceTicketResponseDto>> {
        let filter = TicketFilter {
            owner_user_id: (!ctx.is_staff).then_some(ctx.user_id),
            completed_only: query.completed_only(),
        };

        let rows = self.repository.list(filter).await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Get ticket by ID
    pub async fn get_by_id(&self, id: i64) -> Result<ServiceTicketResponseDto> {
        self.repository
            .find_by_id(id)
            .await?
            .map(Into::into)
            .ok_or_else(|| ticket_not_found(id))
    }

    /// Point the ticket at an employee. Nothing else on the ticket changes.
    pub async fn assign_employee(&self, id: i64, employee_id: i64) -> Result<()> {
        if !self.repository.exists(id).await? {
            return Err(ticket_not_found(id));
        }

        let employee = self
            .repository
            .find_employee(employee_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Employee '{}' not found", employee_id)))?;

        if !self.repository.assign_employee(id, employee.id).await? {
            // deleted between the existence check and the update
            return Err(ticket_not_found(id));
        }

        tracing::info!("Service ticket {} assigned to employee {}", id, employee.id);
        Ok(())
    }

    /// Permanently remove a ticket
    pub async fn delete(&self, id: i64) -> Result<()> {
        if !self.repository.delete(id).await? {
            return Err(ticket_not_found(id));
        }

        tracing::info!("Service ticket {} deleted", id);
        Ok(())
    }
}
