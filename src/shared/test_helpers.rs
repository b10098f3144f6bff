use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use axum::{extract::Request, middleware::Next, response::Response, Router};
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::core::error::Result;
use crate::features::auth::model::AuthContext;
use crate::features::service_tickets::models::{
    Customer, Employee, NewServiceTicket, ServiceTicketRow, TicketFilter,
};
use crate::features::service_tickets::repositories::ServiceTicketRepository;

#[derive(Debug, Clone)]
struct StoredTicket {
    customer_id: i64,
    employee_id: Option<i64>,
    description: String,
    emergency: bool,
    date_completed: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
struct StoredCustomer {
    user_id: i64,
    full_name: String,
    address: String,
}

#[derive(Debug, Clone)]
struct StoredEmployee {
    full_name: String,
    specialty: String,
}

#[derive(Default)]
struct Tables {
    customers: BTreeMap<i64, StoredCustomer>,
    employees: BTreeMap<i64, StoredEmployee>,
    tickets: BTreeMap<i64, StoredTicket>,
    next_ticket_id: i64,
}

impl Tables {
    fn project(&self, id: i64, ticket: &StoredTicket) -> Option<ServiceTicketRow> {
        let customer = self.customers.get(&ticket.customer_id)?;
        let employee = ticket
            .employee_id
            .and_then(|id| self.employees.get(&id).map(|e| (id, e)));

        Some(ServiceTicketRow {
            id,
            description: ticket.description.clone(),
            emergency: ticket.emergency,
            date_completed: ticket.date_completed,
            customer_id: ticket.customer_id,
            customer_user_id: customer.user_id,
            customer_full_name: customer.full_name.clone(),
            customer_address: customer.address.clone(),
            employee_id: employee.map(|(id, _)| id),
            employee_full_name: employee.map(|(_, e)| e.full_name.clone()),
            employee_specialty: employee.map(|(_, e)| e.specialty.clone()),
        })
    }
}

/// Repository over in-process maps, for exercising services and routes without Postgres
#[derive(Default)]
pub struct InMemoryServiceTicketRepository {
    tables: RwLock<Tables>,
}

impl InMemoryServiceTicketRepository {
    pub async fn add_customer(&self, id: i64, user_id: i64, full_name: &str, address: &str) {
        self.tables.write().await.customers.insert(
            id,
            StoredCustomer {
                user_id,
                full_name: full_name.to_string(),
                address: address.to_string(),
            },
        );
    }

    pub async fn add_employee(&self, id: i64, full_name: &str, specialty: &str) {
        self.tables.write().await.employees.insert(
            id,
            StoredEmployee {
                full_name: full_name.to_string(),
                specialty: specialty.to_string(),
            },
        );
    }

    /// Stand-in for the out-of-band process that closes tickets
    pub async fn complete(&self, ticket_id: i64, at: DateTime<Utc>) {
        if let Some(ticket) = self.tables.write().await.tickets.get_mut(&ticket_id) {
            ticket.date_completed = Some(at);
        }
    }
}

#[async_trait]
impl ServiceTicketRepository for InMemoryServiceTicketRepository {
    async fn find_customer_by_user(&self, user_id: i64) -> Result<Option<Customer>> {
        let tables = self.tables.read().await;
        Ok(tables
            .customers
            .iter()
            .find(|(_, c)| c.user_id == user_id)
            .map(|(id, _)| Customer { id: *id }))
    }

    async fn find_employee(&self, id: i64) -> Result<Option<Employee>> {
        let tables = self.tables.read().await;
        Ok(tables.employees.contains_key(&id).then_some(Employee { id }))
    }

    async fn insert(&self, ticket: NewServiceTicket) -> Result<ServiceTicketRow> {
        let mut tables = self.tables.write().await;
        tables.next_ticket_id += 1;
        let id = tables.next_ticket_id;
        let stored = StoredTicket {
            customer_id: ticket.customer_id,
            employee_id: None,
            description: ticket.description,
            emergency: ticket.emergency,
            date_completed: None,
        };
        let row = tables
            .project(id, &stored)
            .ok_or_else(|| crate::core::error::AppError::NotFound("customer".to_string()))?;
        tables.tickets.insert(id, stored);
        Ok(row)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<ServiceTicketRow>> {
        let tables = self.tables.read().await;
        Ok(tables.tickets.get(&id).and_then(|t| tables.project(id, t)))
    }

    async fn exists(&self, id: i64) -> Result<bool> {
        Ok(self.tables.read().await.tickets.contains_key(&id))
    }

    async fn list(&self, filter: TicketFilter) -> Result<Vec<ServiceTicketRow>> {
        let tables = self.tables.read().await;
        Ok(tables
            .tickets
            .iter()
            .filter_map(|(id, t)| tables.project(*id, t))
            .filter(|row| filter_matches(&filter, row))
            .collect())
    }

    async fn assign_employee(&self, ticket_id: i64, employee_id: i64) -> Result<bool> {
        let mut tables = self.tables.write().await;
        match tables.tickets.get_mut(&ticket_id) {
            Some(ticket) => {
                ticket.employee_id = Some(employee_id);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        Ok(self.tables.write().await.tickets.remove(&id).is_some())
    }
}

/// In-process equivalent of the Postgres list WHERE clause
fn filter_matches(filter: &TicketFilter, row: &ServiceTicketRow) -> bool {
    let owned = filter
        .owner_user_id
        .map_or(true, |user_id| row.customer_user_id == user_id);
    let completed = !filter.completed_only || row.date_completed.is_some();
    owned && completed
}

async fn inject_auth_context(
    axum::extract::State(ctx): axum::extract::State<Arc<AuthContext>>,
    mut request: Request,
    next: Next,
) -> Response {
    request.extensions_mut().insert(ctx.as_ref().clone());
    next.run(request).await
}

/// Serve `router` as if the auth middleware had accepted `ctx`
pub fn with_auth(router: Router, ctx: AuthContext) -> Router {
    router.layer(axum::middleware::from_fn_with_state(
        Arc::new(ctx),
        inject_auth_context,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(customer_user_id: i64, completed: bool) -> ServiceTicketRow {
        ServiceTicketRow {
            id: 1,
            description: "Broken dryer".to_string(),
            emergency: false,
            date_completed: completed.then(Utc::now),
            customer_id: 10,
            customer_user_id,
            customer_full_name: "Ada Lovelace".to_string(),
            customer_address: "12 Analytical Way".to_string(),
            employee_id: None,
            employee_full_name: None,
            employee_specialty: None,
        }
    }

    #[test]
    fn test_default_filter_matches_everything() {
        let filter = TicketFilter::default();
        assert!(filter_matches(&filter, &row(1, false)));
        assert!(filter_matches(&filter, &row(2, true)));
    }

    #[test]
    fn test_completed_filter_combines_with_owner() {
        let filter = TicketFilter {
            owner_user_id: Some(1),
            completed_only: true,
        };
        assert!(filter_matches(&filter, &row(1, true)));
        assert!(!filter_matches(&filter, &row(1, false)));
        assert!(!filter_matches(&filter, &row(2, true)));
    }
}
