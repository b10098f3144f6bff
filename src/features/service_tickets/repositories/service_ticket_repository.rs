use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::core::error::{AppError, Result};
use crate::features::service_tickets::models::{
    Customer, Employee, NewServiceTicket, ServiceTicketRow, TicketFilter,
};

/// Persistence port for the ticket endpoint.
///
/// Lookups return `Option` so callers decide how a miss surfaces.
#[async_trait]
pub trait ServiceTicketRepository: Send + Sync {
    async fn find_customer_by_user(&self, user_id: i64) -> Result<Option<Customer>>;

    async fn find_employee(&self, id: i64) -> Result<Option<Employee>>;

    /// Insert a ticket and return its projection
    async fn insert(&self, ticket: NewServiceTicket) -> Result<ServiceTicketRow>;

    async fn find_by_id(&self, id: i64) -> Result<Option<ServiceTicketRow>>;

    async fn exists(&self, id: i64) -> Result<bool>;

    /// Tickets matching `filter`, ordered by id
    async fn list(&self, filter: TicketFilter) -> Result<Vec<ServiceTicketRow>>;

    /// Returns false when no ticket has this id
    async fn assign_employee(&self, ticket_id: i64, employee_id: i64) -> Result<bool>;

    /// Returns false when no ticket has this id
    async fn delete(&self, id: i64) -> Result<bool>;
}

/// Ticket projection joined one level deep, reading tickets from `source`
fn projection(source: &str) -> String {
    format!(
        r#"
        SELECT
            t.id, t.description, t.emergency, t.date_completed,
            c.id AS customer_id, c.user_id AS customer_user_id,
            c.full_name AS customer_full_name, c.address AS customer_address,
            e.id AS employee_id, e.full_name AS employee_full_name,
            e.specialty AS employee_specialty
        FROM {} t
        JOIN customers c ON c.id = t.customer_id
        LEFT JOIN employees e ON e.id = t.employee_id
        "#,
        source
    )
}

/// List query narrowed by `filter`, newest ids last
fn list_query(filter: &TicketFilter) -> QueryBuilder<'static, Postgres> {
    let mut query = QueryBuilder::new(projection("service_tickets"));
    query.push(" WHERE TRUE");

    if let Some(user_id) = filter.owner_user_id {
        query.push(" AND c.user_id = ").push_bind(user_id);
    }
    if filter.completed_only {
        query.push(" AND t.date_completed IS NOT NULL");
    }
    query.push(" ORDER BY t.id ASC");

    query
}

/// Maps constraint violations to user-facing errors
fn handle_db_error(e: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db_err) = &e {
        // 23503: the referenced row vanished after lookup
        if db_err.is_foreign_key_violation() {
            return AppError::NotFound("Referenced record does not exist".to_string());
        }
    }

    AppError::Database(e)
}

pub struct PgServiceTicketRepository {
    pool: PgPool,
}

impl PgServiceTicketRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ServiceTicketRepository for PgServiceTicketRepository {
    async fn find_customer_by_user(&self, user_id: i64) -> Result<Option<Customer>> {
        sqlx::query_as::<_, Customer>("SELECT id FROM customers WHERE user_id = $1")
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to look up customer by user: {:?}", e);
            AppError::Database(e)
        })
    }

    async fn find_employee(&self, id: i64) -> Result<Option<Employee>> {
        sqlx::query_as::<_, Employee>("SELECT id FROM employees WHERE id = $1")
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to look up employee: {:?}", e);
            AppError::Database(e)
        })
    }

    async fn insert(&self, ticket: NewServiceTicket) -> Result<ServiceTicketRow> {
        let sql = format!(
            r#"
            WITH inserted AS (
                INSERT INTO service_tickets (customer_id, description, emergency)
                VALUES ($1, $2, $3)
                RETURNING id, customer_id, employee_id, description, emergency, date_completed
            )
            {}
            "#,
            projection("inserted")
        );

        sqlx::query_as::<_, ServiceTicketRow>(&sql)
            .bind(ticket.customer_id)
            .bind(&ticket.description)
            .bind(ticket.emergency)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to create service ticket: {:?}", e);
                handle_db_error(e)
            })
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<ServiceTicketRow>> {
        let sql = format!("{} WHERE t.id = $1", projection("service_tickets"));

        sqlx::query_as::<_, ServiceTicketRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to get service ticket by ID: {:?}", e);
                AppError::Database(e)
            })
    }

    async fn exists(&self, id: i64) -> Result<bool> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM service_tickets WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list(&self, filter: TicketFilter) -> Result<Vec<ServiceTicketRow>> {
        let mut query = list_query(&filter);

        query
            .build_query_as::<ServiceTicketRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list service tickets: {:?}", e);
                AppError::Database(e)
            })
    }

    async fn assign_employee(&self, ticket_id: i64, employee_id: i64) -> Result<bool> {
        let result = sqlx::query("UPDATE service_tickets SET employee_id = $1 WHERE id = $2")
            .bind(employee_id)
            .bind(ticket_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to assign employee: {:?}", e);
                handle_db_error(e)
            })?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM service_tickets WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to delete service ticket: {:?}", e);
                AppError::Database(e)
            })?;

        Ok(result.rows_affected() > 0)
    }
}
