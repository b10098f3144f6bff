use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Customer key resolved from the caller's identity; the profile fields are
/// read through [`ServiceTicketRow`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromRow)]
pub struct Customer {
    pub id: i64,
}

/// Employee key checked before assignment
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromRow)]
pub struct Employee {
    pub id: i64,
}

/// One row of the ticket read projection: the ticket joined with its
/// customer and, when assigned, its employee.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct ServiceTicketRow {
    pub id: i64,
    pub description: String,
    pub emergency: bool,
    pub date_completed: Option<DateTime<Utc>>,
    pub customer_id: i64,
    pub customer_user_id: i64,
    pub customer_full_name: String,
    pub customer_address: String,
    pub employee_id: Option<i64>,
    pub employee_full_name: Option<String>,
    pub employee_specialty: Option<String>,
}

/// Fields written when a ticket is opened
#[derive(Debug, Clone)]
pub struct NewServiceTicket {
    pub customer_id: i64,
    pub description: String,
    pub emergency: bool,
}

/// Which tickets a list query may return
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TicketFilter {
    /// Restrict to tickets whose customer belongs to this user
    pub owner_user_id: Option<i64>,
    /// Restrict to tickets with a completion date
    pub completed_only: bool,
}
