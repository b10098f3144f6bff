mod service_ticket_repository;

pub use service_ticket_repository::{PgServiceTicketRepository, ServiceTicketRepository};
