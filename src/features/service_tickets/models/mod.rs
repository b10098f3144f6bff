mod service_ticket;

pub use service_ticket::{Customer, Employee, NewServiceTicket, ServiceTicketRow, TicketFilter};
