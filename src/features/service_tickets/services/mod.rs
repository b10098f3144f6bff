mod service_ticket_service;

pub use service_ticket_service::ServiceTicketService;
