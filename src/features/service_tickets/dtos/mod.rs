mod service_ticket_dto;

pub use service_ticket_dto::*;
