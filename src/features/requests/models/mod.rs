mod breakdown;
mod service_request;

pub use breakdown::BreakdownType;
pub use service_request::{CreateServiceRequest, RequestStatus, ServiceRequest};
pub(crate) use service_request::REQUEST_COLUMNS;
