mod request_scope;
mod request_service;

pub use request_scope::RequestScope;
pub use request_service::RequestService;
