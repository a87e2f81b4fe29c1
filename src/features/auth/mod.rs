mod jwks;
mod validator;

pub mod dto;
pub mod guards;
pub mod handler;
pub mod model;
pub mod role;
pub mod routes;

pub use jwks::JwksClient;
pub use validator::JwtValidator;
