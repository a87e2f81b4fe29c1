//! Breakdown requests: submission, routing to the nearest station, dispatch
//! and the mechanic's intervention lifecycle.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | POST | `/api/requests` | Submit a breakdown (public) |
//! | GET | `/api/requests/{id}/track` | Track progress (public) |
//! | GET | `/api/requests` | List visible requests |
//! | GET | `/api/requests/{id}` | Get request |
//! | POST | `/api/requests/{id}/assign` | Manual assignment |
//! | POST | `/api/requests/{id}/auto-assign` | Retry auto-assignment |
//! | POST | `/api/requests/{id}/accept` | Mechanic starts the intervention |
//! | POST | `/api/requests/{id}/reject` | Mechanic hands the request back |
//! | POST | `/api/requests/{id}/complete` | Mechanic finishes |
//! | POST | `/api/requests/{id}/cancel` | Dispatcher cancels |
//! | PATCH | `/api/requests/{id}/status` | Generic status change |

pub mod dtos;
pub mod handlers;
pub mod lifecycle;
pub mod models;
pub mod priority;
pub mod routes;
pub mod services;

pub use services::RequestService;
