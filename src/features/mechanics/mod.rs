//! Mechanics attached to stations, their duty status and live position.
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | POST | `/api/mechanics` | Join a station |
//! | GET | `/api/mechanics/me` | Own profile |
//! | PATCH | `/api/mechanics/me/availability` | Go on or off duty |
//! | PATCH | `/api/mechanics/me/location` | Report live position |
//! | DELETE | `/api/mechanics/{id}` | Remove a mechanic |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::MechanicService;
