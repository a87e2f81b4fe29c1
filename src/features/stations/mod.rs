//! Service stations: registration by managers, the public directory and the
//! nearest-station lookup used to route breakdowns.
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | POST | `/api/stations` | Register a station |
//! | GET | `/api/stations` | List active stations (public) |
//! | GET | `/api/stations/nearest` | Nearest active station (public) |
//! | GET | `/api/stations/{id}` | Get station (public) |
//! | PUT | `/api/stations/{id}` | Update station |
//! | DELETE | `/api/stations/{id}` | Deactivate station |
//! | GET | `/api/stations/{id}/mechanics` | Mechanics of a station |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::StationService;
