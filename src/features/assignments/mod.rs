//! Mechanic assignment: FIFO selection, the per-mechanic active cap and the
//! capacity overview used by dispatchers.
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | `/api/assignments/limits` | Capacity per mechanic with summary |

pub mod dtos;
pub mod handlers;
pub mod limits;
pub mod models;
pub mod routes;
pub mod selection;
pub mod services;

pub use services::{AssignAttempt, AssignmentService, AutoAssignOutcome};
