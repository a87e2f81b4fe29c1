use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::assignments::handlers::{self, AssignmentState};
use crate::features::assignments::services::AssignmentService;
use crate::features::stations::services::StationService;

/// Create routes for the assignments feature (protected)
pub fn routes(
    assignment_service: Arc<AssignmentService>,
    station_service: Arc<StationService>,
) -> Router {
    let state = AssignmentState {
        assignment_service,
        station_service,
    };

    Router::new()
        .route("/api/assignments/limits", get(handlers::get_assignment_limits))
        .with_state(state)
}
