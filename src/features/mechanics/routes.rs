use std::sync::Arc;

use axum::{
    routing::{delete, get, patch, post},
    Router,
};

use crate::features::mechanics::handlers::{self, MechanicState};
use crate::features::mechanics::services::MechanicService;
use crate::features::stations::services::StationService;

/// Create routes for the mechanics feature (protected)
pub fn routes(
    mechanic_service: Arc<MechanicService>,
    station_service: Arc<StationService>,
) -> Router {
    let state = MechanicState {
        mechanic_service,
        station_service,
    };

    Router::new()
        .route("/api/mechanics", post(handlers::join_station))
        .route("/api/mechanics/me", get(handlers::get_my_profile))
        .route(
            "/api/mechanics/me/availability",
            patch(handlers::update_availability),
        )
        .route("/api/mechanics/me/location", patch(handlers::update_location))
        .route("/api/mechanics/{id}", delete(handlers::delete_mechanic))
        .with_state(state)
}
