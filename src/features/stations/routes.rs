use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::features::mechanics::services::MechanicService;
use crate::features::stations::handlers::{self, StationState};
use crate::features::stations::services::StationService;

fn state(
    station_service: Arc<StationService>,
    mechanic_service: Arc<MechanicService>,
) -> StationState {
    StationState {
        station_service,
        mechanic_service,
    }
}

/// Station directory and nearest-station lookup
pub fn public_routes(
    station_service: Arc<StationService>,
    mechanic_service: Arc<MechanicService>,
) -> Router {
    Router::new()
        .route("/api/stations", get(handlers::list_stations))
        // Must come before {id}
        .route("/api/stations/nearest", get(handlers::nearest_station))
        .route("/api/stations/{id}", get(handlers::get_station))
        .with_state(state(station_service, mechanic_service))
}

/// Station administration (require auth middleware to be applied by caller)
pub fn protected_routes(
    station_service: Arc<StationService>,
    mechanic_service: Arc<MechanicService>,
) -> Router {
    Router::new()
        .route("/api/stations", post(handlers::create_station))
        .route(
            "/api/stations/{id}",
            axum::routing::put(handlers::update_station).delete(handlers::delete_station),
        )
        .route(
            "/api/stations/{id}/mechanics",
            get(handlers::list_station_mechanics),
        )
        .with_state(state(station_service, mechanic_service))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::auth::role::Role;
    use crate::shared::test_helpers::{test_services, test_user, with_user};
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use serde_json::json;
    use uuid::Uuid;

    fn protected_server_as(role: Role) -> TestServer {
        let services = test_services();
        let router = with_user(
            protected_routes(services.stations, services.mechanics),
            test_user(role),
        );
        TestServer::new(router).unwrap()
    }

    #[tokio::test]
    async fn test_only_admin_deactivates_stations() {
        let server = protected_server_as(Role::StationManager);
        server
            .delete(&format!("/api/stations/{}", Uuid::new_v4()))
            .await
            .assert_status(StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_customer_cannot_register_station() {
        let server = protected_server_as(Role::Customer);
        server
            .post("/api/stations")
            .json(&json!({
                "name": "Garage Sud",
                "address": "Route de Gabes, Sfax",
                "latitude": 34.74,
                "longitude": 10.76
            }))
            .await
            .assert_status(StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_nearest_rejects_invalid_coordinates() {
        let services = test_services();
        let server =
            TestServer::new(public_routes(services.stations, services.mechanics)).unwrap();
        server
            .get("/api/stations/nearest")
            .add_query_param("lat", 95.0)
            .add_query_param("lon", 10.0)
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }
}
