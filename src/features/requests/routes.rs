use std::sync::Arc;

use axum::{
    routing::{get, patch, post},
    Router,
};

use crate::features::requests::handlers;
use crate::features::requests::services::RequestService;

/// Submission and tracking, reachable without a token
pub fn public_routes(service: Arc<RequestService>) -> Router {
    Router::new()
        .route("/api/requests", post(handlers::create_request))
        .route("/api/requests/{id}/track", get(handlers::track_request))
        .with_state(service)
}

/// Dispatch and mechanic routes (require auth middleware to be applied by caller)
pub fn protected_routes(service: Arc<RequestService>) -> Router {
    Router::new()
        .route("/api/requests", get(handlers::list_requests))
        .route("/api/requests/{id}", get(handlers::get_request))
        .route("/api/requests/{id}/assign", post(handlers::assign_mechanic))
        .route(
            "/api/requests/{id}/auto-assign",
            post(handlers::auto_assign_request),
        )
        .route("/api/requests/{id}/accept", post(handlers::accept_request))
        .route("/api/requests/{id}/reject", post(handlers::reject_request))
        .route("/api/requests/{id}/complete", post(handlers::complete_request))
        .route("/api/requests/{id}/cancel", post(handlers::cancel_request))
        .route(
            "/api/requests/{id}/status",
            patch(handlers::update_request_status),
        )
        .with_state(service)
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

    fn server_as(role: Role) -> TestServer {
        let services = test_services();
        let router = with_user(protected_routes(services.requests), test_user(role));
        TestServer::new(router).unwrap()
    }

    #[tokio::test]
    async fn test_manager_cannot_accept_requests() {
        let server = server_as(Role::StationManager);
        let response = server
            .post(&format!("/api/requests/{}/accept", Uuid::new_v4()))
            .await;
        response.assert_status(StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_mechanic_cannot_cancel_or_assign() {
        let server = server_as(Role::Mechanic);
        let id = Uuid::new_v4();

        server
            .post(&format!("/api/requests/{id}/cancel"))
            .await
            .assert_status(StatusCode::FORBIDDEN);
        server
            .post(&format!("/api/requests/{id}/assign"))
            .json(&json!({ "mechanicId": Uuid::new_v4() }))
            .await
            .assert_status(StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_customer_cannot_list_requests() {
        let server = server_as(Role::Customer);
        server
            .get("/api/requests")
            .await
            .assert_status(StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_missing_user_is_unauthorized() {
        let services = test_services();
        let server = TestServer::new(protected_routes(services.requests)).unwrap();
        server
            .get("/api/requests")
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_invalid_submission_is_rejected_before_storage() {
        let services = test_services();
        let server = TestServer::new(public_routes(services.requests)).unwrap();

        let response = server
            .post("/api/requests")
            .json(&json!({
                "requesterName": "Sami",
                "requesterPhone": "+21698000111",
                "breakdownType": "engine",
                "description": "Smoke from the hood",
                "urgency": 9,
                "address": "GP1, Hammamet",
                "latitude": 36.4,
                "longitude": 10.6
            }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: serde_json::Value = response.json();
        assert_eq!(body["success"], json!(false));
    }

    #[tokio::test]
    async fn test_out_of_range_coordinates_are_rejected() {
        let services = test_services();
        let server = TestServer::new(public_routes(services.requests)).unwrap();

        server
            .post("/api/requests")
            .json(&json!({
                "requesterName": "Sami",
                "requesterPhone": "+21698000111",
                "breakdownType": "tire",
                "description": "Flat",
                "urgency": 2,
                "address": "Nowhere",
                "latitude": 123.0,
                "longitude": 10.6
            }))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }
}
