use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::features::assignments::{
    dtos as assignments_dtos, handlers as assignments_handlers, limits as assignments_limits,
};
use crate::features::auth::{self, dto as auth_dto};
use crate::features::geo::GeoPoint;
use crate::features::mechanics::{dtos as mechanics_dtos, handlers as mechanics_handlers};
use crate::features::requests::{
    dtos as requests_dtos, handlers as requests_handlers, lifecycle as requests_lifecycle,
    models as requests_models,
};
use crate::features::stations::{dtos as stations_dtos, handlers as stations_handlers};
use crate::shared::types::{ApiResponse, Meta};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Auth
        auth::handler::get_me,
        // Stations
        stations_handlers::create_station,
        stations_handlers::list_stations,
        stations_handlers::nearest_station,
        stations_handlers::get_station,
        stations_handlers::update_station,
        stations_handlers::delete_station,
        stations_handlers::list_station_mechanics,
        // Mechanics
        mechanics_handlers::join_station,
        mechanics_handlers::get_my_profile,
        mechanics_handlers::update_availability,
        mechanics_handlers::update_location,
        mechanics_handlers::delete_mechanic,
        // Requests
        requests_handlers::create_request,
        requests_handlers::track_request,
        requests_handlers::list_requests,
        requests_handlers::get_request,
        requests_handlers::assign_mechanic,
        requests_handlers::auto_assign_request,
        requests_handlers::accept_request,
        requests_handlers::reject_request,
        requests_handlers::complete_request,
        requests_handlers::cancel_request,
        requests_handlers::update_request_status,
        // Assignments
        assignments_handlers::get_assignment_limits,
    ),
    components(
        schemas(
            Meta,
            GeoPoint,
            // Auth
            auth::role::Role,
            auth::role::Capability,
            auth_dto::MeResponseDto,
            ApiResponse<auth_dto::MeResponseDto>,
            // Stations
            stations_dtos::CreateStationDto,
            stations_dtos::UpdateStationDto,
            stations_dtos::StationResponseDto,
            stations_dtos::NearestStationResponseDto,
            ApiResponse<stations_dtos::StationResponseDto>,
            ApiResponse<Vec<stations_dtos::StationResponseDto>>,
            ApiResponse<stations_dtos::NearestStationResponseDto>,
            // Mechanics
            mechanics_dtos::JoinStationDto,
            mechanics_dtos::UpdateAvailabilityDto,
            mechanics_dtos::UpdateLocationDto,
            mechanics_dtos::MechanicResponseDto,
            ApiResponse<mechanics_dtos::MechanicResponseDto>,
            ApiResponse<Vec<mechanics_dtos::MechanicResponseDto>>,
            // Requests
            requests_models::BreakdownType,
            requests_models::RequestStatus,
            requests_lifecycle::RequestAction,
            requests_dtos::CreateServiceRequestDto,
            requests_dtos::AssignMechanicDto,
            requests_dtos::UpdateRequestStatusDto,
            requests_dtos::ServiceRequestResponseDto,
            requests_dtos::TrackingResponseDto,
            ApiResponse<requests_dtos::ServiceRequestResponseDto>,
            ApiResponse<Vec<requests_dtos::ServiceRequestResponseDto>>,
            ApiResponse<requests_dtos::TrackingResponseDto>,
            // Assignments
            assignments_limits::MechanicCapacity,
            assignments_limits::AssignmentLimitSummary,
            assignments_dtos::AssignmentLimitsResponseDto,
            ApiResponse<assignments_dtos::AssignmentLimitsResponseDto>,
        )
    ),
    tags(
        (name = "auth", description = "Current user and role"),
        (name = "stations", description = "Service stations and nearest-station lookup"),
        (name = "mechanics", description = "Mechanics, duty status and live position"),
        (name = "requests", description = "Breakdown requests and their lifecycle"),
        (name = "assignments", description = "Mechanic capacity and assignment limits"),
    ),
    modifiers(&SecurityAddon),
    info(
        title = "NTouks Dispatch API",
        version = "0.1.0",
        description = "Roadside assistance dispatch: breakdown intake, station routing and mechanic assignment",
    )
)]
pub struct ApiDoc;

/// Adds Bearer JWT security scheme to OpenAPI spec
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_documents_dispatch_routes() {
        let doc = ApiDoc::openapi();
        let paths = &doc.paths.paths;
        assert!(paths.contains_key("/api/requests"));
        assert!(paths.contains_key("/api/requests/{id}/status"));
        assert!(paths.contains_key("/api/stations/nearest"));
        assert!(paths.contains_key("/api/assignments/limits"));
    }

    #[test]
    fn test_bearer_scheme_is_registered() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("bearer_auth"));
    }

    #[test]
    fn test_info_modifier_overrides_title() {
        let mut doc = ApiDoc::openapi();
        SwaggerInfoModifier {
            title: "Staging".to_string(),
            version: "9.9.9".to_string(),
            description: "staging docs".to_string(),
        }
        .modify(&mut doc);
        assert_eq!(doc.info.title, "Staging");
        assert_eq!(doc.info.version, "9.9.9");
    }
}
