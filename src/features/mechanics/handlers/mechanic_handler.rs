use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::core::extractor::ValidatedJson;
use crate::features::auth::guards::{RequireMechanic, RequireStaff};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::auth::role::Capability;
use crate::features::geo::GeoPoint;
use crate::features::mechanics::dtos::{
    JoinStationDto, MechanicResponseDto, UpdateAvailabilityDto, UpdateLocationDto,
};
use crate::features::mechanics::models::CreateMechanic;
use crate::features::mechanics::services::MechanicService;
use crate::features::stations::services::StationService;
use crate::shared::types::ApiResponse;

/// State for mechanic handlers
#[derive(Clone)]
pub struct MechanicState {
    pub mechanic_service: Arc<MechanicService>,
    pub station_service: Arc<StationService>,
}

/// Join an active station as mechanic
#[utoipa::path(
    post,
    path = "/api/mechanics",
    request_body = JoinStationDto,
    responses(
        (status = 201, description = "Mechanic profile created", body = ApiResponse<MechanicResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Mechanic access required"),
        (status = 404, description = "Active station not found"),
        (status = 409, description = "User already belongs to a station")
    ),
    security(("bearer_auth" = [])),
    tag = "mechanics"
)]
pub async fn join_station(
    user: AuthenticatedUser,
    State(state): State<MechanicState>,
    ValidatedJson(dto): ValidatedJson<JoinStationDto>,
) -> Result<(StatusCode, Json<ApiResponse<MechanicResponseDto>>)> {
    user.require(Capability::JoinStation)?;

    let data = CreateMechanic {
        user_id: user.sub,
        station_id: dto.station_id,
        display_name: dto.display_name,
        phone: dto.phone,
        specialties: dto.specialties,
    };
    let mechanic = state.mechanic_service.create(&data).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Some(mechanic.into()), None, None)),
    ))
}

/// Current user's mechanic profile
#[utoipa::path(
    get,
    path = "/api/mechanics/me",
    responses(
        (status = 200, description = "Mechanic profile", body = ApiResponse<MechanicResponseDto>),
        (status = 403, description = "Mechanic access required"),
        (status = 404, description = "No mechanic profile")
    ),
    security(("bearer_auth" = [])),
    tag = "mechanics"
)]
pub async fn get_my_profile(
    RequireMechanic(user): RequireMechanic,
    State(state): State<MechanicState>,
) -> Result<Json<ApiResponse<MechanicResponseDto>>> {
    let mechanic = state.mechanic_service.get_by_user(&user.sub).await?;
    Ok(Json(ApiResponse::success(Some(mechanic.into()), None, None)))
}

/// Go on or off duty
#[utoipa::path(
    patch,
    path = "/api/mechanics/me/availability",
    request_body = UpdateAvailabilityDto,
    responses(
        (status = 200, description = "Availability updated", body = ApiResponse<MechanicResponseDto>),
        (status = 403, description = "Mechanic access required"),
        (status = 404, description = "No mechanic profile")
    ),
    security(("bearer_auth" = [])),
    tag = "mechanics"
)]
pub async fn update_availability(
    RequireMechanic(user): RequireMechanic,
    State(state): State<MechanicState>,
    Json(dto): Json<UpdateAvailabilityDto>,
) -> Result<Json<ApiResponse<MechanicResponseDto>>> {
    let mechanic = state
        .mechanic_service
        .set_availability(&user.sub, dto.is_available)
        .await?;
    Ok(Json(ApiResponse::success(Some(mechanic.into()), None, None)))
}

/// Report the mechanic's live position
#[utoipa::path(
    patch,
    path = "/api/mechanics/me/location",
    request_body = UpdateLocationDto,
    responses(
        (status = 200, description = "Location updated", body = ApiResponse<MechanicResponseDto>),
        (status = 400, description = "Invalid coordinates"),
        (status = 403, description = "Mechanic access required")
    ),
    security(("bearer_auth" = [])),
    tag = "mechanics"
)]
pub async fn update_location(
    RequireMechanic(user): RequireMechanic,
    State(state): State<MechanicState>,
    Json(dto): Json<UpdateLocationDto>,
) -> Result<Json<ApiResponse<MechanicResponseDto>>> {
    let point = GeoPoint::new(dto.latitude, dto.longitude)?;
    let mechanic = state
        .mechanic_service
        .update_location(&user.sub, point)
        .await?;
    Ok(Json(ApiResponse::success(Some(mechanic.into()), None, None)))
}

/// Remove a mechanic from its station
#[utoipa::path(
    delete,
    path = "/api/mechanics/{id}",
    params(
        ("id" = Uuid, Path, description = "Mechanic ID")
    ),
    responses(
        (status = 200, description = "Mechanic removed"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Mechanic not found"),
        (status = 409, description = "Mechanic still has active requests")
    ),
    security(("bearer_auth" = [])),
    tag = "mechanics"
)]
pub async fn delete_mechanic(
    RequireStaff(user): RequireStaff,
    State(state): State<MechanicState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>> {
    user.require(Capability::ManageMechanics)?;

    if !user.is_admin() {
        let mechanic = state.mechanic_service.get_by_id(id).await?;
        let station = state.station_service.get_by_id(mechanic.station_id).await?;
        if !station.is_managed_by(&user.sub) {
            return Err(AppError::Forbidden(
                "Mechanic belongs to another station".to_string(),
            ));
        }
    }

    state.mechanic_service.delete(id).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("Mechanic removed".to_string()),
        None,
    )))
}
