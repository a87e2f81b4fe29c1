use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::core::extractor::ValidatedJson;
use crate::features::auth::guards::{RequireAdmin, RequireStaff};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::auth::role::Capability;
use crate::features::geo::GeoPoint;
use crate::features::mechanics::dtos::MechanicResponseDto;
use crate::features::mechanics::services::MechanicService;
use crate::features::stations::dtos::{
    CreateStationDto, NearestStationQuery, NearestStationResponseDto, StationResponseDto,
    UpdateStationDto,
};
use crate::features::stations::models::Station;
use crate::features::stations::services::StationService;
use crate::shared::types::{ApiResponse, Meta};

/// State for station handlers
#[derive(Clone)]
pub struct StationState {
    pub station_service: Arc<StationService>,
    pub mechanic_service: Arc<MechanicService>,
}

fn ensure_can_manage(user: &AuthenticatedUser, station: &Station) -> Result<()> {
    if user.is_admin() || station.is_managed_by(&user.sub) {
        Ok(())
    } else {
        Err(AppError::Forbidden(
            "Only the station's manager can do this".to_string(),
        ))
    }
}

/// Register a station
///
/// Station managers register their own station. Admins register on behalf
/// of a manager and must name them in `managerUserId`.
#[utoipa::path(
    post,
    path = "/api/stations",
    request_body = CreateStationDto,
    responses(
        (status = 201, description = "Station registered", body = ApiResponse<StationResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Forbidden"),
        (status = 409, description = "Manager already has a station")
    ),
    security(("bearer_auth" = [])),
    tag = "stations"
)]
pub async fn create_station(
    user: AuthenticatedUser,
    State(state): State<StationState>,
    ValidatedJson(mut dto): ValidatedJson<CreateStationDto>,
) -> Result<(StatusCode, Json<ApiResponse<StationResponseDto>>)> {
    user.require(Capability::RegisterStation)?;

    let manager_user_id = if user.is_admin() {
        dto.manager_user_id.take().ok_or_else(|| {
            AppError::BadRequest("managerUserId is required when an admin registers a station".to_string())
        })?
    } else {
        match dto.manager_user_id.take() {
            Some(other) if other != user.sub => {
                return Err(AppError::Forbidden(
                    "Managers can only register their own station".to_string(),
                ))
            }
            _ => user.sub.clone(),
        }
    };

    let station = state
        .station_service
        .create(&dto.into_create(manager_user_id)?)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Some(station.into()), None, None)),
    ))
}

/// List active stations (public)
#[utoipa::path(
    get,
    path = "/api/stations",
    responses(
        (status = 200, description = "Active stations", body = ApiResponse<Vec<StationResponseDto>>)
    ),
    tag = "stations"
)]
pub async fn list_stations(
    State(state): State<StationState>,
) -> Result<Json<ApiResponse<Vec<StationResponseDto>>>> {
    let stations = state.station_service.list_active().await?;
    let total = stations.len() as i64;
    let dtos: Vec<StationResponseDto> = stations.into_iter().map(Into::into).collect();
    Ok(Json(ApiResponse::success(
        Some(dtos),
        None,
        Some(Meta { total }),
    )))
}

/// Nearest active station to a point (public)
///
/// `data` is null when no station is active.
#[utoipa::path(
    get,
    path = "/api/stations/nearest",
    params(NearestStationQuery),
    responses(
        (status = 200, description = "Nearest station, if any", body = ApiResponse<NearestStationResponseDto>),
        (status = 400, description = "Invalid coordinates")
    ),
    tag = "stations"
)]
pub async fn nearest_station(
    State(state): State<StationState>,
    Query(query): Query<NearestStationQuery>,
) -> Result<Json<ApiResponse<NearestStationResponseDto>>> {
    let point = GeoPoint::new(query.lat, query.lon)?;
    let response = match state.station_service.find_nearest(point).await? {
        Some(nearest) => ApiResponse::success(
            Some(NearestStationResponseDto {
                station: nearest.station.into(),
                distance_km: nearest.distance_km,
            }),
            None,
            None,
        ),
        None => ApiResponse::success(None, Some("No active station".to_string()), None),
    };
    Ok(Json(response))
}

/// Get a station by ID (public)
#[utoipa::path(
    get,
    path = "/api/stations/{id}",
    params(
        ("id" = Uuid, Path, description = "Station ID")
    ),
    responses(
        (status = 200, description = "Station found", body = ApiResponse<StationResponseDto>),
        (status = 404, description = "Station not found")
    ),
    tag = "stations"
)]
pub async fn get_station(
    State(state): State<StationState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<StationResponseDto>>> {
    let station = state.station_service.get_by_id(id).await?;
    Ok(Json(ApiResponse::success(Some(station.into()), None, None)))
}

/// Update station details (admin or the station's manager)
#[utoipa::path(
    put,
    path = "/api/stations/{id}",
    params(
        ("id" = Uuid, Path, description = "Station ID")
    ),
    request_body = UpdateStationDto,
    responses(
        (status = 200, description = "Station updated", body = ApiResponse<StationResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Station not found")
    ),
    security(("bearer_auth" = [])),
    tag = "stations"
)]
pub async fn update_station(
    RequireStaff(user): RequireStaff,
    State(state): State<StationState>,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<UpdateStationDto>,
) -> Result<Json<ApiResponse<StationResponseDto>>> {
    let station = state.station_service.get_by_id(id).await?;
    ensure_can_manage(&user, &station)?;

    let station = state
        .station_service
        .update(id, &dto.into_update()?)
        .await?;
    Ok(Json(ApiResponse::success(Some(station.into()), None, None)))
}

/// Deactivate a station (admin only)
///
/// Deactivated stations stop receiving new requests; existing ones are kept.
#[utoipa::path(
    delete,
    path = "/api/stations/{id}",
    params(
        ("id" = Uuid, Path, description = "Station ID")
    ),
    responses(
        (status = 200, description = "Station deactivated", body = ApiResponse<StationResponseDto>),
        (status = 403, description = "Admin access required"),
        (status = 404, description = "Station not found")
    ),
    security(("bearer_auth" = [])),
    tag = "stations"
)]
pub async fn delete_station(
    RequireAdmin(user): RequireAdmin,
    State(state): State<StationState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<StationResponseDto>>> {
    user.require(Capability::ManageStations)?;
    let station = state.station_service.deactivate(id).await?;
    Ok(Json(ApiResponse::success(Some(station.into()), None, None)))
}

/// List a station's mechanics, oldest first
#[utoipa::path(
    get,
    path = "/api/stations/{id}/mechanics",
    params(
        ("id" = Uuid, Path, description = "Station ID")
    ),
    responses(
        (status = 200, description = "Mechanics of the station", body = ApiResponse<Vec<MechanicResponseDto>>),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Station not found")
    ),
    security(("bearer_auth" = [])),
    tag = "stations"
)]
pub async fn list_station_mechanics(
    RequireStaff(user): RequireStaff,
    State(state): State<StationState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Vec<MechanicResponseDto>>>> {
    let station = state.station_service.get_by_id(id).await?;
    ensure_can_manage(&user, &station)?;

    let mechanics = state.mechanic_service.list_by_station(id).await?;
    let dtos: Vec<MechanicResponseDto> = mechanics.into_iter().map(Into::into).collect();
    Ok(Json(ApiResponse::success(Some(dtos), None, None)))
}
