use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};

use crate::core::error::{AppError, Result};
use crate::features::assignments::dtos::{AssignmentLimitsQuery, AssignmentLimitsResponseDto};
use crate::features::assignments::services::AssignmentService;
use crate::features::auth::guards::RequireStaff;
use crate::features::auth::role::Capability;
use crate::features::stations::services::StationService;
use crate::shared::types::ApiResponse;

/// State for assignment handlers
#[derive(Clone)]
pub struct AssignmentState {
    pub assignment_service: Arc<AssignmentService>,
    pub station_service: Arc<StationService>,
}

/// Per-mechanic capacity and a summary for one station or all stations
///
/// Station managers always get their own station regardless of `stationId`.
#[utoipa::path(
    get,
    path = "/api/assignments/limits",
    params(AssignmentLimitsQuery),
    responses(
        (status = 200, description = "Assignment limits", body = ApiResponse<AssignmentLimitsResponseDto>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin or station manager access required")
    ),
    security(("bearer_auth" = [])),
    tag = "assignments"
)]
pub async fn get_assignment_limits(
    RequireStaff(user): RequireStaff,
    State(state): State<AssignmentState>,
    Query(query): Query<AssignmentLimitsQuery>,
) -> Result<Json<ApiResponse<AssignmentLimitsResponseDto>>> {
    user.require(Capability::ViewAssignmentLimits)?;

    let station_id = if user.is_admin() {
        query.station_id
    } else {
        let station = state
            .station_service
            .get_by_manager(&user.sub)
            .await?
            .ok_or_else(|| AppError::Forbidden("You do not manage a station".to_string()))?;
        Some(station.id)
    };

    let limits = state.assignment_service.assignment_limits(station_id).await?;
    Ok(Json(ApiResponse::success(Some(limits), None, None)))
}
