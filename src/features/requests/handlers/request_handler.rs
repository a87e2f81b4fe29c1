use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::core::error::Result;
use crate::core::extractor::ValidatedJson;
use crate::features::auth::guards::{RequireMechanic, RequireStaff};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::requests::dtos::{
    AssignMechanicDto, CreateServiceRequestDto, RequestListQuery, ServiceRequestResponseDto,
    TrackingResponseDto, UpdateRequestStatusDto,
};
use crate::features::requests::models::RequestStatus;
use crate::features::requests::services::RequestService;
use crate::shared::types::{ApiResponse, Meta};

/// Submit a breakdown (public)
///
/// The request is routed to the nearest active station and, when a mechanic
/// there has room, assigned immediately. Otherwise it stays pending.
#[utoipa::path(
    post,
    path = "/api/requests",
    request_body = CreateServiceRequestDto,
    responses(
        (status = 201, description = "Request submitted", body = ApiResponse<ServiceRequestResponseDto>),
        (status = 400, description = "Validation error")
    ),
    tag = "requests"
)]
pub async fn create_request(
    State(service): State<Arc<RequestService>>,
    ValidatedJson(dto): ValidatedJson<CreateServiceRequestDto>,
) -> Result<(StatusCode, Json<ApiResponse<ServiceRequestResponseDto>>)> {
    let request = service.create(dto).await?;
    let message = match request.status {
        RequestStatus::Assigned => "Mechanic assigned",
        _ => "Request received, waiting for a mechanic",
    };
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(request.into()),
            Some(message.to_string()),
            None,
        )),
    ))
}

/// Track a request by ID (public, no contact details)
#[utoipa::path(
    get,
    path = "/api/requests/{id}/track",
    params(
        ("id" = Uuid, Path, description = "Request ID")
    ),
    responses(
        (status = 200, description = "Request progress", body = ApiResponse<TrackingResponseDto>),
        (status = 404, description = "Request not found")
    ),
    tag = "requests"
)]
pub async fn track_request(
    State(service): State<Arc<RequestService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<TrackingResponseDto>>> {
    let request = service.get(id).await?;
    Ok(Json(ApiResponse::success(Some(request.into()), None, None)))
}

/// List requests visible to the caller, most urgent first
#[utoipa::path(
    get,
    path = "/api/requests",
    params(RequestListQuery),
    responses(
        (status = 200, description = "List of requests", body = ApiResponse<Vec<ServiceRequestResponseDto>>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "requests"
)]
pub async fn list_requests(
    user: AuthenticatedUser,
    State(service): State<Arc<RequestService>>,
    Query(query): Query<RequestListQuery>,
) -> Result<Json<ApiResponse<Vec<ServiceRequestResponseDto>>>> {
    let (requests, total) = service.list(&user, &query).await?;
    let dtos: Vec<ServiceRequestResponseDto> = requests.into_iter().map(Into::into).collect();
    Ok(Json(ApiResponse::success(
        Some(dtos),
        None,
        Some(Meta { total }),
    )))
}

/// Get a request by ID
#[utoipa::path(
    get,
    path = "/api/requests/{id}",
    params(
        ("id" = Uuid, Path, description = "Request ID")
    ),
    responses(
        (status = 200, description = "Request found", body = ApiResponse<ServiceRequestResponseDto>),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Request not found")
    ),
    security(("bearer_auth" = [])),
    tag = "requests"
)]
pub async fn get_request(
    user: AuthenticatedUser,
    State(service): State<Arc<RequestService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<ServiceRequestResponseDto>>> {
    let request = service.get_for(&user, id).await?;
    Ok(Json(ApiResponse::success(Some(request.into()), None, None)))
}

/// Assign a mechanic of the request's station
#[utoipa::path(
    post,
    path = "/api/requests/{id}/assign",
    params(
        ("id" = Uuid, Path, description = "Request ID")
    ),
    request_body = AssignMechanicDto,
    responses(
        (status = 200, description = "Mechanic assigned", body = ApiResponse<ServiceRequestResponseDto>),
        (status = 400, description = "Mechanic belongs to another station"),
        (status = 403, description = "Admin or station manager access required"),
        (status = 404, description = "Request or mechanic not found"),
        (status = 409, description = "Request not pending, or mechanic unavailable or full")
    ),
    security(("bearer_auth" = [])),
    tag = "requests"
)]
pub async fn assign_mechanic(
    RequireStaff(user): RequireStaff,
    State(service): State<Arc<RequestService>>,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<AssignMechanicDto>,
) -> Result<Json<ApiResponse<ServiceRequestResponseDto>>> {
    let request = service.assign(&user, id, dto.mechanic_id).await?;
    Ok(Json(ApiResponse::success(Some(request.into()), None, None)))
}

/// Retry auto-assignment of a pending request
#[utoipa::path(
    post,
    path = "/api/requests/{id}/auto-assign",
    params(
        ("id" = Uuid, Path, description = "Request ID")
    ),
    responses(
        (status = 200, description = "Request after the attempt, pending if nobody could take it", body = ApiResponse<ServiceRequestResponseDto>),
        (status = 403, description = "Admin or station manager access required"),
        (status = 409, description = "Request not pending")
    ),
    security(("bearer_auth" = [])),
    tag = "requests"
)]
pub async fn auto_assign_request(
    RequireStaff(user): RequireStaff,
    State(service): State<Arc<RequestService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<ServiceRequestResponseDto>>> {
    let request = service.auto_assign(&user, id).await?;
    let message = match request.status {
        RequestStatus::Assigned => "Mechanic assigned",
        _ => "No mechanic available, request left pending",
    };
    Ok(Json(ApiResponse::success(
        Some(request.into()),
        Some(message.to_string()),
        None,
    )))
}

/// Accept an assigned request and start working on it
#[utoipa::path(
    post,
    path = "/api/requests/{id}/accept",
    params(
        ("id" = Uuid, Path, description = "Request ID")
    ),
    responses(
        (status = 200, description = "Intervention started", body = ApiResponse<ServiceRequestResponseDto>),
        (status = 403, description = "Not the assigned mechanic"),
        (status = 409, description = "Invalid transition")
    ),
    security(("bearer_auth" = [])),
    tag = "requests"
)]
pub async fn accept_request(
    RequireMechanic(user): RequireMechanic,
    State(service): State<Arc<RequestService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<ServiceRequestResponseDto>>> {
    let request = service.accept(&user, id).await?;
    Ok(Json(ApiResponse::success(Some(request.into()), None, None)))
}

/// Hand an assigned request back to the pending queue
#[utoipa::path(
    post,
    path = "/api/requests/{id}/reject",
    params(
        ("id" = Uuid, Path, description = "Request ID")
    ),
    responses(
        (status = 200, description = "Request back to pending", body = ApiResponse<ServiceRequestResponseDto>),
        (status = 403, description = "Not the assigned mechanic"),
        (status = 409, description = "Invalid transition")
    ),
    security(("bearer_auth" = [])),
    tag = "requests"
)]
pub async fn reject_request(
    RequireMechanic(user): RequireMechanic,
    State(service): State<Arc<RequestService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<ServiceRequestResponseDto>>> {
    let request = service.reject(&user, id).await?;
    Ok(Json(ApiResponse::success(Some(request.into()), None, None)))
}

/// Mark an in-progress request as done
#[utoipa::path(
    post,
    path = "/api/requests/{id}/complete",
    params(
        ("id" = Uuid, Path, description = "Request ID")
    ),
    responses(
        (status = 200, description = "Request completed", body = ApiResponse<ServiceRequestResponseDto>),
        (status = 403, description = "Not the assigned mechanic"),
        (status = 409, description = "Invalid transition")
    ),
    security(("bearer_auth" = [])),
    tag = "requests"
)]
pub async fn complete_request(
    RequireMechanic(user): RequireMechanic,
    State(service): State<Arc<RequestService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<ServiceRequestResponseDto>>> {
    let request = service.complete(&user, id).await?;
    Ok(Json(ApiResponse::success(Some(request.into()), None, None)))
}

/// Cancel a request that is not finished yet
#[utoipa::path(
    post,
    path = "/api/requests/{id}/cancel",
    params(
        ("id" = Uuid, Path, description = "Request ID")
    ),
    responses(
        (status = 200, description = "Request cancelled", body = ApiResponse<ServiceRequestResponseDto>),
        (status = 403, description = "Admin or station manager access required"),
        (status = 409, description = "Request already completed or cancelled")
    ),
    security(("bearer_auth" = [])),
    tag = "requests"
)]
pub async fn cancel_request(
    RequireStaff(user): RequireStaff,
    State(service): State<Arc<RequestService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<ServiceRequestResponseDto>>> {
    let request = service.cancel(&user, id).await?;
    Ok(Json(ApiResponse::success(Some(request.into()), None, None)))
}

/// Move a request to a target status
///
/// The caller needs the role of the matching action: dispatchers assign and
/// cancel, the assigned mechanic accepts, rejects and completes.
#[utoipa::path(
    patch,
    path = "/api/requests/{id}/status",
    params(
        ("id" = Uuid, Path, description = "Request ID")
    ),
    request_body = UpdateRequestStatusDto,
    responses(
        (status = 200, description = "Status updated", body = ApiResponse<ServiceRequestResponseDto>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 409, description = "Invalid transition")
    ),
    security(("bearer_auth" = [])),
    tag = "requests"
)]
pub async fn update_request_status(
    user: AuthenticatedUser,
    State(service): State<Arc<RequestService>>,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<UpdateRequestStatusDto>,
) -> Result<Json<ApiResponse<ServiceRequestResponseDto>>> {
    let request = service
        .update_status(&user, id, dto.status, dto.mechanic_id)
        .await?;
    Ok(Json(ApiResponse::success(Some(request.into()), None, None)))
}
