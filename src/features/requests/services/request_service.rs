use std::sync::Arc;

use sqlx::PgPool;
use uuid::Uuid;

use super::request_scope::RequestScope;
use crate::core::config::DispatchConfig;
use crate::core::error::{AppError, Result};
use crate::features::assignments::{AssignAttempt, AssignmentService, AutoAssignOutcome};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::auth::role::{Capability, Role};
use crate::features::geo::GeoPoint;
use crate::features::mechanics::models::Mechanic;
use crate::features::mechanics::services::MechanicService;
use crate::features::requests::dtos::{CreateServiceRequestDto, RequestListQuery};
use crate::features::requests::lifecycle::RequestAction;
use crate::features::requests::models::{
    CreateServiceRequest, RequestStatus, ServiceRequest, REQUEST_COLUMNS,
};
use crate::features::requests::priority::compute_priority;
use crate::features::stations::models::Station;
use crate::features::stations::services::StationService;
use crate::shared::types::PaginationQuery;

/// Service for breakdown requests and their lifecycle
pub struct RequestService {
    pool: PgPool,
    stations: Arc<StationService>,
    mechanics: Arc<MechanicService>,
    assignments: Arc<AssignmentService>,
    config: DispatchConfig,
}

impl RequestService {
    pub fn new(
        pool: PgPool,
        stations: Arc<StationService>,
        mechanics: Arc<MechanicService>,
        assignments: Arc<AssignmentService>,
        config: DispatchConfig,
    ) -> Self {
        Self {
            pool,
            stations,
            mechanics,
            assignments,
            config,
        }
    }

    /// Submit a breakdown: prioritise it, route it to the nearest station and
    /// try to hand it to a mechanic straight away.
    ///
    /// Auto-assignment never fails the submission. Whatever goes wrong there,
    /// the request is stored and left pending.
    pub async fn create(&self, dto: CreateServiceRequestDto) -> Result<ServiceRequest> {
        let location = GeoPoint::new(dto.latitude, dto.longitude)?;
        let priority = compute_priority(dto.urgency, dto.breakdown_type);

        let station_id = self
            .stations
            .find_nearest(location)
            .await?
            .map(|nearest| nearest.station.id);

        let data = CreateServiceRequest {
            requester_name: dto.requester_name,
            requester_phone: dto.requester_phone,
            requester_email: dto.requester_email,
            breakdown_type: dto.breakdown_type,
            description: dto.description,
            urgency: dto.urgency,
            priority,
            address: dto.address,
            location,
            vehicle_make: dto.vehicle_make,
            vehicle_model: dto.vehicle_model,
            vehicle_plate: dto.vehicle_plate,
            station_id,
        };

        let request = self.insert(&data).await?;
        tracing::info!(
            "Created request {} ({}, priority {}) routed to {:?}",
            request.id,
            request.breakdown_type,
            request.priority,
            request.station_id
        );

        let Some(station_id) = station_id else {
            return Ok(request);
        };
        if !self.config.should_auto_assign(request.urgency) {
            tracing::debug!(
                "Request {} below auto-assign urgency, waiting for dispatcher",
                request.id
            );
            return Ok(request);
        }

        let id = request.id;
        let outcome = self.assignments.auto_assign(id, station_id).await;
        match settle_submission(request, outcome) {
            Some(settled) => Ok(settled),
            None => self.get(id).await,
        }
    }

    async fn insert(&self, data: &CreateServiceRequest) -> Result<ServiceRequest> {
        sqlx::query_as::<_, ServiceRequest>(&format!(
            r#"
            INSERT INTO service_requests (
                requester_name, requester_phone, requester_email,
                breakdown_type, description, urgency, priority,
                address, latitude, longitude,
                vehicle_make, vehicle_model, vehicle_plate,
                station_id
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            RETURNING {REQUEST_COLUMNS}
            "#
        ))
        .bind(&data.requester_name)
        .bind(&data.requester_phone)
        .bind(&data.requester_email)
        .bind(data.breakdown_type)
        .bind(&data.description)
        .bind(data.urgency)
        .bind(data.priority)
        .bind(&data.address)
        .bind(data.location.lat)
        .bind(data.location.lon)
        .bind(&data.vehicle_make)
        .bind(&data.vehicle_model)
        .bind(&data.vehicle_plate)
        .bind(data.station_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to create request: {:?}", e);
            AppError::Database(e)
        })
    }

    /// Get request by ID without any visibility check
    pub async fn get(&self, id: Uuid) -> Result<ServiceRequest> {
        sqlx::query_as::<_, ServiceRequest>(&format!(
            "SELECT {REQUEST_COLUMNS} FROM service_requests WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get request: {:?}", e);
            AppError::Database(e)
        })?
        .ok_or_else(|| AppError::NotFound(format!("Request {} not found", id)))
    }

    /// Requests the user may see, following their role
    pub async fn resolve_scope(&self, user: &AuthenticatedUser) -> Result<RequestScope> {
        match user.role {
            Role::Admin => Ok(RequestScope::All),
            Role::StationManager => {
                let station = self
                    .stations
                    .get_by_manager(&user.sub)
                    .await?
                    .ok_or_else(|| AppError::Forbidden("You do not manage a station".to_string()))?;
                Ok(RequestScope::Station(station.id))
            }
            Role::Mechanic => {
                let mechanic = self.mechanic_of(user).await?;
                Ok(RequestScope::Mechanic(mechanic.id))
            }
            Role::Customer => Err(AppError::Forbidden(
                "Customers can only track their own requests".to_string(),
            )),
        }
    }

    async fn mechanic_of(&self, user: &AuthenticatedUser) -> Result<Mechanic> {
        self.mechanics
            .find_by_user(&user.sub)
            .await?
            .ok_or_else(|| AppError::Forbidden("You have not joined a station".to_string()))
    }

    /// Get a request the user is allowed to see; others look missing
    pub async fn get_for(&self, user: &AuthenticatedUser, id: Uuid) -> Result<ServiceRequest> {
        let scope = self.resolve_scope(user).await?;
        self.get_in_scope(&scope, id).await
    }

    async fn get_in_scope(&self, scope: &RequestScope, id: Uuid) -> Result<ServiceRequest> {
        let request = self.get(id).await?;
        if !scope.allows(&request) {
            return Err(AppError::NotFound(format!("Request {} not found", id)));
        }
        Ok(request)
    }

    /// Visible requests, most urgent first, with the total count
    pub async fn list(
        &self,
        user: &AuthenticatedUser,
        query: &RequestListQuery,
    ) -> Result<(Vec<ServiceRequest>, i64)> {
        let scope = self.resolve_scope(user).await?;
        let (station_id, mechanic_id) = scope.filters();
        let pagination = PaginationQuery {
            page: query.page,
            page_size: query.page_size,
        };

        let filter = r#"
            WHERE ($1::request_status IS NULL OR status = $1)
            AND ($2::uuid IS NULL OR station_id = $2)
            AND ($3::uuid IS NULL OR mechanic_id = $3)
        "#;

        let total = sqlx::query_scalar::<_, i64>(&format!(
            "SELECT COUNT(*) FROM service_requests {filter}"
        ))
        .bind(query.status)
        .bind(station_id)
        .bind(mechanic_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to count requests: {:?}", e);
            AppError::Database(e)
        })?;

        let requests = sqlx::query_as::<_, ServiceRequest>(&format!(
            r#"
            SELECT {REQUEST_COLUMNS}
            FROM service_requests
            {filter}
            ORDER BY priority DESC, created_at ASC
            LIMIT $4 OFFSET $5
            "#
        ))
        .bind(query.status)
        .bind(station_id)
        .bind(mechanic_id)
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list requests: {:?}", e);
            AppError::Database(e)
        })?;

        Ok((requests, total))
    }

    /// Dispatcher scope; mechanics cannot manage requests
    async fn dispatcher_scope(
        &self,
        user: &AuthenticatedUser,
        capability: Capability,
    ) -> Result<RequestScope> {
        user.require(capability)?;
        let scope = self.resolve_scope(user).await?;
        if !scope.is_dispatcher() {
            return Err(AppError::Forbidden(
                "Only dispatchers can manage requests".to_string(),
            ));
        }
        Ok(scope)
    }

    /// Manually assign a mechanic of the request's station
    pub async fn assign(
        &self,
        user: &AuthenticatedUser,
        id: Uuid,
        mechanic_id: Uuid,
    ) -> Result<ServiceRequest> {
        let scope = self.dispatcher_scope(user, Capability::AssignMechanics).await?;
        let request = self.get_in_scope(&scope, id).await?;
        request.status.transition(RequestAction::Assign)?;

        let mechanic = self.mechanics.get_by_id(mechanic_id).await?;
        let expected_station = match scope {
            RequestScope::Station(station_id) => Some(station_id),
            _ => request.station_id,
        };
        if expected_station.is_some_and(|s| s != mechanic.station_id) {
            return Err(AppError::BadRequest(
                "Mechanic does not belong to the request's station".to_string(),
            ));
        }

        match self.assignments.try_assign(id, mechanic_id).await? {
            AssignAttempt::Assigned(assigned) => Ok(assigned),
            AssignAttempt::MechanicNotFound => Err(AppError::NotFound(format!(
                "Mechanic {} not found",
                mechanic_id
            ))),
            AssignAttempt::MechanicUnavailable => Err(AppError::Conflict(
                "Mechanic is not available".to_string(),
            )),
            AssignAttempt::AtCapacity => Err(AppError::Conflict(format!(
                "Mechanic already holds {} active requests",
                self.assignments.max_active()
            ))),
            AssignAttempt::RequestNotPending => Err(AppError::Conflict(
                "Request is no longer pending".to_string(),
            )),
        }
    }

    /// Re-run auto-assignment for a pending request.
    ///
    /// A request that was created while no station was active is routed
    /// first. Returns the request, still pending when nobody could take it.
    pub async fn auto_assign(&self, user: &AuthenticatedUser, id: Uuid) -> Result<ServiceRequest> {
        let scope = self.dispatcher_scope(user, Capability::AssignMechanics).await?;
        let request = self.get_in_scope(&scope, id).await?;
        request.status.transition(RequestAction::Assign)?;

        let current = match request.station_id {
            Some(station_id) => Some(self.stations.get_by_id(station_id).await?),
            None => None,
        };
        let station_id = match routable_station(current.as_ref()) {
            Some(station_id) => station_id,
            None => match self.stations.find_nearest(request.location()).await? {
                Some(nearest) => {
                    self.route_to_station(id, request.station_id, nearest.station.id)
                        .await?
                }
                None => return Ok(request),
            },
        };

        match self.assignments.auto_assign(id, station_id).await? {
            AutoAssignOutcome::Assigned(assigned) => Ok(assigned),
            AutoAssignOutcome::NoMechanicAvailable | AutoAssignOutcome::AlreadyHandled => {
                self.get(id).await
            }
        }
    }

    /// Point a pending request at `station_id`, replacing `previous` (none or a
    /// deactivated station)
    async fn route_to_station(
        &self,
        id: Uuid,
        previous: Option<Uuid>,
        station_id: Uuid,
    ) -> Result<Uuid> {
        let routed = sqlx::query_scalar::<_, Uuid>(
            r#"
            UPDATE service_requests
            SET station_id = $2, updated_at = NOW()
            WHERE id = $1 AND status = 'pending' AND station_id IS NOT DISTINCT FROM $3
            RETURNING station_id
            "#,
        )
        .bind(id)
        .bind(station_id)
        .bind(previous)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to route request: {:?}", e);
            AppError::Database(e)
        })?
        .ok_or_else(|| {
            AppError::Conflict("Request was modified concurrently, reload and retry".to_string())
        })?;

        tracing::info!("Routed request {} to station {}", id, routed);
        Ok(routed)
    }

    pub async fn accept(&self, user: &AuthenticatedUser, id: Uuid) -> Result<ServiceRequest> {
        self.apply_mechanic_action(user, id, RequestAction::Accept)
            .await
    }

    pub async fn reject(&self, user: &AuthenticatedUser, id: Uuid) -> Result<ServiceRequest> {
        self.apply_mechanic_action(user, id, RequestAction::Reject)
            .await
    }

    pub async fn complete(&self, user: &AuthenticatedUser, id: Uuid) -> Result<ServiceRequest> {
        self.apply_mechanic_action(user, id, RequestAction::Complete)
            .await
    }

    /// Accept, reject or complete on behalf of the assigned mechanic.
    ///
    /// Accepting takes the mechanic off the available pool until the job is
    /// completed.
    async fn apply_mechanic_action(
        &self,
        user: &AuthenticatedUser,
        id: Uuid,
        action: RequestAction,
    ) -> Result<ServiceRequest> {
        user.require(Capability::WorkRequests)?;
        let mechanic = self.mechanic_of(user).await?;
        let request = self.get(id).await?;

        if request.mechanic_id != Some(mechanic.id) {
            return Err(AppError::Forbidden(
                "Request is not assigned to you".to_string(),
            ));
        }

        if matches!(action, RequestAction::Assign | RequestAction::Cancel) {
            return Err(AppError::BadRequest(format!(
                "Mechanics cannot {} requests",
                action
            )));
        }

        let from = request.status;
        let effects = action.effects(from)?;
        let changes = effects.set_clause();

        let mut tx = self.pool.begin().await.map_err(|e| {
            tracing::error!("Failed to begin transaction: {:?}", e);
            AppError::Database(e)
        })?;

        let updated = sqlx::query_as::<_, ServiceRequest>(&format!(
            r#"
            UPDATE service_requests
            SET {changes}
            WHERE id = $1 AND status = $2 AND mechanic_id = $3
            RETURNING {REQUEST_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(from)
        .bind(mechanic.id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| {
            tracing::error!("Failed to {} request: {:?}", action, e);
            AppError::Database(e)
        })?
        .ok_or_else(|| {
            AppError::Conflict("Request was modified concurrently, reload and retry".to_string())
        })?;

        if let Some(is_available) = effects.mechanic_available {
            set_mechanic_availability(&mut tx, mechanic.id, is_available).await?;
        }

        tx.commit().await.map_err(|e| {
            tracing::error!("Failed to commit {}: {:?}", action, e);
            AppError::Database(e)
        })?;

        tracing::info!(
            "Mechanic {} did {} on request {}: {} -> {}",
            mechanic.id,
            action,
            id,
            from,
            updated.status
        );
        Ok(updated)
    }

    /// Cancel a non-terminal request; an in-progress mechanic becomes available again
    pub async fn cancel(&self, user: &AuthenticatedUser, id: Uuid) -> Result<ServiceRequest> {
        let scope = self.dispatcher_scope(user, Capability::CancelRequests).await?;
        let request = self.get_in_scope(&scope, id).await?;
        let from = request.status;
        let effects = RequestAction::Cancel.effects(from)?;
        let changes = effects.set_clause();

        let mut tx = self.pool.begin().await.map_err(|e| {
            tracing::error!("Failed to begin transaction: {:?}", e);
            AppError::Database(e)
        })?;

        let cancelled = sqlx::query_as::<_, ServiceRequest>(&format!(
            r#"
            UPDATE service_requests
            SET {changes}
            WHERE id = $1 AND status = $2
            RETURNING {REQUEST_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(from)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| {
            tracing::error!("Failed to cancel request: {:?}", e);
            AppError::Database(e)
        })?
        .ok_or_else(|| {
            AppError::Conflict("Request was modified concurrently, reload and retry".to_string())
        })?;

        if let (Some(is_available), Some(mechanic_id)) =
            (effects.mechanic_available, cancelled.mechanic_id)
        {
            set_mechanic_availability(&mut tx, mechanic_id, is_available).await?;
        }

        tx.commit().await.map_err(|e| {
            tracing::error!("Failed to commit cancellation: {:?}", e);
            AppError::Database(e)
        })?;

        tracing::info!("Cancelled request {} (was {})", id, from);
        Ok(cancelled)
    }

    /// Move a request to `target` through the lifecycle.
    ///
    /// `assigned` uses `mechanic_id` when given and auto-assignment otherwise.
    pub async fn update_status(
        &self,
        user: &AuthenticatedUser,
        id: Uuid,
        target: RequestStatus,
        mechanic_id: Option<Uuid>,
    ) -> Result<ServiceRequest> {
        match RequestAction::for_target(target) {
            RequestAction::Assign => match mechanic_id {
                Some(mechanic_id) => self.assign(user, id, mechanic_id).await,
                None => {
                    let request = self.auto_assign(user, id).await?;
                    if request.status != RequestStatus::Assigned {
                        return Err(AppError::Conflict(
                            "No mechanic available for this request".to_string(),
                        ));
                    }
                    Ok(request)
                }
            },
            RequestAction::Cancel => self.cancel(user, id).await,
            action => self.apply_mechanic_action(user, id, action).await,
        }
    }
}

/// Request to hand back after auto-assigning a fresh submission, `None` when
/// it changed concurrently and must be reloaded. A failed or fruitless
/// attempt leaves the stored request pending and unassigned.
fn settle_submission(
    request: ServiceRequest,
    outcome: Result<AutoAssignOutcome>,
) -> Option<ServiceRequest> {
    match outcome {
        Ok(AutoAssignOutcome::Assigned(assigned)) => Some(assigned),
        Ok(AutoAssignOutcome::NoMechanicAvailable) => Some(request),
        Ok(AutoAssignOutcome::AlreadyHandled) => None,
        Err(e) => {
            tracing::warn!(
                "Auto-assignment failed for request {}, left pending: {}",
                request.id,
                e
            );
            Some(request)
        }
    }
}

/// Station a request can keep using; deactivated stations need re-routing
fn routable_station(current: Option<&Station>) -> Option<Uuid> {
    current.filter(|s| s.is_active).map(|s| s.id)
}

async fn set_mechanic_availability(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    mechanic_id: Uuid,
    is_available: bool,
) -> Result<()> {
    sqlx::query("UPDATE mechanics SET is_available = $2, updated_at = NOW() WHERE id = $1")
        .bind(mechanic_id)
        .bind(is_available)
        .execute(&mut **tx)
        .await
        .map_err(|e| {
            tracing::error!("Failed to update mechanic availability: {:?}", e);
            AppError::Database(e)
        })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::requests::models::BreakdownType;
    use chrono::Utc;

    fn pending_request() -> ServiceRequest {
        let now = Utc::now();
        ServiceRequest {
            id: Uuid::new_v4(),
            requester_name: "Awa Diop".to_string(),
            requester_phone: "+221 77 000 0000".to_string(),
            requester_email: None,
            breakdown_type: BreakdownType::Battery,
            description: "Won't start".to_string(),
            urgency: 3,
            priority: 4,
            address: "Route de Ouakam".to_string(),
            latitude: 14.72,
            longitude: -17.47,
            vehicle_make: None,
            vehicle_model: None,
            vehicle_plate: None,
            status: RequestStatus::Pending,
            station_id: Some(Uuid::new_v4()),
            mechanic_id: None,
            created_at: now,
            assigned_at: None,
            started_at: None,
            completed_at: None,
            cancelled_at: None,
            updated_at: now,
        }
    }

    fn station(is_active: bool) -> Station {
        let now = Utc::now();
        Station {
            id: Uuid::new_v4(),
            name: "Garage Central".to_string(),
            address: "Plateau".to_string(),
            latitude: 14.67,
            longitude: -17.43,
            phone: None,
            email: None,
            manager_user_id: "manager-1".to_string(),
            is_active,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_submission_stays_pending_without_mechanic() {
        let request = pending_request();
        let id = request.id;

        let settled = settle_submission(request, Ok(AutoAssignOutcome::NoMechanicAvailable))
            .expect("request returned");
        assert_eq!(settled.id, id);
        assert_eq!(settled.status, RequestStatus::Pending);
        assert_eq!(settled.mechanic_id, None);
    }

    #[test]
    fn test_submission_survives_auto_assign_failure() {
        let settled = settle_submission(
            pending_request(),
            Err(AppError::Conflict("boom".to_string())),
        )
        .expect("request returned");
        assert_eq!(settled.status, RequestStatus::Pending);
        assert_eq!(settled.mechanic_id, None);
    }

    #[test]
    fn test_submission_returns_assigned_request() {
        let mechanic_id = Uuid::new_v4();
        let mut assigned = pending_request();
        assigned.status = RequestStatus::Assigned;
        assigned.mechanic_id = Some(mechanic_id);

        let settled =
            settle_submission(pending_request(), Ok(AutoAssignOutcome::Assigned(assigned)))
                .expect("request returned");
        assert_eq!(settled.status, RequestStatus::Assigned);
        assert_eq!(settled.mechanic_id, Some(mechanic_id));
    }

    #[test]
    fn test_concurrently_handled_submission_is_reloaded() {
        let settled = settle_submission(pending_request(), Ok(AutoAssignOutcome::AlreadyHandled));
        assert!(settled.is_none());
    }

    #[test]
    fn test_deactivated_station_needs_rerouting() {
        let active = station(true);
        assert_eq!(routable_station(Some(&active)), Some(active.id));
        assert_eq!(routable_station(Some(&station(false))), None);
        assert_eq!(routable_station(None), None);
    }
}
