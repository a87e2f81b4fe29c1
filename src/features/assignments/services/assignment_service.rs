use sqlx::PgPool;
use uuid::Uuid;

use crate::core::config::DispatchConfig;
use crate::core::error::{AppError, Result};
use crate::features::assignments::dtos::AssignmentLimitsResponseDto;
use crate::features::assignments::limits::{summarize, MechanicCapacity};
use crate::features::assignments::models::MechanicLoad;
use crate::features::assignments::selection::{fifo_candidates, select_mechanic};
use crate::features::requests::lifecycle::RequestAction;
use crate::features::requests::models::{RequestStatus, ServiceRequest, REQUEST_COLUMNS};

/// Result of one conditional assignment attempt
#[derive(Debug)]
pub enum AssignAttempt {
    Assigned(ServiceRequest),
    /// The mechanic was deleted after being picked
    MechanicNotFound,
    MechanicUnavailable,
    AtCapacity,
    /// The request was assigned, cancelled or otherwise moved on concurrently
    RequestNotPending,
}

impl AssignAttempt {
    /// Whether auto-assignment moves on to the next candidate after this attempt
    pub fn skips_candidate(&self) -> bool {
        matches!(
            self,
            AssignAttempt::MechanicNotFound
                | AssignAttempt::MechanicUnavailable
                | AssignAttempt::AtCapacity
        )
    }
}

/// Result of auto-assignment; none of these are failures
#[derive(Debug)]
pub enum AutoAssignOutcome {
    Assigned(ServiceRequest),
    NoMechanicAvailable,
    AlreadyHandled,
}

/// Per-mechanic active load; mechanics of deactivated stations are left out
const MECHANIC_LOADS_QUERY: &str = r#"
    SELECT
        m.id AS mechanic_id,
        m.station_id,
        m.display_name,
        m.is_available,
        m.created_at,
        COUNT(r.id) AS active_count
    FROM mechanics m
    JOIN stations s ON s.id = m.station_id AND s.is_active = TRUE
    LEFT JOIN service_requests r
        ON r.mechanic_id = m.id
        AND r.status IN ('assigned', 'in_progress')
    WHERE ($1::uuid IS NULL OR m.station_id = $1)
    GROUP BY m.id
    ORDER BY m.created_at ASC, m.id ASC
"#;

/// Mechanic matching and capacity enforcement
pub struct AssignmentService {
    pool: PgPool,
    config: DispatchConfig,
}

impl AssignmentService {
    pub fn new(pool: PgPool, config: DispatchConfig) -> Self {
        Self { pool, config }
    }

    pub fn max_active(&self) -> i64 {
        self.config.max_active_assignments
    }

    /// Mechanics with their active request counts, oldest first
    pub async fn mechanic_loads(&self, station_id: Option<Uuid>) -> Result<Vec<MechanicLoad>> {
        sqlx::query_as::<_, MechanicLoad>(MECHANIC_LOADS_QUERY)
            .bind(station_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to load mechanic workloads: {:?}", e);
                AppError::Database(e)
            })
    }

    /// Capacity of every mechanic (optionally of one station) plus a summary
    pub async fn assignment_limits(
        &self,
        station_id: Option<Uuid>,
    ) -> Result<AssignmentLimitsResponseDto> {
        let max_active = self.max_active();
        let loads = self.mechanic_loads(station_id).await?;
        let mechanics: Vec<MechanicCapacity> = loads
            .iter()
            .map(|load| MechanicCapacity::evaluate(load, max_active))
            .collect();
        let summary = summarize(&mechanics, max_active);
        let next_mechanic_id = select_mechanic(&loads, max_active).map(|l| l.mechanic_id);

        Ok(AssignmentLimitsResponseDto {
            mechanics,
            summary,
            next_mechanic_id,
        })
    }

    /// Assign `mechanic_id` to a pending request if the mechanic is still
    /// available and under the cap.
    ///
    /// The mechanic row is locked for the duration of the check and the
    /// request update only matches a pending, unassigned request, so two
    /// concurrent attempts cannot both push a mechanic over the cap or both
    /// claim the same request.
    pub async fn try_assign(&self, request_id: Uuid, mechanic_id: Uuid) -> Result<AssignAttempt> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            tracing::error!("Failed to begin assignment transaction: {:?}", e);
            AppError::Database(e)
        })?;

        let Some(is_available) = sqlx::query_scalar::<_, bool>(
            "SELECT is_available FROM mechanics WHERE id = $1 FOR UPDATE",
        )
        .bind(mechanic_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| {
            tracing::error!("Failed to lock mechanic: {:?}", e);
            AppError::Database(e)
        })?
        else {
            return Ok(AssignAttempt::MechanicNotFound);
        };

        if !is_available {
            return Ok(AssignAttempt::MechanicUnavailable);
        }

        let active_count = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM service_requests
            WHERE mechanic_id = $1 AND status IN ('assigned', 'in_progress')
            "#,
        )
        .bind(mechanic_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            tracing::error!("Failed to count active requests: {:?}", e);
            AppError::Database(e)
        })?;

        if active_count >= self.max_active() {
            return Ok(AssignAttempt::AtCapacity);
        }

        let changes = RequestAction::Assign
            .effects(RequestStatus::Pending)?
            .set_clause();
        let assigned = sqlx::query_as::<_, ServiceRequest>(&format!(
            r#"
            UPDATE service_requests
            SET
                {changes},
                mechanic_id = $2,
                station_id = COALESCE(station_id, (SELECT station_id FROM mechanics WHERE id = $2))
            WHERE id = $1 AND status = 'pending' AND mechanic_id IS NULL
            RETURNING {REQUEST_COLUMNS}
            "#
        ))
        .bind(request_id)
        .bind(mechanic_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| {
            tracing::error!("Failed to assign request: {:?}", e);
            AppError::Database(e)
        })?;

        let Some(request) = assigned else {
            return Ok(AssignAttempt::RequestNotPending);
        };

        tx.commit().await.map_err(|e| {
            tracing::error!("Failed to commit assignment: {:?}", e);
            AppError::Database(e)
        })?;

        tracing::info!(
            "Assigned request {} to mechanic {} ({} active before)",
            request_id,
            mechanic_id,
            active_count
        );

        Ok(AssignAttempt::Assigned(request))
    }

    /// Assign the first eligible mechanic of the station in FIFO order.
    ///
    /// A candidate that was deleted, went off duty or filled up between the
    /// load and the locked check is skipped in favour of the next one.
    pub async fn auto_assign(&self, request_id: Uuid, station_id: Uuid) -> Result<AutoAssignOutcome> {
        let loads = self.mechanic_loads(Some(station_id)).await?;
        let candidates = fifo_candidates(&loads, self.max_active());

        if candidates.is_empty() {
            tracing::info!(
                "No mechanic available at station {} for request {}",
                station_id,
                request_id
            );
            return Ok(AutoAssignOutcome::NoMechanicAvailable);
        }

        for candidate in candidates {
            let attempt = self.try_assign(request_id, candidate.mechanic_id).await?;
            if attempt.skips_candidate() {
                tracing::debug!(
                    "Mechanic {} lost eligibility while assigning {}: {:?}",
                    candidate.mechanic_id,
                    request_id,
                    attempt
                );
                continue;
            }

            return Ok(match attempt {
                AssignAttempt::Assigned(request) => AutoAssignOutcome::Assigned(request),
                _ => {
                    tracing::debug!("Request {} no longer pending, skipping", request_id);
                    AutoAssignOutcome::AlreadyHandled
                }
            });
        }

        tracing::info!(
            "All candidates at station {} became ineligible for request {}",
            station_id,
            request_id
        );
        Ok(AutoAssignOutcome::NoMechanicAvailable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lost_candidates_are_skipped() {
        assert!(AssignAttempt::MechanicNotFound.skips_candidate());
        assert!(AssignAttempt::MechanicUnavailable.skips_candidate());
        assert!(AssignAttempt::AtCapacity.skips_candidate());
        assert!(!AssignAttempt::RequestNotPending.skips_candidate());
    }

    #[test]
    fn test_loads_ignore_deactivated_stations() {
        assert!(MECHANIC_LOADS_QUERY
            .contains("JOIN stations s ON s.id = m.station_id AND s.is_active = TRUE"));
        assert!(!MECHANIC_LOADS_QUERY.contains("LEFT JOIN stations"));
    }
}
