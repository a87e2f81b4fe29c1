use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::features::assignments::limits::{AssignmentLimitSummary, MechanicCapacity};

/// Query params for the assignment-limits view
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentLimitsQuery {
    /// Restrict to one station (admins only; managers always see their own)
    pub station_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentLimitsResponseDto {
    pub mechanics: Vec<MechanicCapacity>,
    pub summary: AssignmentLimitSummary,
    /// Mechanic auto-assignment would pick next, if any
    pub next_mechanic_id: Option<Uuid>,
}
