use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use utoipa::ToSchema;
use uuid::Uuid;

use super::BreakdownType;
use crate::features::geo::GeoPoint;

/// Request status enum matching the `request_status` database enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "request_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    Pending,
    Assigned,
    InProgress,
    Completed,
    Cancelled,
}

impl std::fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RequestStatus::Pending => write!(f, "pending"),
            RequestStatus::Assigned => write!(f, "assigned"),
            RequestStatus::InProgress => write!(f, "in_progress"),
            RequestStatus::Completed => write!(f, "completed"),
            RequestStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// Column list shared by every query returning a `ServiceRequest`
pub(crate) const REQUEST_COLUMNS: &str = r#"
    id, requester_name, requester_phone, requester_email,
    breakdown_type, description, urgency, priority,
    address, latitude, longitude,
    vehicle_make, vehicle_model, vehicle_plate,
    status, station_id, mechanic_id,
    created_at, assigned_at, started_at, completed_at, cancelled_at, updated_at
"#;

/// Database model for a breakdown request
#[derive(Debug, Clone, FromRow)]
pub struct ServiceRequest {
    pub id: Uuid,
    pub requester_name: String,
    pub requester_phone: String,
    pub requester_email: Option<String>,
    pub breakdown_type: BreakdownType,
    pub description: String,
    pub urgency: i16,
    pub priority: i16,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    pub vehicle_make: Option<String>,
    pub vehicle_model: Option<String>,
    pub vehicle_plate: Option<String>,
    pub status: RequestStatus,
    pub station_id: Option<Uuid>,
    pub mechanic_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub assigned_at: Option<DateTime<Utc>>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub cancelled_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

impl ServiceRequest {
    pub fn location(&self) -> GeoPoint {
        GeoPoint::from_stored(self.latitude, self.longitude)
    }
}

/// Data for inserting a new request, already validated and prioritised
#[derive(Debug)]
pub struct CreateServiceRequest {
    pub requester_name: String,
    pub requester_phone: String,
    pub requester_email: Option<String>,
    pub breakdown_type: BreakdownType,
    pub description: String,
    pub urgency: i16,
    pub priority: i16,
    pub address: String,
    pub location: GeoPoint,
    pub vehicle_make: Option<String>,
    pub vehicle_model: Option<String>,
    pub vehicle_plate: Option<String>,
    pub station_id: Option<Uuid>,
}
