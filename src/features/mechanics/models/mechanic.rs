use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use crate::features::geo::GeoPoint;
use crate::features::requests::models::BreakdownType;

/// Database model for a mechanic attached to a station
#[derive(Debug, Clone, FromRow)]
pub struct Mechanic {
    pub id: Uuid,
    pub user_id: String,
    pub station_id: Uuid,
    pub display_name: String,
    pub phone: Option<String>,
    pub specialties: Vec<BreakdownType>,
    pub is_available: bool,
    pub current_latitude: Option<f64>,
    pub current_longitude: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Mechanic {
    /// Last reported live position, when both coordinates are known
    pub fn current_location(&self) -> Option<GeoPoint> {
        match (self.current_latitude, self.current_longitude) {
            (Some(lat), Some(lon)) => Some(GeoPoint::from_stored(lat, lon)),
            _ => None,
        }
    }
}

/// Data for attaching a user to a station as mechanic
#[derive(Debug)]
pub struct CreateMechanic {
    pub user_id: String,
    pub station_id: Uuid,
    pub display_name: String,
    pub phone: Option<String>,
    pub specialties: Vec<BreakdownType>,
}
