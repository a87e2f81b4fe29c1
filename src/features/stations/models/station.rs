use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use crate::features::geo::GeoPoint;

/// Database model for a service station
#[derive(Debug, Clone, FromRow)]
pub struct Station {
    pub id: Uuid,
    pub name: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub manager_user_id: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Station {
    pub fn location(&self) -> GeoPoint {
        GeoPoint::from_stored(self.latitude, self.longitude)
    }

    pub fn is_managed_by(&self, user_id: &str) -> bool {
        self.manager_user_id == user_id
    }
}

/// Data for creating a station
#[derive(Debug)]
pub struct CreateStation {
    pub name: String,
    pub address: String,
    pub location: GeoPoint,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub manager_user_id: String,
}

/// Partial update; `None` keeps the stored value
#[derive(Debug, Default)]
pub struct UpdateStation {
    pub name: Option<String>,
    pub address: Option<String>,
    pub location: Option<GeoPoint>,
    pub phone: Option<String>,
    pub email: Option<String>,
}
