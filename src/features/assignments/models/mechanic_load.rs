use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// A mechanic together with the number of assigned or in-progress requests it holds
#[derive(Debug, Clone, FromRow)]
pub struct MechanicLoad {
    pub mechanic_id: Uuid,
    pub station_id: Uuid,
    pub display_name: String,
    pub is_available: bool,
    pub active_count: i64,
    pub created_at: DateTime<Utc>,
}
