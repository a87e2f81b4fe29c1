use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::features::geo::GeoPoint;
use crate::features::mechanics::models::Mechanic;
use crate::features::requests::models::BreakdownType;

/// Request DTO for a mechanic joining a station
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct JoinStationDto {
    pub station_id: Uuid,

    #[validate(length(min = 1, max = 255, message = "Display name must be 1-255 characters"))]
    pub display_name: String,

    #[validate(regex(
        path = "*crate::shared::validation::PHONE_REGEX",
        message = "Invalid phone number"
    ))]
    pub phone: Option<String>,

    #[serde(default)]
    pub specialties: Vec<BreakdownType>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAvailabilityDto {
    pub is_available: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateLocationDto {
    pub latitude: f64,
    pub longitude: f64,
}

/// Response DTO for mechanic
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MechanicResponseDto {
    pub id: Uuid,
    pub station_id: Uuid,
    pub display_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub specialties: Vec<BreakdownType>,
    pub is_available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_location: Option<GeoPoint>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Mechanic> for MechanicResponseDto {
    fn from(m: Mechanic) -> Self {
        Self {
            current_location: m.current_location(),
            id: m.id,
            station_id: m.station_id,
            display_name: m.display_name,
            phone: m.phone,
            specialties: m.specialties,
            is_available: m.is_available,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_specialties_default_to_empty() {
        let dto: JoinStationDto = serde_json::from_value(serde_json::json!({
            "stationId": Uuid::nil(),
            "displayName": "Karim"
        }))
        .unwrap();
        assert!(dto.specialties.is_empty());
        assert!(dto.validate().is_ok());
    }

    #[test]
    fn test_specialties_parse_breakdown_tags() {
        let dto: JoinStationDto = serde_json::from_value(serde_json::json!({
            "stationId": Uuid::nil(),
            "displayName": "Karim",
            "specialties": ["brakes", "engine"]
        }))
        .unwrap();
        assert_eq!(
            dto.specialties,
            vec![BreakdownType::Brakes, BreakdownType::Engine]
        );
    }

    #[test]
    fn test_blank_display_name_fails() {
        let dto = JoinStationDto {
            station_id: Uuid::nil(),
            display_name: String::new(),
            phone: None,
            specialties: vec![],
        };
        assert!(dto.validate().is_err());
    }
}
