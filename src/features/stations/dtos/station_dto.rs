use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::core::error::AppError;
use crate::features::geo::GeoPoint;
use crate::features::stations::models::{CreateStation, Station, UpdateStation};

/// Request DTO for registering a station
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateStationDto {
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: String,

    #[validate(length(min = 1, max = 1000, message = "Address must be 1-1000 characters"))]
    pub address: String,

    /// Checked against [-90, 90] when converted into a `GeoPoint`
    pub latitude: f64,

    pub longitude: f64,

    #[validate(regex(
        path = "*crate::shared::validation::PHONE_REGEX",
        message = "Invalid phone number"
    ))]
    pub phone: Option<String>,

    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,

    /// Manager account; only admins may set it, managers register their own station
    pub manager_user_id: Option<String>,
}

impl CreateStationDto {
    pub fn into_create(self, manager_user_id: String) -> Result<CreateStation, AppError> {
        Ok(CreateStation {
            location: GeoPoint::new(self.latitude, self.longitude)?,
            name: self.name,
            address: self.address,
            phone: self.phone,
            email: self.email,
            manager_user_id,
        })
    }
}

/// Request DTO for updating a station
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStationDto {
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: Option<String>,

    #[validate(length(min = 1, max = 1000, message = "Address must be 1-1000 characters"))]
    pub address: Option<String>,

    pub latitude: Option<f64>,

    pub longitude: Option<f64>,

    #[validate(regex(
        path = "*crate::shared::validation::PHONE_REGEX",
        message = "Invalid phone number"
    ))]
    pub phone: Option<String>,

    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
}

impl UpdateStationDto {
    /// Coordinates move together; one without the other is rejected
    pub fn into_update(self) -> Result<UpdateStation, AppError> {
        let location = match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) => Some(GeoPoint::new(lat, lon)?),
            (None, None) => None,
            _ => {
                return Err(AppError::BadRequest(
                    "Latitude and longitude must be updated together".to_string(),
                ))
            }
        };

        Ok(UpdateStation {
            name: self.name,
            address: self.address,
            location,
            phone: self.phone,
            email: self.email,
        })
    }
}

/// Query for the nearest-station lookup
#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct NearestStationQuery {
    /// Latitude in degrees
    pub lat: f64,
    /// Longitude in degrees
    pub lon: f64,
}

/// Response DTO for station
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StationResponseDto {
    pub id: Uuid,
    pub name: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<Station> for StationResponseDto {
    fn from(s: Station) -> Self {
        Self {
            id: s.id,
            name: s.name,
            address: s.address,
            latitude: s.latitude,
            longitude: s.longitude,
            phone: s.phone,
            email: s.email,
            is_active: s.is_active,
            created_at: s.created_at,
        }
    }
}

/// Nearest active station with its great-circle distance
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NearestStationResponseDto {
    pub station: StationResponseDto,
    pub distance_km: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_dto() -> CreateStationDto {
        CreateStationDto {
            name: "Garage Central".to_string(),
            address: "12 Avenue Habib Bourguiba, Tunis".to_string(),
            latitude: 36.8,
            longitude: 10.18,
            phone: Some("+216 71 234 567".to_string()),
            email: Some("contact@garage.tn".to_string()),
            manager_user_id: None,
        }
    }

    #[test]
    fn test_valid_station_passes() {
        assert!(valid_dto().validate().is_ok());
    }

    #[test]
    fn test_empty_name_fails() {
        let mut dto = valid_dto();
        dto.name = String::new();
        let errors = dto.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("name"));
    }

    #[test]
    fn test_out_of_range_coordinates_are_rejected_on_conversion() {
        let mut dto = valid_dto();
        dto.latitude = 91.0;
        let result = dto.into_create("manager-1".to_string());
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[test]
    fn test_update_needs_both_coordinates() {
        let dto = UpdateStationDto {
            latitude: Some(36.0),
            ..Default::default()
        };
        assert!(matches!(dto.into_update(), Err(AppError::BadRequest(_))));

        let dto = UpdateStationDto {
            latitude: Some(36.0),
            longitude: Some(10.0),
            ..Default::default()
        };
        let update = dto.into_update().unwrap();
        assert_eq!(update.location, Some(GeoPoint::from_stored(36.0, 10.0)));
        assert!(update.name.is_none());
    }

    #[test]
    fn test_bad_contact_fails() {
        let mut dto = valid_dto();
        dto.phone = Some("call me".to_string());
        dto.email = Some("nope".to_string());
        let errors = dto.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("phone"));
        assert!(fields.contains_key("email"));
    }
}
