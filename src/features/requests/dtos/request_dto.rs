use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::features::requests::models::{BreakdownType, RequestStatus, ServiceRequest};
use crate::shared::types::{default_page, default_page_size};

/// Request DTO for submitting a breakdown
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateServiceRequestDto {
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub requester_name: String,

    #[validate(regex(
        path = "*crate::shared::validation::PHONE_REGEX",
        message = "Invalid phone number"
    ))]
    pub requester_phone: String,

    #[validate(email(message = "Invalid email format"))]
    pub requester_email: Option<String>,

    pub breakdown_type: BreakdownType,

    #[validate(length(min = 1, max = 2000, message = "Description must be 1-2000 characters"))]
    pub description: String,

    /// 1 (can wait) to 5 (stranded in danger)
    #[validate(range(min = 1, max = 5, message = "Urgency must be between 1 and 5"))]
    pub urgency: i16,

    #[validate(length(min = 1, max = 1000, message = "Address must be 1-1000 characters"))]
    pub address: String,

    pub latitude: f64,

    pub longitude: f64,

    #[validate(length(max = 100))]
    pub vehicle_make: Option<String>,

    #[validate(length(max = 100))]
    pub vehicle_model: Option<String>,

    #[validate(regex(
        path = "*crate::shared::validation::PLATE_REGEX",
        message = "Invalid plate number"
    ))]
    pub vehicle_plate: Option<String>,
}

/// Manual assignment of a mechanic by a dispatcher
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssignMechanicDto {
    pub mechanic_id: Uuid,
}

/// Generic status change; `mechanicId` only applies when targeting `assigned`
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRequestStatusDto {
    pub status: RequestStatus,
    pub mechanic_id: Option<Uuid>,
}

/// Query params for listing requests
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct RequestListQuery {
    pub status: Option<RequestStatus>,

    #[serde(default = "default_page")]
    #[param(minimum = 1)]
    pub page: i64,

    #[serde(default = "default_page_size")]
    #[param(minimum = 1, maximum = 100)]
    pub page_size: i64,
}

/// Full request view for staff and the assigned mechanic
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ServiceRequestResponseDto {
    pub id: Uuid,
    pub requester_name: String,
    pub requester_phone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requester_email: Option<String>,
    pub breakdown_type: BreakdownType,
    pub description: String,
    pub urgency: i16,
    pub priority: i16,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vehicle_make: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vehicle_model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
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

impl From<ServiceRequest> for ServiceRequestResponseDto {
    fn from(r: ServiceRequest) -> Self {
        Self {
            id: r.id,
            requester_name: r.requester_name,
            requester_phone: r.requester_phone,
            requester_email: r.requester_email,
            breakdown_type: r.breakdown_type,
            description: r.description,
            urgency: r.urgency,
            priority: r.priority,
            address: r.address,
            latitude: r.latitude,
            longitude: r.longitude,
            vehicle_make: r.vehicle_make,
            vehicle_model: r.vehicle_model,
            vehicle_plate: r.vehicle_plate,
            status: r.status,
            station_id: r.station_id,
            mechanic_id: r.mechanic_id,
            created_at: r.created_at,
            assigned_at: r.assigned_at,
            started_at: r.started_at,
            completed_at: r.completed_at,
            cancelled_at: r.cancelled_at,
            updated_at: r.updated_at,
        }
    }
}

/// Public tracking view; carries no requester contact details
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TrackingResponseDto {
    pub id: Uuid,
    pub status: RequestStatus,
    pub breakdown_type: BreakdownType,
    pub priority: i16,
    pub station_id: Option<Uuid>,
    pub mechanic_assigned: bool,
    pub created_at: DateTime<Utc>,
    pub assigned_at: Option<DateTime<Utc>>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub cancelled_at: Option<DateTime<Utc>>,
}

impl From<ServiceRequest> for TrackingResponseDto {
    fn from(r: ServiceRequest) -> Self {
        Self {
            id: r.id,
            status: r.status,
            breakdown_type: r.breakdown_type,
            priority: r.priority,
            station_id: r.station_id,
            mechanic_assigned: r.mechanic_id.is_some(),
            created_at: r.created_at,
            assigned_at: r.assigned_at,
            started_at: r.started_at,
            completed_at: r.completed_at,
            cancelled_at: r.cancelled_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fake::faker::address::en::StreetName;
    use fake::faker::internet::en::SafeEmail;
    use fake::faker::name::en::Name;
    use fake::Fake;

    fn valid_dto() -> CreateServiceRequestDto {
        CreateServiceRequestDto {
            requester_name: Name().fake(),
            requester_phone: "+216 98 765 432".to_string(),
            requester_email: Some(SafeEmail().fake()),
            breakdown_type: BreakdownType::Battery,
            description: "Car will not start, dashboard lights flicker".to_string(),
            urgency: 3,
            address: StreetName().fake(),
            latitude: 36.8,
            longitude: 10.18,
            vehicle_make: Some("Peugeot".to_string()),
            vehicle_model: Some("208".to_string()),
            vehicle_plate: Some("123 TU 4567".to_string()),
        }
    }

    #[test]
    fn test_valid_request_passes() {
        assert!(valid_dto().validate().is_ok());
    }

    #[test]
    fn test_urgency_out_of_range_fails() {
        for urgency in [0, 6] {
            let mut dto = valid_dto();
            dto.urgency = urgency;
            let errors = dto.validate().unwrap_err();
            assert!(errors.field_errors().contains_key("urgency"));
        }
    }

    #[test]
    fn test_bad_phone_and_plate_fail() {
        let mut dto = valid_dto();
        dto.requester_phone = "unknown".to_string();
        dto.vehicle_plate = Some("abc!".to_string());
        let errors = dto.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("requester_phone"));
        assert!(fields.contains_key("vehicle_plate"));
    }

    #[test]
    fn test_breakdown_type_uses_snake_case() {
        let json = serde_json::json!({
            "requesterName": "Amel",
            "requesterPhone": "+21698765432",
            "breakdownType": "transmission",
            "description": "Gear stuck",
            "urgency": 2,
            "address": "Route de Sousse",
            "latitude": 35.8,
            "longitude": 10.6
        });
        let dto: CreateServiceRequestDto = serde_json::from_value(json).unwrap();
        assert_eq!(dto.breakdown_type, BreakdownType::Transmission);
        assert!(dto.requester_email.is_none());
        assert!(dto.validate().is_ok());
    }

    #[test]
    fn test_list_query_defaults() {
        let query: RequestListQuery = serde_json::from_value(serde_json::json!({})).unwrap();
        assert!(query.status.is_none());
        assert_eq!(query.page, 1);
        assert_eq!(query.page_size, crate::shared::constants::DEFAULT_PAGE_SIZE);
    }
}
