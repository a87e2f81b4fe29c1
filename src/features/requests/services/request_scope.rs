use uuid::Uuid;

use crate::features::requests::models::ServiceRequest;

/// Which requests an authenticated staff member or mechanic may see
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestScope {
    All,
    Station(Uuid),
    Mechanic(Uuid),
}

impl RequestScope {
    pub fn allows(&self, request: &ServiceRequest) -> bool {
        match self {
            RequestScope::All => true,
            RequestScope::Station(id) => request.station_id == Some(*id),
            RequestScope::Mechanic(id) => request.mechanic_id == Some(*id),
        }
    }

    /// `(station_id, mechanic_id)` filters for list queries
    pub fn filters(&self) -> (Option<Uuid>, Option<Uuid>) {
        match self {
            RequestScope::All => (None, None),
            RequestScope::Station(id) => (Some(*id), None),
            RequestScope::Mechanic(id) => (None, Some(*id)),
        }
    }

    /// Dispatchers manage requests; mechanics only work on them
    pub fn is_dispatcher(&self) -> bool {
        !matches!(self, RequestScope::Mechanic(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::requests::models::{BreakdownType, RequestStatus};
    use chrono::Utc;

    fn request(station_id: Option<Uuid>, mechanic_id: Option<Uuid>) -> ServiceRequest {
        let now = Utc::now();
        ServiceRequest {
            id: Uuid::new_v4(),
            requester_name: "Driver".to_string(),
            requester_phone: "+21600000000".to_string(),
            requester_email: None,
            breakdown_type: BreakdownType::Tire,
            description: "Flat tire".to_string(),
            urgency: 2,
            priority: 2,
            address: "A1 km 42".to_string(),
            latitude: 36.0,
            longitude: 10.0,
            vehicle_make: None,
            vehicle_model: None,
            vehicle_plate: None,
            status: RequestStatus::Assigned,
            station_id,
            mechanic_id,
            created_at: now,
            assigned_at: Some(now),
            started_at: None,
            completed_at: None,
            cancelled_at: None,
            updated_at: now,
        }
    }

    #[test]
    fn test_station_scope_only_sees_its_station() {
        let station = Uuid::new_v4();
        let scope = RequestScope::Station(station);
        assert!(scope.allows(&request(Some(station), None)));
        assert!(!scope.allows(&request(Some(Uuid::new_v4()), None)));
        assert!(!scope.allows(&request(None, None)));
    }

    #[test]
    fn test_mechanic_scope_only_sees_own_assignments() {
        let mechanic = Uuid::new_v4();
        let scope = RequestScope::Mechanic(mechanic);
        assert!(scope.allows(&request(None, Some(mechanic))));
        assert!(!scope.allows(&request(None, Some(Uuid::new_v4()))));
        assert!(!scope.is_dispatcher());
    }

    #[test]
    fn test_filters() {
        let id = Uuid::new_v4();
        assert_eq!(RequestScope::All.filters(), (None, None));
        assert_eq!(RequestScope::Station(id).filters(), (Some(id), None));
        assert_eq!(RequestScope::Mechanic(id).filters(), (None, Some(id)));
    }
}
