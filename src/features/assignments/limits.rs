//! Per-mechanic capacity gate.
//!
//! A mechanic can receive more work iff it is available and holds fewer
//! active requests than the cap. Requests beyond the cap stay pending until
//! a mechanic drops below it.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::features::assignments::models::MechanicLoad;

pub fn can_receive_more(active_count: i64, is_available: bool, max_active: i64) -> bool {
    is_available && active_count < max_active
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MechanicCapacity {
    pub mechanic_id: Uuid,
    pub station_id: Uuid,
    pub display_name: String,
    pub is_available: bool,
    pub active_count: i64,
    pub max_active: i64,
    pub can_receive_more: bool,
}

impl MechanicCapacity {
    pub fn evaluate(load: &MechanicLoad, max_active: i64) -> Self {
        Self {
            mechanic_id: load.mechanic_id,
            station_id: load.station_id,
            display_name: load.display_name.clone(),
            is_available: load.is_available,
            active_count: load.active_count,
            max_active,
            can_receive_more: can_receive_more(load.active_count, load.is_available, max_active),
        }
    }

    pub fn is_at_capacity(&self) -> bool {
        self.active_count >= self.max_active
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentLimitSummary {
    pub total_mechanics: i64,
    pub at_capacity: i64,
    pub can_take_more: i64,
    pub max_active: i64,
}

pub fn summarize(capacities: &[MechanicCapacity], max_active: i64) -> AssignmentLimitSummary {
    let count = |pred: fn(&MechanicCapacity) -> bool| {
        capacities.iter().filter(|c| pred(c)).count() as i64
    };

    AssignmentLimitSummary {
        total_mechanics: capacities.len() as i64,
        at_capacity: count(MechanicCapacity::is_at_capacity),
        can_take_more: count(|c| c.can_receive_more),
        max_active,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn load(active_count: i64, is_available: bool) -> MechanicLoad {
        MechanicLoad {
            mechanic_id: Uuid::new_v4(),
            station_id: Uuid::nil(),
            display_name: "mechanic".to_string(),
            is_available,
            active_count,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_two_active_requests_is_not_eligible_even_if_available() {
        let capacity = MechanicCapacity::evaluate(&load(2, true), 2);
        assert!(!capacity.can_receive_more);
        assert!(capacity.is_at_capacity());
    }

    #[test]
    fn test_one_active_request_and_available_is_eligible() {
        let capacity = MechanicCapacity::evaluate(&load(1, true), 2);
        assert!(capacity.can_receive_more);
        assert_eq!(capacity.max_active, 2);
        assert_eq!(capacity.active_count, 1);
    }

    #[test]
    fn test_unavailable_mechanic_is_not_eligible() {
        let capacity = MechanicCapacity::evaluate(&load(0, false), 2);
        assert!(!capacity.can_receive_more);
        assert!(!capacity.is_at_capacity());
    }

    #[test]
    fn test_cap_is_injectable() {
        assert!(can_receive_more(2, true, 3));
        assert!(!can_receive_more(1, true, 1));
    }

    #[test]
    fn test_summary_counts() {
        let capacities: Vec<_> = [load(2, true), load(1, true), load(0, false), load(3, false)]
            .iter()
            .map(|l| MechanicCapacity::evaluate(l, 2))
            .collect();

        assert_eq!(
            summarize(&capacities, 2),
            AssignmentLimitSummary {
                total_mechanics: 4,
                at_capacity: 2,
                can_take_more: 1,
                max_active: 2,
            }
        );
    }

    #[test]
    fn test_empty_summary() {
        let summary = summarize(&[], 2);
        assert_eq!(summary.total_mechanics, 0);
        assert_eq!(summary.can_take_more, 0);
    }
}
