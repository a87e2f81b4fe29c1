use crate::features::requests::models::BreakdownType;
use crate::shared::constants::{MAX_PRIORITY, MAX_URGENCY, MIN_URGENCY};

/// Dispatch priority: urgency plus the fault's criticality, capped at `MAX_PRIORITY`
pub fn compute_priority(urgency: i16, breakdown_type: BreakdownType) -> i16 {
    let urgency = urgency.clamp(MIN_URGENCY, MAX_URGENCY);
    (urgency + breakdown_type.criticality()).min(MAX_PRIORITY)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_critical_fault_raises_priority() {
        assert_eq!(compute_priority(2, BreakdownType::Tire), 2);
        assert_eq!(compute_priority(2, BreakdownType::Battery), 3);
        assert_eq!(compute_priority(2, BreakdownType::Brakes), 4);
    }

    #[test]
    fn test_priority_is_capped() {
        assert_eq!(compute_priority(5, BreakdownType::Engine), MAX_PRIORITY);
        assert_eq!(compute_priority(4, BreakdownType::Engine), MAX_PRIORITY);
    }

    #[test]
    fn test_out_of_range_urgency_is_clamped() {
        assert_eq!(compute_priority(0, BreakdownType::Other), 1);
        assert_eq!(compute_priority(9, BreakdownType::Other), 5);
    }
}
