//! Mechanic selection for auto-assignment.
//!
//! Policy: among the station's mechanics that can receive more work, the one
//! that joined the station first is tried first (`created_at`, then `id`).

use super::limits::can_receive_more;
use crate::features::assignments::models::MechanicLoad;

/// Eligible mechanics in the order auto-assignment should try them
pub fn fifo_candidates(loads: &[MechanicLoad], max_active: i64) -> Vec<&MechanicLoad> {
    let mut candidates: Vec<&MechanicLoad> = loads
        .iter()
        .filter(|l| can_receive_more(l.active_count, l.is_available, max_active))
        .collect();
    candidates.sort_by_key(|l| (l.created_at, l.mechanic_id));
    candidates
}

pub fn select_mechanic(loads: &[MechanicLoad], max_active: i64) -> Option<&MechanicLoad> {
    fifo_candidates(loads, max_active).into_iter().next()
}
