/// Default page size for pagination
pub const DEFAULT_PAGE_SIZE: i64 = 20;

/// Maximum page size allowed
pub const MAX_PAGE_SIZE: i64 = 100;

// =============================================================================
// DISPATCH CONSTANTS
// =============================================================================

/// Mean Earth radius used by the Haversine formula, in kilometers
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Active (assigned or in-progress) requests a mechanic may hold by default
pub const DEFAULT_MAX_ACTIVE_ASSIGNMENTS: i64 = 2;

/// Lowest urgency that triggers auto-assignment on creation by default
pub const DEFAULT_AUTO_ASSIGN_MIN_URGENCY: i16 = 1;

/// Customer-supplied urgency bounds
pub const MIN_URGENCY: i16 = 1;
pub const MAX_URGENCY: i16 = 5;

/// Upper bound of the derived request priority
pub const MAX_PRIORITY: i16 = 5;
