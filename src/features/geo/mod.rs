//! Geographic primitives shared by station lookup and mechanic tracking.

mod distance;

pub use distance::{haversine_km, GeoError, GeoPoint};
