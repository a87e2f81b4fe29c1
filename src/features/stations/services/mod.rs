mod nearest_station;
mod station_service;

pub use nearest_station::{nearest_station, NearestStation};
pub use station_service::StationService;
