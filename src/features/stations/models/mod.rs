mod station;

pub use station::{CreateStation, Station, UpdateStation};
