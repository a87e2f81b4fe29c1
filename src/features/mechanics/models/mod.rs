mod mechanic;

pub use mechanic::{CreateMechanic, Mechanic};
