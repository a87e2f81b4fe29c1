mod mechanic_load;

pub use mechanic_load::MechanicLoad;
