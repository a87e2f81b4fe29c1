pub mod mechanic_dto;

pub use mechanic_dto::{
    JoinStationDto, MechanicResponseDto, UpdateAvailabilityDto, UpdateLocationDto,
};
