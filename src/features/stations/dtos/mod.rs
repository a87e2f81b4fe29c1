pub mod station_dto;

pub use station_dto::{
    CreateStationDto, NearestStationQuery, NearestStationResponseDto, StationResponseDto,
    UpdateStationDto,
};
