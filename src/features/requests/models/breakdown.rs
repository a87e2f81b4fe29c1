use serde::{Deserialize, Serialize};
use sqlx::Type;
use utoipa::ToSchema;

/// Category of vehicle fault, matching the `breakdown_type` database enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "breakdown_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum BreakdownType {
    Mechanical,
    Electrical,
    Tire,
    Battery,
    Engine,
    Transmission,
    Brakes,
    Other,
}

impl BreakdownType {
    /// Priority bonus for faults that leave the vehicle unsafe or immobile
    pub fn criticality(self) -> i16 {
        match self {
            BreakdownType::Engine | BreakdownType::Brakes => 2,
            BreakdownType::Transmission | BreakdownType::Electrical | BreakdownType::Battery => 1,
            BreakdownType::Mechanical | BreakdownType::Tire | BreakdownType::Other => 0,
        }
    }
}

impl std::fmt::Display for BreakdownType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            BreakdownType::Mechanical => "mechanical",
            BreakdownType::Electrical => "electrical",
            BreakdownType::Tire => "tire",
            BreakdownType::Battery => "battery",
            BreakdownType::Engine => "engine",
            BreakdownType::Transmission => "transmission",
            BreakdownType::Brakes => "brakes",
            BreakdownType::Other => "other",
        };
        f.write_str(name)
    }
}
