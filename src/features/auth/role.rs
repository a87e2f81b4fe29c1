//! Closed role set and the capability table that gates every route.
//!
//! A user carries at most one role. Tokens without a recognised role are
//! treated as customers, who may only submit and track requests.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    StationManager,
    Mechanic,
    Customer,
}

/// Actions a role may perform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    SubmitRequests,
    RegisterStation,
    ManageStations,
    ViewAllRequests,
    ViewStationRequests,
    AssignMechanics,
    CancelRequests,
    ManageMechanics,
    ViewAssignmentLimits,
    JoinStation,
    WorkRequests,
}

const ADMIN_CAPABILITIES: &[Capability] = &[
    Capability::SubmitRequests,
    Capability::RegisterStation,
    Capability::ManageStations,
    Capability::ViewAllRequests,
    Capability::ViewStationRequests,
    Capability::AssignMechanics,
    Capability::CancelRequests,
    Capability::ManageMechanics,
    Capability::ViewAssignmentLimits,
];

const STATION_MANAGER_CAPABILITIES: &[Capability] = &[
    Capability::SubmitRequests,
    Capability::RegisterStation,
    Capability::ViewStationRequests,
    Capability::AssignMechanics,
    Capability::CancelRequests,
    Capability::ManageMechanics,
    Capability::ViewAssignmentLimits,
];

const MECHANIC_CAPABILITIES: &[Capability] = &[
    Capability::SubmitRequests,
    Capability::JoinStation,
    Capability::WorkRequests,
];

const CUSTOMER_CAPABILITIES: &[Capability] = &[Capability::SubmitRequests];

impl Role {
    /// Parses a single role claim value
    pub fn from_claim(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "admin" => Some(Role::Admin),
            "station_manager" => Some(Role::StationManager),
            "mechanic" => Some(Role::Mechanic),
            "customer" => Some(Role::Customer),
            _ => None,
        }
    }

    /// First recognised role in the claim list, customer otherwise
    pub fn from_claims(values: &[String]) -> Self {
        values
            .iter()
            .find_map(|v| Self::from_claim(v))
            .unwrap_or(Role::Customer)
    }

    pub fn capabilities(self) -> &'static [Capability] {
        match self {
            Role::Admin => ADMIN_CAPABILITIES,
            Role::StationManager => STATION_MANAGER_CAPABILITIES,
            Role::Mechanic => MECHANIC_CAPABILITIES,
            Role::Customer => CUSTOMER_CAPABILITIES,
        }
    }

    pub fn can(self, capability: Capability) -> bool {
        self.capabilities().contains(&capability)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::StationManager => "station_manager",
            Role::Mechanic => "mechanic",
            Role::Customer => "customer",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
