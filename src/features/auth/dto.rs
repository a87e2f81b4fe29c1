use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::model::AuthenticatedUser;
use super::role::{Capability, Role};

/// DTO for /api/auth/me response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MeResponseDto {
    pub sub: String,
    pub role: Role,
    pub capabilities: Vec<Capability>,
}

impl From<AuthenticatedUser> for MeResponseDto {
    fn from(user: AuthenticatedUser) -> Self {
        Self {
            capabilities: user.role.capabilities().to_vec(),
            sub: user.sub,
            role: user.role,
        }
    }
}
