use super::jwks::JwksClient;
use super::model::{AuthenticatedUser, RoleClaims};
use super::role::Role;
use crate::core::error::AppError;
use jsonwebtoken::{decode, decode_header, Algorithm, Validation};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

pub struct JwtValidator {
    jwks_client: Arc<JwksClient>,
    issuer: String,
    audience: String,
    leeway: u64,
}

#[derive(Debug, Clone, Deserialize)]
struct Claims {
    sub: String,
    // Standard claims are checked by jsonwebtoken; kept here so the shape is explicit
    #[serde(rename = "iss")]
    _iss: String,
    #[serde(rename = "exp")]
    _exp: u64,

    #[serde(rename = "https://ntouks.app/claims", default)]
    role_claims: Option<RoleClaims>,
}

impl Claims {
    fn into_user(self) -> AuthenticatedUser {
        let role = self
            .role_claims
            .as_ref()
            .map(|c| Role::from_claims(&c.roles))
            .unwrap_or(Role::Customer);
        AuthenticatedUser::new(self.sub, role)
    }
}

impl JwtValidator {
    pub fn new(
        jwks_client: Arc<JwksClient>,
        issuer: String,
        audience: String,
        leeway: Duration,
    ) -> Self {
        Self {
            jwks_client,
            issuer,
            audience,
            leeway: leeway.as_secs(),
        }
    }

    pub async fn validate_token(&self, token: &str) -> Result<AuthenticatedUser, AppError> {
        let header = decode_header(token).map_err(|e| AppError::Auth(e.to_string()))?;

        if header.alg != Algorithm::RS256 {
            return Err(AppError::Auth(format!(
                "Unsupported algorithm: {:?}. Only RS256 is allowed",
                header.alg
            )));
        }

        let kid = header
            .kid
            .ok_or_else(|| AppError::Auth("Missing kid in token header".to_string()))?;

        let decoding_key = self
            .jwks_client
            .get_key(&kid)
            .await
            .map_err(|e| AppError::Auth(e.to_string()))?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_issuer(&[&self.issuer]);
        validation.set_audience(&[&self.audience]);
        validation.leeway = self.leeway;
        validation.validate_nbf = true;

        let token_data = decode::<Claims>(token, &decoding_key, &validation)
            .map_err(|e| AppError::Auth(e.to_string()))?;

        Ok(token_data.claims.into_user())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claims_map_to_role() {
        let claims: Claims = serde_json::from_value(serde_json::json!({
            "sub": "user-42",
            "iss": "https://auth.example.com",
            "exp": 4_102_444_800u64,
            "https://ntouks.app/claims": { "roles": ["station_manager"] }
        }))
        .unwrap();

        let user = claims.into_user();
        assert_eq!(user.sub, "user-42");
        assert_eq!(user.role, Role::StationManager);
    }

    #[test]
    fn test_missing_role_claims_mean_customer() {
        let claims: Claims = serde_json::from_value(serde_json::json!({
            "sub": "user-7",
            "iss": "https://auth.example.com",
            "exp": 4_102_444_800u64
        }))
        .unwrap();

        assert_eq!(claims.into_user().role, Role::Customer);
    }

    #[tokio::test]
    async fn test_garbage_token_is_rejected() {
        let validator = JwtValidator::new(
            Arc::new(JwksClient::new(
                "http://127.0.0.1:9/oidc",
                Duration::from_secs(60),
            )),
            "issuer".to_string(),
            "audience".to_string(),
            Duration::from_secs(0),
        );

        let result = validator.validate_token("not-a-jwt").await;
        assert!(matches!(result, Err(AppError::Auth(_))));
    }
}
