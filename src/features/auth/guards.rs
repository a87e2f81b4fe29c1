//! Role guards as axum extractors.
//!
//! - `RequireAdmin`: admins only (station administration)
//! - `RequireStaff`: admins and station managers (dispatch and oversight)
//! - `RequireMechanic`: mechanics only (working on assigned requests)
//!
//! Finer checks go through `AuthenticatedUser::require(Capability)`.

use crate::core::error::AppError;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::auth::role::Role;
use axum::{extract::FromRequestParts, http::request::Parts};

fn user_with_role(
    parts: &Parts,
    allowed: &[Role],
    denied_message: &str,
) -> Result<AuthenticatedUser, AppError> {
    let user = parts
        .extensions
        .get::<AuthenticatedUser>()
        .ok_or_else(|| AppError::Unauthorized("User not authenticated".to_string()))?;

    if !allowed.contains(&user.role) {
        return Err(AppError::Forbidden(denied_message.to_string()));
    }

    Ok(user.clone())
}

pub struct RequireAdmin(pub AuthenticatedUser);

impl<S> FromRequestParts<S> for RequireAdmin
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        user_with_role(parts, &[Role::Admin], "Admin access required").map(RequireAdmin)
    }
}

pub struct RequireStaff(pub AuthenticatedUser);

impl<S> FromRequestParts<S> for RequireStaff
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        user_with_role(
            parts,
            &[Role::Admin, Role::StationManager],
            "Admin or station manager access required",
        )
        .map(RequireStaff)
    }
}

pub struct RequireMechanic(pub AuthenticatedUser);

impl<S> FromRequestParts<S> for RequireMechanic
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        user_with_role(parts, &[Role::Mechanic], "Mechanic access required").map(RequireMechanic)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts_with(user: Option<AuthenticatedUser>) -> Parts {
        let (mut parts, _) = Request::builder().body(()).unwrap().into_parts();
        if let Some(user) = user {
            parts.extensions.insert(user);
        }
        parts
    }

    #[tokio::test]
    async fn test_missing_user_is_unauthorized() {
        let mut parts = parts_with(None);
        let result = RequireStaff::from_request_parts(&mut parts, &()).await;
        assert!(matches!(result, Err(AppError::Unauthorized(_))));
    }

    #[tokio::test]
    async fn test_staff_guard_accepts_manager_and_rejects_mechanic() {
        let mut manager = parts_with(Some(AuthenticatedUser::new("m", Role::StationManager)));
        assert!(RequireStaff::from_request_parts(&mut manager, &())
            .await
            .is_ok());

        let mut mechanic = parts_with(Some(AuthenticatedUser::new("x", Role::Mechanic)));
        assert!(matches!(
            RequireStaff::from_request_parts(&mut mechanic, &()).await,
            Err(AppError::Forbidden(_))
        ));
    }

    #[tokio::test]
    async fn test_admin_guard_rejects_manager() {
        let mut manager = parts_with(Some(AuthenticatedUser::new("m", Role::StationManager)));
        assert!(matches!(
            RequireAdmin::from_request_parts(&mut manager, &()).await,
            Err(AppError::Forbidden(_))
        ));
    }
}
