//! Role and ban gates layered on top of the bearer session gate.
//!
//! Each protected mutation resolves a fresh [`Principal`] from the user
//! store, so a ban or role change applies to the very next request even
//! though access tokens are stateless. The ban check always runs before the
//! role check; a banned admin is blocked like anyone else.

use tracing::debug;

use crate::domain::DomainError;
use crate::domain::user::{Principal, Role, UserId};
use crate::inbound::http::error::{ApiError, ApiResult};
use crate::inbound::http::state::HttpState;

/// Load the caller's current principal from the user store.
///
/// A token whose subject no longer exists is treated as unauthenticated, not
/// as an internal fault.
pub async fn principal(state: &HttpState, user_id: &UserId) -> ApiResult<Principal> {
    let user = state
        .users
        .find_by_id(user_id)
        .await
        .map_err(|err| ApiError::from(DomainError::internal(err.to_string())))?
        .ok_or_else(|| {
            debug!(user_id = %user_id, "token subject no longer exists");
            ApiError::from(DomainError::unauthorized("Not authenticated."))
        })?;
    Ok(Principal::from_user(&user))
}

/// Resolve the caller and deny banned principals.
pub async fn require_unbanned(state: &HttpState, user_id: &UserId) -> ApiResult<Principal> {
    let principal = principal(state, user_id).await?;
    principal.require_unbanned().map_err(ApiError::from)?;
    Ok(principal)
}

/// Resolve the caller, deny banned principals, then require one of the
/// allowed roles.
pub async fn require_role(
    state: &HttpState,
    user_id: &UserId,
    allowed: &[Role],
) -> ApiResult<Principal> {
    let principal = principal(state, user_id).await?;
    principal
        .require_unbanned()
        .and_then(|p| p.require_role(allowed))
        .map_err(ApiError::from)?;
    Ok(principal)
}
