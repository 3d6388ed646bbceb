//! Bearer-token session gate.
//!
//! Extracting [`Bearer`] from a request authenticates the caller: the access
//! token from the `Authorization` header is verified against the access
//! secret and its subject becomes the caller's identity. Missing, malformed,
//! and invalid tokens are logged distinctly but all answer with the same
//! denial; the token payload itself is never logged.

use actix_web::dev::Payload;
use actix_web::http::header;
use actix_web::{FromRequest, HttpRequest, web};
use futures_util::future::{Ready, ready};
use tracing::debug;

use crate::domain::DomainError;
use crate::domain::user::UserId;
use crate::inbound::http::error::ApiError;
use crate::inbound::http::state::HttpState;

/// Authenticated caller identity proven by an access token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bearer {
    pub user_id: UserId,
}

fn denied() -> ApiError {
    ApiError::from(DomainError::unauthorized("Not authenticated."))
}

fn extract(req: &HttpRequest) -> Result<Bearer, ApiError> {
    let state = req
        .app_data::<web::Data<HttpState>>()
        .ok_or_else(|| ApiError::from(DomainError::internal("HTTP state not configured")))?;

    let Some(value) = req.headers().get(header::AUTHORIZATION) else {
        debug!("authorization header missing");
        return Err(denied());
    };
    let Ok(value) = value.to_str() else {
        debug!("authorization header is not valid ASCII");
        return Err(denied());
    };
    let Some(token) = value.strip_prefix("Bearer ") else {
        debug!("authorization header is not a bearer scheme");
        return Err(denied());
    };

    match state.tokens.verify_access(token) {
        Ok(user_id) => Ok(Bearer { user_id }),
        Err(rejection) => {
            debug!(reason = %rejection, "access token rejected");
            Err(denied())
        }
    }
}

impl FromRequest for Bearer {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(extract(req))
    }
}
