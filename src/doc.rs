//! OpenAPI documentation configuration.
//!
//! Generates the OpenAPI specification for the REST API: auth, profile, and
//! item vote endpoints plus the shared error envelope. Swagger UI serves the
//! document in debug builds only.

use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::ErrorCode;
use crate::domain::user::Role;
use crate::domain::vote::{VoteCounters, VoteDirection};
use crate::inbound::http::auth::{
    LoginRequest, LoginResponse, RefreshResponse, SignupRequest, UserResponse,
};
use crate::inbound::http::error::ApiError;
use crate::inbound::http::users::UpdateProfileRequest;

/// Enrich the generated document with the bearer token security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "BearerToken",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Postboard API",
        description = "HTTP interface for account management and item voting."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("BearerToken" = [])),
    paths(
        crate::inbound::http::auth::signup,
        crate::inbound::http::auth::login,
        crate::inbound::http::auth::refresh,
        crate::inbound::http::users::me,
        crate::inbound::http::users::update_me,
        crate::inbound::http::votes::cast_vote,
        crate::inbound::http::votes::remove_item,
    ),
    components(schemas(
        ApiError,
        ErrorCode,
        Role,
        SignupRequest,
        LoginRequest,
        LoginResponse,
        RefreshResponse,
        UserResponse,
        UpdateProfileRequest,
        VoteCounters,
        VoteDirection,
    )),
    tags(
        (name = "auth", description = "Signup, login, and token refresh"),
        (name = "users", description = "Caller profile operations"),
        (name = "items", description = "Item votes and moderation")
    )
)]
pub struct ApiDoc;
