//! Auth API handlers.
//!
//! ```text
//! POST /auth/signup  {"name":"Ada","email":"ada@example.com","password":"..."}
//! POST /auth/login   {"email":"ada@example.com","password":"..."}
//! POST /auth/refresh (refresh cookie)
//! ```
//!
//! The access token travels in the response body and subsequent
//! `Authorization` headers; the refresh token only ever travels in an
//! http-only, same-site cookie.

use actix_web::cookie::time::Duration as CookieDuration;
use actix_web::cookie::{Cookie, SameSite};
use actix_web::{HttpRequest, HttpResponse, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;

use crate::domain::DomainError;
use crate::domain::auth::{CredentialValidationError, LoginCredentials, SignupDetails};
use crate::domain::user::{Role, User, UserValidationError};
use crate::inbound::http::error::{ApiError, ApiResult};
use crate::inbound::http::state::HttpState;

/// Name of the refresh-token cookie.
pub const REFRESH_COOKIE: &str = "refreshToken";

/// Signup request body.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    /// Optional role; defaults to `USER`.
    #[serde(default)]
    pub role: Option<String>,
}

/// Login request body.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Public view of a user account. Never carries the password hash.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub is_banned: bool,
    pub bio: String,
    pub avatar: String,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
            name: user.name.to_string(),
            email: user.email.to_string(),
            role: user.role,
            is_banned: user.is_banned,
            bio: user.bio.clone(),
            avatar: user.avatar.clone(),
        }
    }
}

/// Login response body.
#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub access_token: String,
    pub user: UserResponse,
}

/// Refresh response body.
#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RefreshResponse {
    pub access_token: String,
}

fn refresh_cookie(state: &HttpState, token: String) -> Cookie<'static> {
    let max_age = state.tokens.refresh_ttl().as_secs();
    Cookie::build(REFRESH_COOKIE, token)
        .path("/")
        .http_only(true)
        .same_site(SameSite::Strict)
        .secure(state.cookies.secure)
        .max_age(CookieDuration::seconds(
            i64::try_from(max_age).unwrap_or(i64::MAX),
        ))
        .finish()
}

fn map_credential_error(err: CredentialValidationError) -> DomainError {
    let field = match &err {
        CredentialValidationError::EmptyPassword
        | CredentialValidationError::PasswordTooShort { .. } => "password",
        CredentialValidationError::User(user_err) => match user_err {
            UserValidationError::EmptyDisplayName
            | UserValidationError::DisplayNameTooLong { .. } => "name",
            UserValidationError::EmptyEmail | UserValidationError::InvalidEmail => "email",
            UserValidationError::UnknownRole { .. } => "role",
            _ => "user",
        },
    };
    DomainError::invalid_request(err.to_string()).with_details(json!({ "field": field }))
}

/// Register a new account.
#[utoipa::path(
    post,
    path = "/auth/signup",
    request_body = SignupRequest,
    responses(
        (status = 200, description = "Account created", body = UserResponse),
        (status = 400, description = "Validation failure or duplicate email", body = ApiError),
        (status = 500, description = "Internal server error", body = ApiError)
    ),
    tags = ["auth"],
    operation_id = "signup",
    security([])
)]
#[post("/signup")]
pub async fn signup(
    state: web::Data<HttpState>,
    payload: web::Json<SignupRequest>,
) -> ApiResult<web::Json<UserResponse>> {
    let body = payload.into_inner();
    let details =
        SignupDetails::try_from_parts(&body.name, &body.email, &body.password, body.role.as_deref())
            .map_err(map_credential_error)?;
    let user = state.auth.signup(details).await?;
    Ok(web::Json(UserResponse::from(&user)))
}

/// Verify credentials and establish a session.
///
/// The refresh token is set as an http-only cookie so browser scripts never
/// see it.
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = LoginResponse,
            headers(("Set-Cookie" = String, description = "Refresh token cookie"))),
        (status = 400, description = "Invalid request or credentials", body = ApiError),
        (status = 500, description = "Internal server error", body = ApiError)
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    payload: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    let body = payload.into_inner();
    let credentials = LoginCredentials::try_from_parts(&body.email, &body.password)
        .map_err(map_credential_error)?;
    let (pair, user) = state.auth.login(credentials).await?;
    let cookie = refresh_cookie(&state, pair.refresh_token);
    Ok(HttpResponse::Ok().cookie(cookie).json(LoginResponse {
        access_token: pair.access_token,
        user: UserResponse::from(&user),
    }))
}

/// Exchange the refresh cookie for a fresh access token and cookie.
#[utoipa::path(
    post,
    path = "/auth/refresh",
    responses(
        (status = 200, description = "Fresh access token", body = RefreshResponse,
            headers(("Set-Cookie" = String, description = "Rotated refresh token cookie"))),
        (status = 403, description = "Missing or invalid refresh token", body = ApiError),
        (status = 500, description = "Internal server error", body = ApiError)
    ),
    tags = ["auth"],
    operation_id = "refresh",
    security([])
)]
#[post("/refresh")]
pub async fn refresh(state: web::Data<HttpState>, req: HttpRequest) -> ApiResult<HttpResponse> {
    let cookie = req.cookie(REFRESH_COOKIE).ok_or_else(|| {
        debug!("refresh cookie missing");
        ApiError::from(DomainError::unauthorized("Invalid refresh token."))
    })?;
    let pair = state.auth.refresh(cookie.value())?;
    let cookie = refresh_cookie(&state, pair.refresh_token);
    Ok(HttpResponse::Ok().cookie(cookie).json(RefreshResponse {
        access_token: pair.access_token,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inbound::http::test_utils::{PASSWORD, harness};
    use actix_web::http::StatusCode;
    use actix_web::{App, test as actix_test};
    use rstest::rstest;
    use serde_json::Value;

    fn signup_json(email: &str) -> Value {
        json!({ "name": "Ada Lovelace", "email": email, "password": PASSWORD })
    }

    macro_rules! auth_app {
        ($state:expr) => {
            actix_test::init_service(
                App::new()
                    .app_data(web::Data::new($state))
                    .service(web::scope("/auth").service(signup).service(login).service(refresh)),
            )
            .await
        };
    }

    #[rstest]
    #[actix_web::test]
    async fn signup_returns_the_public_user_view() {
        let h = harness();
        let app = auth_app!(h.state.clone());
        let req = actix_test::TestRequest::post()
            .uri("/auth/signup")
            .set_json(signup_json("ada@example.com"))
            .to_request();
        let res = actix_test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::OK);
        let body: Value = actix_test::read_body_json(res).await;
        assert_eq!(body.get("email").and_then(Value::as_str), Some("ada@example.com"));
        assert_eq!(body.get("role").and_then(Value::as_str), Some("USER"));
        assert!(body.get("passwordHash").is_none());
    }

    #[rstest]
    #[case(json!({ "name": "", "email": "ada@example.com", "password": PASSWORD }), "name")]
    #[case(json!({ "name": "Ada", "email": "not-an-email", "password": PASSWORD }), "email")]
    #[case(json!({ "name": "Ada", "email": "ada@example.com", "password": "short" }), "password")]
    #[case(json!({ "name": "Ada", "email": "ada@example.com", "password": PASSWORD, "role": "WIZARD" }), "role")]
    #[actix_web::test]
    async fn signup_validation_failures_name_the_field(
        #[case] payload: Value,
        #[case] field: &str,
    ) {
        let h = harness();
        let app = auth_app!(h.state.clone());
        let req = actix_test::TestRequest::post()
            .uri("/auth/signup")
            .set_json(payload)
            .to_request();
        let res = actix_test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: Value = actix_test::read_body_json(res).await;
        assert_eq!(
            body.pointer("/details/field").and_then(Value::as_str),
            Some(field)
        );
    }

    #[rstest]
    #[actix_web::test]
    async fn duplicate_signup_is_a_bad_request() {
        let h = harness();
        let app = auth_app!(h.state.clone());
        for expected in [StatusCode::OK, StatusCode::BAD_REQUEST] {
            let req = actix_test::TestRequest::post()
                .uri("/auth/signup")
                .set_json(signup_json("ada@example.com"))
                .to_request();
            let res = actix_test::call_service(&app, req).await;
            assert_eq!(res.status(), expected);
        }
    }

    #[rstest]
    #[actix_web::test]
    async fn login_sets_a_guarded_refresh_cookie() {
        let h = harness();
        h.signup("ada@example.com").await;
        let app = auth_app!(h.state.clone());

        let req = actix_test::TestRequest::post()
            .uri("/auth/login")
            .set_json(json!({ "email": "ada@example.com", "password": PASSWORD }))
            .to_request();
        let res = actix_test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::OK);

        let cookie = res
            .response()
            .cookies()
            .find(|c| c.name() == REFRESH_COOKIE)
            .expect("refresh cookie set")
            .into_owned();
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Strict));
        assert!(cookie.max_age().expect("max age").whole_days() >= 7);

        let body: Value = actix_test::read_body_json(res).await;
        let access = body
            .get("accessToken")
            .and_then(Value::as_str)
            .expect("access token in body");
        assert!(h.state.tokens.verify_access(access).is_ok());
        // The refresh token never appears in the body.
        assert!(body.get("refreshToken").is_none());
    }

    #[rstest]
    #[case("ada@example.com", "wrong-password")]
    #[case("nobody@example.com", PASSWORD)]
    #[actix_web::test]
    async fn bad_logins_get_one_uniform_denial(#[case] email: &str, #[case] password: &str) {
        let h = harness();
        h.signup("ada@example.com").await;
        let app = auth_app!(h.state.clone());

        let req = actix_test::TestRequest::post()
            .uri("/auth/login")
            .set_json(json!({ "email": email, "password": password }))
            .to_request();
        let res = actix_test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: Value = actix_test::read_body_json(res).await;
        assert_eq!(
            body.get("message").and_then(Value::as_str),
            Some("Incorrect email or password.")
        );
    }

    #[rstest]
    #[actix_web::test]
    async fn refresh_rotates_the_cookie_and_mints_an_access_token() {
        let h = harness();
        let user = h.signup("ada@example.com").await;
        let pair = h.state.tokens.issue(&user.id).expect("pair issued");
        let app = auth_app!(h.state.clone());

        let req = actix_test::TestRequest::post()
            .uri("/auth/refresh")
            .cookie(Cookie::new(REFRESH_COOKIE, pair.refresh_token))
            .to_request();
        let res = actix_test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::OK);
        let rotated = res
            .response()
            .cookies()
            .find(|c| c.name() == REFRESH_COOKIE)
            .expect("rotated cookie")
            .into_owned();
        assert!(h.state.tokens.verify_refresh(rotated.value()).is_ok());

        let body: Value = actix_test::read_body_json(res).await;
        let access = body
            .get("accessToken")
            .and_then(Value::as_str)
            .expect("access token");
        assert_eq!(
            h.state.tokens.verify_access(access).expect("valid access"),
            user.id
        );
    }

    #[rstest]
    #[case::no_cookie(None)]
    #[case::garbage(Some("not-a-jwt".to_owned()))]
    #[actix_web::test]
    async fn refresh_denies_missing_or_invalid_cookies(#[case] cookie: Option<String>) {
        let h = harness();
        let app = auth_app!(h.state.clone());

        let mut req = actix_test::TestRequest::post().uri("/auth/refresh");
        if let Some(value) = cookie {
            req = req.cookie(Cookie::new(REFRESH_COOKIE, value));
        }
        let res = actix_test::call_service(&app, req.to_request()).await;
        assert_eq!(res.status(), StatusCode::FORBIDDEN);
    }

    #[rstest]
    #[actix_web::test]
    async fn access_tokens_are_not_accepted_as_refresh_tokens() {
        let h = harness();
        let user = h.signup("ada@example.com").await;
        let app = auth_app!(h.state.clone());

        let req = actix_test::TestRequest::post()
            .uri("/auth/refresh")
            .cookie(Cookie::new(REFRESH_COOKIE, h.access_token(&user.id)))
            .to_request();
        let res = actix_test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::FORBIDDEN);
    }
}
