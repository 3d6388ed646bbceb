//! Profile API handlers.
//!
//! ```text
//! GET   /users/me
//! PATCH /users/me {"name":...,"bio":...,"avatar":...}
//! ```

use actix_web::{get, patch, web};
use serde::{Deserialize, Serialize};

use crate::domain::ProfileUpdate;
use crate::inbound::http::auth::UserResponse;
use crate::inbound::http::bearer::Bearer;
use crate::inbound::http::error::{ApiError, ApiResult};
use crate::inbound::http::state::HttpState;

/// Partial profile update body; absent fields keep their current value.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
}

/// Fetch the caller's own profile.
#[utoipa::path(
    get,
    path = "/users/me",
    responses(
        (status = 200, description = "Caller profile", body = UserResponse),
        (status = 403, description = "Not authenticated", body = ApiError),
        (status = 404, description = "Account no longer exists", body = ApiError),
        (status = 500, description = "Internal server error", body = ApiError)
    ),
    tags = ["users"],
    operation_id = "getProfile"
)]
#[get("/me")]
pub async fn me(state: web::Data<HttpState>, bearer: Bearer) -> ApiResult<web::Json<UserResponse>> {
    let user = state.auth.profile(&bearer.user_id).await?;
    Ok(web::Json(UserResponse::from(&user)))
}

/// Apply a partial update to the caller's own profile.
#[utoipa::path(
    patch,
    path = "/users/me",
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Updated profile", body = UserResponse),
        (status = 400, description = "Validation failure", body = ApiError),
        (status = 403, description = "Not authenticated", body = ApiError),
        (status = 500, description = "Internal server error", body = ApiError)
    ),
    tags = ["users"],
    operation_id = "updateProfile"
)]
#[patch("/me")]
pub async fn update_me(
    state: web::Data<HttpState>,
    bearer: Bearer,
    payload: web::Json<UpdateProfileRequest>,
) -> ApiResult<web::Json<UserResponse>> {
    let body = payload.into_inner();
    let update = ProfileUpdate {
        name: body.name,
        bio: body.bio,
        avatar: body.avatar,
    };
    let user = state.auth.update_profile(&bearer.user_id, update).await?;
    Ok(web::Json(UserResponse::from(&user)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inbound::http::test_utils::harness;
    use actix_web::http::{StatusCode, header};
    use actix_web::{App, test as actix_test};
    use rstest::rstest;
    use serde_json::{Value, json};

    macro_rules! users_app {
        ($state:expr) => {
            actix_test::init_service(
                App::new()
                    .app_data(web::Data::new($state))
                    .service(web::scope("/users").service(me).service(update_me)),
            )
            .await
        };
    }

    #[rstest]
    #[actix_web::test]
    async fn profile_round_trips_for_the_token_subject() {
        let h = harness();
        let user = h.signup("ada@example.com").await;
        let app = users_app!(h.state.clone());

        let req = actix_test::TestRequest::get()
            .uri("/users/me")
            .insert_header((
                header::AUTHORIZATION,
                format!("Bearer {}", h.access_token(&user.id)),
            ))
            .to_request();
        let res = actix_test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::OK);
        let body: Value = actix_test::read_body_json(res).await;
        assert_eq!(
            body.get("id").and_then(Value::as_str),
            Some(user.id.to_string().as_str())
        );
    }

    #[rstest]
    #[actix_web::test]
    async fn profile_requires_a_live_bearer_token() {
        let h = harness();
        let user = h.signup("ada@example.com").await;
        let app = users_app!(h.state.clone());

        let req = actix_test::TestRequest::get()
            .uri("/users/me")
            .insert_header((
                header::AUTHORIZATION,
                format!("Bearer {}", h.expired_access_token(&user.id)),
            ))
            .to_request();
        let res = actix_test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::FORBIDDEN);
    }

    #[rstest]
    #[actix_web::test]
    async fn update_changes_only_the_provided_fields() {
        let h = harness();
        let user = h.signup("ada@example.com").await;
        let app = users_app!(h.state.clone());

        let req = actix_test::TestRequest::patch()
            .uri("/users/me")
            .insert_header((
                header::AUTHORIZATION,
                format!("Bearer {}", h.access_token(&user.id)),
            ))
            .set_json(json!({ "bio": "Analyst" }))
            .to_request();
        let res = actix_test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::OK);
        let body: Value = actix_test::read_body_json(res).await;
        assert_eq!(body.get("bio").and_then(Value::as_str), Some("Analyst"));
        assert_eq!(
            body.get("name").and_then(Value::as_str),
            Some("Ada Lovelace")
        );
    }

    #[rstest]
    #[actix_web::test]
    async fn blank_names_are_rejected() {
        let h = harness();
        let user = h.signup("ada@example.com").await;
        let app = users_app!(h.state.clone());

        let req = actix_test::TestRequest::patch()
            .uri("/users/me")
            .insert_header((
                header::AUTHORIZATION,
                format!("Bearer {}", h.access_token(&user.id)),
            ))
            .set_json(json!({ "name": "   " }))
            .to_request();
        let res = actix_test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }
}
