//! Item vote and moderation handlers.
//!
//! ```text
//! PATCH  /items/{id}/vote/{direction}   direction ∈ {upvote, downvote}
//! DELETE /items/{id}                    moderators and admins only
//! ```

use actix_web::{HttpResponse, delete, patch, web};
use serde_json::json;

use crate::domain::DomainError;
use crate::domain::user::Role;
use crate::domain::vote::{ItemId, VoteCounters, VoteDirection};
use crate::inbound::http::bearer::Bearer;
use crate::inbound::http::error::{ApiError, ApiResult};
use crate::inbound::http::guard;
use crate::inbound::http::state::HttpState;

fn parse_item_id(raw: &str) -> Result<ItemId, DomainError> {
    ItemId::new(raw).map_err(|err| {
        DomainError::invalid_request(err.to_string()).with_details(json!({ "field": "itemId" }))
    })
}

/// Cast, retract, or switch the caller's vote on an item.
///
/// The same request repeated is a retraction; the opposite direction is a
/// switch. The response carries the item's updated counters.
#[utoipa::path(
    patch,
    path = "/items/{item_id}/vote/{direction}",
    params(
        ("item_id" = String, Path, description = "Item identifier (UUID)"),
        ("direction" = String, Path, description = "`upvote` or `downvote`")
    ),
    responses(
        (status = 200, description = "Updated counters", body = VoteCounters),
        (status = 400, description = "Invalid direction, item id, or concurrent duplicate", body = ApiError),
        (status = 403, description = "Not authenticated or banned", body = ApiError),
        (status = 404, description = "Unknown item", body = ApiError),
        (status = 500, description = "Internal server error", body = ApiError)
    ),
    tags = ["items"],
    operation_id = "castVote"
)]
#[patch("/{item_id}/vote/{direction}")]
pub async fn cast_vote(
    state: web::Data<HttpState>,
    bearer: Bearer,
    path: web::Path<(String, String)>,
) -> ApiResult<web::Json<VoteCounters>> {
    // The ban gate runs before any request parsing; a banned caller always
    // gets the ban denial.
    guard::require_unbanned(&state, &bearer.user_id).await?;

    let (raw_item, raw_direction) = path.into_inner();
    let direction = VoteDirection::parse(&raw_direction).ok_or_else(|| {
        ApiError::from(
            DomainError::invalid_request("Vote direction must be \"upvote\" or \"downvote\".")
                .with_details(json!({ "field": "direction" })),
        )
    })?;
    let item_id = parse_item_id(&raw_item)?;

    let counters = state
        .ledger
        .cast_vote(&bearer.user_id, &item_id, direction)
        .await?;
    Ok(web::Json(counters))
}

/// Remove an item and every vote record referencing it.
#[utoipa::path(
    delete,
    path = "/items/{item_id}",
    params(("item_id" = String, Path, description = "Item identifier (UUID)")),
    responses(
        (status = 204, description = "Item removed"),
        (status = 400, description = "Invalid item id", body = ApiError),
        (status = 403, description = "Not authenticated, banned, or lacking the role", body = ApiError),
        (status = 404, description = "Unknown item", body = ApiError),
        (status = 500, description = "Internal server error", body = ApiError)
    ),
    tags = ["items"],
    operation_id = "removeItem"
)]
#[delete("/{item_id}")]
pub async fn remove_item(
    state: web::Data<HttpState>,
    bearer: Bearer,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let item_id = parse_item_id(&path.into_inner())?;
    guard::require_role(&state, &bearer.user_id, &[Role::Moderator, Role::Admin]).await?;
    state.ledger.remove_item(&item_id).await?;
    Ok(HttpResponse::NoContent().finish())
}
