//! User cause association HTTP handlers.
//!
//! ```text
//! DELETE /api/v1/user_causes/{cause_id}
//! DELETE /api/v1/user_causes
//! ```
//!
//! The caller is authenticated before the cause id is inspected, and no
//! store is touched unless both checks pass.

use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, delete, web};
use tracing::debug;

use crate::domain::ports::UnfollowCauseRequest;
use crate::domain::{CauseId, CauseIdValidationError, Error};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::CallerIdentity;
use crate::inbound::http::response::json_response;
use crate::inbound::http::schemas::{BadRequestBody, InternalErrorBody, MessageBody};
use crate::inbound::http::state::HttpState;

fn parse_cause_id(raw: Option<&str>) -> Result<CauseId, Error> {
    CauseId::new(raw.unwrap_or_default()).map_err(|err| Error::invalid_request(err.to_string()))
}

fn missing_cause_id() -> Error {
    Error::invalid_request(CauseIdValidationError::Missing.to_string())
}

/// Unfollow a cause on behalf of the authenticated caller.
#[utoipa::path(
    delete,
    path = "/api/v1/user_causes/{cause_id}",
    description = "Remove the caller's association with a cause and decrement its follower count.",
    params(("cause_id" = String, Path, description = "Cause to unfollow")),
    responses(
        (status = 200, description = "Cause unfollowed", body = MessageBody),
        (status = 400, description = "Missing cause id", body = BadRequestBody),
        (status = 401, description = "Missing or invalid bearer token", body = MessageBody),
        (status = 500, description = "Store failure", body = InternalErrorBody)
    ),
    tags = ["user_causes"],
    security(("BearerToken" = []))
)]
#[delete("/api/v1/user_causes/{cause_id}")]
pub async fn unfollow_cause(
    caller: CallerIdentity,
    state: web::Data<HttpState>,
    request: HttpRequest,
) -> ApiResult<HttpResponse> {
    let cause_id = parse_cause_id(request.match_info().get("cause_id"))?;
    let user_id = caller.into_inner();

    let outcome = state
        .unfollow
        .unfollow(UnfollowCauseRequest { user_id, cause_id })
        .await?;
    debug!(
        associations_removed = outcome.associations_removed,
        batches = outcome.batches_submitted,
        "unfollow completed"
    );

    Ok(json_response(StatusCode::OK, &MessageBody::unfollowed()))
}

/// Requests without a cause id segment.
#[utoipa::path(
    delete,
    path = "/api/v1/user_causes",
    responses(
        (status = 400, description = "Missing cause id", body = BadRequestBody),
        (status = 401, description = "Missing or invalid bearer token", body = MessageBody)
    ),
    tags = ["user_causes"],
    security(("BearerToken" = []))
)]
pub async fn unfollow_cause_missing_id(_caller: CallerIdentity) -> ApiResult<HttpResponse> {
    Err(missing_cause_id())
}

/// Register the unfollow routes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(unfollow_cause).service(
        web::resource(["/api/v1/user_causes", "/api/v1/user_causes/"])
            .route(web::delete().to(unfollow_cause_missing_id)),
    );
}
