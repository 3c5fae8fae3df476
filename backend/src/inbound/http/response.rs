//! JSON response construction.
//!
//! Bodies are serialised to text up front so the status, headers and body
//! are fixed before the response leaves the handler.

use actix_web::HttpResponse;
use actix_web::http::StatusCode;
use actix_web::http::header::{CONTENT_TYPE, HeaderValue};
use serde::Serialize;

/// The response body could not be serialised.
#[derive(Debug, thiserror::Error)]
#[error("failed to serialise response body: {0}")]
pub struct ResponseBuildError(#[from] serde_json::Error);

/// Serialise `body` and build a JSON response with `status`.
///
/// # Examples
/// ```
/// use actix_web::http::StatusCode;
/// use serde_json::json;
/// use user_causes::inbound::http::response::try_json_response;
///
/// let response = try_json_response(StatusCode::OK, &json!({ "message": "ok" }))
///     .expect("serialisable body");
/// assert_eq!(response.status(), StatusCode::OK);
/// ```
pub fn try_json_response<T>(status: StatusCode, body: &T) -> Result<HttpResponse, ResponseBuildError>
where
    T: Serialize + ?Sized,
{
    let text = serde_json::to_string(body)?;
    Ok(HttpResponse::build(status)
        .insert_header((CONTENT_TYPE, HeaderValue::from_static("application/json")))
        .body(text))
}

/// Infallible form of [`try_json_response`].
///
/// # Panics
/// Panics when `body` cannot be serialised. Wire bodies are plain structs
/// with string keys, so this only fires on a programming error.
pub fn json_response<T>(status: StatusCode, body: &T) -> HttpResponse
where
    T: Serialize + ?Sized,
{
    match try_json_response(status, body) {
        Ok(response) => response,
        Err(err) => panic!("{err}"),
    }
}
