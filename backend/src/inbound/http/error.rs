//! HTTP rendering of domain errors.
//!
//! This is the single place where failures become wire bodies. The domain
//! error stays transport agnostic; the status and body shape are chosen from
//! its [`ErrorCode`].

use actix_web::http::StatusCode;
use actix_web::http::header::{HeaderName, HeaderValue};
use actix_web::{HttpResponse, ResponseError};
use tracing::error;

use crate::domain::{Error, ErrorCode, TRACE_ID_HEADER};

use super::response::try_json_response;
use super::schemas::{BadRequestBody, InternalErrorBody, MessageBody};

/// Convenient result alias for HTTP handlers.
pub type ApiResult<T> = Result<T, Error>;

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
        ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn render(error: &Error) -> Result<HttpResponse, super::response::ResponseBuildError> {
    let status = status_for(error.code());
    match error.code() {
        ErrorCode::InvalidRequest => try_json_response(status, &BadRequestBody::new(error.message())),
        ErrorCode::Unauthorized => try_json_response(status, &MessageBody::unauthorized()),
        ErrorCode::InternalError => {
            try_json_response(status, &InternalErrorBody::new(error.message()))
        }
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        status_for(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        if self.code() == ErrorCode::InternalError {
            error!(
                error = self.message(),
                details = ?self.details(),
                trace_id = ?self.trace_id(),
                "request failed"
            );
        }

        let mut response = render(self).unwrap_or_else(|err| {
            error!(error = %err, "failed to render error body");
            HttpResponse::InternalServerError().finish()
        });
        if let Some(value) = self.trace_id().and_then(|id| HeaderValue::from_str(id).ok()) {
            response
                .headers_mut()
                .insert(HeaderName::from_static(TRACE_ID_HEADER), value);
        }
        response
    }
}
