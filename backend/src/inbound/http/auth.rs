//! Bearer token authentication.
//!
//! The caller identity is the `sub` claim of an HS256-signed JWT carried in
//! `Authorization: Bearer <token>`. Every failure collapses to
//! [`ErrorCode::Unauthorized`](crate::domain::ErrorCode::Unauthorized); the
//! reason is logged but never returned to the client.

use actix_web::dev::Payload;
use actix_web::http::header::AUTHORIZATION;
use actix_web::{FromRequest, HttpRequest, web};
use futures_util::future::{Ready, ready};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::domain::{Error, UserId};

use super::state::HttpState;

/// Why a request could not be authenticated.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("authorization header missing")]
    MissingHeader,
    #[error("authorization header is not a bearer token")]
    MalformedHeader,
    #[error("token expired")]
    Expired,
    #[error("token rejected: {0}")]
    InvalidToken(String),
    #[error("token has no subject")]
    MissingSubject,
}

impl From<AuthError> for Error {
    fn from(value: AuthError) -> Self {
        Error::unauthorized(value.to_string())
    }
}

#[derive(Debug, Clone, Deserialize)]
struct Claims {
    #[serde(default)]
    sub: Option<String>,
}

/// Verifies bearer tokens against a shared secret.
pub struct TokenVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl TokenVerifier {
    /// HS256 verifier. Issuer and audience are checked only when given.
    pub fn hs256(secret: &[u8], issuer: Option<&str>, audience: Option<&str>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        if let Some(iss) = issuer {
            validation.set_issuer(&[iss]);
        }
        match audience {
            Some(aud) => validation.set_audience(&[aud]),
            None => validation.validate_aud = false,
        }
        Self {
            key: DecodingKey::from_secret(secret),
            validation,
        }
    }

    /// Validate `token` and return the caller it names.
    pub fn verify(&self, token: &str) -> Result<UserId, AuthError> {
        let data = decode::<Claims>(token, &self.key, &self.validation).map_err(|err| {
            match err.kind() {
                ErrorKind::ExpiredSignature => AuthError::Expired,
                _ => AuthError::InvalidToken(err.to_string()),
            }
        })?;
        let subject = data.claims.sub.ok_or(AuthError::MissingSubject)?;
        UserId::new(subject).map_err(|_| AuthError::MissingSubject)
    }

    /// Extract and verify the bearer token of `req`.
    pub fn authenticate(&self, req: &HttpRequest) -> Result<UserId, AuthError> {
        let header = req
            .headers()
            .get(AUTHORIZATION)
            .ok_or(AuthError::MissingHeader)?;
        let token = header
            .to_str()
            .ok()
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or(AuthError::MalformedHeader)?;
        self.verify(token)
    }
}

/// Authenticated caller, extracted from the bearer token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerIdentity(pub UserId);

impl CallerIdentity {
    pub fn user_id(&self) -> &UserId {
        &self.0
    }

    pub fn into_inner(self) -> UserId {
        self.0
    }
}

impl FromRequest for CallerIdentity {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let Some(state) = req.app_data::<web::Data<HttpState>>() else {
            return ready(Err(Error::internal("authentication is not configured")));
        };
        let result = state
            .tokens
            .authenticate(req)
            .map(|user_id| {
                debug!(%user_id, "caller authenticated");
                CallerIdentity(user_id)
            })
            .map_err(|err| {
                warn!(error = %err, path = req.path(), "authentication failed");
                Error::from(err)
            });
        ready(result)
    }
}
