//! Caller identity.
//!
//! The identity is the `sub` claim handed over by the authentication
//! extractor. It is opaque to the domain: usually a UUID issued by the
//! identity provider, but any non-empty string is accepted.

use std::fmt;

/// Validation errors returned by [`UserId::new`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserIdValidationError {
    /// The identity was empty.
    #[error("user id must not be empty")]
    Empty,
}

/// Identity of the authenticated caller.
///
/// # Examples
/// ```
/// use user_causes::domain::UserId;
///
/// let id = UserId::new("11111111-2222-3333-4444-555555555555").expect("valid id");
/// assert_eq!(id.as_ref(), "11111111-2222-3333-4444-555555555555");
/// assert!(UserId::new("").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UserId(String);

impl UserId {
    /// Validate and construct a [`UserId`].
    pub fn new(id: impl Into<String>) -> Result<Self, UserIdValidationError> {
        let id = id.into();
        if id.is_empty() {
            return Err(UserIdValidationError::Empty);
        }
        Ok(Self(id))
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        value.0
    }
}
