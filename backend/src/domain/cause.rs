//! Cause identifiers and the association key linking users to causes.

use std::fmt;

use super::UserId;

/// Validation errors returned by [`CauseId::new`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CauseIdValidationError {
    /// The identifier was empty.
    #[error("cause_id not present")]
    Missing,
}

/// Identifier of a cause entity.
///
/// # Examples
/// ```
/// use user_causes::domain::CauseId;
///
/// let id = CauseId::new("cause456").expect("valid cause id");
/// assert_eq!(id.as_ref(), "cause456");
/// assert!(CauseId::new("").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CauseId(String);

impl CauseId {
    /// Validate and construct a [`CauseId`].
    ///
    /// Only the empty string is rejected; any other value is kept verbatim.
    pub fn new(id: impl Into<String>) -> Result<Self, CauseIdValidationError> {
        let id = id.into();
        if id.is_empty() {
            return Err(CauseIdValidationError::Missing);
        }
        Ok(Self(id))
    }
}

impl AsRef<str> for CauseId {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for CauseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Primary key of an association record in the `user_causes` store.
///
/// Keys handed to deletes are the ones the store returned from its query,
/// so adapters must build them from stored attributes rather than from
/// request input.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UserCauseKey {
    /// Owning user (partition key).
    pub user_id: UserId,
    /// Followed cause (sort key).
    pub cause_id: CauseId,
}

impl UserCauseKey {
    /// Pair a user with a cause.
    pub fn new(user_id: UserId, cause_id: CauseId) -> Self {
        Self { user_id, cause_id }
    }
}

impl fmt::Display for UserCauseKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.user_id, self.cause_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn empty_identifier_is_missing() {
        let error = CauseId::new("").expect_err("empty id");
        assert_eq!(error, CauseIdValidationError::Missing);
        assert_eq!(error.to_string(), "cause_id not present");
    }

    #[rstest]
    #[case(" cause456")]
    #[case("cause456\t")]
    #[case("   ")]
    fn non_empty_identifiers_are_kept_verbatim(#[case] raw: &str) {
        let id = CauseId::new(raw).expect("non-empty id");
        assert_eq!(id.as_ref(), raw);
    }

    #[rstest]
    fn key_displays_both_parts() {
        let key = UserCauseKey::new(
            UserId::new("user123").expect("user id"),
            CauseId::new("cause456").expect("cause id"),
        );
        assert_eq!(key.to_string(), "user123/cause456");
    }
}
