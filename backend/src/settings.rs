//! Service configuration loaded via OrthoConfig.
//!
//! Values come from `USER_CAUSES_*` environment variables, command-line
//! flags, or a configuration file, with accessors supplying defaults.

use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::domain::{DecrementPolicy, ParseDecrementPolicyError};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

/// Runtime settings for the user causes service.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "USER_CAUSES")]
pub struct ServiceSettings {
    /// Socket address the HTTP server binds to.
    pub bind_addr: Option<String>,
    /// PostgreSQL connection string. The in-memory store is used when unset.
    pub database_url: Option<String>,
    /// Shared HS256 secret used to verify bearer tokens.
    pub jwt_secret: Option<String>,
    /// Expected `iss` claim, when tokens carry one.
    pub jwt_issuer: Option<String>,
    /// Expected `aud` claim, when tokens carry one.
    pub jwt_audience: Option<String>,
    /// Follower counter policy: `always` or `when_removed`.
    pub decrement_policy: Option<String>,
    /// Apply pending schema migrations before serving.
    #[ortho_config(default = false)]
    pub migrate_on_startup: bool,
}

impl ServiceSettings {
    /// Return the configured bind address, falling back to the default.
    pub fn bind_addr(&self) -> &str {
        self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR)
    }

    /// Parse the configured decrement policy.
    ///
    /// # Errors
    /// Returns [`ParseDecrementPolicyError`] when the value is not a known
    /// policy name.
    pub fn decrement_policy(&self) -> Result<DecrementPolicy, ParseDecrementPolicyError> {
        self.decrement_policy
            .as_deref()
            .map_or(Ok(DecrementPolicy::default()), str::parse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    const VARS: [&str; 7] = [
        "USER_CAUSES_BIND_ADDR",
        "USER_CAUSES_DATABASE_URL",
        "USER_CAUSES_JWT_SECRET",
        "USER_CAUSES_JWT_ISSUER",
        "USER_CAUSES_JWT_AUDIENCE",
        "USER_CAUSES_DECREMENT_POLICY",
        "USER_CAUSES_MIGRATE_ON_STARTUP",
    ];

    fn load_from_empty_args() -> ServiceSettings {
        ServiceSettings::load_from_iter([OsString::from("user-causes")])
            .expect("config should load")
    }

    fn env_with(overrides: &[(&str, &str)]) -> Vec<(&'static str, Option<String>)> {
        VARS.iter()
            .map(|name| {
                let value = overrides
                    .iter()
                    .find(|(key, _)| key == name)
                    .map(|(_, value)| (*value).to_owned());
                (*name, value)
            })
            .collect()
    }

    #[rstest]
    fn default_values_are_used_when_missing() {
        let _guard = lock_env(env_with(&[]));

        let settings = load_from_empty_args();
        assert_eq!(settings.bind_addr(), DEFAULT_BIND_ADDR);
        assert!(settings.database_url.is_none());
        assert!(settings.jwt_secret.is_none());
        assert!(!settings.migrate_on_startup);
        assert_eq!(settings.decrement_policy(), Ok(DecrementPolicy::Always));
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env(env_with(&[
            ("USER_CAUSES_BIND_ADDR", "127.0.0.1:9000"),
            ("USER_CAUSES_DATABASE_URL", "postgres://localhost/causes"),
            ("USER_CAUSES_JWT_SECRET", "s3cret"),
            ("USER_CAUSES_DECREMENT_POLICY", "when_removed"),
            ("USER_CAUSES_MIGRATE_ON_STARTUP", "true"),
        ]));

        let settings = load_from_empty_args();
        assert_eq!(settings.bind_addr(), "127.0.0.1:9000");
        assert_eq!(
            settings.database_url.as_deref(),
            Some("postgres://localhost/causes")
        );
        assert_eq!(settings.jwt_secret.as_deref(), Some("s3cret"));
        assert!(settings.migrate_on_startup);
        assert_eq!(settings.decrement_policy(), Ok(DecrementPolicy::WhenRemoved));
    }

    #[rstest]
    fn unknown_policy_is_reported() {
        let settings = ServiceSettings {
            bind_addr: None,
            database_url: None,
            jwt_secret: None,
            jwt_issuer: None,
            jwt_audience: None,
            decrement_policy: Some("sometimes".to_owned()),
            migrate_on_startup: false,
        };

        assert!(settings.decrement_policy().is_err());
    }
}
