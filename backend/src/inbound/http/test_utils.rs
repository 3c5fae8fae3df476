//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use jsonwebtoken::{EncodingKey, Header, encode, get_current_timestamp};
use serde_json::json;

use super::auth::TokenVerifier;

const TEST_SECRET: &[u8] = b"inbound-http-test-secret";

/// Verifier accepting tokens minted by [`bearer_for`].
pub fn test_verifier() -> Arc<TokenVerifier> {
    Arc::new(TokenVerifier::hs256(TEST_SECRET, None, None))
}

/// `Authorization` header value for a token whose subject is `sub`.
pub fn bearer_for(sub: &str) -> String {
    let claims = json!({ "sub": sub, "exp": get_current_timestamp() + 600 });
    let token = encode(&Header::default(), &claims, &EncodingKey::from_secret(TEST_SECRET))
        .expect("test token encodes");
    format!("Bearer {token}")
}
