use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

use sg_shared::config::RevocationFailurePolicy;

use crate::domain::entities::token::{ClaimBody, Claims};
use crate::services::revocation::RevocationStore;
use crate::services::store::KeyValueStore;
use crate::services::token::{Signer, TokenIssuer, TokenServiceConfig, TokenValidator};

pub const SECRET: &str = "unit-test-secret";

pub fn config() -> TokenServiceConfig {
    TokenServiceConfig {
        jwt_secret: SECRET.to_string(),
        access_token_ttl: 3600,
        refresh_token_ttl: 86400,
        password_reset_ttl: 1800,
        email_verification_ttl: 7200,
    }
}

pub fn signer() -> Arc<Signer> {
    Arc::new(Signer::new(SECRET))
}

pub fn issuer() -> TokenIssuer {
    TokenIssuer::new(signer(), config())
}

pub fn validator_over(store: Arc<dyn KeyValueStore>, policy: RevocationFailurePolicy) -> (TokenValidator, RevocationStore) {
    let revocation = RevocationStore::new(store, policy, Duration::from_millis(200));
    (TokenValidator::new(signer(), revocation.clone()), revocation)
}

pub fn access_claims() -> Claims {
    Claims::new(
        Uuid::new_v4(),
        ClaimBody::Access {
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
        },
        3600,
    )
}

/// Assemble a compact token from raw JSON parts and a raw signature segment
pub fn compact(header: &serde_json::Value, claims: &serde_json::Value, signature: &str) -> String {
    format!(
        "{}.{}.{}",
        URL_SAFE_NO_PAD.encode(header.to_string()),
        URL_SAFE_NO_PAD.encode(claims.to_string()),
        signature
    )
}
