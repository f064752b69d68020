// crates/gov-core/src/identity.rs
// ============================================================================
// Module: Identity Verification
// Description: Opaque access-token verification for privileged commands.
// ============================================================================

//! ## Overview
//! Privileged governance commands (catalog `submitForReview`/`approveCatalog`/
//! `modifyCatalog`) accept an optional opaque access token. When present, its
//! claim-derived subject supersedes the caller-supplied actor name for audit
//! recording (§4.J). Verification is pluggable via [`IdentityVerifier`] so the
//! core never hard-codes a token format or signing scheme.

use std::collections::HashMap;

use serde::Deserialize;
use serde::Serialize;

use crate::error::GovernanceError;

/// An opaque, caller-supplied access token. The core never inspects its
/// internal structure; only an [`IdentityVerifier`] implementation does.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessToken(String);

impl AccessToken {
    /// Wraps a raw token string.
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Returns the raw token text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// The claim-derived identity recovered from a verified [`AccessToken`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// The subject the token attests to; supersedes a caller-supplied actor.
    pub subject: String,
    /// Additional claim key/value pairs, carried for `_audit_user_info`.
    pub extra: HashMap<String, String>,
}

impl Claims {
    /// Builds claims for `subject` with no extra fields.
    #[must_use]
    pub fn new(subject: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            extra: HashMap::new(),
        }
    }
}

/// Verifies [`AccessToken`]s and recovers their [`Claims`].
///
/// Implementations are supplied by the command-surface boundary (`gov-cli`)
/// or tests; `gov-core` and the subsystem crates only depend on the trait.
pub trait IdentityVerifier: Send + Sync {
    /// Verifies `token`, returning its claims.
    ///
    /// # Errors
    /// Returns [`GovernanceError::Unauthorized`] if the token is malformed,
    /// expired, or fails signature verification.
    fn verify(&self, token: &AccessToken) -> Result<Claims, GovernanceError>;
}

/// A reference verifier backed by a static, in-memory token → subject map.
///
/// Production deployments supply their own
/// [`IdentityVerifier`] (e.g. JWT/JWKS-backed) via the same trait.
#[derive(Debug, Clone, Default)]
pub struct StaticIdentityVerifier {
    tokens: HashMap<String, Claims>,
}

impl StaticIdentityVerifier {
    /// Builds an empty verifier that rejects every token.
    #[must_use]
    pub fn new() -> Self {
        Self { tokens: HashMap::new() }
    }

    /// Registers `token` as valid, resolving to `claims`.
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>, claims: Claims) -> Self {
        self.tokens.insert(token.into(), claims);
        self
    }
}

impl IdentityVerifier for StaticIdentityVerifier {
    fn verify(&self, token: &AccessToken) -> Result<Claims, GovernanceError> {
        self.tokens
            .get(token.as_str())
            .cloned()
            .ok_or_else(|| GovernanceError::Unauthorized {
                reason: "access token not recognized".to_string(),
            })
    }
}

/// Resolves the actor to record on an audit entry: the token's verified
/// subject if a token was supplied and verifies, otherwise the
/// caller-supplied `fallback_actor`.
///
/// # Errors
/// Propagates [`GovernanceError::Unauthorized`] if a token was supplied but
/// failed verification; a missing token is not an error (falls back).
pub fn resolve_actor(
    verifier: &dyn IdentityVerifier,
    token: Option<&AccessToken>,
    fallback_actor: &str,
) -> Result<String, GovernanceError> {
    match token {
        Some(token) => verifier.verify(token).map(|claims| claims.subject),
        None => Ok(fallback_actor.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::AccessToken;
    use super::Claims;
    use super::StaticIdentityVerifier;
    use super::resolve_actor;

    #[test]
    fn token_subject_supersedes_fallback_actor() {
        let verifier = StaticIdentityVerifier::new().with_token("tok-1", Claims::new("alice"));
        let resolved = resolve_actor(&verifier, Some(&AccessToken::new("tok-1")), "bob")
            .unwrap_or_else(|_| "bob".to_string());
        assert_eq!(resolved, "alice");
    }

    #[test]
    fn missing_token_falls_back_to_caller_actor() {
        let verifier = StaticIdentityVerifier::new();
        let resolved = resolve_actor(&verifier, None, "bob").unwrap_or_else(|_| "bob".to_string());
        assert_eq!(resolved, "bob");
    }

    #[test]
    fn unrecognized_token_is_unauthorized() {
        let verifier = StaticIdentityVerifier::new();
        let result = resolve_actor(&verifier, Some(&AccessToken::new("bogus")), "bob");
        assert!(result.is_err());
    }
}
