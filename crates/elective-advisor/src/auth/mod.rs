//! Request identity resolution.
//!
//! Resolution never rejects a request. A credential that fails verification
//! is treated exactly like no credential at all: tokens minted by an
//! external identity provider are indistinguishable from garbage here, and
//! the product must stay usable either way. The tradeoff is safe only while
//! the anonymous identity carries no elevated privilege, so role-gated
//! endpoints must check a *verified* role.

use axum::http::{header, HeaderMap};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Identity id assigned to anonymous and externally-authenticated callers.
pub const ANONYMOUS_ID: &str = "ext";

/// Cookie carrying the service-issued token.
const TOKEN_COOKIE: &str = "token";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Student,
    Faculty,
}

/// Resolved caller context. Created per-request; never persisted by this
/// service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub id: String,
    pub role: Role,
    pub is_external: bool,
}

impl Identity {
    /// The degraded identity used when no trustworthy credential is present.
    pub fn anonymous() -> Self {
        Self {
            id: ANONYMOUS_ID.to_string(),
            role: Role::Student,
            is_external: true,
        }
    }
}

/// Claims embedded in service-issued tokens.
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenClaims {
    pub id: String,
    #[serde(default)]
    pub role: Role,
    pub exp: usize,
}

/// Verifies bearer credentials against the service's own signing key.
pub struct SessionResolver {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl SessionResolver {
    pub fn new(secret: &str) -> Self {
        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::new(Algorithm::HS256),
        }
    }

    /// Resolve a credential to an identity. Never fails: both a missing and
    /// an unverifiable credential yield the anonymous identity.
    pub fn resolve(&self, credential: Option<&str>) -> Identity {
        let Some(token) = credential else {
            return Identity::anonymous();
        };

        match decode::<TokenClaims>(token, &self.decoding_key, &self.validation) {
            Ok(data) => Identity {
                id: data.claims.id,
                role: data.claims.role,
                is_external: false,
            },
            Err(error) => {
                debug!(%error, "credential failed verification, continuing as anonymous");
                Identity::anonymous()
            }
        }
    }
}

/// Bearer credential from the `token` cookie or the `Authorization` header.
/// The cookie wins when both are present.
pub fn credential_from_headers(headers: &HeaderMap) -> Option<String> {
    if let Some(cookies) = headers
        .get(header::COOKIE)
        .and_then(|value| value.to_str().ok())
    {
        for pair in cookies.split(';') {
            if let Some((name, value)) = pair.trim().split_once('=') {
                if name == TOKEN_COOKIE && !value.is_empty() {
                    return Some(value.to_string());
                }
            }
        }
    }

    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use jsonwebtoken::{encode, EncodingKey, Header};

    const SECRET: &str = "unit-test-secret";

    fn token(id: &str, role: Role, secret: &str) -> String {
        let claims = TokenClaims {
            id: id.to_string(),
            role,
            exp: (chrono::Utc::now().timestamp() + 3600) as usize,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .expect("token encodes")
    }

    #[test]
    fn missing_credential_resolves_anonymous() {
        let resolver = SessionResolver::new(SECRET);
        let identity = resolver.resolve(None);
        assert_eq!(identity.id, ANONYMOUS_ID);
        assert_eq!(identity.role, Role::Student);
        assert!(identity.is_external);
    }

    #[test]
    fn service_issued_token_resolves_embedded_identity() {
        let resolver = SessionResolver::new(SECRET);
        let identity = resolver.resolve(Some(&token("u-42", Role::Faculty, SECRET)));
        assert_eq!(identity.id, "u-42");
        assert_eq!(identity.role, Role::Faculty);
        assert!(!identity.is_external);
    }

    #[test]
    fn foreign_token_degrades_to_anonymous() {
        let resolver = SessionResolver::new(SECRET);
        let foreign = token("u-42", Role::Faculty, "some-other-issuer");
        let identity = resolver.resolve(Some(&foreign));
        assert_eq!(identity, Identity::anonymous());
    }

    #[test]
    fn garbage_token_degrades_to_anonymous() {
        let resolver = SessionResolver::new(SECRET);
        assert_eq!(
            resolver.resolve(Some("not-a-jwt-at-all")),
            Identity::anonymous()
        );
    }

    #[test]
    fn cookie_takes_precedence_over_bearer_header() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; token=cookie-token"),
        );
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Bearer header-token"),
        );
        assert_eq!(
            credential_from_headers(&headers).as_deref(),
            Some("cookie-token")
        );
    }

    #[test]
    fn bearer_header_used_when_cookie_absent() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Bearer header-token"),
        );
        assert_eq!(
            credential_from_headers(&headers).as_deref(),
            Some("header-token")
        );
    }

    #[test]
    fn no_credential_in_unrelated_headers() {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("theme=dark"));
        assert_eq!(credential_from_headers(&headers), None);
    }
}
