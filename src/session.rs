use axum_extra::extract::{
    CookieJar,
    cookie::{Cookie, SameSite},
};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::time::{Duration, SystemTime};
use uuid::Uuid;

use crate::gate::parse_role_set;

/// Name of the session cookie, the one canonical credential carrier.
pub const SESSION_COOKIE: &str = "session";

/// Claims
///
/// The payload structure inside the signed session JWT. Signed with the server's
/// secret at login and validated on every request by both the access gate and the
/// AuthUser extractor.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (sub): the UUID of the user, primary key into public.profiles.
    pub sub: Uuid,
    /// The caller's role set, serialized as a JSON array of role strings
    /// (comma-separated is also accepted on read). Only ever read out of a
    /// signature-verified token; a plain client-asserted value is never honored.
    pub roles: String,
    /// Expiration Time (exp): timestamp after which the session must not be accepted.
    pub exp: usize,
    /// Issued At (iat): timestamp when the session was established.
    pub iat: usize,
}

/// issue
///
/// Establishes a session: mints a signed JWT for the user's identity and role set
/// and wraps it in an HttpOnly cookie. Called by the login handler after the
/// repository has verified the credentials.
pub fn issue(
    user_id: Uuid,
    roles: &[String],
    secret: &str,
    ttl: Duration,
) -> Result<Cookie<'static>, jsonwebtoken::errors::Error> {
    let now = SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as usize;

    let claims = Claims {
        sub: user_id,
        roles: serde_json::to_string(roles).unwrap_or_else(|_| "[]".to_string()),
        iat: now,
        exp: now + ttl.as_secs() as usize,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;

    // Validity is bounded by the exp claim rather than cookie max-age, so a
    // stolen-but-expired token is rejected even if the cookie lingers.
    Ok(Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build())
}

/// clear
///
/// Ends the session. Returns the carrier cookie to hand to `CookieJar::remove`,
/// which turns it into a removal cookie on the response. Safe to send whether or
/// not a session existed.
pub fn clear() -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, ""))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

/// verify
///
/// Decodes and validates the session token from the cookie jar. Returns the claims
/// only when the signature and expiry check out.
pub fn verify(jar: &CookieJar, secret: &str) -> Option<Claims> {
    let token = jar.get(SESSION_COOKIE)?.value();
    if token.is_empty() {
        return None;
    }

    let mut validation = Validation::default();
    validation.validate_exp = true;

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .ok()
    .map(|data| data.claims)
}

/// read_roles
///
/// The gate-facing read path: verified claims reduced to a role set. Any failure
/// along the way (missing cookie, bad signature, expired token, malformed roles
/// claim) resolves to the empty set, never an error.
pub fn read_roles(jar: &CookieJar, secret: &str) -> Vec<String> {
    match verify(jar, secret) {
        Some(claims) => parse_role_set(&claims.roles),
        None => Vec::new(),
    }
}
