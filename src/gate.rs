use axum::{
    extract::{Request, State},
    http::{HeaderValue, StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::CookieJar;

use crate::{AppState, session};

/// PermissionTable
///
/// The single, process-wide mapping from role label to the path prefixes that role
/// may access, plus the full set of protected prefixes. Built once at startup and
/// never mutated, so it can be shared across request tasks without synchronization.
///
/// Role labels are an open set: a role absent from the table simply grants access
/// to nothing, which keeps the gate fail-closed for unknown or misspelled labels.
#[derive(Clone, Debug)]
pub struct PermissionTable {
    /// (role, permitted prefixes) pairs. Linear scan is fine: the table is tiny
    /// and the lookup is a handful of string comparisons per request.
    grants: Vec<(String, Vec<String>)>,
    /// Every prefix that requires a non-empty, authorized role set.
    protected: Vec<String>,
    /// Redirect target for denied requests.
    login_redirect: String,
    /// The redirect target pre-validated as a Location header value.
    login_location: HeaderValue,
}

impl PermissionTable {
    /// Builds a table from explicit grants and protected prefixes, for
    /// deployments whose protected-path set differs from the standard one.
    ///
    /// # Panics
    /// Panics if `login_redirect` cannot be carried in a Location header, so a
    /// bad redirect target fails at startup instead of silently dropping the
    /// header on live denials.
    pub fn new(
        grants: Vec<(String, Vec<String>)>,
        protected: Vec<String>,
        login_redirect: &str,
    ) -> Self {
        let login_location = HeaderValue::from_str(login_redirect)
            .expect("FATAL: login redirect must be a valid header value");
        Self {
            grants,
            protected,
            login_redirect: login_redirect.to_string(),
            login_location,
        }
    }

    /// Builds the canonical table for the platform's five roles.
    ///
    /// Admin spans every protected region; the remaining roles each own exactly
    /// their namesake prefix. `login_redirect` is where denied callers are sent.
    pub fn standard(login_redirect: &str) -> Self {
        let all = ["/admin", "/staff", "/clinic", "/vet", "/user"];
        Self::new(
            vec![
                (
                    "Admin".to_string(),
                    all.iter().map(|p| p.to_string()).collect(),
                ),
                ("Staff".to_string(), vec!["/staff".to_string()]),
                ("Clinic".to_string(), vec!["/clinic".to_string()]),
                ("Vet".to_string(), vec!["/vet".to_string()]),
                ("User".to_string(), vec!["/user".to_string()]),
            ],
            all.iter().map(|p| p.to_string()).collect(),
            login_redirect,
        )
    }

    /// True if the path falls under any protected prefix.
    pub fn is_protected(&self, path: &str) -> bool {
        self.protected.iter().any(|p| prefix_matches(p, path))
    }

    /// True if at least one of the caller's roles grants a prefix covering the path.
    pub fn is_permitted(&self, roles: &[String], path: &str) -> bool {
        roles.iter().any(|role| {
            self.grants
                .iter()
                .filter(|(name, _)| name == role)
                .any(|(_, prefixes)| prefixes.iter().any(|p| prefix_matches(p, path)))
        })
    }

    pub fn login_redirect(&self) -> &str {
        &self.login_redirect
    }

    /// The redirect target as a ready-made Location header value, validated at
    /// construction time.
    pub fn login_location(&self) -> &HeaderValue {
        &self.login_location
    }
}

/// GateDecision
///
/// The outcome of one gate evaluation: pass the request through untouched, or
/// redirect it to the login/landing target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    Forward,
    Redirect(String),
}

/// prefix_matches
///
/// Segment-granular, case-sensitive prefix test. "/admin" matches "/admin" and
/// "/admin/dashboard" but never "/administration": the character after the prefix
/// must be a path separator (or the path must end exactly at the prefix).
fn prefix_matches(prefix: &str, path: &str) -> bool {
    match path.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}

/// parse_role_set
///
/// Parses the raw `roles` claim into a role set. Accepts a JSON array of strings
/// (`["Admin","Vet"]`) or a comma-separated list (`Vet, User`); entries are trimmed
/// and empties dropped. Anything else (invalid JSON, non-string elements, JSON
/// objects) resolves to the empty set. Parsing never fails: malformed
/// credential data means "no roles" (fail closed), not an error.
pub fn parse_role_set(raw: &str) -> Vec<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Vec::new();
    }

    if raw.starts_with('[') {
        return match serde_json::from_str::<serde_json::Value>(raw) {
            Ok(serde_json::Value::Array(items)) => {
                let mut roles = Vec::with_capacity(items.len());
                for item in items {
                    match item.as_str() {
                        Some(s) if !s.trim().is_empty() => roles.push(s.trim().to_string()),
                        Some(_) => {}
                        // A non-string element poisons the whole carrier value.
                        None => return Vec::new(),
                    }
                }
                roles
            }
            _ => Vec::new(),
        };
    }

    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// decide
///
/// The consolidated authorization decision: a pure, synchronous function of the
/// requested path, the caller's role set, and the immutable PermissionTable.
///
/// - Empty role set: forward only if the path is outside every protected prefix.
/// - Non-empty role set: forward if any role grants a prefix covering the path,
///   or if the path is public; redirect otherwise.
pub fn decide(table: &PermissionTable, path: &str, roles: &[String]) -> GateDecision {
    if roles.is_empty() {
        if table.is_protected(path) {
            return GateDecision::Redirect(table.login_redirect().to_string());
        }
        return GateDecision::Forward;
    }

    if table.is_permitted(roles, path) || !table.is_protected(path) {
        GateDecision::Forward
    } else {
        GateDecision::Redirect(table.login_redirect().to_string())
    }
}

/// gate_middleware
///
/// The single routing entry point for authorization. Reads the verified session
/// cookie (the one canonical credential carrier), resolves the role set, and either
/// forwards the request or issues a redirect. Applied once around the whole router,
/// replacing any per-route ad-hoc gating.
///
/// A redirect for a protected path carries cache-prevention headers so that no
/// intermediary or browser cache ever replays a previously authorized page to a
/// now-unauthorized caller.
pub async fn gate_middleware(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let jar = CookieJar::from_headers(request.headers());
    // Signature or expiry failure yields the empty role set: the gate never
    // trusts an unverified carrier and never propagates a parse error.
    let roles = session::read_roles(&jar, &state.config.jwt_secret);

    match decide(&state.permissions, request.uri().path(), &roles) {
        GateDecision::Forward => next.run(request).await,
        GateDecision::Redirect(_) => denial_redirect(state.permissions.login_location()),
    }
}

/// denial_redirect
///
/// Builds the 303 response for a denied request, with the no-cache header set
/// required by the gate contract. The Location value was validated when the
/// PermissionTable was built, so every denial carries it.
fn denial_redirect(location: &HeaderValue) -> Response {
    let mut response = (
        StatusCode::SEE_OTHER,
        [
            (
                header::CACHE_CONTROL,
                HeaderValue::from_static("no-store, no-cache, must-revalidate"),
            ),
            (header::PRAGMA, HeaderValue::from_static("no-cache")),
            (header::EXPIRES, HeaderValue::from_static("0")),
        ],
    )
        .into_response();

    response
        .headers_mut()
        .insert(header::LOCATION, location.clone());
    response
}
