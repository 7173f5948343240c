use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{get, post},
};

/// Public Router Module
///
/// Endpoints that are **unauthenticated** and accessible to any client. These
/// cover the session entry and exit points plus read-only data explicitly marked
/// public (the active-clinic directory).
///
/// Security Mandate:
/// The directory handler must enforce `is_active = true` at the Repository level,
/// so deactivated clinics are never visible to anonymous callers.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        // GET /health
        // Unauthenticated endpoint for monitoring and load balancer checks.
        .route("/health", get(|| async { "ok" }))
        // POST /login
        // Verifies credentials and establishes the signed session cookie. This is
        // the only place a session is ever minted.
        .route("/login", post(handlers::login))
        // POST /logout
        // Clears the session cookie. Idempotent.
        .route("/logout", post(handlers::logout))
        // GET /clinics
        // The public clinic directory (active clinics only).
        .route("/clinics", get(handlers::get_clinics))
}
