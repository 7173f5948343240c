use crate::{AppState, handlers};
use axum::{Router, routing::get};

/// User Router Module
///
/// Routes nested under "/user". The access gate forwards requests here only for
/// callers whose role set grants the "/user" prefix (the User role, or Admin).
/// Handlers additionally resolve the caller via the `AuthUser` extractor for
/// ownership-scoped queries.
pub fn user_routes() -> Router<AppState> {
    Router::new()
        // GET /user/me
        // The authenticated account's profile.
        .route("/me", get(handlers::get_me))
        // GET /user/payments
        // Payment history, scoped to the session's account.
        .route("/payments", get(handlers::get_my_payments))
}
