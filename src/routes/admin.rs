use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{delete, get},
};

/// Admin Router Module
///
/// Routes nested under "/admin", reachable through the gate only for the Admin
/// role. Provides oversight of clinics, invitations, and platform statistics.
///
/// Access Control:
/// The gate already restricts this prefix, but every handler here re-checks
/// `Admin` on the resolved AuthUser as a second, independent layer.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        // GET /admin/stats
        // Core dashboard metrics (clinics, users, customers, open shifts).
        .route("/stats", get(handlers::get_admin_stats))
        // GET/POST /admin/clinics
        // Lists ALL clinics including deactivated ones, and registers new clinics.
        .route(
            "/clinics",
            get(handlers::get_admin_clinics).post(handlers::create_clinic),
        )
        // GET /admin/invitations
        // All invitations across clinics.
        .route("/invitations", get(handlers::get_admin_invitations))
        // DELETE /admin/invitations/{id}
        // Revokes a pending invitation.
        .route("/invitations/{id}", delete(handlers::revoke_invitation))
}
