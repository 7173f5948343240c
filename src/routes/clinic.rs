use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{get, post},
};

/// Clinic Router Module
///
/// Routes nested under "/clinic", reachable through the gate for the Clinic role
/// (or Admin). Every handler resolves the caller's clinic via the membership
/// table, so all reads and writes are scoped to exactly one clinic regardless of
/// what the client sends.
pub fn clinic_routes() -> Router<AppState> {
    Router::new()
        // GET/POST /clinic/customers
        // The clinic's customer book: list, and register a new customer.
        .route(
            "/customers",
            get(handlers::get_clinic_customers).post(handlers::create_customer),
        )
        // GET/POST /clinic/shifts
        // Shifts posted by this clinic, and posting a new open shift.
        .route(
            "/shifts",
            get(handlers::get_clinic_shifts).post(handlers::create_shift),
        )
        // POST /clinic/invitations
        // Invites a staff member or vet; consumed by the external signup flow.
        .route("/invitations", post(handlers::create_invitation))
}
