use crate::{AppState, handlers};
use axum::{Router, routing::get};

/// Staff Router Module
///
/// Routes nested under "/staff", reachable through the gate for the Staff role
/// (or Admin). Staff see the cross-clinic open shift board and their own clinic's
/// customer book.
pub fn staff_routes() -> Router<AppState> {
    Router::new()
        // GET /staff/shifts
        // Every open (unclaimed) shift across all clinics.
        .route("/shifts", get(handlers::get_open_shifts))
        // GET /staff/customers
        // The customer book of the staff member's clinic.
        .route("/customers", get(handlers::get_staff_customers))
}
