use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{get, post},
};

/// Vet Router Module
///
/// Routes nested under "/vet", reachable through the gate for the Vet role (or
/// Admin). Covers a vet's own schedule and the claim operation against the open
/// shift board.
pub fn vet_routes() -> Router<AppState> {
    Router::new()
        // GET /vet/shifts
        // The vet's claimed shifts, ordered by start time.
        .route("/shifts", get(handlers::get_my_shifts))
        // POST /vet/shifts/{id}/claim
        // Claims an open shift. Race-safe at the repository level: a shift that
        // was claimed in between surfaces as 409.
        .route("/shifts/{id}/claim", post(handlers::claim_shift))
}
