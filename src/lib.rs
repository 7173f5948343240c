use axum::{Router, extract::FromRef, http::HeaderName, middleware};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::{Level, Span};

// --- Module Structure ---

// Core application services and components.
pub mod auth;
pub mod config;
pub mod gate;
pub mod handlers;
pub mod models;
pub mod repository;
pub mod session;

// Module for routing segregation, one module per protected prefix.
pub mod routes;
use routes::{admin, clinic, public, staff, user, vet};

// --- Public Re-exports ---

// Makes core state types easily accessible to the main application entry point (main.rs).
pub use config::AppConfig;
pub use gate::PermissionTable;
pub use repository::{PostgresRepository, RepositoryState};

/// ApiDoc
///
/// Auto-generates the OpenAPI documentation (Swagger JSON) for the application.
/// It aggregates all API paths and data schemas decorated with the
/// `#[utoipa::path]` and `#[derive(utoipa::ToSchema)]` macros.
/// The resulting JSON is served at `/api-docs/openapi.json`.
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::login, handlers::logout, handlers::get_clinics,
        handlers::get_me, handlers::get_my_payments,
        handlers::get_my_shifts, handlers::claim_shift,
        handlers::get_clinic_customers, handlers::create_customer,
        handlers::get_clinic_shifts, handlers::create_shift,
        handlers::create_invitation,
        handlers::get_open_shifts, handlers::get_staff_customers,
        handlers::get_admin_stats, handlers::get_admin_clinics,
        handlers::create_clinic, handlers::get_admin_invitations,
        handlers::revoke_invitation
    ),
    components(
        schemas(
            models::User, models::Clinic, models::Customer, models::Shift,
            models::Payment, models::Invitation, models::LoginRequest,
            models::CreateCustomerRequest, models::CreateShiftRequest,
            models::CreateInvitationRequest, models::CreateClinicRequest,
            models::AdminDashboardStats, models::UserProfile,
        )
    ),
    tags(
        (name = "vet-portal", description = "Veterinary Clinic Platform API")
    )
)]
struct ApiDoc;

/// AppState
///
/// Implements the **Unified State Pattern**: the single, thread-safe, immutable
/// container holding all essential application services and configuration,
/// shared across all incoming requests.
#[derive(Clone)]
pub struct AppState {
    /// Repository Layer: abstracts database access via the PgPool connection.
    pub repo: RepositoryState,
    /// Configuration: the loaded, immutable environment configuration.
    pub config: AppConfig,
    /// The process-wide, read-only role-to-prefix permission table used by the
    /// access gate. Built once at startup, never mutated.
    pub permissions: PermissionTable,
}

// --- Axum FromRef Extractor Implementations ---

// These allow handlers and extractors to selectively pull components from the
// shared AppState, which is what keeps dependency injection at the seams.

impl FromRef<AppState> for RepositoryState {
    fn from_ref(app_state: &AppState) -> RepositoryState {
        app_state.repo.clone()
    }
}

impl FromRef<AppState> for AppConfig {
    fn from_ref(app_state: &AppState) -> AppConfig {
        app_state.config.clone()
    }
}

impl FromRef<AppState> for PermissionTable {
    fn from_ref(app_state: &AppState) -> PermissionTable {
        app_state.permissions.clone()
    }
}

/// create_router
///
/// Assembles the application's entire routing structure, applies the access gate
/// and global middleware, and registers the application state.
///
/// The gate is attached exactly once, at this single routing entry point. Every
/// request, to any route, passes through the same consolidated decision function;
/// there are no per-route copies of the authorization logic.
pub fn create_router(state: AppState) -> Router {
    // 1. CORS Configuration
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);

    // Header name constant for Request Correlation.
    let x_request_id = HeaderName::from_static("x-request-id");

    // 2. Base Router Assembly
    let base_router = Router::new()
        // Documentation: serve the auto-generated Swagger UI.
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Public routes: reachable with an empty role set (the gate still runs,
        // but no protected prefix matches).
        .merge(public::public_routes())
        // Protected route trees, one per gated prefix.
        .nest("/user", user::user_routes())
        .nest("/vet", vet::vet_routes())
        .nest("/clinic", clinic::clinic_routes())
        .nest("/staff", staff::staff_routes())
        .nest("/admin", admin::admin_routes())
        // The Access Gate: the one authorization entry point. Runs before any
        // handler, for every route, public or protected.
        .layer(middleware::from_fn_with_state(
            state.clone(),
            gate::gate_middleware,
        ))
        // Apply the Unified State to all routes.
        .with_state(state);

    // 3. Observability and Correlation Layers (applied outermost/first)
    base_router
        .layer(
            ServiceBuilder::new()
                // 3a. Request ID Generation: a unique UUID for every incoming request.
                .layer(SetRequestIdLayer::new(x_request_id.clone(), MakeRequestUuid))
                // 3b. Request Tracing: wraps the request/response lifecycle in a
                // tracing span correlated by the generated request ID.
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(trace_span_logger)
                        .on_response(
                            DefaultOnResponse::new()
                                .level(Level::INFO)
                                .latency_unit(tower_http::LatencyUnit::Millis),
                        ),
                )
                // 3c. Request ID Propagation: returns x-request-id to the client.
                .layer(PropagateRequestIdLayer::new(x_request_id)),
        )
        // 4. CORS Layer
        .layer(cors)
}

/// trace_span_logger
///
/// Helper used by `TraceLayer` to customize span creation. Extracts the
/// `x-request-id` header (if present) and includes it in the structured logging
/// metadata alongside the HTTP method and URI, so every log line for a single
/// request is correlated by a unique ID.
fn trace_span_logger(request: &axum::http::Request<axum::body::Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "http_request",
        method = ?request.method(),
        uri = ?request.uri(),
        req_id = %request_id,
    )
}
