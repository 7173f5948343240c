use crate::{
    AppState,
    auth::AuthUser,
    models::{
        AdminDashboardStats, Clinic, CreateClinicRequest, CreateCustomerRequest,
        CreateInvitationRequest, CreateShiftRequest, Customer, Invitation, LoginRequest, Payment,
        Shift, UserProfile,
    },
    session,
};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use std::time::Duration;
use uuid::Uuid;

// --- Public Handlers ---

/// login
///
/// [Public Route] Establishes a session. The repository verifies the credentials
/// against the stored hash; success mints the signed session cookie carrying the
/// user's role set. Failure returns 401 with no cookie and no detail about which
/// part of the credential was wrong.
#[utoipa::path(
    post,
    path = "/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Session established", body = UserProfile),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    jar: axum_extra::extract::CookieJar,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, StatusCode> {
    let user = state
        .repo
        .verify_credentials(&payload.email, &payload.password)
        .await
        .ok_or(StatusCode::UNAUTHORIZED)?;

    let cookie = session::issue(
        user.id,
        &user.roles,
        &state.config.jwt_secret,
        Duration::from_secs(state.config.session_ttl_secs),
    )
    .map_err(|e| {
        tracing::error!("session issue error: {:?}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    let profile = UserProfile {
        id: user.id,
        email: user.email,
        roles: user.roles,
    };

    Ok((jar.add(cookie), Json(profile)))
}

/// logout
///
/// [Public Route] Clears the session cookie unconditionally. Logging out without
/// a session is a no-op, not an error.
#[utoipa::path(
    post,
    path = "/logout",
    responses((status = 204, description = "Session cleared"))
)]
pub async fn logout(jar: axum_extra::extract::CookieJar) -> impl IntoResponse {
    (jar.remove(session::clear()), StatusCode::NO_CONTENT)
}

/// get_clinics
///
/// [Public Route] The clinic directory. The repository enforces `is_active = true`
/// unconditionally so deactivated clinics never appear.
#[utoipa::path(
    get,
    path = "/clinics",
    responses((status = 200, description = "Active clinics", body = [Clinic]))
)]
pub async fn get_clinics(State(state): State<AppState>) -> Json<Vec<Clinic>> {
    Json(state.repo.get_active_clinics().await)
}

// --- /user Handlers ---

/// get_me
///
/// [User Route] The authenticated account's profile, resolved from the session
/// and the current database record.
#[utoipa::path(
    get,
    path = "/user/me",
    responses((status = 200, description = "Profile", body = UserProfile))
)]
pub async fn get_me(
    AuthUser { id, .. }: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<UserProfile>, StatusCode> {
    let user = state.repo.get_user(id).await.ok_or(StatusCode::NOT_FOUND)?;
    Ok(Json(UserProfile {
        id: user.id,
        email: user.email,
        roles: user.roles,
    }))
}

/// get_my_payments
///
/// [User Route] Payment history for the authenticated account only. The `user_id`
/// comes from the resolved session, never a query parameter.
#[utoipa::path(
    get,
    path = "/user/payments",
    responses((status = 200, description = "My payments", body = [Payment]))
)]
pub async fn get_my_payments(
    AuthUser { id, .. }: AuthUser,
    State(state): State<AppState>,
) -> Json<Vec<Payment>> {
    Json(state.repo.get_user_payments(id).await)
}

// --- /vet Handlers ---

/// get_my_shifts
///
/// [Vet Route] The vet's own schedule: shifts they have claimed.
#[utoipa::path(
    get,
    path = "/vet/shifts",
    responses((status = 200, description = "My shifts", body = [Shift]))
)]
pub async fn get_my_shifts(
    AuthUser { id, .. }: AuthUser,
    State(state): State<AppState>,
) -> Json<Vec<Shift>> {
    Json(state.repo.get_vet_shifts(id).await)
}

/// claim_shift
///
/// [Vet Route] Claims an open shift for the authenticated vet.
///
/// *Idempotency*: the repository's `vet_id IS NULL` guard means a double claim or
/// a lost race affects 0 rows and surfaces as 409 Conflict.
#[utoipa::path(
    post,
    path = "/vet/shifts/{id}/claim",
    params(("id" = Uuid, Path, description = "Shift ID")),
    responses(
        (status = 200, description = "Claimed"),
        (status = 409, description = "Already claimed")
    )
)]
pub async fn claim_shift(
    AuthUser { id: vet_id, .. }: AuthUser,
    State(state): State<AppState>,
    Path(shift_id): Path<Uuid>,
) -> Result<StatusCode, StatusCode> {
    match state.repo.claim_shift(shift_id, vet_id).await {
        true => Ok(StatusCode::OK),
        false => Err(StatusCode::CONFLICT),
    }
}

// --- /clinic Handlers ---

/// get_clinic_customers
///
/// [Clinic Route] Lists the caller's clinic's customers. The clinic scope is
/// resolved from the membership table, so one clinic can never read another's
/// customer book.
#[utoipa::path(
    get,
    path = "/clinic/customers",
    responses(
        (status = 200, description = "Customers", body = [Customer]),
        (status = 404, description = "No clinic membership")
    )
)]
pub async fn get_clinic_customers(
    AuthUser { id, .. }: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<Customer>>, StatusCode> {
    let clinic_id = state
        .repo
        .get_user_clinic(id)
        .await
        .ok_or(StatusCode::NOT_FOUND)?;
    Ok(Json(state.repo.get_customers(clinic_id).await))
}

/// create_customer
///
/// [Clinic Route] Registers a customer under the caller's clinic.
#[utoipa::path(
    post,
    path = "/clinic/customers",
    request_body = CreateCustomerRequest,
    responses(
        (status = 200, description = "Created", body = Customer),
        (status = 404, description = "No clinic membership")
    )
)]
pub async fn create_customer(
    AuthUser { id, .. }: AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<CreateCustomerRequest>,
) -> Result<Json<Customer>, StatusCode> {
    let clinic_id = state
        .repo
        .get_user_clinic(id)
        .await
        .ok_or(StatusCode::NOT_FOUND)?;
    state
        .repo
        .create_customer(clinic_id, payload)
        .await
        .map(Json)
        .ok_or(StatusCode::INTERNAL_SERVER_ERROR)
}

/// get_clinic_shifts
///
/// [Clinic Route] All shifts posted by the caller's clinic, open or claimed.
#[utoipa::path(
    get,
    path = "/clinic/shifts",
    responses(
        (status = 200, description = "Shifts", body = [Shift]),
        (status = 404, description = "No clinic membership")
    )
)]
pub async fn get_clinic_shifts(
    AuthUser { id, .. }: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<Shift>>, StatusCode> {
    let clinic_id = state
        .repo
        .get_user_clinic(id)
        .await
        .ok_or(StatusCode::NOT_FOUND)?;
    Ok(Json(state.repo.get_clinic_shifts(clinic_id).await))
}

/// create_shift
///
/// [Clinic Route] Posts a new open shift for the caller's clinic.
#[utoipa::path(
    post,
    path = "/clinic/shifts",
    request_body = CreateShiftRequest,
    responses(
        (status = 200, description = "Created", body = Shift),
        (status = 404, description = "No clinic membership")
    )
)]
pub async fn create_shift(
    AuthUser { id, .. }: AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<CreateShiftRequest>,
) -> Result<Json<Shift>, StatusCode> {
    let clinic_id = state
        .repo
        .get_user_clinic(id)
        .await
        .ok_or(StatusCode::NOT_FOUND)?;
    state
        .repo
        .create_shift(clinic_id, payload)
        .await
        .map(Json)
        .ok_or(StatusCode::INTERNAL_SERVER_ERROR)
}

/// create_invitation
///
/// [Clinic Route] Invites a staff member or vet to the caller's clinic. The
/// invitation is consumed by the external signup flow.
#[utoipa::path(
    post,
    path = "/clinic/invitations",
    request_body = CreateInvitationRequest,
    responses(
        (status = 200, description = "Created", body = Invitation),
        (status = 404, description = "No clinic membership")
    )
)]
pub async fn create_invitation(
    AuthUser { id, .. }: AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<CreateInvitationRequest>,
) -> Result<Json<Invitation>, StatusCode> {
    let clinic_id = state
        .repo
        .get_user_clinic(id)
        .await
        .ok_or(StatusCode::NOT_FOUND)?;
    state
        .repo
        .create_invitation(clinic_id, payload)
        .await
        .map(Json)
        .ok_or(StatusCode::INTERNAL_SERVER_ERROR)
}

// --- /staff Handlers ---

/// get_open_shifts
///
/// [Staff Route] The shift board: every shift still waiting for a vet, across
/// all clinics.
#[utoipa::path(
    get,
    path = "/staff/shifts",
    responses((status = 200, description = "Open shifts", body = [Shift]))
)]
pub async fn get_open_shifts(State(state): State<AppState>) -> Json<Vec<Shift>> {
    Json(state.repo.get_open_shifts().await)
}

/// get_staff_customers
///
/// [Staff Route] The customer book of the staff member's clinic.
#[utoipa::path(
    get,
    path = "/staff/customers",
    responses(
        (status = 200, description = "Customers", body = [Customer]),
        (status = 404, description = "No clinic membership")
    )
)]
pub async fn get_staff_customers(
    AuthUser { id, .. }: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<Customer>>, StatusCode> {
    let clinic_id = state
        .repo
        .get_user_clinic(id)
        .await
        .ok_or(StatusCode::NOT_FOUND)?;
    Ok(Json(state.repo.get_customers(clinic_id).await))
}

// --- /admin Handlers ---

/// get_admin_stats
///
/// [Admin Route] Core platform statistics for the dashboard.
///
/// *Defense in Depth*: the gate has already filtered this path, but the handler
/// re-checks the "Admin" role from the resolved AuthUser anyway.
#[utoipa::path(
    get,
    path = "/admin/stats",
    responses((status = 200, description = "Stats", body = AdminDashboardStats))
)]
pub async fn get_admin_stats(
    auth: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<AdminDashboardStats>, StatusCode> {
    if !auth.has_role("Admin") {
        return Err(StatusCode::FORBIDDEN);
    }
    Ok(Json(state.repo.get_stats().await))
}

/// get_admin_clinics
///
/// [Admin Route] Every clinic in the system, active or not.
#[utoipa::path(
    get,
    path = "/admin/clinics",
    responses((status = 200, description = "All clinics", body = [Clinic]))
)]
pub async fn get_admin_clinics(
    auth: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<Clinic>>, StatusCode> {
    if !auth.has_role("Admin") {
        return Err(StatusCode::FORBIDDEN);
    }
    Ok(Json(state.repo.get_all_clinics().await))
}

/// create_clinic
///
/// [Admin Route] Registers a new clinic on the platform.
#[utoipa::path(
    post,
    path = "/admin/clinics",
    request_body = CreateClinicRequest,
    responses((status = 200, description = "Created", body = Clinic))
)]
pub async fn create_clinic(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<CreateClinicRequest>,
) -> Result<Json<Clinic>, StatusCode> {
    if !auth.has_role("Admin") {
        return Err(StatusCode::FORBIDDEN);
    }
    state
        .repo
        .create_clinic(payload)
        .await
        .map(Json)
        .ok_or(StatusCode::INTERNAL_SERVER_ERROR)
}

/// get_admin_invitations
///
/// [Admin Route] All invitations across clinics, pending and accepted.
#[utoipa::path(
    get,
    path = "/admin/invitations",
    responses((status = 200, description = "All invitations", body = [Invitation]))
)]
pub async fn get_admin_invitations(
    auth: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<Invitation>>, StatusCode> {
    if !auth.has_role("Admin") {
        return Err(StatusCode::FORBIDDEN);
    }
    Ok(Json(state.repo.get_all_invitations().await))
}

/// revoke_invitation
///
/// [Admin Route] Revokes a pending invitation. Accepted invitations cannot be
/// revoked and return 404.
#[utoipa::path(
    delete,
    path = "/admin/invitations/{id}",
    params(("id" = Uuid, Path, description = "Invitation ID")),
    responses(
        (status = 204, description = "Revoked"),
        (status = 404, description = "Not found or already accepted")
    )
)]
pub async fn revoke_invitation(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> StatusCode {
    if !auth.has_role("Admin") {
        return StatusCode::FORBIDDEN;
    }
    if state.repo.delete_invitation(id).await {
        StatusCode::NO_CONTENT
    } else {
        StatusCode::NOT_FOUND
    }
}
