use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use ts_rs::TS;
use utoipa::ToSchema;
use uuid::Uuid;

// --- Core Application Schemas (Mapped to Database) ---

/// User
///
/// The canonical identity record from `public.profiles`. Includes the minimal
/// data resolved during authentication: identity, contact, and the role set used
/// by the access gate.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    /// The RBAC field: zero or more of "Admin", "Staff", "Clinic", "Vet", "User".
    /// Stored as a Postgres text[] column.
    pub roles: Vec<String>,
}

/// Clinic
///
/// A veterinary clinic registered on the platform (`public.clinics`).
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct Clinic {
    pub id: Uuid,
    pub name: String,
    pub address: String,
    pub phone: String,
    /// Hidden clinics are excluded from the public directory.
    pub is_active: bool,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
}

/// Customer
///
/// A pet owner attached to a clinic (`public.customers`). Only visible to that
/// clinic's staff and to platform admins.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct Customer {
    pub id: Uuid,
    // FK to public.clinics.id (owning clinic).
    pub clinic_id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub pet_name: String,
    pub pet_species: String,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
}

/// Shift
///
/// A work shift posted by a clinic (`public.shifts`). Open shifts appear on the
/// staff board until a vet claims them.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct Shift {
    pub id: Uuid,
    pub clinic_id: Uuid,
    /// The vet who claimed the shift; None while the shift is open.
    pub vet_id: Option<Uuid>,
    #[ts(type = "string")]
    pub starts_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub ends_at: DateTime<Utc>,
    pub hourly_rate_cents: i64,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
}

/// Payment
///
/// A settled or pending payment record (`public.payments`). Read-only through
/// the API; settlement itself happens out of band.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct Payment {
    pub id: Uuid,
    // The paying customer account.
    pub user_id: Uuid,
    pub clinic_id: Uuid,
    pub amount_cents: i64,
    // "pending" | "settled" | "refunded"
    pub status: String,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
}

/// Invitation
///
/// An invitation for a new staff member or vet to join a clinic
/// (`public.invitations`). Consumed by the external signup flow.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct Invitation {
    pub id: Uuid,
    pub clinic_id: Uuid,
    pub email: String,
    /// The role the invitee will receive on acceptance.
    pub role: String,
    pub accepted: bool,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
}

// --- Request Payloads (Input Schemas) ---

/// LoginRequest
///
/// Input payload for the public login endpoint (POST /login).
/// The password is compared against the stored hash inside the database
/// (pgcrypto) and is never persisted or logged in clear text.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// CreateCustomerRequest
///
/// Input payload for registering a customer under the caller's clinic
/// (POST /clinic/customers).
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct CreateCustomerRequest {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub pet_name: String,
    pub pet_species: String,
}

/// CreateShiftRequest
///
/// Input payload for posting a new open shift (POST /clinic/shifts).
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct CreateShiftRequest {
    #[ts(type = "string")]
    pub starts_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub ends_at: DateTime<Utc>,
    pub hourly_rate_cents: i64,
}

/// CreateInvitationRequest
///
/// Input payload for inviting a staff member or vet (POST /clinic/invitations).
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct CreateInvitationRequest {
    pub email: String,
    pub role: String,
}

/// CreateClinicRequest
///
/// Input payload for registering a new clinic (POST /admin/clinics).
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct CreateClinicRequest {
    pub name: String,
    pub address: String,
    pub phone: String,
}

// --- Dashboard & Profile Schemas (Output) ---

/// AdminDashboardStats
///
/// Output schema for the administrative statistics dashboard (GET /admin/stats).
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct AdminDashboardStats {
    pub total_clinics: i64,
    pub total_users: i64,
    pub total_customers: i64,
    /// Shifts with no assigned vet.
    pub open_shifts: i64,
}

/// UserProfile
///
/// Output schema for the authenticated user's profile (GET /user/me and the
/// login response).
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct UserProfile {
    pub id: Uuid,
    pub email: String,
    pub roles: Vec<String>,
}
