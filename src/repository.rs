use crate::models::{
    AdminDashboardStats, Clinic, CreateClinicRequest, CreateCustomerRequest,
    CreateInvitationRequest, CreateShiftRequest, Customer, Invitation, Payment, Shift, User,
};
use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

/// Repository Trait
///
/// Defines the abstract contract for all persistence operations. This is the core
/// of the Repository Abstraction pattern, allowing the handlers to interact with
/// the data layer without knowing the specific implementation (Postgres, Mock, etc.).
///
/// **Send + Sync + async_trait** are required to make the trait object (`Arc<dyn Repository>`)
/// safely shareable and usable across Axum's asynchronous task boundaries.
#[async_trait]
pub trait Repository: Send + Sync {
    // --- User/Auth ---
    async fn get_user(&self, id: Uuid) -> Option<User>;
    // Login: returns the user only when email + password verify against the stored hash.
    async fn verify_credentials(&self, email: &str, password: &str) -> Option<User>;

    // --- Clinics ---
    // Public directory listing. Must enforce is_active=true.
    async fn get_active_clinics(&self) -> Vec<Clinic>;
    // Admin access: retrieves all clinics regardless of status.
    async fn get_all_clinics(&self) -> Vec<Clinic>;
    async fn create_clinic(&self, req: CreateClinicRequest) -> Option<Clinic>;

    // --- Customers ---
    // Scoped to one clinic; staff and clinic accounts never see other clinics' customers.
    async fn get_customers(&self, clinic_id: Uuid) -> Vec<Customer>;
    async fn create_customer(&self, clinic_id: Uuid, req: CreateCustomerRequest)
    -> Option<Customer>;

    // --- Shifts ---
    async fn get_clinic_shifts(&self, clinic_id: Uuid) -> Vec<Shift>;
    // Board listing: every shift with no assigned vet yet.
    async fn get_open_shifts(&self) -> Vec<Shift>;
    // Shifts claimed by one vet.
    async fn get_vet_shifts(&self, vet_id: Uuid) -> Vec<Shift>;
    async fn create_shift(&self, clinic_id: Uuid, req: CreateShiftRequest) -> Option<Shift>;
    // Idempotency guard: only claims a shift that is still unassigned, returning
    // false on a lost race or an already-claimed shift.
    async fn claim_shift(&self, shift_id: Uuid, vet_id: Uuid) -> bool;

    // --- Payments ---
    async fn get_user_payments(&self, user_id: Uuid) -> Vec<Payment>;

    // --- Invitations ---
    async fn create_invitation(&self, clinic_id: Uuid, req: CreateInvitationRequest)
    -> Option<Invitation>;
    async fn get_all_invitations(&self) -> Vec<Invitation>;
    // Admin action: revokes a pending invitation. Returns false if already accepted or absent.
    async fn delete_invitation(&self, id: Uuid) -> bool;

    // --- Membership ---
    // Resolves the clinic a staff/clinic/vet account belongs to, if any.
    async fn get_user_clinic(&self, user_id: Uuid) -> Option<Uuid>;

    // --- Dashboard ---
    async fn get_stats(&self) -> AdminDashboardStats;
}

/// RepositoryState
///
/// The concrete type used to share the persistence layer access across the application state.
pub type RepositoryState = Arc<dyn Repository>;

/// PostgresRepository
///
/// The concrete implementation of the `Repository` trait, backed by the PostgreSQL database.
pub struct PostgresRepository {
    pool: PgPool,
}

impl PostgresRepository {
    /// Creates a new repository instance using the initialized connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Repository for PostgresRepository {
    /// get_user
    ///
    /// Retrieves the profile data (ID, email, roles) needed for authentication
    /// and authorization.
    async fn get_user(&self, id: Uuid) -> Option<User> {
        sqlx::query_as::<_, User>("SELECT id, email, roles FROM profiles WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .unwrap_or_else(|e| {
                tracing::error!("get_user error: {:?}", e);
                None
            })
    }

    /// verify_credentials
    ///
    /// Compares the supplied password against the stored pgcrypto hash inside the
    /// database, so the clear-text password never leaves the query parameters.
    async fn verify_credentials(&self, email: &str, password: &str) -> Option<User> {
        sqlx::query_as::<_, User>(
            "SELECT id, email, roles FROM profiles \
             WHERE email = $1 AND password_hash = crypt($2, password_hash)",
        )
        .bind(email)
        .bind(password)
        .fetch_optional(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("verify_credentials error: {:?}", e);
            None
        })
    }

    /// get_active_clinics
    ///
    /// Public directory listing. **Security**: strictly enforces `is_active = true`
    /// so deactivated clinics never leak to anonymous callers.
    async fn get_active_clinics(&self) -> Vec<Clinic> {
        sqlx::query_as::<_, Clinic>(
            "SELECT id, name, address, phone, is_active, created_at \
             FROM clinics WHERE is_active = true ORDER BY name ASC",
        )
        .fetch_all(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("get_active_clinics error: {:?}", e);
            vec![]
        })
    }

    /// get_all_clinics
    ///
    /// Administrative listing. Does *not* include the `is_active` restriction.
    async fn get_all_clinics(&self) -> Vec<Clinic> {
        sqlx::query_as::<_, Clinic>(
            "SELECT id, name, address, phone, is_active, created_at \
             FROM clinics ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("get_all_clinics error: {:?}", e);
            vec![]
        })
    }

    /// create_clinic
    ///
    /// Inserts a new clinic. New clinics start active.
    async fn create_clinic(&self, req: CreateClinicRequest) -> Option<Clinic> {
        sqlx::query_as::<_, Clinic>(
            "INSERT INTO clinics (id, name, address, phone, is_active, created_at) \
             VALUES ($1, $2, $3, $4, true, NOW()) \
             RETURNING id, name, address, phone, is_active, created_at",
        )
        .bind(Uuid::new_v4())
        .bind(req.name)
        .bind(req.address)
        .bind(req.phone)
        .fetch_optional(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("create_clinic error: {:?}", e);
            None
        })
    }

    /// get_customers
    ///
    /// Retrieves the customers of a single clinic. The `clinic_id` comes from the
    /// caller's resolved membership, never from a client-supplied parameter.
    async fn get_customers(&self, clinic_id: Uuid) -> Vec<Customer> {
        sqlx::query_as::<_, Customer>(
            "SELECT id, clinic_id, name, email, phone, pet_name, pet_species, created_at \
             FROM customers WHERE clinic_id = $1 ORDER BY created_at DESC",
        )
        .bind(clinic_id)
        .fetch_all(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("get_customers error: {:?}", e);
            vec![]
        })
    }

    /// create_customer
    ///
    /// Registers a customer under the given clinic.
    async fn create_customer(
        &self,
        clinic_id: Uuid,
        req: CreateCustomerRequest,
    ) -> Option<Customer> {
        sqlx::query_as::<_, Customer>(
            "INSERT INTO customers \
             (id, clinic_id, name, email, phone, pet_name, pet_species, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, NOW()) \
             RETURNING id, clinic_id, name, email, phone, pet_name, pet_species, created_at",
        )
        .bind(Uuid::new_v4())
        .bind(clinic_id)
        .bind(req.name)
        .bind(req.email)
        .bind(req.phone)
        .bind(req.pet_name)
        .bind(req.pet_species)
        .fetch_optional(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("create_customer error: {:?}", e);
            None
        })
    }

    /// get_clinic_shifts
    ///
    /// All shifts posted by one clinic, open or claimed.
    async fn get_clinic_shifts(&self, clinic_id: Uuid) -> Vec<Shift> {
        sqlx::query_as::<_, Shift>(
            "SELECT id, clinic_id, vet_id, starts_at, ends_at, hourly_rate_cents, created_at \
             FROM shifts WHERE clinic_id = $1 ORDER BY starts_at ASC",
        )
        .bind(clinic_id)
        .fetch_all(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("get_clinic_shifts error: {:?}", e);
            vec![]
        })
    }

    /// get_open_shifts
    ///
    /// The staff board: every shift still waiting for a vet.
    async fn get_open_shifts(&self) -> Vec<Shift> {
        sqlx::query_as::<_, Shift>(
            "SELECT id, clinic_id, vet_id, starts_at, ends_at, hourly_rate_cents, created_at \
             FROM shifts WHERE vet_id IS NULL ORDER BY starts_at ASC",
        )
        .fetch_all(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("get_open_shifts error: {:?}", e);
            vec![]
        })
    }

    /// get_vet_shifts
    ///
    /// The schedule of one vet: shifts they have claimed.
    async fn get_vet_shifts(&self, vet_id: Uuid) -> Vec<Shift> {
        sqlx::query_as::<_, Shift>(
            "SELECT id, clinic_id, vet_id, starts_at, ends_at, hourly_rate_cents, created_at \
             FROM shifts WHERE vet_id = $1 ORDER BY starts_at ASC",
        )
        .bind(vet_id)
        .fetch_all(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("get_vet_shifts error: {:?}", e);
            vec![]
        })
    }

    /// create_shift
    ///
    /// Posts a new open shift for the clinic.
    async fn create_shift(&self, clinic_id: Uuid, req: CreateShiftRequest) -> Option<Shift> {
        sqlx::query_as::<_, Shift>(
            "INSERT INTO shifts \
             (id, clinic_id, vet_id, starts_at, ends_at, hourly_rate_cents, created_at) \
             VALUES ($1, $2, NULL, $3, $4, $5, NOW()) \
             RETURNING id, clinic_id, vet_id, starts_at, ends_at, hourly_rate_cents, created_at",
        )
        .bind(Uuid::new_v4())
        .bind(clinic_id)
        .bind(req.starts_at)
        .bind(req.ends_at)
        .bind(req.hourly_rate_cents)
        .fetch_optional(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("create_shift error: {:?}", e);
            None
        })
    }

    /// claim_shift
    ///
    /// Claims a shift for a vet. The `vet_id IS NULL` guard makes the claim
    /// race-safe: whichever UPDATE lands first wins, everyone else affects 0 rows.
    async fn claim_shift(&self, shift_id: Uuid, vet_id: Uuid) -> bool {
        let result = sqlx::query("UPDATE shifts SET vet_id = $2 WHERE id = $1 AND vet_id IS NULL")
            .bind(shift_id)
            .bind(vet_id)
            .execute(&self.pool)
            .await;
        match result {
            Ok(res) => res.rows_affected() > 0,
            Err(e) => {
                tracing::error!("claim_shift error: {:?}", e);
                false
            }
        }
    }

    /// get_user_payments
    ///
    /// Payment history scoped to the authenticated account.
    async fn get_user_payments(&self, user_id: Uuid) -> Vec<Payment> {
        sqlx::query_as::<_, Payment>(
            "SELECT id, user_id, clinic_id, amount_cents, status, created_at \
             FROM payments WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("get_user_payments error: {:?}", e);
            vec![]
        })
    }

    /// create_invitation
    ///
    /// Issues an invitation for the clinic. Accepted state starts false; the
    /// external signup flow flips it.
    async fn create_invitation(
        &self,
        clinic_id: Uuid,
        req: CreateInvitationRequest,
    ) -> Option<Invitation> {
        sqlx::query_as::<_, Invitation>(
            "INSERT INTO invitations (id, clinic_id, email, role, accepted, created_at) \
             VALUES ($1, $2, $3, $4, false, NOW()) \
             RETURNING id, clinic_id, email, role, accepted, created_at",
        )
        .bind(Uuid::new_v4())
        .bind(clinic_id)
        .bind(req.email)
        .bind(req.role)
        .fetch_optional(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("create_invitation error: {:?}", e);
            None
        })
    }

    /// get_all_invitations
    ///
    /// Administrative listing across all clinics.
    async fn get_all_invitations(&self) -> Vec<Invitation> {
        sqlx::query_as::<_, Invitation>(
            "SELECT id, clinic_id, email, role, accepted, created_at \
             FROM invitations ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("get_all_invitations error: {:?}", e);
            vec![]
        })
    }

    /// delete_invitation
    ///
    /// Revokes a pending invitation. Accepted invitations stay for the audit trail.
    async fn delete_invitation(&self, id: Uuid) -> bool {
        let result = sqlx::query("DELETE FROM invitations WHERE id = $1 AND accepted = false")
            .bind(id)
            .execute(&self.pool)
            .await;
        match result {
            Ok(res) => res.rows_affected() > 0,
            Err(e) => {
                tracing::error!("delete_invitation error: {:?}", e);
                false
            }
        }
    }

    /// get_user_clinic
    ///
    /// Resolves a staff/clinic/vet account to its clinic via the membership table.
    async fn get_user_clinic(&self, user_id: Uuid) -> Option<Uuid> {
        sqlx::query_scalar::<_, Uuid>(
            "SELECT clinic_id FROM clinic_members WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("get_user_clinic error: {:?}", e);
            None
        })
    }

    /// get_stats
    ///
    /// Compiles all counters for the administrative dashboard in one call.
    async fn get_stats(&self) -> AdminDashboardStats {
        let total_clinics = count(&self.pool, "SELECT COUNT(*) FROM clinics").await;
        let total_users = count(&self.pool, "SELECT COUNT(*) FROM profiles").await;
        let total_customers = count(&self.pool, "SELECT COUNT(*) FROM customers").await;
        let open_shifts =
            count(&self.pool, "SELECT COUNT(*) FROM shifts WHERE vet_id IS NULL").await;
        AdminDashboardStats {
            total_clinics,
            total_users,
            total_customers,
            open_shifts,
        }
    }
}

/// Runs a COUNT(*) query, degrading to 0 on database errors.
async fn count(pool: &PgPool, sql: &str) -> i64 {
    sqlx::query_scalar::<_, i64>(sql)
        .fetch_one(pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("count error ({sql}): {:?}", e);
            0
        })
}
