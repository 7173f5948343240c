use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode, header},
};
use std::{sync::Arc, time::Duration};
use tower::ServiceExt;
use uuid::Uuid;
use vet_portal::{
    AppState,
    config::AppConfig,
    create_router,
    gate::PermissionTable,
    models::{
        AdminDashboardStats, Clinic, CreateClinicRequest, CreateCustomerRequest,
        CreateInvitationRequest, CreateShiftRequest, Customer, Invitation, Payment, Shift, User,
    },
    repository::Repository,
    session,
};

// --- Mock Repository ---

/// Returns one fixed user for every lookup; everything else is inert. Enough to
/// drive the gate and the defense-in-depth checks end to end without Postgres.
struct FixedUserRepo {
    user: Option<User>,
}

#[async_trait]
impl Repository for FixedUserRepo {
    async fn get_user(&self, _id: Uuid) -> Option<User> {
        self.user.clone()
    }
    async fn verify_credentials(&self, email: &str, password: &str) -> Option<User> {
        // The mock accepts one known credential pair.
        if email == "admin@vet.example" && password == "correct-horse" {
            self.user.clone()
        } else {
            None
        }
    }
    async fn get_active_clinics(&self) -> Vec<Clinic> {
        vec![]
    }
    async fn get_all_clinics(&self) -> Vec<Clinic> {
        vec![]
    }
    async fn create_clinic(&self, _req: CreateClinicRequest) -> Option<Clinic> {
        None
    }
    async fn get_customers(&self, _clinic_id: Uuid) -> Vec<Customer> {
        vec![]
    }
    async fn create_customer(
        &self,
        _clinic_id: Uuid,
        _req: CreateCustomerRequest,
    ) -> Option<Customer> {
        None
    }
    async fn get_clinic_shifts(&self, _clinic_id: Uuid) -> Vec<Shift> {
        vec![]
    }
    async fn get_open_shifts(&self) -> Vec<Shift> {
        vec![]
    }
    async fn get_vet_shifts(&self, _vet_id: Uuid) -> Vec<Shift> {
        vec![]
    }
    async fn create_shift(&self, _clinic_id: Uuid, _req: CreateShiftRequest) -> Option<Shift> {
        None
    }
    async fn claim_shift(&self, _shift_id: Uuid, _vet_id: Uuid) -> bool {
        false
    }
    async fn get_user_payments(&self, _user_id: Uuid) -> Vec<Payment> {
        vec![]
    }
    async fn create_invitation(
        &self,
        _clinic_id: Uuid,
        _req: CreateInvitationRequest,
    ) -> Option<Invitation> {
        None
    }
    async fn get_all_invitations(&self) -> Vec<Invitation> {
        vec![]
    }
    async fn delete_invitation(&self, _id: Uuid) -> bool {
        false
    }
    async fn get_user_clinic(&self, _user_id: Uuid) -> Option<Uuid> {
        None
    }
    async fn get_stats(&self) -> AdminDashboardStats {
        AdminDashboardStats {
            total_clinics: 2,
            total_users: 10,
            total_customers: 40,
            open_shifts: 3,
        }
    }
}

// --- Helpers ---

const TEST_JWT_SECRET: &str = "test-secret-value-1234567890";
const TEST_USER_ID: Uuid = Uuid::from_u128(7);

fn test_router(roles_in_db: &[&str]) -> axum::Router {
    let mut config = AppConfig::default();
    config.env = vet_portal::config::Env::Production;
    config.jwt_secret = TEST_JWT_SECRET.to_string();

    let user = User {
        id: TEST_USER_ID,
        email: "admin@vet.example".to_string(),
        roles: roles_in_db.iter().map(|s| s.to_string()).collect(),
    };

    let state = AppState {
        repo: Arc::new(FixedUserRepo { user: Some(user) }),
        config,
        permissions: PermissionTable::standard("/"),
    };
    create_router(state)
}

fn session_header(roles: &[&str]) -> String {
    let roles: Vec<String> = roles.iter().map(|s| s.to_string()).collect();
    let cookie = session::issue(
        TEST_USER_ID,
        &roles,
        TEST_JWT_SECRET,
        Duration::from_secs(3600),
    )
    .unwrap();
    format!("{}={}", session::SESSION_COOKIE, cookie.value())
}

async fn send(router: axum::Router, request: Request<Body>) -> axum::http::Response<Body> {
    router.oneshot(request).await.unwrap()
}

fn get(path: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(path)
        .body(Body::empty())
        .unwrap()
}

fn get_with_session(path: &str, roles: &[&str]) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(path)
        .header(header::COOKIE, session_header(roles))
        .body(Body::empty())
        .unwrap()
}

// --- Tests ---

#[tokio::test]
async fn health_is_reachable_without_a_session() {
    let response = send(test_router(&[]), get("/health")).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn anonymous_protected_request_redirects_with_no_cache_headers() {
    let response = send(test_router(&[]), get("/admin/stats")).await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/");
    // The denial must not be cacheable anywhere.
    assert_eq!(
        response.headers().get(header::CACHE_CONTROL).unwrap(),
        "no-store, no-cache, must-revalidate"
    );
    assert_eq!(response.headers().get(header::PRAGMA).unwrap(), "no-cache");
    assert_eq!(response.headers().get(header::EXPIRES).unwrap(), "0");
}

#[tokio::test]
async fn admin_session_reaches_admin_stats() {
    let response = send(
        test_router(&["Admin"]),
        get_with_session("/admin/stats", &["Admin"]),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn user_session_is_redirected_from_admin_paths() {
    let response = send(
        test_router(&["User"]),
        get_with_session("/admin/stats", &["User"]),
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        response.headers().get(header::CACHE_CONTROL).unwrap(),
        "no-store, no-cache, must-revalidate"
    );
}

#[tokio::test]
async fn user_session_reaches_user_routes() {
    let response = send(
        test_router(&["User"]),
        get_with_session("/user/me", &["User"]),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn tampered_session_fails_closed() {
    let mut cookie = session_header(&["Admin"]);
    // Corrupt the signature portion of the token.
    cookie.push_str("tampered");
    let request = Request::builder()
        .method("GET")
        .uri("/admin/stats")
        .header(header::COOKIE, cookie)
        .body(Body::empty())
        .unwrap();

    let response = send(test_router(&["Admin"]), request).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
}

#[tokio::test]
async fn unknown_public_path_is_not_gated() {
    // The gate forwards; the router then has nothing mounted there. 404, not a
    // redirect, proving "/administration" is not captured by "/admin".
    let response = send(test_router(&[]), get("/administration")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn gate_spans_every_protected_prefix() {
    for path in [
        "/admin/stats",
        "/staff/shifts",
        "/clinic/customers",
        "/vet/shifts",
        "/user/payments",
    ] {
        let response = send(test_router(&[]), get(path)).await;
        assert_eq!(
            response.status(),
            StatusCode::SEE_OTHER,
            "expected redirect for anonymous {path}"
        );
    }
}

#[tokio::test]
async fn login_sets_session_and_logout_clears_it() {
    let router = test_router(&["Admin"]);

    let login = Request::builder()
        .method("POST")
        .uri("/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            r#"{"email":"admin@vet.example","password":"correct-horse"}"#,
        ))
        .unwrap();
    let response = send(router.clone(), login).await;
    assert_eq!(response.status(), StatusCode::OK);
    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .expect("login must set the session cookie")
        .to_str()
        .unwrap();
    assert!(set_cookie.starts_with(&format!("{}=", session::SESSION_COOKIE)));
    assert!(set_cookie.contains("HttpOnly"));

    let logout = Request::builder()
        .method("POST")
        .uri("/logout")
        .body(Body::empty())
        .unwrap();
    let response = send(router, logout).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let cleared = response
        .headers()
        .get(header::SET_COOKIE)
        .expect("logout must clear the session cookie")
        .to_str()
        .unwrap();
    assert!(cleared.starts_with(&format!("{}=", session::SESSION_COOKIE)));
}

#[tokio::test]
async fn login_with_bad_credentials_sets_no_cookie() {
    let login = Request::builder()
        .method("POST")
        .uri("/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            r#"{"email":"admin@vet.example","password":"wrong"}"#,
        ))
        .unwrap();
    let response = send(test_router(&["Admin"]), login).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(response.headers().get(header::SET_COOKIE).is_none());
}

#[tokio::test]
async fn demoted_user_is_stopped_by_the_handler_layer() {
    // Token still says Admin (gate forwards), but the database now says User:
    // the handler's defense-in-depth role check returns 403.
    let response = send(
        test_router(&["User"]),
        get_with_session("/admin/stats", &["Admin"]),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}
