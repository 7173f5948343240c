use axum::http::{HeaderMap, HeaderValue, header};
use axum_extra::extract::CookieJar;
use std::time::Duration;
use uuid::Uuid;
use vet_portal::session;

const TEST_SECRET: &str = "test-secret-value-1234567890";

fn jar_with_cookie(value: &str) -> CookieJar {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::COOKIE,
        HeaderValue::from_str(&format!("{}={}", session::SESSION_COOKIE, value)).unwrap(),
    );
    CookieJar::from_headers(&headers)
}

#[test]
fn issued_session_round_trips_roles() {
    let user_id = Uuid::new_v4();
    let roles = vec!["Clinic".to_string(), "Staff".to_string()];

    let cookie = session::issue(user_id, &roles, TEST_SECRET, Duration::from_secs(3600)).unwrap();
    assert_eq!(cookie.name(), session::SESSION_COOKIE);
    assert!(cookie.http_only().unwrap_or(false));

    let jar = jar_with_cookie(cookie.value());
    let claims = session::verify(&jar, TEST_SECRET).expect("valid session should verify");
    assert_eq!(claims.sub, user_id);
    assert_eq!(session::read_roles(&jar, TEST_SECRET), roles);
}

#[test]
fn wrong_secret_rejects_the_session() {
    let cookie = session::issue(
        Uuid::new_v4(),
        &["Admin".to_string()],
        TEST_SECRET,
        Duration::from_secs(3600),
    )
    .unwrap();

    let jar = jar_with_cookie(cookie.value());
    assert!(session::verify(&jar, "some-other-secret-entirely").is_none());
    assert!(session::read_roles(&jar, "some-other-secret-entirely").is_empty());
}

#[test]
fn garbage_cookie_reads_as_no_roles() {
    let jar = jar_with_cookie("not-a-jwt-at-all");
    assert!(session::verify(&jar, TEST_SECRET).is_none());
    assert!(session::read_roles(&jar, TEST_SECRET).is_empty());
}

#[test]
fn missing_cookie_reads_as_no_roles() {
    let jar = CookieJar::from_headers(&HeaderMap::new());
    assert!(session::verify(&jar, TEST_SECRET).is_none());
    assert!(session::read_roles(&jar, TEST_SECRET).is_empty());
}

#[test]
fn empty_role_set_round_trips_as_empty() {
    let cookie =
        session::issue(Uuid::new_v4(), &[], TEST_SECRET, Duration::from_secs(3600)).unwrap();
    let jar = jar_with_cookie(cookie.value());
    // A verified session with no roles still grants nothing.
    assert!(session::verify(&jar, TEST_SECRET).is_some());
    assert!(session::read_roles(&jar, TEST_SECRET).is_empty());
}

#[test]
fn expired_session_reads_as_no_roles() {
    use jsonwebtoken::{EncodingKey, Header, encode};
    use std::time::SystemTime;

    let now = SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .unwrap()
        .as_secs() as usize;

    // Expired an hour ago, well past any validation leeway.
    let claims = vet_portal::session::Claims {
        sub: Uuid::new_v4(),
        roles: r#"["Admin"]"#.to_string(),
        iat: now - 7200,
        exp: now - 3600,
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(TEST_SECRET.as_bytes()),
    )
    .unwrap();

    let jar = jar_with_cookie(&token);
    assert!(session::verify(&jar, TEST_SECRET).is_none());
    assert!(session::read_roles(&jar, TEST_SECRET).is_empty());
}

#[test]
fn clear_targets_the_session_cookie() {
    let cookie = session::clear();
    assert_eq!(cookie.name(), session::SESSION_COOKIE);
    assert!(cookie.value().is_empty());
}
