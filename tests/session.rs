//! Vendor session client: authentication and the single retry on 401.

use serde_json::json;
use starline_dash::errors::StarlineError;
use starline_dash::starline::session::{SessionClient, VendorSession};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SLID: &str = "slidtoken:4200042";
const AUTH_PATH: &str = "/json/v2/auth.slid";
const DATA_PATH: &str = "/json/v3/user/42/data";

fn auth_ok(cookie: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .insert_header("set-cookie", format!("slnet={}; Path=/; HttpOnly", cookie).as_str())
        .set_body_json(json!({"code": 200, "codestring": "OK", "user_id": 42}))
}

fn device_data() -> serde_json::Value {
    json!({
        "code": 200,
        "codestring": "OK",
        "user_data": {"devices": [{"activity_ts": 1700000000, "obd": {"mileage": 12345}}]}
    })
}

#[tokio::test]
async fn test_authenticate_extracts_cookie_and_user_id() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(AUTH_PATH))
        .and(body_json(json!({"slid_token": SLID})))
        .respond_with(auth_ok("cookie-1"))
        .expect(1)
        .mount(&server)
        .await;

    let mut client = SessionClient::new(server.uri(), SLID).unwrap();
    let session = client.authenticate().await.unwrap().clone();

    assert_eq!(
        session,
        VendorSession {
            slnet: "cookie-1".into(),
            user_id: "42".into()
        }
    );
    assert!(client.is_authenticated());
}

#[tokio::test]
async fn test_authenticate_without_cookie_fails() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(AUTH_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"user_id": 42})))
        .mount(&server)
        .await;

    let mut client = SessionClient::new(server.uri(), SLID).unwrap();
    let err = client.authenticate().await.unwrap_err();

    assert!(matches!(err, StarlineError::Auth(_)));
    assert!(!client.is_authenticated());
}

#[tokio::test]
async fn test_authenticate_http_error_fails() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(AUTH_PATH))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let mut client = SessionClient::new(server.uri(), SLID).unwrap();
    assert!(matches!(client.authenticate().await, Err(StarlineError::Auth(_))));
    assert!(!client.is_authenticated());
}

#[tokio::test]
async fn test_fetch_authenticates_lazily_and_sends_cookie() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(AUTH_PATH))
        .respond_with(auth_ok("cookie-1"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(DATA_PATH))
        .and(header("cookie", "slnet=cookie-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(device_data()))
        .expect(2)
        .mount(&server)
        .await;

    let mut client = SessionClient::new(server.uri(), SLID).unwrap();
    assert_eq!(client.fetch_device_data().await.unwrap(), device_data());
    // second fetch reuses the in-memory session
    assert_eq!(client.fetch_device_data().await.unwrap(), device_data());
}

#[tokio::test]
async fn test_expired_cookie_reauthenticates_once() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(AUTH_PATH))
        .respond_with(auth_ok("stale"))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(AUTH_PATH))
        .respond_with(auth_ok("fresh"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(DATA_PATH))
        .and(header("cookie", "slnet=stale"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(DATA_PATH))
        .and(header("cookie", "slnet=fresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(device_data()))
        .expect(1)
        .mount(&server)
        .await;

    let mut client = SessionClient::new(server.uri(), SLID).unwrap();
    assert_eq!(client.fetch_device_data().await.unwrap(), device_data());
    assert_eq!(client.session().unwrap().slnet, "fresh");
}

#[tokio::test]
async fn test_second_401_is_fetch_error_without_third_attempt() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(AUTH_PATH))
        .respond_with(auth_ok("cookie"))
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(DATA_PATH))
        .respond_with(ResponseTemplate::new(401))
        .expect(2)
        .mount(&server)
        .await;

    let mut client = SessionClient::new(server.uri(), SLID).unwrap();
    let err = client.fetch_device_data().await.unwrap_err();

    assert!(matches!(err, StarlineError::Fetch(_)));
    // stays authenticated with the stale pair until the next 401
    assert!(client.is_authenticated());
}

#[tokio::test]
async fn test_failed_reauth_after_401_keeps_stale_pair() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(AUTH_PATH))
        .respond_with(auth_ok("stale"))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(AUTH_PATH))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(DATA_PATH))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    let mut client = SessionClient::new(server.uri(), SLID).unwrap();
    let err = client.fetch_device_data().await.unwrap_err();

    assert!(matches!(err, StarlineError::Auth(_)));
    assert_eq!(client.session().unwrap().slnet, "stale");
}

#[tokio::test]
async fn test_server_error_is_fetch_error_without_retry() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(AUTH_PATH))
        .respond_with(auth_ok("cookie"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(DATA_PATH))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let mut client = SessionClient::new(server.uri(), SLID).unwrap();
    assert!(matches!(client.fetch_device_data().await, Err(StarlineError::Fetch(_))));
}

#[tokio::test]
async fn test_fetch_surfaces_auth_error_when_unauthenticated() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(AUTH_PATH))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(DATA_PATH))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let mut client = SessionClient::new(server.uri(), SLID).unwrap();
    assert!(matches!(client.fetch_device_data().await, Err(StarlineError::Auth(_))));
}
