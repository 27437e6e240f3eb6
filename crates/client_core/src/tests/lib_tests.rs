use super::*;
use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::NaiveDate;
use shared::domain::{Credentials, RegistrationData};
use tokio::{net::TcpListener, sync::Mutex};

const VALID_EMAIL: &str = "juan@example.com";
const VALID_PASSWORD: &str = "secret";
const TOKEN: &str = "token-123";

#[derive(Clone, Default)]
struct AccountServerState {
    registrations: Arc<Mutex<Vec<serde_json::Value>>>,
    logout_calls: Arc<Mutex<u32>>,
    fail_logout: bool,
}

fn bearer(headers: &HeaderMap) -> Option<&str> {
    headers
        .get("authorization")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
}

async fn handle_login(Json(body): Json<serde_json::Value>) -> Response {
    if body["email"] == VALID_EMAIL && body["password"] == VALID_PASSWORD {
        Json(serde_json::json!({ "token": TOKEN, "user_id": 7 })).into_response()
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(serde_json::json!({ "message": "Invalid credentials" })),
        )
            .into_response()
    }
}

async fn handle_register(
    State(state): State<AccountServerState>,
    Json(body): Json<serde_json::Value>,
) -> Response {
    if body["email"] == VALID_EMAIL {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(serde_json::json!({
                "message": "The given data was invalid.",
                "errors": {
                    "email": ["The email has already been taken."],
                    "user_name": "The user name has already been taken."
                }
            })),
        )
            .into_response();
    }
    state.registrations.lock().await.push(body);
    (StatusCode::CREATED, Json(serde_json::json!({ "id": 8 }))).into_response()
}

async fn handle_logout(State(state): State<AccountServerState>, headers: HeaderMap) -> Response {
    *state.logout_calls.lock().await += 1;
    if state.fail_logout || bearer(&headers) != Some(TOKEN) {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }
    StatusCode::NO_CONTENT.into_response()
}

async fn handle_profile(headers: HeaderMap) -> Response {
    if bearer(&headers) != Some(TOKEN) {
        return (
            StatusCode::UNAUTHORIZED,
            Json(serde_json::json!({ "message": "Unauthenticated." })),
        )
            .into_response();
    }
    Json(serde_json::json!({
        "data": {
            "id": 7,
            "name": "Juan",
            "paternal_lastname": "Pérez",
            "maternal_lastname": "García",
            "email": VALID_EMAIL,
            "phone": "987654321",
            "user_name": "jperez",
            "role": { "name": "Admin" },
            "country": { "name": "Peru" }
        }
    }))
    .into_response()
}

async fn spawn_account_server(state: AccountServerState) -> anyhow::Result<String> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let app = Router::new()
        .route("/api/auth/login", post(handle_login))
        .route("/api/auth/register", post(handle_register))
        .route("/api/auth/logout", post(handle_logout))
        .route("/api/auth/profile", get(handle_profile))
        .with_state(state);
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok(format!("http://{addr}/api"))
}

fn registration(email: &str) -> RegistrationData {
    let mut data =
        RegistrationData::with_session_date(NaiveDate::from_ymd_opt(2024, 5, 2).expect("date"));
    data.document_number = "87654321".into();
    data.name = "Ana".into();
    data.paternal_lastname = "Rojas".into();
    data.maternal_lastname = "Luna".into();
    data.email = email.into();
    data.phone = "987654321".into();
    data.user_name = "arojas".into();
    data.password = "hunter2".into();
    data
}

#[tokio::test]
async fn login_stores_token_used_for_profile_fetch() {
    let base = spawn_account_server(AccountServerState::default())
        .await
        .expect("spawn server");
    let client = AccountClient::new(&base).expect("client");

    client
        .login(&Credentials::new(VALID_EMAIL, VALID_PASSWORD))
        .await
        .expect("login");

    let profile = client.refresh().await.expect("profile");
    assert_eq!(profile.user_name, "jperez");
    assert_eq!(profile.role.as_ref().map(|role| role.name.as_str()), Some("Admin"));

    let state = client.state().borrow().clone();
    assert!(!state.loading);
    assert_eq!(state.profile, Some(profile));
    assert!(state.error.is_none());
}

#[tokio::test]
async fn rejected_login_publishes_service_message() {
    let base = spawn_account_server(AccountServerState::default())
        .await
        .expect("spawn server");
    let client = AccountClient::new(&base).expect("client");

    let err = client
        .login(&Credentials::new(VALID_EMAIL, "wrong"))
        .await
        .expect_err("login should fail");
    assert_eq!(err.service_message(), Some("Invalid credentials"));
    assert!(matches!(
        client.refresh().await,
        Err(SessionError::NotAuthenticated)
    ));

    let status = client.status().borrow().clone();
    assert!(!status.loading);
    assert_eq!(status.error.as_deref(), Some("Invalid credentials"));
}

#[tokio::test]
async fn register_sends_defaulted_fields() {
    let state = AccountServerState::default();
    let base = spawn_account_server(state.clone())
        .await
        .expect("spawn server");
    let client = AccountClient::new(&base).expect("client");

    client
        .register(&registration("ana@example.com"))
        .await
        .expect("register");

    let registrations = state.registrations.lock().await;
    assert_eq!(registrations.len(), 1);
    let body = &registrations[0];
    assert_eq!(body["account_statement"], true);
    assert_eq!(body["document_type_id"], 1);
    assert_eq!(body["country_id"], 179);
    assert_eq!(body["last_session"], "2024-05-02");
    assert_eq!(body["email"], "ana@example.com");
}

#[tokio::test]
async fn register_rejection_exposes_field_errors() {
    let base = spawn_account_server(AccountServerState::default())
        .await
        .expect("spawn server");
    let client = AccountClient::new(&base).expect("client");

    let err = client
        .register(&registration(VALID_EMAIL))
        .await
        .expect_err("duplicate email");
    let body = err.body().expect("error body");
    assert!(body.has_field_errors());
    assert_eq!(
        body.field_messages(),
        vec![
            "The email has already been taken.".to_string(),
            "The user name has already been taken.".to_string(),
        ]
    );
}

#[tokio::test]
async fn profile_without_session_is_not_authenticated() {
    let base = spawn_account_server(AccountServerState::default())
        .await
        .expect("spawn server");
    let client = AccountClient::new(&base).expect("client");

    let err = client.refresh().await.expect_err("no session");
    assert!(matches!(err, SessionError::NotAuthenticated));
    assert!(err.is_unauthorized());
    assert_eq!(client.state().borrow().error.as_deref(), Some("not signed in"));
}

#[tokio::test]
async fn logout_drops_local_session_even_when_service_fails() {
    let state = AccountServerState {
        fail_logout: true,
        ..AccountServerState::default()
    };
    let base = spawn_account_server(state.clone())
        .await
        .expect("spawn server");
    let client = AccountClient::new(&base).expect("client");

    client
        .login(&Credentials::new(VALID_EMAIL, VALID_PASSWORD))
        .await
        .expect("login");
    client.refresh().await.expect("profile");

    assert!(client.logout().await.is_err());
    assert_eq!(*state.logout_calls.lock().await, 1);
    assert_eq!(client.state().borrow().clone(), ProfileState::default());
    assert_eq!(client.status().borrow().clone(), SessionStatus::default());
    assert!(matches!(
        client.refresh().await,
        Err(SessionError::NotAuthenticated)
    ));
}

#[tokio::test]
async fn unreachable_service_is_a_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    let client = AccountClient::new(&format!("http://{addr}/api")).expect("client");
    let err = client
        .login(&Credentials::new(VALID_EMAIL, VALID_PASSWORD))
        .await
        .expect_err("nothing listening");
    assert!(matches!(err, SessionError::Transport(_)));
    assert!(err.service_message().is_none());
}

#[test]
fn base_url_keeps_path_prefix_for_endpoints() {
    let base = normalize_base_url("http://localhost:8000/api").expect("url");
    assert_eq!(
        base.join("auth/login").expect("join").as_str(),
        "http://localhost:8000/api/auth/login"
    );
    assert!(normalize_base_url("not a url").is_err());
}
