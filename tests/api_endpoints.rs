//! HTTP surface: bearer sessions, status codes and response bodies.

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{App, test, web::Data};
use jsonwebtoken::{EncodingKey, Header, encode};
use serde_json::{Value, json};

use leave_desk::auth::jwt::{Claims, TokenType};
use leave_desk::config::Config;
use leave_desk::model::{LeaveEntitlement, LeaveType, Role, User};
use leave_desk::store::MemoryStore;
use leave_desk::{LeaveService, routes};

const SECRET: &str = "test-secret";

fn config() -> Config {
    Config {
        server_addr: "127.0.0.1:0".to_string(),
        jwt_secret: SECRET.to_string(),
        api_prefix: "/api".to_string(),
        rate_protected_per_min: 1000,
        seed_path: None,
        log_dir: "logs".to_string(),
        log_level: tracing::Level::INFO,
    }
}

fn service() -> LeaveService {
    let store = MemoryStore::new();
    for (id, name, role) in [
        (1, "Asha Rao", Role::Employee),
        (10, "Meera Iyer", Role::Manager),
    ] {
        store
            .insert_user(User {
                id,
                name: name.to_string(),
                role,
            })
            .unwrap();
    }
    store
        .insert_entitlement(LeaveEntitlement::new(1, LeaveType::Sick, 5))
        .unwrap();
    LeaveService::with_system_clock(Arc::new(store))
}

fn token(user_id: u64, role: Role, token_type: TokenType) -> String {
    let claims = Claims {
        user_id,
        sub: format!("user-{user_id}"),
        role: role.id(),
        exp: (chrono::Utc::now().timestamp() + 3600) as usize,
        jti: uuid::Uuid::new_v4().to_string(),
        token_type,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(SECRET.as_bytes()),
    )
    .unwrap()
}

fn bearer(user_id: u64, role: Role) -> (&'static str, String) {
    (
        "Authorization",
        format!("Bearer {}", token(user_id, role, TokenType::Access)),
    )
}

fn leave_body(days_ahead: i64, length: i64) -> Value {
    let start = chrono::Local::now().date_naive() + chrono::Duration::days(days_ahead);
    let end = start + chrono::Duration::days(length - 1);
    json!({
        "leaveType": "sick",
        "startDate": start.to_string(),
        "endDate": end.to_string(),
        "reason": "flu",
    })
}

macro_rules! app {
    () => {
        test::init_service(
            App::new()
                .app_data(Data::new(service()))
                .app_data(Data::new(config()))
                .configure(|cfg| routes::configure(cfg, "/api")),
        )
        .await
    };
}

#[actix_web::test]
async fn requests_without_an_access_token_are_unauthorized() {
    let app = app!();

    let req = test::TestRequest::get().uri("/api/leaves/balance").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let refresh = format!("Bearer {}", token(1, Role::Employee, TokenType::Refresh));
    let req = test::TestRequest::get()
        .uri("/api/leaves/balance")
        .insert_header(("Authorization", refresh))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn submit_then_exceed_the_balance() {
    let app = app!();

    let req = test::TestRequest::post()
        .uri("/api/leaves/request")
        .insert_header(bearer(1, Role::Employee))
        .set_json(leave_body(3, 3))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "pending");
    assert_eq!(body["leaveType"], "sick");

    let req = test::TestRequest::post()
        .uri("/api/leaves/request")
        .insert_header(bearer(1, Role::Employee))
        .set_json(leave_body(10, 3))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "balance_exceeded");
    assert_eq!(body["requested"], 3);
    assert_eq!(body["available"], 2);

    let req = test::TestRequest::get()
        .uri("/api/leaves/balance")
        .insert_header(bearer(1, Role::Employee))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["pendingDays"], 3);
    assert_eq!(body["available"], 2);
}

#[actix_web::test]
async fn invalid_drafts_are_bad_requests() {
    let app = app!();

    let mut body = leave_body(3, 1);
    body["reason"] = json!("   ");
    let req = test::TestRequest::post()
        .uri("/api/leaves/request")
        .insert_header(bearer(1, Role::Employee))
        .set_json(body)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["field"], "reason");

    let req = test::TestRequest::get()
        .uri("/api/leaves/requests?status=archived")
        .insert_header(bearer(1, Role::Employee))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn employees_are_kept_out_of_manager_routes() {
    let app = app!();

    for uri in [
        "/api/manager/requests",
        "/api/manager/employees",
        "/api/manager/leave-calendar",
        "/api/manager/dashboard",
    ] {
        let req = test::TestRequest::get()
            .uri(uri)
            .insert_header(bearer(1, Role::Employee))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN, "{uri}");
    }
}

#[actix_web::test]
async fn managers_decide_once_with_a_comment() {
    let app = app!();

    let req = test::TestRequest::post()
        .uri("/api/leaves/request")
        .insert_header(bearer(1, Role::Employee))
        .set_json(leave_body(2, 2))
        .to_request();
    let created: Value = test::call_and_read_body_json(&app, req).await;
    let uri = format!("/api/manager/requests/{}", created["id"].as_str().unwrap());

    let req = test::TestRequest::put()
        .uri(&uri)
        .insert_header(bearer(10, Role::Manager))
        .set_json(json!({"action": "approve", "managerComment": ""}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::put()
        .uri(&uri)
        .insert_header(bearer(10, Role::Manager))
        .set_json(json!({"action": "approve", "managerComment": "Get well soon"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Leave approved");
    assert_eq!(body["leave"]["managerComment"], "Get well soon");

    let req = test::TestRequest::put()
        .uri(&uri)
        .insert_header(bearer(10, Role::Manager))
        .set_json(json!({"action": "reject", "managerComment": "Too late"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    let req = test::TestRequest::get()
        .uri("/api/manager/leave-calendar")
        .insert_header(bearer(10, Role::Manager))
        .to_request();
    let events: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(events[0]["employee"], "Asha Rao");
    assert_eq!(events[0]["color"], "green");
}

#[actix_web::test]
async fn employees_cannot_learn_which_request_ids_exist() {
    let app = app!();

    let req = test::TestRequest::put()
        .uri(&format!("/api/manager/requests/{}", uuid::Uuid::new_v4()))
        .insert_header(bearer(1, Role::Employee))
        .set_json(json!({"action": "approve", "managerComment": "ok"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn pending_count_is_served_to_approvers() {
    let app = app!();

    let req = test::TestRequest::post()
        .uri("/api/leaves/request")
        .insert_header(bearer(1, Role::Employee))
        .set_json(leave_body(2, 1))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let req = test::TestRequest::get()
        .uri("/api/manager/requests/pending-count")
        .insert_header(bearer(10, Role::Manager))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["pending"], 1);

    let req = test::TestRequest::get()
        .uri("/api/manager/requests/pending-count")
        .insert_header(bearer(1, Role::Employee))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn malformed_input_is_a_structured_validation_error() {
    let app = app!();

    let mut body = leave_body(3, 1);
    body["startDate"] = json!("not-a-date");
    let req = test::TestRequest::post()
        .uri("/api/leaves/request")
        .insert_header(bearer(1, Role::Employee))
        .set_json(body)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "validation");
    assert_eq!(body["field"], "body");

    let req = test::TestRequest::put()
        .uri("/api/manager/requests/not-a-uuid")
        .insert_header(bearer(10, Role::Manager))
        .set_json(json!({"action": "approve", "managerComment": "ok"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "validation");
    assert_eq!(body["field"], "leave_id");
}

#[actix_web::test]
async fn unknown_request_is_not_found() {
    let app = app!();

    let req = test::TestRequest::put()
        .uri(&format!("/api/manager/requests/{}", uuid::Uuid::new_v4()))
        .insert_header(bearer(10, Role::Manager))
        .set_json(json!({"action": "approve", "managerComment": "ok"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn permissions_follow_the_role() {
    let app = app!();

    let req = test::TestRequest::get()
        .uri("/api/session/permissions")
        .insert_header(bearer(10, Role::Manager))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["role"], "manager");
    let actions = body["actions"].as_array().unwrap();
    assert!(actions.contains(&json!("decide_request")));
    assert!(!actions.contains(&json!("create_request")));
}
