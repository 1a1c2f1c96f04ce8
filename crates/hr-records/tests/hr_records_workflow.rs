use std::path::PathBuf;
use std::sync::Arc;

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use hr_records::config::AuthConfig;
use hr_records::hr::{
    hr_router, Argon2Hasher, AuthService, DiskDocumentStore, EmployeeService, JwtSigner,
    LeaveService, MemoryStore, TokenSigner,
};
use serde_json::{json, Value};
use tower::ServiceExt;

fn upload_root(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("hr-records-workflow-{name}"))
}

fn app(root: &PathBuf) -> (Router, MemoryStore) {
    let store = MemoryStore::default();
    let shared = Arc::new(store.clone());
    let documents = Arc::new(DiskDocumentStore::new(root.clone()));
    let signer: Arc<dyn TokenSigner> = Arc::new(JwtSigner::new("workflow-secret"));
    let auth = Arc::new(AuthService::new(
        shared.clone(),
        Arc::new(Argon2Hasher),
        signer,
        &AuthConfig::with_secret("workflow-secret"),
    ));
    let employees = Arc::new(EmployeeService::new(shared.clone(), documents.clone()));
    let leaves = Arc::new(LeaveService::new(shared.clone(), shared, documents));
    (hr_router(auth, employees, leaves), store)
}

async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router
        .clone()
        .oneshot(request)
        .await
        .expect("route executes");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("read body");
    let payload = serde_json::from_slice(&bytes).expect("json body");
    (status, payload)
}

fn json_request(method: Method, uri: &str, body: Value, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    builder
        .body(Body::from(body.to_string()))
        .expect("request builds")
}

fn intake_form(boundary: &str) -> String {
    let mut body = String::new();
    for (name, value) in [
        ("fullName", "Priya Menon"),
        ("email", "priya@example.com"),
        ("phoneNumber", "9123456780"),
        ("position", "senior"),
        ("experience", "6"),
        ("declaration", "true"),
        ("status", "scheduled"),
    ] {
        body.push_str(&format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
        ));
    }
    body.push_str(&format!(
        "--{boundary}\r\nContent-Disposition: form-data; name=\"resume\"; filename=\"priya.pdf\"\r\nContent-Type: application/pdf\r\n\r\n%PDF-1.7 resume\r\n--{boundary}--\r\n"
    ));
    body
}

#[tokio::test]
async fn recruiter_registers_onboards_and_approves_leave() {
    let root = upload_root("full");
    let (router, store) = app(&root);

    let (status, registered) = send(
        &router,
        json_request(
            Method::POST,
            "/auth/register",
            json!({
                "fullName": "Kiran Shah",
                "email": "kiran@example.com",
                "password": "hunter22",
                "confirmPassword": "hunter22",
            }),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(registered["message"], "Registered successfully");
    let stored_hash = registered["data"]["password"].as_str().expect("hash");
    assert!(stored_hash.starts_with("$argon2"));

    let (status, logged_in) = send(
        &router,
        json_request(
            Method::POST,
            "/auth/login",
            json!({ "email": "kiran@example.com", "password": "hunter22" }),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let token = logged_in["accessToken"]
        .as_str()
        .expect("access token")
        .to_string();
    assert!(logged_in["refreshToken"].is_string());

    let boundary = "workflowboundary";
    let intake = Request::builder()
        .method(Method::POST)
        .uri("/submission/submit")
        .header(
            CONTENT_TYPE,
            format!("multipart/form-data; boundary={boundary}"),
        )
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::from(intake_form(boundary)))
        .expect("request builds");
    let (status, created) = send(&router, intake).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["data"]["status"], "scheduled");
    let resume = created["data"]["resume"].as_str().expect("resume path");
    assert!(resume.ends_with(".pdf"));
    assert_eq!(
        std::fs::read(resume).expect("resume written"),
        b"%PDF-1.7 resume"
    );

    let listing = Request::builder()
        .uri("/submission/employees?page=1&limit=5")
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .expect("request builds");
    let (status, page) = send(&router, listing).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["totalEmployees"], 1);
    assert_eq!(page["employees"][0]["email"], "priya@example.com");

    let (status, requested) = send(
        &router,
        json_request(
            Method::POST,
            "/leave/addLeaveRequest",
            json!({
                "employeeName": "Priya Menon",
                "designation": "senior",
                "leaveDate": "2025-06-02",
                "reason": "Conference travel",
            }),
            Some(&token),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(requested["data"]["status"], "pending");
    let leave_id = requested["data"]["id"].as_str().expect("leave id");

    let (status, decided) = send(
        &router,
        json_request(
            Method::PUT,
            &format!("/leave/update_status/{leave_id}"),
            json!({ "status": "approved" }),
            Some(&token),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(decided["message"], "Leave request approved successfully");

    let on_leave = Request::builder()
        .uri("/leave/employees_on_leave")
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .expect("request builds");
    let (status, payload) = send(&router, on_leave).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(payload["count"], 1);

    assert_eq!(store.employee_count(), 1);
    assert_eq!(store.leave_count(), 1);
    std::fs::remove_dir_all(root).ok();
}

#[tokio::test]
async fn tokens_from_another_secret_are_refused() {
    let root = upload_root("foreign");
    let (router, _) = app(&root);
    let foreign = JwtSigner::new("someone-else")
        .sign(
            &hr_records::hr::Principal {
                user_id: "u1".to_string(),
                email: "mallory@example.com".to_string(),
            },
            chrono::Duration::hours(1),
        )
        .expect("signed");

    let request = Request::builder()
        .uri("/leave/employees_on_leave")
        .header(AUTHORIZATION, format!("Bearer {foreign}"))
        .body(Body::empty())
        .expect("request builds");
    let (status, payload) = send(&router, request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(payload["message"], "Not authorized, token failed");
    std::fs::remove_dir_all(root).ok();
}
