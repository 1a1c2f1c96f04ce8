use std::sync::{Arc, Mutex};

use axum::body::{Body, Bytes};
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Method, Request};
use axum::response::Response;
use chrono::Duration;
use serde_json::Value;

use crate::config::AuthConfig;
use crate::hr::auth::{AuthService, CredentialHasher, HashError, JwtSigner, Principal, TokenSigner};
use crate::hr::domain::{
    Credential, EmployeeRecord, EmployeeSubmission, FieldInput, LeaveRecord, LeaveSubmission,
    RecordId, RegistrationRequest,
};
use crate::hr::employees::EmployeeService;
use crate::hr::leaves::LeaveService;
use crate::hr::query::{EmployeeFilter, LeaveFilter, Pagination};
use crate::hr::repository::{
    CredentialRepository, EmployeeRepository, LeaveRepository, RepositoryError,
};
use crate::hr::store::MemoryStore;
use crate::hr::uploads::{DocumentStore, IncomingFile, StoredDocument, UploadError};

pub(super) const TEST_SECRET: &str = "test-secret";

/// Reversible stand-in for Argon2 so service tests stay fast.
pub(super) struct PlainHasher;

impl CredentialHasher for PlainHasher {
    fn hash(&self, password: &str) -> Result<String, HashError> {
        Ok(format!("plain${password}"))
    }

    fn verify(&self, password: &str, hash: &str) -> Result<bool, HashError> {
        hash.strip_prefix("plain$")
            .map(|stored| stored == password)
            .ok_or_else(|| HashError("unknown hash format".to_string()))
    }
}

#[derive(Default)]
pub(super) struct MemoryDocuments {
    stored: Mutex<Vec<String>>,
}

impl MemoryDocuments {
    pub(super) fn paths(&self) -> Vec<String> {
        self.stored.lock().expect("documents mutex poisoned").clone()
    }
}

impl DocumentStore for MemoryDocuments {
    fn store(&self, folder: &str, file: &IncomingFile) -> Result<StoredDocument, UploadError> {
        let path = format!("memory/{folder}/{}", file.file_name);
        self.stored
            .lock()
            .expect("documents mutex poisoned")
            .push(path.clone());
        Ok(StoredDocument { path })
    }

    fn discard(&self, document: &StoredDocument) -> Result<(), UploadError> {
        self.stored
            .lock()
            .expect("documents mutex poisoned")
            .retain(|path| path != &document.path);
        Ok(())
    }
}

pub(super) struct Harness {
    pub(super) store: MemoryStore,
    pub(super) documents: Arc<MemoryDocuments>,
    pub(super) auth: Arc<AuthService<MemoryStore>>,
    pub(super) employees: Arc<EmployeeService<MemoryStore>>,
    pub(super) leaves: Arc<LeaveService<MemoryStore, MemoryStore>>,
}

impl Harness {
    pub(super) fn router(&self) -> axum::Router {
        crate::hr::hr_router(
            self.auth.clone(),
            self.employees.clone(),
            self.leaves.clone(),
        )
    }

    pub(super) fn bearer(&self) -> String {
        let principal = Principal {
            user_id: "user-1".to_string(),
            email: "hr@example.com".to_string(),
        };
        let token = JwtSigner::new(TEST_SECRET)
            .sign(&principal, Duration::hours(1))
            .expect("token signed");
        format!("Bearer {token}")
    }
}

pub(super) fn harness() -> Harness {
    let store = MemoryStore::default();
    let documents = Arc::new(MemoryDocuments::default());
    let shared = Arc::new(store.clone());
    let signer: Arc<dyn TokenSigner> = Arc::new(JwtSigner::new(TEST_SECRET));

    let auth = Arc::new(AuthService::new(
        shared.clone(),
        Arc::new(PlainHasher),
        signer,
        &AuthConfig::with_secret(TEST_SECRET),
    ));
    let employees = Arc::new(EmployeeService::new(shared.clone(), documents.clone()));
    let leaves = Arc::new(LeaveService::new(
        shared.clone(),
        shared,
        documents.clone(),
    ));

    Harness {
        store,
        documents,
        auth,
        employees,
        leaves,
    }
}

pub(super) fn registration() -> RegistrationRequest {
    RegistrationRequest {
        full_name: Some("Asha Rao".to_string()),
        email: Some("asha@example.com".to_string()),
        password: Some("secret1".to_string()),
        confirm_password: Some("secret1".to_string()),
    }
}

pub(super) fn submission(email: &str) -> EmployeeSubmission {
    EmployeeSubmission {
        full_name: Some("Jane Doe".to_string()),
        email: Some(email.to_string()),
        phone_number: Some("9876543210".to_string()),
        position: Some("junior".to_string()),
        experience: Some(FieldInput::Integer(2)),
        declaration: Some(FieldInput::Bool(true)),
        ..EmployeeSubmission::default()
    }
}

pub(super) fn pdf(field: &str, name: &str) -> IncomingFile {
    IncomingFile {
        field: field.to_string(),
        file_name: name.to_string(),
        content_type: "application/pdf".to_string(),
        bytes: Bytes::from_static(b"%PDF-1.4"),
    }
}

pub(super) fn leave_submission(name: &str) -> LeaveSubmission {
    LeaveSubmission {
        employee_name: Some(name.to_string()),
        designation: Some("Engineer".to_string()),
        leave_date: Some("2025-03-14".to_string()),
        document: None,
        reason: Some("Medical appointment".to_string()),
    }
}

/// Intake one employee per name, in order.
pub(super) fn seed_employees(harness: &Harness, names: &[&str]) -> Vec<EmployeeRecord> {
    names
        .iter()
        .enumerate()
        .map(|(index, name)| {
            let mut submission = submission(&format!("employee{index}@example.com"));
            submission.full_name = Some(name.to_string());
            harness
                .employees
                .create(submission, Some(pdf("resume", "cv.pdf")))
                .expect("seeded employee")
        })
        .collect()
}

pub(super) struct UnavailableStore;

fn offline<T>() -> Result<T, RepositoryError> {
    Err(RepositoryError::Unavailable("database offline".to_string()))
}

impl CredentialRepository for UnavailableStore {
    fn insert(&self, _credential: Credential) -> Result<Credential, RepositoryError> {
        offline()
    }

    fn find_by_email(&self, _email: &str) -> Result<Option<Credential>, RepositoryError> {
        offline()
    }
}

impl EmployeeRepository for UnavailableStore {
    fn insert(&self, _record: EmployeeRecord) -> Result<EmployeeRecord, RepositoryError> {
        offline()
    }

    fn update(&self, _record: EmployeeRecord) -> Result<(), RepositoryError> {
        offline()
    }

    fn fetch(&self, _id: &RecordId) -> Result<Option<EmployeeRecord>, RepositoryError> {
        offline()
    }

    fn find_by_email(&self, _email: &str) -> Result<Option<EmployeeRecord>, RepositoryError> {
        offline()
    }

    fn delete(&self, _id: &RecordId) -> Result<Option<EmployeeRecord>, RepositoryError> {
        offline()
    }

    fn query(
        &self,
        _filter: &EmployeeFilter,
        _window: Option<Pagination>,
    ) -> Result<Vec<EmployeeRecord>, RepositoryError> {
        offline()
    }

    fn count(&self, _filter: &EmployeeFilter) -> Result<usize, RepositoryError> {
        offline()
    }
}

impl LeaveRepository for UnavailableStore {
    fn insert(&self, _record: LeaveRecord) -> Result<LeaveRecord, RepositoryError> {
        offline()
    }

    fn update(&self, _record: LeaveRecord) -> Result<(), RepositoryError> {
        offline()
    }

    fn fetch(&self, _id: &RecordId) -> Result<Option<LeaveRecord>, RepositoryError> {
        offline()
    }

    fn query(&self, _filter: &LeaveFilter) -> Result<Vec<LeaveRecord>, RepositoryError> {
        offline()
    }
}

pub(super) fn json_request(
    method: Method,
    uri: &str,
    body: Value,
    authorization: Option<&str>,
) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json");
    if let Some(value) = authorization {
        builder = builder.header(AUTHORIZATION, value);
    }
    builder
        .body(Body::from(body.to_string()))
        .expect("request builds")
}

pub(super) fn empty_request(method: Method, uri: &str, authorization: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(value) = authorization {
        builder = builder.header(AUTHORIZATION, value);
    }
    builder.body(Body::empty()).expect("request builds")
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
