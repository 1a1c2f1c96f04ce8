use hr_records::config::{AuthConfig, UploadConfig};
use hr_records::hr::{
    Argon2Hasher, AuthService, DiskDocumentStore, EmployeeService, JwtSigner, LeaveService,
    MemoryStore, TokenSigner,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Services wired to one shared in-process store and an on-disk upload directory.
pub(crate) struct HrStack {
    pub(crate) store: MemoryStore,
    pub(crate) auth: Arc<AuthService<MemoryStore>>,
    pub(crate) employees: Arc<EmployeeService<MemoryStore>>,
    pub(crate) leaves: Arc<LeaveService<MemoryStore, MemoryStore>>,
}

pub(crate) fn build_stack(auth: &AuthConfig, uploads: &UploadConfig) -> HrStack {
    let store = MemoryStore::default();
    let shared = Arc::new(store.clone());
    let documents = Arc::new(DiskDocumentStore::new(uploads.root.clone()));
    let signer: Arc<dyn TokenSigner> = Arc::new(JwtSigner::new(&auth.jwt_secret));

    HrStack {
        auth: Arc::new(AuthService::new(
            shared.clone(),
            Arc::new(Argon2Hasher),
            signer,
            auth,
        )),
        employees: Arc::new(
            EmployeeService::new(shared.clone(), documents.clone())
                .with_max_upload_bytes(uploads.max_file_bytes),
        ),
        leaves: Arc::new(
            LeaveService::new(shared.clone(), shared, documents)
                .with_max_upload_bytes(uploads.max_file_bytes),
        ),
        store,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stack_applies_configured_upload_cap() {
        let uploads = UploadConfig {
            root: std::env::temp_dir().join("hr-records-api-infra"),
            max_file_bytes: 1024,
        };
        let stack = build_stack(&AuthConfig::with_secret("infra-secret"), &uploads);

        assert_eq!(stack.employees.upload_policy().max_bytes, 1024);
        assert_eq!(stack.leaves.upload_policy().max_bytes, 1024);
        assert_eq!(stack.leaves.upload_policy().folder, "documents");
    }
}
