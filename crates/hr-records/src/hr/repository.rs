use super::domain::{Credential, EmployeeRecord, LeaveRecord, RecordId};
use super::query::{EmployeeFilter, LeaveFilter, Pagination};

/// Storage abstraction over registered accounts.
pub trait CredentialRepository: Send + Sync {
    fn insert(&self, credential: Credential) -> Result<Credential, RepositoryError>;
    fn find_by_email(&self, email: &str) -> Result<Option<Credential>, RepositoryError>;
}

/// Storage abstraction over employee records. Emails are unique across the collection.
pub trait EmployeeRepository: Send + Sync {
    fn insert(&self, record: EmployeeRecord) -> Result<EmployeeRecord, RepositoryError>;
    fn update(&self, record: EmployeeRecord) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &RecordId) -> Result<Option<EmployeeRecord>, RepositoryError>;
    fn find_by_email(&self, email: &str) -> Result<Option<EmployeeRecord>, RepositoryError>;
    fn delete(&self, id: &RecordId) -> Result<Option<EmployeeRecord>, RepositoryError>;
    /// Matching records in insertion order, optionally windowed to one page.
    fn query(
        &self,
        filter: &EmployeeFilter,
        window: Option<Pagination>,
    ) -> Result<Vec<EmployeeRecord>, RepositoryError>;
    fn count(&self, filter: &EmployeeFilter) -> Result<usize, RepositoryError>;
}

pub trait LeaveRepository: Send + Sync {
    fn insert(&self, record: LeaveRecord) -> Result<LeaveRecord, RepositoryError>;
    fn update(&self, record: LeaveRecord) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &RecordId) -> Result<Option<LeaveRecord>, RepositoryError>;
    fn query(&self, filter: &LeaveFilter) -> Result<Vec<LeaveRecord>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists: {0}")]
    Conflict(String),
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
