use std::sync::{Arc, Mutex, MutexGuard};

use super::domain::{Credential, EmployeeRecord, LeaveRecord, RecordId};
use super::query::{EmployeeFilter, LeaveFilter, Pagination};
use super::repository::{
    CredentialRepository, EmployeeRepository, LeaveRepository, RepositoryError,
};

/// In-process document store backing all three record collections.
///
/// Collections keep insertion order. Each call locks one collection for its whole
/// read-modify-write, so concurrent writers to one record resolve last-writer-wins.
#[derive(Default, Clone)]
pub struct MemoryStore {
    credentials: Arc<Mutex<Vec<Credential>>>,
    employees: Arc<Mutex<Vec<EmployeeRecord>>>,
    leaves: Arc<Mutex<Vec<LeaveRecord>>>,
}

fn lock<T>(collection: &Mutex<Vec<T>>) -> Result<MutexGuard<'_, Vec<T>>, RepositoryError> {
    collection
        .lock()
        .map_err(|_| RepositoryError::Unavailable("collection lock poisoned".to_string()))
}

impl MemoryStore {
    pub fn employee_count(&self) -> usize {
        self.employees.lock().map(|guard| guard.len()).unwrap_or(0)
    }

    pub fn leave_count(&self) -> usize {
        self.leaves.lock().map(|guard| guard.len()).unwrap_or(0)
    }
}

impl CredentialRepository for MemoryStore {
    fn insert(&self, credential: Credential) -> Result<Credential, RepositoryError> {
        let mut guard = lock(&self.credentials)?;
        if guard.iter().any(|existing| existing.email == credential.email) {
            return Err(RepositoryError::Conflict(credential.email));
        }
        guard.push(credential.clone());
        Ok(credential)
    }

    fn find_by_email(&self, email: &str) -> Result<Option<Credential>, RepositoryError> {
        let guard = lock(&self.credentials)?;
        Ok(guard.iter().find(|existing| existing.email == email).cloned())
    }
}

impl EmployeeRepository for MemoryStore {
    fn insert(&self, record: EmployeeRecord) -> Result<EmployeeRecord, RepositoryError> {
        let mut guard = lock(&self.employees)?;
        if guard.iter().any(|existing| existing.email == record.email) {
            return Err(RepositoryError::Conflict(record.email));
        }
        guard.push(record.clone());
        Ok(record)
    }

    fn update(&self, record: EmployeeRecord) -> Result<(), RepositoryError> {
        let mut guard = lock(&self.employees)?;
        if guard
            .iter()
            .any(|existing| existing.email == record.email && existing.id != record.id)
        {
            return Err(RepositoryError::Conflict(record.email));
        }
        match guard.iter_mut().find(|existing| existing.id == record.id) {
            Some(slot) => {
                *slot = record;
                Ok(())
            }
            None => Err(RepositoryError::NotFound),
        }
    }

    fn fetch(&self, id: &RecordId) -> Result<Option<EmployeeRecord>, RepositoryError> {
        let guard = lock(&self.employees)?;
        Ok(guard.iter().find(|existing| &existing.id == id).cloned())
    }

    fn find_by_email(&self, email: &str) -> Result<Option<EmployeeRecord>, RepositoryError> {
        let guard = lock(&self.employees)?;
        Ok(guard.iter().find(|existing| existing.email == email).cloned())
    }

    fn delete(&self, id: &RecordId) -> Result<Option<EmployeeRecord>, RepositoryError> {
        let mut guard = lock(&self.employees)?;
        Ok(guard
            .iter()
            .position(|existing| &existing.id == id)
            .map(|index| guard.remove(index)))
    }

    fn query(
        &self,
        filter: &EmployeeFilter,
        window: Option<Pagination>,
    ) -> Result<Vec<EmployeeRecord>, RepositoryError> {
        let guard = lock(&self.employees)?;
        let matching = guard.iter().filter(|record| filter.matches(record));
        let records = match window {
            Some(pagination) => matching
                .skip(pagination.skip())
                .take(pagination.limit)
                .cloned()
                .collect(),
            None => matching.cloned().collect(),
        };
        Ok(records)
    }

    fn count(&self, filter: &EmployeeFilter) -> Result<usize, RepositoryError> {
        let guard = lock(&self.employees)?;
        Ok(guard.iter().filter(|record| filter.matches(record)).count())
    }
}

impl LeaveRepository for MemoryStore {
    fn insert(&self, record: LeaveRecord) -> Result<LeaveRecord, RepositoryError> {
        let mut guard = lock(&self.leaves)?;
        if guard.iter().any(|existing| existing.id == record.id) {
            return Err(RepositoryError::Conflict(record.id.0));
        }
        guard.push(record.clone());
        Ok(record)
    }

    fn update(&self, record: LeaveRecord) -> Result<(), RepositoryError> {
        let mut guard = lock(&self.leaves)?;
        match guard.iter_mut().find(|existing| existing.id == record.id) {
            Some(slot) => {
                *slot = record;
                Ok(())
            }
            None => Err(RepositoryError::NotFound),
        }
    }

    fn fetch(&self, id: &RecordId) -> Result<Option<LeaveRecord>, RepositoryError> {
        let guard = lock(&self.leaves)?;
        Ok(guard.iter().find(|existing| &existing.id == id).cloned())
    }

    fn query(&self, filter: &LeaveFilter) -> Result<Vec<LeaveRecord>, RepositoryError> {
        let guard = lock(&self.leaves)?;
        Ok(guard
            .iter()
            .filter(|record| filter.matches(record))
            .cloned()
            .collect())
    }
}
