use std::sync::Arc;

use chrono::Utc;

use crate::hr::domain::{
    non_blank, parse_calendar_date, EmployeeRecord, EnumField, LeaveRecord, LeaveStatus,
    LeaveStatusUpdate, LeaveSubmission, LeaveSummary, RecordId,
};
use crate::hr::error::ServiceError;
use crate::hr::query::{EmployeeFilter, LeaveFilter, LeaveSearchQuery};
use crate::hr::repository::{EmployeeRepository, LeaveRepository, RepositoryError};
use crate::hr::uploads::{DocumentStore, IncomingFile, UploadPolicy, LEAVE_DOCUMENT_UPLOADS};

/// Statuses an approver may move a leave request to.
const DECISIONS: [LeaveStatus; 2] = [LeaveStatus::Approved, LeaveStatus::Rejected];

/// Statuses exposed by the filtered leave listing.
const LISTED: [LeaveStatus; 3] = [
    LeaveStatus::Pending,
    LeaveStatus::Approved,
    LeaveStatus::Rejected,
];

const NOT_FOUND: &str = "Leave request not found";

/// Leave request submission, approval, and the leave-related lookups.
pub struct LeaveService<L, E> {
    leaves: Arc<L>,
    employees: Arc<E>,
    documents: Arc<dyn DocumentStore>,
    uploads: UploadPolicy,
}

impl<L, E> LeaveService<L, E>
where
    L: LeaveRepository + 'static,
    E: EmployeeRepository + 'static,
{
    pub fn new(leaves: Arc<L>, employees: Arc<E>, documents: Arc<dyn DocumentStore>) -> Self {
        Self {
            leaves,
            employees,
            documents,
            uploads: LEAVE_DOCUMENT_UPLOADS,
        }
    }

    /// Override the per-file leave document size cap.
    pub fn with_max_upload_bytes(mut self, max_bytes: usize) -> Self {
        self.uploads = self.uploads.with_max_bytes(max_bytes);
        self
    }

    pub fn upload_policy(&self) -> &UploadPolicy {
        &self.uploads
    }

    /// Record a new request as `pending`. An attached document wins over a `document`
    /// reference in the payload.
    pub fn create(
        &self,
        submission: LeaveSubmission,
        document: Option<IncomingFile>,
    ) -> Result<LeaveRecord, ServiceError> {
        let (Some(employee_name), Some(designation), Some(raw_date), Some(reason)) = (
            non_blank(&submission.employee_name),
            non_blank(&submission.designation),
            non_blank(&submission.leave_date),
            non_blank(&submission.reason),
        ) else {
            return Err(ServiceError::bad_request(
                "Employee name, designation, leave date, and reason are required",
            ));
        };

        let leave_date = parse_calendar_date(raw_date)
            .ok_or_else(|| ServiceError::bad_request("Invalid leave date format"))?;

        let document = match document {
            Some(file) => Some(self.documents.store(self.uploads.folder, &file)?.path),
            None => non_blank(&submission.document).map(str::to_string),
        };

        let now = Utc::now();
        let record = self.leaves.insert(LeaveRecord {
            id: RecordId::generate(),
            employee_name: employee_name.to_string(),
            designation: designation.to_string(),
            leave_date,
            document,
            reason: reason.to_string(),
            status: LeaveStatus::default(),
            created_at: now,
            updated_at: now,
        })?;
        tracing::info!(record_id = %record.id, leave_date = %record.leave_date, "leave requested");
        Ok(record)
    }

    pub fn update_status(
        &self,
        id: &str,
        request: LeaveStatusUpdate,
    ) -> Result<LeaveRecord, ServiceError> {
        let Some(raw) = non_blank(&request.status) else {
            return Err(ServiceError::bad_request("Status is required"));
        };
        let status = LeaveStatus::parse(raw)
            .filter(|status| DECISIONS.contains(status))
            .ok_or_else(|| {
                ServiceError::bad_request(format!(
                    "Invalid status. Allowed values: {}",
                    labels(&DECISIONS)
                ))
            })?;

        let mut record = self
            .leaves
            .fetch(&RecordId(id.trim().to_string()))?
            .ok_or_else(|| ServiceError::not_found(NOT_FOUND))?;
        record.status = status;
        record.updated_at = Utc::now();

        self.leaves.update(record.clone()).map_err(|err| match err {
            RepositoryError::NotFound => ServiceError::not_found(NOT_FOUND),
            other => other.into(),
        })?;
        tracing::info!(record_id = %record.id, status = status.label(), "leave status updated");
        Ok(record)
    }

    pub fn list_on_leave(&self) -> Result<Vec<LeaveRecord>, ServiceError> {
        Ok(self.leaves.query(&LeaveFilter::status(LeaveStatus::Approved))?)
    }

    pub fn search(&self, query: &LeaveSearchQuery) -> Result<Vec<LeaveRecord>, ServiceError> {
        let statuses = match non_blank(&query.status) {
            Some(raw) => {
                let status = LeaveStatus::parse(raw).ok_or_else(|| {
                    ServiceError::bad_request(format!(
                        "Invalid status. Allowed values: {}",
                        LeaveStatus::allowed()
                    ))
                })?;
                Some(vec![status])
            }
            None => None,
        };

        let filter = LeaveFilter {
            name_contains: non_blank(&query.employee_name).map(str::to_string),
            statuses,
        };
        Ok(self.leaves.query(&filter)?)
    }

    pub fn list_filtered(&self) -> Result<Vec<LeaveSummary>, ServiceError> {
        let records = self.leaves.query(&LeaveFilter::statuses(&LISTED))?;
        Ok(records.iter().map(LeaveRecord::summary).collect())
    }

    /// Employee records whose full name contains `name`, ignoring case.
    pub fn find_employees_by_name(
        &self,
        name: Option<&str>,
    ) -> Result<Vec<EmployeeRecord>, ServiceError> {
        let Some(name) = name.map(str::trim).filter(|name| !name.is_empty()) else {
            return Err(ServiceError::bad_request("Employee name is required"));
        };

        let matches = self
            .employees
            .query(&EmployeeFilter::name_contains(name), None)?;
        if matches.is_empty() {
            return Err(ServiceError::not_found("No employees found with that name"));
        }
        Ok(matches)
    }
}

fn labels(statuses: &[LeaveStatus]) -> String {
    statuses
        .iter()
        .map(|status| status.label())
        .collect::<Vec<_>>()
        .join(", ")
}
