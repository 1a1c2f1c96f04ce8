use std::sync::Arc;

use chrono::Utc;

use crate::hr::domain::{
    non_blank, parse_calendar_date, AttendanceStatus, AttendanceUpdate, EmployeeRecord,
    EmployeeStatus, EmployeeStatusUpdate, EmployeeSubmission, EmployeeUpdate, EnumField,
    FieldInput, Position, RecordId,
};
use crate::hr::error::ServiceError;
use crate::hr::query::{EmployeeFilter, EmployeeListQuery, EmployeePage, Pagination};
use crate::hr::repository::{EmployeeRepository, RepositoryError};
use crate::hr::uploads::{DocumentStore, IncomingFile, UploadPolicy, RESUME_UPLOADS};
use crate::hr::validation::{
    resolve_intake_status, validate_employee, validate_employee_changes, IntakeMode,
    DEPARTMENT_MAX_CHARS,
};

const DUPLICATE_EMAIL: &str = "An employee with this email already exists.";
const NOT_FOUND: &str = "Employee not found";
pub(crate) const MISSING_RESUME: &str = "Resume file is required";

/// Applies intake, edits, status and attendance transitions to employee records.
pub struct EmployeeService<R> {
    records: Arc<R>,
    documents: Arc<dyn DocumentStore>,
    uploads: UploadPolicy,
}

impl<R> EmployeeService<R>
where
    R: EmployeeRepository + 'static,
{
    pub fn new(records: Arc<R>, documents: Arc<dyn DocumentStore>) -> Self {
        Self {
            records,
            documents,
            uploads: RESUME_UPLOADS,
        }
    }

    /// Override the per-file resume size cap.
    pub fn with_max_upload_bytes(mut self, max_bytes: usize) -> Self {
        self.uploads = self.uploads.with_max_bytes(max_bytes);
        self
    }

    pub fn upload_policy(&self) -> &UploadPolicy {
        &self.uploads
    }

    /// Intake a new employee. The resume upload is mandatory and is only written once the
    /// payload has been accepted.
    pub fn create(
        &self,
        mut submission: EmployeeSubmission,
        resume: Option<IncomingFile>,
    ) -> Result<EmployeeRecord, ServiceError> {
        let Some(resume) = resume else {
            return Err(ServiceError::bad_request(MISSING_RESUME));
        };

        // Placeholder reference until the upload is written.
        submission.resume = Some(format!("{}/{}", self.uploads.folder, resume.file_name));
        validate_employee(&submission, IntakeMode::Create)?;

        let email = submission.email.clone().unwrap_or_default();
        if self.records.find_by_email(&email)?.is_some() {
            return Err(ServiceError::Conflict(DUPLICATE_EMAIL.to_string()));
        }

        let position = parse_position(submission.position.as_deref().unwrap_or_default())?;
        let status = resolve_intake_status(submission.status.as_deref());
        let stored = self.documents.store(self.uploads.folder, &resume)?;

        let now = Utc::now();
        let record = EmployeeRecord {
            id: RecordId::generate(),
            full_name: submission.full_name.unwrap_or_default(),
            email,
            phone_number: submission.phone_number.unwrap_or_default(),
            position,
            experience: submission.experience.as_ref().map_or(0, years),
            resume: stored.path.clone(),
            declaration: true,
            status,
            joining_date: submission.joining_date.as_deref().and_then(parse_calendar_date),
            department: non_blank(&submission.department).map(str::to_string),
            attendance_status: AttendanceStatus::default(),
            created_at: now,
            updated_at: now,
        };

        let record = match self.records.insert(record) {
            Ok(record) => record,
            Err(err) => {
                if let Err(cleanup) = self.documents.discard(&stored) {
                    tracing::warn!(path = %stored.path, error = %cleanup, "orphaned resume left behind");
                }
                return Err(match err {
                    RepositoryError::Conflict(_) => {
                        ServiceError::Conflict(DUPLICATE_EMAIL.to_string())
                    }
                    other => other.into(),
                });
            }
        };
        tracing::info!(record_id = %record.id, status = record.status.label(), "employee created");
        Ok(record)
    }

    /// Strict status transition keyed by email, with optional position, joining date and
    /// department changes.
    pub fn update_status(
        &self,
        request: EmployeeStatusUpdate,
    ) -> Result<EmployeeRecord, ServiceError> {
        let (Some(email), Some(raw_status)) = (non_blank(&request.email), non_blank(&request.status))
        else {
            return Err(ServiceError::bad_request("Email and status are required"));
        };

        let status = parse_status(raw_status)?;
        let position = non_blank(&request.position).map(parse_position).transpose()?;
        let joining_date = match non_blank(&request.joining_date) {
            Some(raw) => Some(
                parse_calendar_date(raw)
                    .ok_or_else(|| ServiceError::bad_request("Invalid joining date format"))?,
            ),
            None => None,
        };
        let department = non_blank(&request.department)
            .map(check_department)
            .transpose()?;

        let mut record = self.by_email(email)?;
        record.status = status;
        if let Some(position) = position {
            record.position = position;
        }
        if let Some(date) = joining_date {
            record.joining_date = Some(date);
        }
        if let Some(department) = department {
            record.department = Some(department);
        }

        let record = self.save(record)?;
        tracing::info!(record_id = %record.id, status = status.label(), "employee status updated");
        Ok(record)
    }

    /// General edit keyed by email. Only supplied fields change; a new resume replaces the
    /// stored one.
    pub fn update(
        &self,
        update: EmployeeUpdate,
        resume: Option<IncomingFile>,
    ) -> Result<EmployeeRecord, ServiceError> {
        let Some(email) = non_blank(&update.email) else {
            return Err(ServiceError::bad_request("Email is required"));
        };

        validate_employee_changes(&update)?;
        let status = non_blank(&update.status).map(parse_status).transpose()?;
        let position = non_blank(&update.position).map(parse_position).transpose()?;

        let mut record = self.by_email(email)?;
        if let Some(name) = non_blank(&update.full_name) {
            record.full_name = name.to_string();
        }
        if let Some(phone) = non_blank(&update.phone_number) {
            record.phone_number = phone.to_string();
        }
        if let Some(position) = position {
            record.position = position;
        }
        if let Some(experience) = &update.experience {
            record.experience = years(experience);
        }
        if let Some(declaration) = update.declaration.as_ref().and_then(FieldInput::as_bool) {
            record.declaration = declaration;
        }
        if let Some(department) = non_blank(&update.department) {
            record.department = Some(department.to_string());
        }
        if let Some(status) = status {
            record.status = status;
        }
        if let Some(file) = resume {
            record.resume = self.documents.store(self.uploads.folder, &file)?.path;
        }

        let record = self.save(record)?;
        tracing::info!(record_id = %record.id, "employee updated");
        Ok(record)
    }

    pub fn delete(&self, id: &str) -> Result<EmployeeRecord, ServiceError> {
        let id = id.trim();
        if id.is_empty() {
            return Err(ServiceError::bad_request("Employee ID is required"));
        }

        let removed = self
            .records
            .delete(&RecordId(id.to_string()))?
            .ok_or_else(|| ServiceError::not_found(NOT_FOUND))?;
        tracing::info!(record_id = %removed.id, "employee deleted");
        Ok(removed)
    }

    pub fn update_attendance(
        &self,
        id: &str,
        request: AttendanceUpdate,
    ) -> Result<EmployeeRecord, ServiceError> {
        let Some(raw) = non_blank(&request.attendance_status) else {
            return Err(ServiceError::bad_request("Attendance status is required"));
        };
        let attendance = AttendanceStatus::parse(raw).ok_or_else(|| {
            ServiceError::bad_request(format!(
                "Invalid attendance status. Allowed values: {}",
                AttendanceStatus::allowed()
            ))
        })?;

        let mut record = self
            .records
            .fetch(&RecordId(id.trim().to_string()))?
            .ok_or_else(|| ServiceError::not_found(NOT_FOUND))?;
        record.attendance_status = attendance;

        let record = self.save(record)?;
        tracing::info!(
            record_id = %record.id,
            attendance = attendance.label(),
            "attendance updated"
        );
        Ok(record)
    }

    /// Filtered, paginated listing. Bad `page`/`limit` values fall back to their defaults.
    pub fn list(&self, query: &EmployeeListQuery) -> Result<EmployeePage, ServiceError> {
        let pagination = Pagination::resolve(query.page.as_deref(), query.limit.as_deref());
        let filter = EmployeeFilter::from_query(query);

        let employees = self.records.query(&filter, Some(pagination))?;
        let total = self.records.count(&filter)?;
        Ok(EmployeePage::new(employees, total, pagination))
    }

    pub fn list_present(&self) -> Result<Vec<EmployeeRecord>, ServiceError> {
        let filter = EmployeeFilter::attendance(AttendanceStatus::Present);
        Ok(self.records.query(&filter, None)?)
    }

    pub fn find_by_email(&self, email: &str) -> Result<EmployeeRecord, ServiceError> {
        self.by_email(email)
    }

    fn by_email(&self, email: &str) -> Result<EmployeeRecord, ServiceError> {
        self.records
            .find_by_email(email)?
            .ok_or_else(|| ServiceError::not_found(NOT_FOUND))
    }

    fn save(&self, mut record: EmployeeRecord) -> Result<EmployeeRecord, ServiceError> {
        record.updated_at = Utc::now();
        self.records.update(record.clone()).map_err(|err| match err {
            RepositoryError::NotFound => ServiceError::not_found(NOT_FOUND),
            other => other.into(),
        })?;
        Ok(record)
    }
}

fn parse_status(raw: &str) -> Result<EmployeeStatus, ServiceError> {
    EmployeeStatus::parse(raw).ok_or_else(|| {
        ServiceError::bad_request(format!(
            "Invalid status. Allowed values: {}",
            EmployeeStatus::allowed()
        ))
    })
}

fn parse_position(raw: &str) -> Result<Position, ServiceError> {
    Position::parse(raw).ok_or_else(|| {
        ServiceError::bad_request(format!(
            "Invalid position. Allowed values: {}",
            Position::allowed()
        ))
    })
}

fn check_department(raw: &str) -> Result<String, ServiceError> {
    if raw.chars().count() > DEPARTMENT_MAX_CHARS {
        return Err(ServiceError::bad_request(format!(
            "Department name must not exceed {DEPARTMENT_MAX_CHARS} characters"
        )));
    }
    Ok(raw.to_string())
}

// Only called on inputs that already passed the experience check.
fn years(input: &FieldInput) -> u32 {
    input
        .as_integer()
        .and_then(|value| u32::try_from(value).ok())
        .unwrap_or_default()
}
