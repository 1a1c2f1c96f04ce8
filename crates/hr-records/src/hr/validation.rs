//! Field-level checks for inbound payloads.
//!
//! Every check is pure. A payload is accepted when no violation is recorded; otherwise the
//! violations come back in field declaration order, at most one per field.

use std::fmt;

use serde::Serialize;
use validator::ValidateEmail;

use super::domain::{
    non_blank, parse_calendar_date, EmployeeStatus, EmployeeSubmission, EmployeeUpdate, EnumField,
    FieldInput, LoginRequest, Position, RegistrationRequest,
};

pub const DEPARTMENT_MAX_CHARS: usize = 100;
pub const PHONE_DIGITS: usize = 10;
pub const PASSWORD_MIN_CHARS: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    Missing,
    WrongType,
    OutOfRange,
    OutOfEnum,
    PatternMismatch,
    CrossFieldMismatch,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    pub field: &'static str,
    pub kind: ViolationKind,
    pub message: String,
}

/// Non-empty, ordered set of violations for a rejected payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationErrors(Vec<FieldViolation>);

impl ValidationErrors {
    pub fn violations(&self) -> &[FieldViolation] {
        &self.0
    }

    pub fn first(&self) -> &FieldViolation {
        &self.0[0]
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.0.iter().any(|violation| violation.field == field)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.first().message)
    }
}

impl std::error::Error for ValidationErrors {}

/// Whether the intake check is for a new record or an edit of an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntakeMode {
    Create,
    Update,
}

#[derive(Default)]
struct Checks {
    violations: Vec<FieldViolation>,
}

impl Checks {
    fn push(&mut self, field: &'static str, kind: ViolationKind, message: impl Into<String>) {
        self.violations.push(FieldViolation {
            field,
            kind,
            message: message.into(),
        });
    }

    fn finish(self) -> Result<(), ValidationErrors> {
        if self.violations.is_empty() {
            Ok(())
        } else {
            Err(ValidationErrors(self.violations))
        }
    }

    fn required<'a>(
        &mut self,
        field: &'static str,
        label: &str,
        value: &'a Option<String>,
    ) -> Option<&'a str> {
        match value.as_deref() {
            Some(raw) if !raw.is_empty() => Some(raw),
            _ => {
                self.push(field, ViolationKind::Missing, format!("{label} is required"));
                None
            }
        }
    }

    fn length(
        &mut self,
        field: &'static str,
        label: &str,
        raw: &str,
        min: usize,
        max: Option<usize>,
    ) {
        let count = raw.chars().count();
        if count < min {
            self.push(
                field,
                ViolationKind::OutOfRange,
                format!("{label} must be at least {min} characters long"),
            );
        } else if let Some(max) = max.filter(|max| count > *max) {
            self.push(
                field,
                ViolationKind::OutOfRange,
                format!("{label} must not exceed {max} characters"),
            );
        }
    }

    fn email(&mut self, value: &Option<String>, message: &str) {
        if let Some(raw) = self.required("email", "Email", value) {
            if !raw.validate_email() {
                self.push("email", ViolationKind::PatternMismatch, message);
            }
        }
    }

    fn password(&mut self, value: &Option<String>) {
        if let Some(raw) = self.required("password", "Password", value) {
            self.length("password", "Password", raw, PASSWORD_MIN_CHARS, None);
        }
    }

    fn phone(&mut self, raw: &str) {
        if raw.chars().count() != PHONE_DIGITS {
            self.push(
                "phoneNumber",
                ViolationKind::OutOfRange,
                format!("Phone number must be exactly {PHONE_DIGITS} digits"),
            );
        } else if !raw.chars().all(|c| c.is_ascii_digit()) {
            self.push(
                "phoneNumber",
                ViolationKind::PatternMismatch,
                "Phone number must contain only digits",
            );
        }
    }

    fn position(&mut self, raw: &str) {
        if Position::parse(raw).is_none() {
            self.push(
                "position",
                ViolationKind::OutOfEnum,
                format!("Invalid position. Allowed values: {}", Position::allowed()),
            );
        }
    }

    fn experience(&mut self, input: &FieldInput) {
        if !input.is_numeric() {
            self.push(
                "experience",
                ViolationKind::WrongType,
                "Experience must be a number",
            );
            return;
        }
        match input.as_integer() {
            None => self.push(
                "experience",
                ViolationKind::WrongType,
                "Experience must be a whole number",
            ),
            Some(years) if years < 0 => self.push(
                "experience",
                ViolationKind::OutOfRange,
                "Experience cannot be negative",
            ),
            Some(years) if u32::try_from(years).is_err() => self.push(
                "experience",
                ViolationKind::OutOfRange,
                "Experience is out of range",
            ),
            Some(_) => {}
        }
    }

    fn department(&mut self, raw: &str) {
        if raw.chars().count() > DEPARTMENT_MAX_CHARS {
            self.push(
                "department",
                ViolationKind::OutOfRange,
                format!("Department name must not exceed {DEPARTMENT_MAX_CHARS} characters"),
            );
        }
    }
}

pub fn validate_registration(request: &RegistrationRequest) -> Result<(), ValidationErrors> {
    let mut checks = Checks::default();

    if let Some(name) = checks.required("fullName", "Full name", &request.full_name) {
        if name.chars().count() > 30 {
            checks.push(
                "fullName",
                ViolationKind::OutOfRange,
                "Full name must be at most 30 characters long",
            );
        } else {
            checks.length("fullName", "Full name", name, 2, None);
        }
    }
    checks.email(
        &request.email,
        "Invalid email format. Please provide a valid email address.",
    );
    checks.password(&request.password);

    if let Some(confirm) =
        checks.required("confirmPassword", "Confirm password", &request.confirm_password)
    {
        if request.password.as_deref() != Some(confirm) {
            checks.push(
                "confirmPassword",
                ViolationKind::CrossFieldMismatch,
                "Confirm password must match the password",
            );
        }
    }

    checks.finish()
}

/// Shape-only login check; account existence is decided by the auth service.
pub fn validate_login(request: &LoginRequest) -> Result<(), ValidationErrors> {
    let mut checks = Checks::default();
    checks.email(
        &request.email,
        "Invalid email format. Please provide a valid email address.",
    );
    checks.password(&request.password);
    checks.finish()
}

/// Intake rules for employee records. `status` is not checked here; intake resolves it
/// through [`resolve_intake_status`].
pub fn validate_employee(
    submission: &EmployeeSubmission,
    mode: IntakeMode,
) -> Result<(), ValidationErrors> {
    let mut checks = Checks::default();

    if let Some(name) = checks.required("fullName", "Full name", &submission.full_name) {
        checks.length("fullName", "Full name", name, 3, Some(50));
    }
    checks.email(&submission.email, "Invalid email format");
    if let Some(phone) = checks.required("phoneNumber", "Phone number", &submission.phone_number)
    {
        checks.phone(phone);
    }
    if let Some(position) = checks.required("position", "Position", &submission.position) {
        checks.position(position);
    }
    match &submission.experience {
        Some(input) => checks.experience(input),
        None => checks.push("experience", ViolationKind::Missing, "Experience is required"),
    }
    match mode {
        IntakeMode::Create => {
            checks.required("resume", "Resume file path", &submission.resume);
        }
        IntakeMode::Update => {
            if submission.resume.as_deref() == Some("") {
                checks.push(
                    "resume",
                    ViolationKind::Missing,
                    "Resume file path must not be empty",
                );
            }
        }
    }
    match submission.declaration.as_ref().map(FieldInput::as_bool) {
        Some(Some(true)) => {}
        Some(Some(false)) => checks.push(
            "declaration",
            ViolationKind::OutOfEnum,
            "You must agree to the declaration",
        ),
        Some(None) => checks.push(
            "declaration",
            ViolationKind::WrongType,
            "Declaration must be a boolean",
        ),
        None => checks.push(
            "declaration",
            ViolationKind::Missing,
            "Declaration is required",
        ),
    }
    if let Some(raw) = submission.joining_date.as_deref() {
        if parse_calendar_date(raw).is_none() {
            checks.push(
                "joiningDate",
                ViolationKind::WrongType,
                "Joining date must be a valid date",
            );
        }
    }
    if let Some(department) = submission.department.as_deref() {
        checks.department(department);
    }

    checks.finish()
}

/// Checks only the fields a general update supplies. `declaration` may be either boolean.
pub fn validate_employee_changes(update: &EmployeeUpdate) -> Result<(), ValidationErrors> {
    let mut checks = Checks::default();

    if let Some(name) = non_blank(&update.full_name) {
        checks.length("fullName", "Full name", name, 3, Some(50));
    }
    if let Some(phone) = non_blank(&update.phone_number) {
        checks.phone(phone);
    }
    if let Some(position) = non_blank(&update.position) {
        checks.position(position);
    }
    if let Some(input) = &update.experience {
        checks.experience(input);
    }
    if let Some(input) = &update.declaration {
        if input.as_bool().is_none() {
            checks.push(
                "declaration",
                ViolationKind::WrongType,
                "Declaration must be a boolean",
            );
        }
    }
    if let Some(department) = non_blank(&update.department) {
        checks.department(department);
    }

    checks.finish()
}

/// Intake leniency: a supplied in-enum status is kept, anything else becomes `new`.
pub fn resolve_intake_status(raw: Option<&str>) -> EmployeeStatus {
    raw.and_then(EmployeeStatus::parse).unwrap_or_default()
}
