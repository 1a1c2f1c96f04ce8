use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier wrapper shared by every persisted record kind.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub String);

impl RecordId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// String field restricted to a fixed allow-set of lowercase labels.
pub trait EnumField: Copy + Sized + 'static {
    const ALL: &'static [Self];

    fn label(self) -> &'static str;

    fn parse(raw: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|value| value.label() == raw)
    }

    /// Comma separated allow-set, used in rejection messages.
    fn allowed() -> String {
        Self::ALL
            .iter()
            .map(|value| value.label())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Position {
    Intern,
    Fulltime,
    Junior,
    Senior,
    Teamlead,
}

impl EnumField for Position {
    const ALL: &'static [Self] = &[
        Position::Intern,
        Position::Fulltime,
        Position::Junior,
        Position::Senior,
        Position::Teamlead,
    ];

    fn label(self) -> &'static str {
        match self {
            Position::Intern => "intern",
            Position::Fulltime => "fulltime",
            Position::Junior => "junior",
            Position::Senior => "senior",
            Position::Teamlead => "teamlead",
        }
    }
}

/// Hiring pipeline stage of an employee record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmployeeStatus {
    #[default]
    New,
    Scheduled,
    Ongoing,
    Selected,
    Rejected,
}

impl EnumField for EmployeeStatus {
    const ALL: &'static [Self] = &[
        EmployeeStatus::New,
        EmployeeStatus::Scheduled,
        EmployeeStatus::Ongoing,
        EmployeeStatus::Selected,
        EmployeeStatus::Rejected,
    ];

    fn label(self) -> &'static str {
        match self {
            EmployeeStatus::New => "new",
            EmployeeStatus::Scheduled => "scheduled",
            EmployeeStatus::Ongoing => "ongoing",
            EmployeeStatus::Selected => "selected",
            EmployeeStatus::Rejected => "rejected",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttendanceStatus {
    #[default]
    Present,
    Absent,
    Leave,
}

impl EnumField for AttendanceStatus {
    const ALL: &'static [Self] = &[
        AttendanceStatus::Present,
        AttendanceStatus::Absent,
        AttendanceStatus::Leave,
    ];

    fn label(self) -> &'static str {
        match self {
            AttendanceStatus::Present => "present",
            AttendanceStatus::Absent => "absent",
            AttendanceStatus::Leave => "leave",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeaveStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl EnumField for LeaveStatus {
    const ALL: &'static [Self] = &[
        LeaveStatus::Pending,
        LeaveStatus::Approved,
        LeaveStatus::Rejected,
    ];

    fn label(self) -> &'static str {
        match self {
            LeaveStatus::Pending => "pending",
            LeaveStatus::Approved => "approved",
            LeaveStatus::Rejected => "rejected",
        }
    }
}

/// Registered account. `password` holds the salted hash, never the plain text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credential {
    pub id: RecordId,
    pub full_name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeRecord {
    pub id: RecordId,
    pub full_name: String,
    pub email: String,
    pub phone_number: String,
    pub position: Position,
    pub experience: u32,
    pub resume: String,
    pub declaration: bool,
    pub status: EmployeeStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub joining_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    pub attendance_status: AttendanceStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaveRecord {
    pub id: RecordId,
    pub employee_name: String,
    pub designation: String,
    pub leave_date: NaiveDate,
    pub document: Option<String>,
    pub reason: String,
    pub status: LeaveStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl LeaveRecord {
    pub fn summary(&self) -> LeaveSummary {
        LeaveSummary {
            document: self.document.clone(),
            employee_name: self.employee_name.clone(),
            designation: self.designation.clone(),
            leave_date: self.leave_date,
            reason: self.reason.clone(),
            status: self.status,
        }
    }
}

/// Projection of a leave record exposed by the filtered listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaveSummary {
    pub document: Option<String>,
    pub employee_name: String,
    pub designation: String,
    pub leave_date: NaiveDate,
    pub reason: String,
    pub status: LeaveStatus,
}

/// Scalar accepted where JSON clients send typed values and form clients send text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldInput {
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
}

impl FieldInput {
    /// Integer view, converting numeric text the way form submissions arrive.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            FieldInput::Integer(value) => Some(*value),
            FieldInput::Float(value) => whole_number(*value),
            FieldInput::Text(raw) => {
                let raw = raw.trim();
                raw.parse()
                    .ok()
                    .or_else(|| raw.parse::<f64>().ok().and_then(whole_number))
            }
            FieldInput::Bool(_) => None,
        }
    }

    pub fn is_numeric(&self) -> bool {
        match self {
            FieldInput::Integer(_) | FieldInput::Float(_) => true,
            FieldInput::Text(raw) => raw.trim().parse::<f64>().is_ok(),
            FieldInput::Bool(_) => false,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldInput::Bool(value) => Some(*value),
            FieldInput::Text(raw) => match raw.trim() {
                "true" => Some(true),
                "false" => Some(false),
                _ => None,
            },
            _ => None,
        }
    }
}

fn whole_number(value: f64) -> Option<i64> {
    let in_range = value >= i64::MIN as f64 && value < i64::MAX as f64;
    (value.is_finite() && value.fract() == 0.0 && in_range).then_some(value as i64)
}

/// Parse a calendar date from `YYYY-MM-DD`, an RFC 3339 timestamp, or a naive timestamp.
pub fn parse_calendar_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc3339(raw)
                .ok()
                .map(|stamp| stamp.with_timezone(&Utc).date_naive())
        })
        .or_else(|| {
            chrono::NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S")
                .ok()
                .map(|stamp| stamp.date())
        })
}

/// Returns the trimmed value when present and not blank.
pub(crate) fn non_blank(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|trimmed| !trimmed.is_empty())
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationRequest {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub confirm_password: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Employee intake payload. `resume` is filled from the attached upload.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeSubmission {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub position: Option<String>,
    pub experience: Option<FieldInput>,
    pub resume: Option<String>,
    pub declaration: Option<FieldInput>,
    pub status: Option<String>,
    pub joining_date: Option<String>,
    pub department: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeStatusUpdate {
    pub email: Option<String>,
    pub status: Option<String>,
    pub position: Option<String>,
    pub joining_date: Option<String>,
    pub department: Option<String>,
}

/// General update keyed by email; absent fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeUpdate {
    pub email: Option<String>,
    pub full_name: Option<String>,
    pub phone_number: Option<String>,
    pub position: Option<String>,
    pub experience: Option<FieldInput>,
    pub declaration: Option<FieldInput>,
    pub status: Option<String>,
    pub department: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceUpdate {
    pub attendance_status: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaveSubmission {
    pub employee_name: Option<String>,
    pub designation: Option<String>,
    pub leave_date: Option<String>,
    pub document: Option<String>,
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LeaveStatusUpdate {
    pub status: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enum_fields_round_trip_labels() {
        for position in Position::ALL {
            assert_eq!(Position::parse(position.label()), Some(*position));
        }
        assert_eq!(EmployeeStatus::parse("Selected"), None);
        assert_eq!(LeaveStatus::parse("leaveApproved"), None);
        assert_eq!(
            Position::allowed(),
            "intern, fulltime, junior, senior, teamlead"
        );
    }

    #[test]
    fn enum_defaults_match_record_defaults() {
        assert_eq!(EmployeeStatus::default(), EmployeeStatus::New);
        assert_eq!(AttendanceStatus::default(), AttendanceStatus::Present);
        assert_eq!(LeaveStatus::default(), LeaveStatus::Pending);
    }

    #[test]
    fn field_input_accepts_json_and_form_shapes() {
        let json: FieldInput = serde_json::from_str("2").expect("integer");
        let text: FieldInput = serde_json::from_str("\"2\"").expect("text");
        let flag: FieldInput = serde_json::from_str("true").expect("bool");
        assert_eq!(json.as_integer(), Some(2));
        assert_eq!(text.as_integer(), Some(2));
        assert_eq!(flag.as_bool(), Some(true));
        assert_eq!(FieldInput::Text("false".into()).as_bool(), Some(false));
        assert_eq!(FieldInput::Float(2.5).as_integer(), None);
        assert!(FieldInput::Float(2.5).is_numeric());
        assert!(!FieldInput::Text("two".into()).is_numeric());
    }

    #[test]
    fn decimal_text_converts_when_integral() {
        assert_eq!(FieldInput::Text("2.0".into()).as_integer(), Some(2));
        assert_eq!(FieldInput::Text(" 3 ".into()).as_integer(), Some(3));
        assert_eq!(FieldInput::Text("2.5".into()).as_integer(), None);
        assert_eq!(FieldInput::Text("1e300".into()).as_integer(), None);
    }

    #[test]
    fn parses_supported_date_shapes() {
        let expected = NaiveDate::from_ymd_opt(2025, 3, 14).expect("valid");
        assert_eq!(parse_calendar_date("2025-03-14"), Some(expected));
        assert_eq!(parse_calendar_date("2025-03-14T09:30:00Z"), Some(expected));
        assert_eq!(parse_calendar_date("2025-03-14T09:30:00"), Some(expected));
        assert_eq!(parse_calendar_date("2025-02-30"), None);
        assert_eq!(parse_calendar_date("next tuesday"), None);
        assert_eq!(parse_calendar_date("  "), None);
    }

    #[test]
    fn employee_record_serializes_camel_case() {
        let now = Utc::now();
        let record = EmployeeRecord {
            id: RecordId("emp-1".to_string()),
            full_name: "Jane Doe".to_string(),
            email: "jane@x.com".to_string(),
            phone_number: "9876543210".to_string(),
            position: Position::Junior,
            experience: 2,
            resume: "uploads/resumes/1.pdf".to_string(),
            declaration: true,
            status: EmployeeStatus::New,
            joining_date: None,
            department: None,
            attendance_status: AttendanceStatus::Present,
            created_at: now,
            updated_at: now,
        };

        let value = serde_json::to_value(&record).expect("serializes");
        assert_eq!(value["fullName"], "Jane Doe");
        assert_eq!(value["attendanceStatus"], "present");
        assert_eq!(value["status"], "new");
        assert!(value.get("joiningDate").is_none());
    }
}
