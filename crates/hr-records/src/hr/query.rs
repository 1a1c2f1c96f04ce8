//! Filter predicates and pagination built from optional query parameters.

use serde::{Deserialize, Serialize};

use super::domain::{
    non_blank, AttendanceStatus, EmployeeRecord, EnumField, LeaveRecord, LeaveStatus,
};

pub const DEFAULT_PAGE: usize = 1;
pub const DEFAULT_LIMIT: usize = 10;

/// Raw listing parameters as they arrive on the query string.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EmployeeListQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub position: Option<String>,
    pub status: Option<String>,
    pub search: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaveSearchQuery {
    pub employee_name: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EmployeeNameQuery {
    #[serde(alias = "fullName", alias = "employeeName")]
    pub name: Option<String>,
}

/// Resolved page window. Unparseable or non-positive inputs fall back to the defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: usize,
    pub limit: usize,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl Pagination {
    pub fn resolve(page: Option<&str>, limit: Option<&str>) -> Self {
        Self {
            page: positive_or(page, DEFAULT_PAGE),
            limit: positive_or(limit, DEFAULT_LIMIT),
        }
    }

    pub fn skip(&self) -> usize {
        (self.page - 1).saturating_mul(self.limit)
    }

    pub fn total_pages(&self, total: usize) -> usize {
        total.div_ceil(self.limit)
    }
}

fn positive_or(raw: Option<&str>, fallback: usize) -> usize {
    raw.and_then(|value| value.trim().parse::<i64>().ok())
        .filter(|value| *value >= 1)
        .and_then(|value| usize::try_from(value).ok())
        .unwrap_or(fallback)
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Conjunction of optional employee predicates; an empty filter matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmployeeFilter {
    pub position: Option<String>,
    pub status: Option<String>,
    pub attendance: Option<AttendanceStatus>,
    pub name_contains: Option<String>,
}

impl EmployeeFilter {
    pub fn from_query(query: &EmployeeListQuery) -> Self {
        Self {
            position: non_blank(&query.position).map(str::to_string),
            status: non_blank(&query.status).map(str::to_string),
            attendance: None,
            name_contains: non_blank(&query.search).map(str::to_string),
        }
    }

    pub fn attendance(status: AttendanceStatus) -> Self {
        Self {
            attendance: Some(status),
            ..Self::default()
        }
    }

    pub fn name_contains(fragment: impl Into<String>) -> Self {
        Self {
            name_contains: Some(fragment.into()),
            ..Self::default()
        }
    }

    pub fn matches(&self, record: &EmployeeRecord) -> bool {
        self.position
            .as_deref()
            .map_or(true, |position| record.position.label() == position)
            && self
                .status
                .as_deref()
                .map_or(true, |status| record.status.label() == status)
            && self
                .attendance
                .map_or(true, |attendance| record.attendance_status == attendance)
            && self
                .name_contains
                .as_deref()
                .map_or(true, |fragment| contains_ignore_case(&record.full_name, fragment))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LeaveFilter {
    pub name_contains: Option<String>,
    pub statuses: Option<Vec<LeaveStatus>>,
}

impl LeaveFilter {
    pub fn status(status: LeaveStatus) -> Self {
        Self {
            statuses: Some(vec![status]),
            ..Self::default()
        }
    }

    pub fn statuses(statuses: &[LeaveStatus]) -> Self {
        Self {
            statuses: Some(statuses.to_vec()),
            ..Self::default()
        }
    }

    pub fn matches(&self, record: &LeaveRecord) -> bool {
        self.name_contains
            .as_deref()
            .map_or(true, |fragment| contains_ignore_case(&record.employee_name, fragment))
            && self
                .statuses
                .as_ref()
                .map_or(true, |statuses| statuses.contains(&record.status))
    }
}

/// One page of the employee listing with the counts the listing endpoint reports.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeePage {
    pub count: usize,
    pub total_employees: usize,
    pub total_pages: usize,
    pub current_page: usize,
    pub employees: Vec<EmployeeRecord>,
}

impl EmployeePage {
    pub fn new(employees: Vec<EmployeeRecord>, total: usize, pagination: Pagination) -> Self {
        Self {
            count: employees.len(),
            total_employees: total,
            total_pages: pagination.total_pages(total),
            current_page: pagination.page,
            employees,
        }
    }
}
