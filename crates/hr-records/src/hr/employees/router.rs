use std::sync::Arc;

use axum::{
    extract::{DefaultBodyLimit, Path, Query, State},
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
    Json, Router,
};
use serde_json::{json, Value};

use super::service::{EmployeeService, MISSING_RESUME};
use crate::hr::auth::{require_bearer, Authenticator, Principal};
use crate::hr::domain::{
    AttendanceUpdate, EmployeeStatusUpdate, EmployeeSubmission, EmployeeUpdate,
};
use crate::hr::error::ServiceError;
use crate::hr::form::SubmittedForm;
use crate::hr::query::EmployeeListQuery;
use crate::hr::repository::EmployeeRepository;

/// Employee intake and lifecycle endpoints under `/submission`.
pub fn employee_router<R>(
    service: Arc<EmployeeService<R>>,
    authenticator: Arc<dyn Authenticator>,
) -> Router
where
    R: EmployeeRepository + 'static,
{
    let protected = Router::new()
        .route("/submission/submit", post(create_handler::<R>))
        .route("/submission/update_status", put(update_status_handler::<R>))
        .route("/submission/employees", get(list_handler::<R>))
        .route("/submission/present_employees", get(present_handler::<R>))
        .route_layer(middleware::from_fn_with_state(authenticator, require_bearer));

    let open = Router::new()
        .route("/submission/update_employee", put(update_handler::<R>))
        .route("/submission/delete_employee/:id", delete(delete_handler::<R>))
        .route(
            "/submission/updateAttendance/:id",
            put(attendance_handler::<R>),
        );

    let body_limit = service.upload_policy().body_limit();
    protected
        .merge(open)
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(service)
}

fn record_response(status: StatusCode, message: &str, data: impl serde::Serialize) -> Response {
    let payload = json!({
        "message": message,
        "success": true,
        "data": data,
    });
    (status, Json(payload)).into_response()
}

pub(crate) async fn create_handler<R>(
    State(service): State<Arc<EmployeeService<R>>>,
    principal: Principal,
    mut form: SubmittedForm,
) -> Result<Response, ServiceError>
where
    R: EmployeeRepository + 'static,
{
    // A missing resume outranks every payload problem.
    let Some(resume) = form.take_file(service.upload_policy())? else {
        return Err(ServiceError::bad_request(MISSING_RESUME));
    };
    let submission: EmployeeSubmission = form.payload()?;
    let record = service.create(submission, Some(resume))?;
    tracing::debug!(requested_by = %principal.email, record_id = %record.id, "intake accepted");
    Ok(record_response(
        StatusCode::CREATED,
        "Employee created successfully",
        record,
    ))
}

pub(crate) async fn update_status_handler<R>(
    State(service): State<Arc<EmployeeService<R>>>,
    form: SubmittedForm,
) -> Result<Response, ServiceError>
where
    R: EmployeeRepository + 'static,
{
    let request: EmployeeStatusUpdate = form.payload()?;
    let record = service.update_status(request)?;
    Ok(record_response(
        StatusCode::OK,
        "Employee status updated successfully",
        record,
    ))
}

pub(crate) async fn update_handler<R>(
    State(service): State<Arc<EmployeeService<R>>>,
    mut form: SubmittedForm,
) -> Result<Response, ServiceError>
where
    R: EmployeeRepository + 'static,
{
    let resume = form.take_file(service.upload_policy())?;
    let update: EmployeeUpdate = form.payload()?;
    let record = service.update(update, resume)?;
    Ok(record_response(
        StatusCode::OK,
        "Employee updated successfully",
        record,
    ))
}

pub(crate) async fn delete_handler<R>(
    State(service): State<Arc<EmployeeService<R>>>,
    Path(id): Path<String>,
) -> Result<Response, ServiceError>
where
    R: EmployeeRepository + 'static,
{
    service.delete(&id)?;
    let payload = json!({
        "message": "Employee deleted successfully",
        "success": true,
    });
    Ok((StatusCode::OK, Json(payload)).into_response())
}

pub(crate) async fn attendance_handler<R>(
    State(service): State<Arc<EmployeeService<R>>>,
    Path(id): Path<String>,
    form: SubmittedForm,
) -> Result<Response, ServiceError>
where
    R: EmployeeRepository + 'static,
{
    let request: AttendanceUpdate = form.payload()?;
    let record = service.update_attendance(&id, request)?;
    Ok(record_response(
        StatusCode::OK,
        "Employee attendance status updated successfully",
        record,
    ))
}

pub(crate) async fn list_handler<R>(
    State(service): State<Arc<EmployeeService<R>>>,
    Query(query): Query<EmployeeListQuery>,
) -> Result<Response, ServiceError>
where
    R: EmployeeRepository + 'static,
{
    let page = service.list(&query)?;
    let mut payload = json!(page);
    payload["success"] = Value::Bool(true);
    Ok((StatusCode::OK, Json(payload)).into_response())
}

pub(crate) async fn present_handler<R>(
    State(service): State<Arc<EmployeeService<R>>>,
) -> Result<Response, ServiceError>
where
    R: EmployeeRepository + 'static,
{
    let employees = service.list_present()?;
    let payload = json!({
        "success": true,
        "count": employees.len(),
        "employees": employees,
    });
    Ok((StatusCode::OK, Json(payload)).into_response())
}
