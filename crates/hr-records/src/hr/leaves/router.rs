use std::sync::Arc;

use axum::{
    extract::{DefaultBodyLimit, Path, Query, State},
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde::Serialize;
use serde_json::json;

use super::service::LeaveService;
use crate::hr::auth::{require_bearer, Authenticator, Principal};
use crate::hr::domain::{EnumField, LeaveStatusUpdate, LeaveSubmission};
use crate::hr::error::ServiceError;
use crate::hr::form::SubmittedForm;
use crate::hr::query::{EmployeeNameQuery, LeaveSearchQuery};
use crate::hr::repository::{EmployeeRepository, LeaveRepository};

type SharedService<L, E> = Arc<LeaveService<L, E>>;

/// Leave request endpoints under `/leave`. Only the filtered listing is public.
pub fn leave_router<L, E>(service: SharedService<L, E>, authenticator: Arc<dyn Authenticator>) -> Router
where
    L: LeaveRepository + 'static,
    E: EmployeeRepository + 'static,
{
    let protected = Router::new()
        .route("/leave/addLeaveRequest", post(create_handler::<L, E>))
        .route("/leave/update_status/:id", put(update_status_handler::<L, E>))
        .route("/leave/employees_on_leave", get(on_leave_handler::<L, E>))
        .route("/leave/filter_leaves", get(search_handler::<L, E>))
        .route("/leave/getEmployeesByName", get(by_name_handler::<L, E>))
        .route_layer(middleware::from_fn_with_state(authenticator, require_bearer));

    let body_limit = service.upload_policy().body_limit();
    Router::new()
        .route("/leave/getFilteredLeaves", get(filtered_handler::<L, E>))
        .merge(protected)
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(service)
}

fn collection_response<T: Serialize>(message: &str, data: Vec<T>) -> Response {
    let payload = json!({
        "message": message,
        "success": true,
        "count": data.len(),
        "data": data,
    });
    (StatusCode::OK, Json(payload)).into_response()
}

pub(crate) async fn create_handler<L, E>(
    State(service): State<SharedService<L, E>>,
    principal: Principal,
    mut form: SubmittedForm,
) -> Result<Response, ServiceError>
where
    L: LeaveRepository + 'static,
    E: EmployeeRepository + 'static,
{
    let document = form.take_file(service.upload_policy())?;
    let submission: LeaveSubmission = form.payload()?;
    let record = service.create(submission, document)?;
    tracing::debug!(requested_by = %principal.email, record_id = %record.id, "leave accepted");

    let payload = json!({
        "message": "Leave request added successfully",
        "success": true,
        "data": record,
    });
    Ok((StatusCode::CREATED, Json(payload)).into_response())
}

pub(crate) async fn update_status_handler<L, E>(
    State(service): State<SharedService<L, E>>,
    Path(id): Path<String>,
    form: SubmittedForm,
) -> Result<Response, ServiceError>
where
    L: LeaveRepository + 'static,
    E: EmployeeRepository + 'static,
{
    let request: LeaveStatusUpdate = form.payload()?;
    let record = service.update_status(&id, request)?;
    let payload = json!({
        "message": format!("Leave request {} successfully", record.status.label()),
        "success": true,
        "data": record,
    });
    Ok((StatusCode::OK, Json(payload)).into_response())
}

pub(crate) async fn on_leave_handler<L, E>(
    State(service): State<SharedService<L, E>>,
) -> Result<Response, ServiceError>
where
    L: LeaveRepository + 'static,
    E: EmployeeRepository + 'static,
{
    let records = service.list_on_leave()?;
    Ok(collection_response("Employees currently on leave", records))
}

pub(crate) async fn search_handler<L, E>(
    State(service): State<SharedService<L, E>>,
    Query(query): Query<LeaveSearchQuery>,
) -> Result<Response, ServiceError>
where
    L: LeaveRepository + 'static,
    E: EmployeeRepository + 'static,
{
    let records = service.search(&query)?;
    Ok(collection_response(
        "Leave requests fetched successfully",
        records,
    ))
}

pub(crate) async fn filtered_handler<L, E>(
    State(service): State<SharedService<L, E>>,
) -> Result<Response, ServiceError>
where
    L: LeaveRepository + 'static,
    E: EmployeeRepository + 'static,
{
    let summaries = service.list_filtered()?;
    Ok(collection_response(
        "Filtered leave requests fetched successfully",
        summaries,
    ))
}

pub(crate) async fn by_name_handler<L, E>(
    State(service): State<SharedService<L, E>>,
    Query(query): Query<EmployeeNameQuery>,
) -> Result<Response, ServiceError>
where
    L: LeaveRepository + 'static,
    E: EmployeeRepository + 'static,
{
    let employees = service.find_employees_by_name(query.name.as_deref())?;
    Ok(collection_response("Employees fetched successfully", employees))
}
