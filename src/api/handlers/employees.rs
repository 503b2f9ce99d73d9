use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::{
    api::models::{
        auth::RegisterRequest,
        employees::{EmployeePageResponse, EmployeeResponse, ListEmployeesQuery},
    },
    auth::{
        password,
        policy::{self, Action},
        Principal,
    },
    errors::Error,
    store::{EmployeeUpdate, Role, StoreError},
    types::EmployeeId,
    AppState,
};

/// Get the caller's own profile
#[utoipa::path(
    get,
    path = "/api/v1/employees/me",
    tag = "employees",
    responses(
        (status = 200, description = "The caller's profile", body = EmployeeResponse),
        (status = 401, description = "Missing or invalid token"),
    ),
    security(("BearerAuth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn me(
    State(state): State<AppState>,
    principal: Principal,
) -> Result<Json<EmployeeResponse>, Error> {
    let employee = state
        .store
        .find_by_id(principal.id)
        .await?
        .ok_or_else(|| Error::employee_not_found(principal.id))?;

    Ok(Json(EmployeeResponse::from(employee)))
}

/// Look up an employee by email
///
/// The superadmin account is never served through this route, for any caller.
#[utoipa::path(
    get,
    path = "/api/v1/employees/view/{email}",
    tag = "employees",
    responses(
        (status = 200, description = "The employee's profile", body = EmployeeResponse),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "The requested account is protected"),
        (status = 404, description = "No employee with this email"),
    ),
    security(("BearerAuth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn view_by_email(
    State(state): State<AppState>,
    principal: Principal,
    Path(email): Path<String>,
) -> Result<Json<EmployeeResponse>, Error> {
    // The protection check runs on the requested email itself, before any
    // lookup, so this route cannot confirm whether the account exists.
    policy::authorize(
        &principal,
        Action::ViewByEmail { email: &email },
        &state.config.superadmin_email,
    )?;

    let employee = state
        .store
        .find_by_email(&email)
        .await?
        .ok_or_else(|| Error::employee_not_found_by_email(&email))?;

    Ok(Json(EmployeeResponse::from(employee)))
}

/// Replace the caller's own profile
#[utoipa::path(
    put,
    path = "/api/v1/employees/updateMyInfo",
    request_body = RegisterRequest,
    tag = "employees",
    responses(
        (status = 200, description = "The updated profile", body = EmployeeResponse),
        (status = 400, description = "Invalid input"),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "The superadmin account cannot be updated"),
        (status = 409, description = "The new email is already taken"),
    ),
    security(("BearerAuth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn update_my_info(
    State(state): State<AppState>,
    principal: Principal,
    Json(request): Json<RegisterRequest>,
) -> Result<Json<EmployeeResponse>, Error> {
    request.validate()?;
    policy::authorize(&principal, Action::UpdateSelf, &state.config.superadmin_email)?;

    // Hash the password on a blocking thread to avoid blocking the async runtime
    let password_hash = tokio::task::spawn_blocking({
        let password = request.password.clone();
        move || password::hash_password(&password)
    })
    .await
    .map_err(|e| Error::Internal {
        operation: format!("spawn password hashing task: {e}"),
    })??;

    let employee = state
        .store
        .update(
            principal.id,
            EmployeeUpdate {
                name: request.name,
                email: request.email,
                password_hash,
            },
        )
        .await
        .map_err(|e| match e {
            StoreError::NotFound => Error::employee_not_found(principal.id),
            e => e.into(),
        })?;

    Ok(Json(EmployeeResponse::from(employee)))
}

/// Delete the caller's own account
#[utoipa::path(
    delete,
    path = "/api/v1/employees/deleteMyAccount",
    tag = "employees",
    responses(
        (status = 204, description = "Account deleted"),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "The superadmin account cannot be deleted"),
    ),
    security(("BearerAuth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn delete_my_account(
    State(state): State<AppState>,
    principal: Principal,
) -> Result<StatusCode, Error> {
    policy::authorize(&principal, Action::DeleteSelf, &state.config.superadmin_email)?;

    state.store.delete(principal.id).await.map_err(|e| match e {
        StoreError::NotFound => Error::employee_not_found(principal.id),
        e => e.into(),
    })?;

    Ok(StatusCode::NO_CONTENT)
}

/// Delete an employee by id
///
/// Requires ADMIN. An admin may delete themself through this route but not
/// another admin; only the superadmin may delete other admins.
#[utoipa::path(
    delete,
    path = "/api/v1/employees/delete/{id}",
    tag = "employees",
    responses(
        (status = 204, description = "Account deleted"),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Caller may not delete this employee"),
        (status = 404, description = "No employee with this id"),
    ),
    security(("BearerAuth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn delete_employee(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<EmployeeId>,
) -> Result<StatusCode, Error> {
    let subject = state
        .store
        .find_by_id(id)
        .await?
        .ok_or_else(|| Error::employee_not_found(id))?;

    policy::authorize(
        &principal,
        Action::DeleteById { subject: &subject },
        &state.config.superadmin_email,
    )?;

    state.store.delete(subject.id).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Promote an employee to ADMIN
///
/// Requires ADMIN. Promoting an employee who is already ADMIN is a no-op
/// that still returns the record.
#[utoipa::path(
    put,
    path = "/api/v1/employees/promote/{id}",
    tag = "employees",
    responses(
        (status = 200, description = "The promoted employee", body = EmployeeResponse),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Caller may not promote this employee"),
        (status = 404, description = "No employee with this id"),
    ),
    security(("BearerAuth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn promote_employee(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<EmployeeId>,
) -> Result<Json<EmployeeResponse>, Error> {
    let subject = state
        .store
        .find_by_id(id)
        .await?
        .ok_or_else(|| Error::employee_not_found(id))?;

    policy::authorize(
        &principal,
        Action::Promote { subject: &subject },
        &state.config.superadmin_email,
    )?;

    let employee = state.store.set_role(subject.id, Role::Admin).await?;

    Ok(Json(EmployeeResponse::from(employee)))
}

/// Demote an employee to USER
///
/// Only the superadmin may demote. Demoting an employee who is already USER
/// is a no-op that still returns the record.
#[utoipa::path(
    put,
    path = "/api/v1/employees/demote/{id}",
    tag = "employees",
    responses(
        (status = 200, description = "The demoted employee", body = EmployeeResponse),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Caller may not demote this employee"),
        (status = 404, description = "No employee with this id"),
    ),
    security(("BearerAuth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn demote_employee(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<EmployeeId>,
) -> Result<Json<EmployeeResponse>, Error> {
    let subject = state
        .store
        .find_by_id(id)
        .await?
        .ok_or_else(|| Error::employee_not_found(id))?;

    policy::authorize(
        &principal,
        Action::Demote { subject: &subject },
        &state.config.superadmin_email,
    )?;

    let employee = state.store.set_role(subject.id, Role::User).await?;

    Ok(Json(EmployeeResponse::from(employee)))
}

/// List employees with pagination and filters
#[utoipa::path(
    get,
    path = "/api/v1/employees/list",
    tag = "employees",
    params(ListEmployeesQuery),
    responses(
        (status = 200, description = "One page of the directory", body = EmployeePageResponse),
        (status = 400, description = "Malformed query parameter"),
        (status = 401, description = "Missing or invalid token"),
    ),
    security(("BearerAuth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn list_employees(
    State(state): State<AppState>,
    _principal: Principal,
    Query(query): Query<ListEmployeesQuery>,
) -> Result<Json<EmployeePageResponse>, Error> {
    let page = query.page();
    let size = query.size();
    let filter = query.filter();

    let total_items = state.store.count(&filter).await?;

    // A page number large enough to overflow the offset lies past the end
    // of any directory; serve it as an empty page rather than erroring.
    let employees = match page.checked_mul(size) {
        Some(offset) => state
            .store
            .list(&filter, query.order(), size, offset)
            .await?
            .into_iter()
            .map(EmployeeResponse::from)
            .collect(),
        None => Vec::new(),
    };

    Ok(Json(EmployeePageResponse::new(employees, page, size, total_items)))
}
