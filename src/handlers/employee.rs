use crate::{
    errors::{AppError, AppResult},
    models::{CreateEmployeeRequest, Employee, UpdateEmployeeRequest},
    state::AppState,
};
use axum::{
    extract::{Path, State},
    Json,
};
use rust_decimal_macros::dec;
use uuid::Uuid;

/// Register a new employee
#[utoipa::path(
    post,
    path = "/api/v1/employees",
    request_body = CreateEmployeeRequest,
    responses(
        (status = 201, description = "Employee created", body = Employee),
        (status = 400, description = "Invalid salary"),
    ),
    tag = "Employees"
)]
pub async fn create_employee(
    State(state): State<AppState>,
    Json(body): Json<CreateEmployeeRequest>,
) -> AppResult<(axum::http::StatusCode, Json<Employee>)> {
    if body.base_salary < dec!(0) || body.position_allowance < dec!(0) {
        return Err(AppError::Validation(
            "Salary amounts cannot be negative".to_string(),
        ));
    }

    let employee = sqlx::query_as::<_, Employee>(
        r#"INSERT INTO employees (
            id, name, role, department, category, base_salary, position_allowance,
            is_active, created_at, updated_at
        ) VALUES ($1,$2,$3,$4,$5,$6,$7,true,NOW(),NOW())
        RETURNING *"#,
    )
    .bind(Uuid::new_v4())
    .bind(body.name)
    .bind(body.role)
    .bind(body.department)
    .bind(body.category)
    .bind(body.base_salary)
    .bind(body.position_allowance)
    .fetch_one(&state.db)
    .await?;

    Ok((axum::http::StatusCode::CREATED, Json(employee)))
}

/// List all employees
#[utoipa::path(
    get,
    path = "/api/v1/employees",
    responses((status = 200, description = "List of employees", body = Vec<Employee>)),
    tag = "Employees"
)]
pub async fn list_employees(State(state): State<AppState>) -> AppResult<Json<Vec<Employee>>> {
    let employees =
        sqlx::query_as::<_, Employee>("SELECT * FROM employees ORDER BY created_at DESC")
            .fetch_all(&state.db)
            .await?;

    Ok(Json(employees))
}

/// Get a single employee
#[utoipa::path(
    get,
    path = "/api/v1/employees/{employee_id}",
    params(("employee_id" = Uuid, Path, description = "Employee ID")),
    responses(
        (status = 200, description = "Employee detail", body = Employee),
        (status = 404, description = "Employee not found"),
    ),
    tag = "Employees"
)]
pub async fn get_employee(
    State(state): State<AppState>,
    Path(employee_id): Path<Uuid>,
) -> AppResult<Json<Employee>> {
    let employee = sqlx::query_as::<_, Employee>("SELECT * FROM employees WHERE id = $1")
        .bind(employee_id)
        .fetch_optional(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Employee {} not found", employee_id)))?;

    Ok(Json(employee))
}

/// Update an employee's profile or compensation
#[utoipa::path(
    put,
    path = "/api/v1/employees/{employee_id}",
    request_body = UpdateEmployeeRequest,
    params(("employee_id" = Uuid, Path, description = "Employee ID")),
    responses(
        (status = 200, description = "Employee updated", body = Employee),
        (status = 404, description = "Employee not found"),
    ),
    tag = "Employees"
)]
pub async fn update_employee(
    State(state): State<AppState>,
    Path(employee_id): Path<Uuid>,
    Json(body): Json<UpdateEmployeeRequest>,
) -> AppResult<Json<Employee>> {
    if body.base_salary.is_some_and(|s| s < dec!(0))
        || body.position_allowance.is_some_and(|a| a < dec!(0))
    {
        return Err(AppError::Validation(
            "Salary amounts cannot be negative".to_string(),
        ));
    }

    let employee = sqlx::query_as::<_, Employee>(
        r#"UPDATE employees SET
            name = COALESCE($1, name),
            role = COALESCE($2, role),
            department = COALESCE($3, department),
            category = COALESCE($4, category),
            base_salary = COALESCE($5, base_salary),
            position_allowance = COALESCE($6, position_allowance),
            updated_at = NOW()
           WHERE id = $7
           RETURNING *"#,
    )
    .bind(body.name)
    .bind(body.role)
    .bind(body.department)
    .bind(body.category)
    .bind(body.base_salary)
    .bind(body.position_allowance)
    .bind(employee_id)
    .fetch_optional(&state.db)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Employee {} not found", employee_id)))?;

    Ok(Json(employee))
}

/// Deactivate (soft-delete) an employee
#[utoipa::path(
    delete,
    path = "/api/v1/employees/{employee_id}",
    params(("employee_id" = Uuid, Path, description = "Employee ID")),
    responses(
        (status = 200, description = "Employee deactivated"),
        (status = 404, description = "Employee not found"),
    ),
    tag = "Employees"
)]
pub async fn deactivate_employee(
    State(state): State<AppState>,
    Path(employee_id): Path<Uuid>,
) -> AppResult<Json<serde_json::Value>> {
    let result = sqlx::query(
        "UPDATE employees SET is_active = false, updated_at = NOW() WHERE id = $1",
    )
    .bind(employee_id)
    .execute(&state.db)
    .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("Employee {} not found", employee_id)));
    }

    Ok(Json(serde_json::json!({ "message": "Employee deactivated successfully" })))
}
