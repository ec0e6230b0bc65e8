// src/handlers/attendance.rs

use crate::{
    errors::{AppError, AppResult},
    models::{
        AttendanceListQuery, AttendanceRecord, AttendanceView, RecordAttendanceRequest,
        UpdateAttendanceRequest,
    },
    services::{
        attendance::month_range,
        overtime::{combine_overtime, derive_overtime, extra_overtime},
    },
    state::AppState,
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use uuid::Uuid;

fn with_breakdown(record: AttendanceRecord) -> AttendanceView {
    let derived = derive_overtime(record.check_in, record.check_out);
    let extra = extra_overtime(record.overtime_hours, record.check_in, record.check_out);
    AttendanceView {
        record,
        derived_overtime: derived,
        extra_overtime: extra,
    }
}

/// Record one day's attendance for an employee.
/// The stored overtime total is the punch-derived amount plus the supplied
/// extra; callers never write the total directly.
#[utoipa::path(
    post,
    path = "/api/v1/attendance",
    request_body = RecordAttendanceRequest,
    responses(
        (status = 201, description = "Attendance recorded", body = AttendanceView),
        (status = 404, description = "Employee not found"),
        (status = 409, description = "Attendance already recorded for that date"),
    ),
    tag = "Attendance"
)]
pub async fn record_attendance(
    State(state): State<AppState>,
    Json(body): Json<RecordAttendanceRequest>,
) -> AppResult<(StatusCode, Json<AttendanceView>)> {
    let _ = sqlx::query("SELECT id FROM employees WHERE id = $1")
        .bind(body.employee_id)
        .fetch_optional(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Employee {} not found", body.employee_id)))?;

    let existing = sqlx::query("SELECT id FROM attendance_records WHERE employee_id = $1 AND date = $2")
        .bind(body.employee_id)
        .bind(body.date)
        .fetch_optional(&state.db)
        .await?;

    if existing.is_some() {
        return Err(AppError::Conflict(format!(
            "Attendance for {} already recorded",
            body.date
        )));
    }

    let overtime_hours = combine_overtime(body.check_in, body.check_out, body.extra_overtime);

    let record = sqlx::query_as::<_, AttendanceRecord>(
        r#"INSERT INTO attendance_records (
            id, employee_id, date, check_in, check_out, status, overtime_hours,
            created_at, updated_at
        ) VALUES ($1,$2,$3,$4,$5,$6,$7,NOW(),NOW())
        RETURNING *"#,
    )
    .bind(Uuid::new_v4())
    .bind(body.employee_id)
    .bind(body.date)
    .bind(body.check_in)
    .bind(body.check_out)
    .bind(body.status)
    .bind(overtime_hours)
    .fetch_one(&state.db)
    .await?;

    Ok((StatusCode::CREATED, Json(with_breakdown(record))))
}

/// Edit a day's attendance. Overtime is recombined from the new punches and
/// the supplied extra.
#[utoipa::path(
    put,
    path = "/api/v1/attendance/{record_id}",
    request_body = UpdateAttendanceRequest,
    params(("record_id" = Uuid, Path, description = "Attendance record ID")),
    responses(
        (status = 200, description = "Attendance updated", body = AttendanceView),
        (status = 404, description = "Record not found"),
    ),
    tag = "Attendance"
)]
pub async fn update_attendance(
    State(state): State<AppState>,
    Path(record_id): Path<Uuid>,
    Json(body): Json<UpdateAttendanceRequest>,
) -> AppResult<Json<AttendanceView>> {
    let overtime_hours = combine_overtime(body.check_in, body.check_out, body.extra_overtime);

    let record = sqlx::query_as::<_, AttendanceRecord>(
        r#"UPDATE attendance_records
           SET check_in = $1, check_out = $2, status = $3, overtime_hours = $4,
               updated_at = NOW()
           WHERE id = $5
           RETURNING *"#,
    )
    .bind(body.check_in)
    .bind(body.check_out)
    .bind(body.status)
    .bind(overtime_hours)
    .bind(record_id)
    .fetch_optional(&state.db)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Attendance record {} not found", record_id)))?;

    Ok(Json(with_breakdown(record)))
}

/// List one employee's attendance for a calendar month
#[utoipa::path(
    get,
    path = "/api/v1/attendance",
    params(
        ("employee_id" = Uuid, Query, description = "Employee ID"),
        ("month" = u32, Query, description = "Calendar month 1-12"),
        ("year" = i32, Query, description = "Calendar year"),
    ),
    responses((status = 200, description = "Attendance rows with overtime breakdown", body = Vec<AttendanceView>)),
    tag = "Attendance"
)]
pub async fn list_attendance(
    State(state): State<AppState>,
    Query(query): Query<AttendanceListQuery>,
) -> AppResult<Json<Vec<AttendanceView>>> {
    let (first_day, last_day) = month_range(query.month, query.year)?;

    let records = sqlx::query_as::<_, AttendanceRecord>(
        "SELECT * FROM attendance_records
         WHERE employee_id = $1 AND date >= $2 AND date <= $3
         ORDER BY date",
    )
    .bind(query.employee_id)
    .bind(first_day)
    .bind(last_day)
    .fetch_all(&state.db)
    .await?;

    Ok(Json(records.into_iter().map(with_breakdown).collect()))
}

/// Delete a day's attendance
#[utoipa::path(
    delete,
    path = "/api/v1/attendance/{record_id}",
    params(("record_id" = Uuid, Path, description = "Attendance record ID")),
    responses(
        (status = 200, description = "Attendance deleted"),
        (status = 404, description = "Record not found"),
    ),
    tag = "Attendance"
)]
pub async fn delete_attendance(
    State(state): State<AppState>,
    Path(record_id): Path<Uuid>,
) -> AppResult<Json<serde_json::Value>> {
    let result = sqlx::query("DELETE FROM attendance_records WHERE id = $1")
        .bind(record_id)
        .execute(&state.db)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!(
            "Attendance record {} not found",
            record_id
        )));
    }

    Ok(Json(serde_json::json!({ "message": "Attendance record deleted" })))
}
