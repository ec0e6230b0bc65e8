// src/handlers/slip.rs

use crate::{
    errors::{AppError, AppResult},
    models::{GenerateSlipRequest, SalarySlip, SlipListQuery},
    services::slip::{self, SlipResponse},
    state::AppState,
};
use axum::{
    Json,
    extract::{Path, Query, State},
};
use uuid::Uuid;

/// Compute a salary slip for one employee/period.
/// `preview: true` returns the computed record without writing; otherwise the
/// slip is upserted on (employee, month, year) — rerunning overwrites, never
/// duplicates.
#[utoipa::path(
    post,
    path = "/api/v1/slips/generate",
    request_body = GenerateSlipRequest,
    responses(
        (status = 200, description = "Computed slip", body = SlipResponse),
        (status = 400, description = "Invalid month or override value"),
        (status = 404, description = "Employee not found"),
    ),
    tag = "Salary Slips"
)]
pub async fn generate_slip(
    State(state): State<AppState>,
    Json(body): Json<GenerateSlipRequest>,
) -> AppResult<Json<SlipResponse>> {
    let response = slip::generate(&state.db, &body).await?;
    Ok(Json(response))
}

/// List persisted slips for a period
#[utoipa::path(
    get,
    path = "/api/v1/slips",
    params(
        ("month" = u32, Query, description = "Calendar month 1-12"),
        ("year" = i32, Query, description = "Calendar year"),
    ),
    responses((status = 200, description = "Slips for the period", body = Vec<SalarySlip>)),
    tag = "Salary Slips"
)]
pub async fn list_slips(
    State(state): State<AppState>,
    Query(query): Query<SlipListQuery>,
) -> AppResult<Json<Vec<SalarySlip>>> {
    let slips = sqlx::query_as::<_, SalarySlip>(
        "SELECT * FROM salary_slips WHERE month = $1 AND year = $2 ORDER BY created_at",
    )
    .bind(query.month as i32)
    .bind(query.year)
    .fetch_all(&state.db)
    .await?;

    Ok(Json(slips))
}

/// Get a single persisted slip
#[utoipa::path(
    get,
    path = "/api/v1/slips/{slip_id}",
    params(("slip_id" = Uuid, Path, description = "Slip ID")),
    responses(
        (status = 200, description = "Slip detail", body = SalarySlip),
        (status = 404, description = "Slip not found"),
    ),
    tag = "Salary Slips"
)]
pub async fn get_slip(
    State(state): State<AppState>,
    Path(slip_id): Path<Uuid>,
) -> AppResult<Json<SalarySlip>> {
    let slip = sqlx::query_as::<_, SalarySlip>("SELECT * FROM salary_slips WHERE id = $1")
        .bind(slip_id)
        .fetch_optional(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Slip {} not found", slip_id)))?;

    Ok(Json(slip))
}
