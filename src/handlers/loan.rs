// src/handlers/loan.rs

use crate::{
    errors::{AppError, AppResult},
    models::{AddLoanPaymentRequest, CreateLoanRequest, Loan, LoanDetail, LoanPayment, LoanStatus},
    state::AppState,
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;
use tracing::info;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Deserialize, ToSchema)]
pub struct LoanListQuery {
    pub employee_id: Uuid,
}

/// Issue a loan to an employee
#[utoipa::path(
    post,
    path = "/api/v1/loans",
    request_body = CreateLoanRequest,
    responses(
        (status = 201, description = "Loan created", body = Loan),
        (status = 400, description = "Invalid amounts"),
        (status = 404, description = "Employee not found"),
    ),
    tag = "Loans"
)]
pub async fn create_loan(
    State(state): State<AppState>,
    Json(body): Json<CreateLoanRequest>,
) -> AppResult<(StatusCode, Json<Loan>)> {
    if body.amount <= dec!(0) || body.monthly_installment <= dec!(0) {
        return Err(AppError::Validation(
            "Loan amount and monthly installment must be greater than zero".to_string(),
        ));
    }

    let _ = sqlx::query("SELECT id FROM employees WHERE id = $1")
        .bind(body.employee_id)
        .fetch_optional(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Employee {} not found", body.employee_id)))?;

    let loan = sqlx::query_as::<_, Loan>(
        r#"INSERT INTO loans (
            id, employee_id, amount, monthly_installment, status, note,
            created_at, updated_at
        ) VALUES ($1,$2,$3,$4,'active',$5,NOW(),NOW())
        RETURNING *"#,
    )
    .bind(Uuid::new_v4())
    .bind(body.employee_id)
    .bind(body.amount)
    .bind(body.monthly_installment)
    .bind(body.note)
    .fetch_one(&state.db)
    .await?;

    Ok((StatusCode::CREATED, Json(loan)))
}

/// List an employee's loans
#[utoipa::path(
    get,
    path = "/api/v1/loans",
    params(("employee_id" = Uuid, Query, description = "Employee ID")),
    responses((status = 200, description = "Loans for the employee", body = Vec<Loan>)),
    tag = "Loans"
)]
pub async fn list_loans(
    State(state): State<AppState>,
    Query(query): Query<LoanListQuery>,
) -> AppResult<Json<Vec<Loan>>> {
    let loans = sqlx::query_as::<_, Loan>(
        "SELECT * FROM loans WHERE employee_id = $1 ORDER BY created_at DESC",
    )
    .bind(query.employee_id)
    .fetch_all(&state.db)
    .await?;

    Ok(Json(loans))
}

/// Get a loan with its payment history
#[utoipa::path(
    get,
    path = "/api/v1/loans/{loan_id}",
    params(("loan_id" = Uuid, Path, description = "Loan ID")),
    responses(
        (status = 200, description = "Loan detail", body = LoanDetail),
        (status = 404, description = "Loan not found"),
    ),
    tag = "Loans"
)]
pub async fn get_loan(
    State(state): State<AppState>,
    Path(loan_id): Path<Uuid>,
) -> AppResult<Json<LoanDetail>> {
    let loan = fetch_loan(&state, loan_id).await?;
    let payments = fetch_payments(&state, loan_id).await?;
    let total_paid = payments.iter().map(|p| p.amount).sum();

    Ok(Json(LoanDetail {
        loan,
        payments,
        total_paid,
    }))
}

/// Record an installment payment against a loan.
/// When cumulative payments reach the loan amount the loan flips to `paid`
/// and stops deducting from future slips.
#[utoipa::path(
    post,
    path = "/api/v1/loans/{loan_id}/payments",
    request_body = AddLoanPaymentRequest,
    params(("loan_id" = Uuid, Path, description = "Loan ID")),
    responses(
        (status = 201, description = "Payment recorded", body = LoanDetail),
        (status = 400, description = "Invalid amount"),
        (status = 404, description = "Loan not found"),
    ),
    tag = "Loans"
)]
pub async fn add_loan_payment(
    State(state): State<AppState>,
    Path(loan_id): Path<Uuid>,
    Json(body): Json<AddLoanPaymentRequest>,
) -> AppResult<(StatusCode, Json<LoanDetail>)> {
    if body.amount <= dec!(0) {
        return Err(AppError::Validation(
            "Payment amount must be greater than zero".to_string(),
        ));
    }

    let mut loan = fetch_loan(&state, loan_id).await?;

    sqlx::query(
        "INSERT INTO loan_payments (id, loan_id, amount, paid_at, created_at)
         VALUES ($1,$2,$3,$4,NOW())",
    )
    .bind(Uuid::new_v4())
    .bind(loan_id)
    .bind(body.amount)
    .bind(body.paid_at)
    .execute(&state.db)
    .await?;

    let payments = fetch_payments(&state, loan_id).await?;
    let total_paid: Decimal = payments.iter().map(|p| p.amount).sum();

    if loan.status == LoanStatus::Active && total_paid >= loan.amount {
        loan = sqlx::query_as::<_, Loan>(
            "UPDATE loans SET status = 'paid', updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(loan_id)
        .fetch_one(&state.db)
        .await?;
        info!("Loan {} fully repaid ({} of {})", loan_id, total_paid, loan.amount);
    }

    Ok((
        StatusCode::CREATED,
        Json(LoanDetail {
            loan,
            payments,
            total_paid,
        }),
    ))
}

async fn fetch_loan(state: &AppState, loan_id: Uuid) -> AppResult<Loan> {
    sqlx::query_as::<_, Loan>("SELECT * FROM loans WHERE id = $1")
        .bind(loan_id)
        .fetch_optional(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Loan {} not found", loan_id)))
}

async fn fetch_payments(state: &AppState, loan_id: Uuid) -> AppResult<Vec<LoanPayment>> {
    let payments = sqlx::query_as::<_, LoanPayment>(
        "SELECT * FROM loan_payments WHERE loan_id = $1 ORDER BY paid_at",
    )
    .bind(loan_id)
    .fetch_all(&state.db)
    .await?;
    Ok(payments)
}
