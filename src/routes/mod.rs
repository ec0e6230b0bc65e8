// src/routes/mod.rs

use crate::{
    handlers::{
        attendance::{delete_attendance, list_attendance, record_attendance, update_attendance},
        employee::{
            create_employee, deactivate_employee, get_employee, list_employees, update_employee,
        },
        loan::{add_loan_payment, create_loan, get_loan, list_loans},
        slip::{generate_slip, get_slip, list_slips},
    },
    state::AppState,
};
use axum::{
    Router,
    routing::{get, post},
};

pub fn api_routes() -> Router<AppState> {
    Router::new()
        // ─── Employees ────────────────────────────────────────
        .route("/employees", post(create_employee).get(list_employees))
        .route(
            "/employees/{employee_id}",
            get(get_employee)
                .put(update_employee)
                .delete(deactivate_employee),
        )
        // ─── Attendance ───────────────────────────────────────
        .route("/attendance", post(record_attendance).get(list_attendance))
        .route(
            "/attendance/{record_id}",
            axum::routing::put(update_attendance).delete(delete_attendance),
        )
        // ─── Loans ────────────────────────────────────────────
        .route("/loans", post(create_loan).get(list_loans))
        .route("/loans/{loan_id}", get(get_loan))
        .route("/loans/{loan_id}/payments", post(add_loan_payment))
        // ─── Salary Slips ─────────────────────────────────────
        .route("/slips/generate", post(generate_slip))
        .route("/slips", get(list_slips))
        .route("/slips/{slip_id}", get(get_slip))
}
