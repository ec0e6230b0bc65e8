// src/openapi.rs

use crate::handlers::loan::LoanListQuery;
use crate::models::{
    AddLoanPaymentRequest, AttendanceListQuery, AttendanceRecord, AttendanceStatus,
    AttendanceView, CreateEmployeeRequest, CreateLoanRequest, Employee, EmployeeCategory,
    EmployeeSummary, GenerateSlipRequest, Loan, LoanDetail, LoanPayment, LoanStatus,
    RecordAttendanceRequest, SalarySlip, SlipListQuery, UpdateAttendanceRequest,
    UpdateEmployeeRequest,
};
use crate::services::slip::{ComputedSlip, SlipResponse};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "HRIS Payroll API",
        version = "1.0.0",
        description = "Internal HR/payroll backend built with Rust and Axum. \
            Manages employees, daily attendance with overtime derivation, employee \
            loans, and deterministic monthly salary slip generation with per-field \
            overrides.",
        license(name = "MIT")
    ),
    paths(
        // Employees
        crate::handlers::employee::create_employee,
        crate::handlers::employee::list_employees,
        crate::handlers::employee::get_employee,
        crate::handlers::employee::update_employee,
        crate::handlers::employee::deactivate_employee,
        // Attendance
        crate::handlers::attendance::record_attendance,
        crate::handlers::attendance::update_attendance,
        crate::handlers::attendance::list_attendance,
        crate::handlers::attendance::delete_attendance,
        // Loans
        crate::handlers::loan::create_loan,
        crate::handlers::loan::list_loans,
        crate::handlers::loan::get_loan,
        crate::handlers::loan::add_loan_payment,
        // Salary slips
        crate::handlers::slip::generate_slip,
        crate::handlers::slip::list_slips,
        crate::handlers::slip::get_slip,
    ),
    components(
        schemas(
            Employee, EmployeeCategory, EmployeeSummary,
            CreateEmployeeRequest, UpdateEmployeeRequest,
            AttendanceRecord, AttendanceStatus, AttendanceView,
            RecordAttendanceRequest, UpdateAttendanceRequest, AttendanceListQuery,
            Loan, LoanStatus, LoanPayment, LoanDetail,
            CreateLoanRequest, AddLoanPaymentRequest, LoanListQuery,
            SalarySlip, GenerateSlipRequest, SlipListQuery,
            ComputedSlip, SlipResponse,
        )
    ),
    tags(
        (name = "Employees", description = "Employee registry"),
        (name = "Attendance", description = "Daily punches and overtime"),
        (name = "Loans", description = "Employee loans and installment payments"),
        (name = "Salary Slips", description = "Monthly slip generation and history"),
    )
)]
pub struct ApiDoc;
