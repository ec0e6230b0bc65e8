// src/models/mod.rs

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::collections::HashMap;
use utoipa::ToSchema;
use uuid::Uuid;

// ─── Employee ─────────────────────────────────────────────────────────────────

// sqlx 0.8: custom Postgres enums need #[sqlx(type_name = "...")] on the enum
#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, ToSchema, PartialEq, Eq)]
#[sqlx(type_name = "employee_category", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum EmployeeCategory {
    Office,
    Marketing,
    Technician,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Employee {
    pub id: Uuid,
    pub name: String,
    /// Free-text job title, e.g. "STAFF", "LEADER TEKNISI"
    pub role: String,
    pub department: String,
    pub category: EmployeeCategory,
    pub base_salary: Decimal,
    pub position_allowance: Decimal,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateEmployeeRequest {
    pub name: String,
    pub role: String,
    pub department: String,
    pub category: EmployeeCategory,
    pub base_salary: Decimal,
    #[serde(default)]
    pub position_allowance: Decimal,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateEmployeeRequest {
    pub name: Option<String>,
    pub role: Option<String>,
    pub department: Option<String>,
    pub category: Option<EmployeeCategory>,
    pub base_salary: Option<Decimal>,
    pub position_allowance: Option<Decimal>,
}

/// Compact employee block embedded in slip responses.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct EmployeeSummary {
    pub name: String,
    pub role: String,
    pub department: String,
}

impl From<&Employee> for EmployeeSummary {
    fn from(e: &Employee) -> Self {
        EmployeeSummary {
            name: e.name.clone(),
            role: e.role.clone(),
            department: e.department.clone(),
        }
    }
}

// ─── Attendance ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, ToSchema, PartialEq, Eq)]
#[sqlx(type_name = "attendance_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum AttendanceStatus {
    Present,
    Sick,
    Permit,
    Alpha,
    Leave,
}

/// One punch record. At most one per (employee, date).
/// `overtime_hours` is stored in hour.minutes notation (1.30 = 1h30m) and may
/// include a manually entered extra on top of what the punches derive.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct AttendanceRecord {
    pub id: Uuid,
    pub employee_id: Uuid,
    pub date: NaiveDate,
    pub check_in: Option<NaiveDateTime>,
    pub check_out: Option<NaiveDateTime>,
    pub status: AttendanceStatus,
    pub overtime_hours: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct RecordAttendanceRequest {
    pub employee_id: Uuid,
    pub date: NaiveDate,
    pub check_in: Option<NaiveDateTime>,
    pub check_out: Option<NaiveDateTime>,
    pub status: AttendanceStatus,
    /// Overtime on top of what the punches derive, hour.minutes notation.
    #[serde(default)]
    pub extra_overtime: Decimal,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateAttendanceRequest {
    pub check_in: Option<NaiveDateTime>,
    pub check_out: Option<NaiveDateTime>,
    pub status: AttendanceStatus,
    #[serde(default)]
    pub extra_overtime: Decimal,
}

/// Attendance row plus the derived/extra overtime breakdown.
#[derive(Debug, Serialize, ToSchema)]
pub struct AttendanceView {
    #[serde(flatten)]
    pub record: AttendanceRecord,
    /// Overtime derivable from the punches alone, hour.minutes notation.
    pub derived_overtime: Decimal,
    /// Stored total minus derived, floored at zero.
    pub extra_overtime: Decimal,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AttendanceListQuery {
    pub employee_id: Uuid,
    pub month: u32,
    pub year: i32,
}

// ─── Loans ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, ToSchema, PartialEq, Eq)]
#[sqlx(type_name = "loan_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum LoanStatus {
    Active,
    Paid,
    Cancelled,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Loan {
    pub id: Uuid,
    pub employee_id: Uuid,
    pub amount: Decimal,
    pub monthly_installment: Decimal,
    pub status: LoanStatus,
    pub note: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct LoanPayment {
    pub id: Uuid,
    pub loan_id: Uuid,
    pub amount: Decimal,
    pub paid_at: NaiveDate,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateLoanRequest {
    pub employee_id: Uuid,
    pub amount: Decimal,
    pub monthly_installment: Decimal,
    #[serde(default)]
    pub note: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AddLoanPaymentRequest {
    pub amount: Decimal,
    pub paid_at: NaiveDate,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoanDetail {
    #[serde(flatten)]
    pub loan: Loan,
    pub payments: Vec<LoanPayment>,
    pub total_paid: Decimal,
}

// ─── Salary Slip ──────────────────────────────────────────────────────────────

/// Persisted slip row. Unique on (employee_id, month, year); written only by
/// the generation upsert.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct SalarySlip {
    pub id: Uuid,
    pub employee_id: Uuid,
    pub month: i32,
    pub year: i32,
    pub present_days: i32,
    pub total_overtime_hours: Decimal,
    pub base_salary: Decimal,
    pub transport_amount: Decimal,
    pub overtime_amount: Decimal,
    pub performance_bonus: Decimal,
    pub discipline_bonus: Decimal,
    pub position_allowance: Decimal,
    pub bpjs_allowance: Decimal,
    pub meal_allowance: Decimal,
    pub incentive_psb: Decimal,
    pub incentive_instalasi: Decimal,
    pub incentive_tagihan: Decimal,
    pub umt_amount: Decimal,
    pub new_customer_incentive: Decimal,
    pub client_fee: Decimal,
    pub count_home_lite: Decimal,
    pub count_home_basic: Decimal,
    pub count_home_stream: Decimal,
    pub count_home_entertain: Decimal,
    pub count_home_small: Decimal,
    pub count_home_advan: Decimal,
    pub psb_count: Decimal,
    pub installation_count_5k: Decimal,
    pub installation_count_10k: Decimal,
    pub arisan_deduction: Decimal,
    pub jht_deduction: Decimal,
    pub loan_deduction: Decimal,
    pub total_income: Decimal,
    pub total_deduction: Decimal,
    pub net_salary: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Generation request. `employee` is tried as an exact id first, then as a
/// case-sensitive substring of employee names.
#[derive(Debug, Deserialize, ToSchema)]
pub struct GenerateSlipRequest {
    pub employee: String,
    pub month: u32,
    pub year: i32,
    /// Field name → numeric value; an overridden field is taken verbatim
    /// instead of computed.
    #[serde(default)]
    pub overrides: HashMap<String, serde_json::Value>,
    /// When true the computed record is returned without persisting anything.
    #[serde(default)]
    pub preview: bool,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SlipListQuery {
    pub month: u32,
    pub year: i32,
}
