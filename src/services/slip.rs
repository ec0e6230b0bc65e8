// src/services/slip.rs
//
// The slip engine: resolves every income/deduction line item for one
// employee/period under a uniform override-or-default policy, sums the
// totals, and upserts the result keyed by (employee, month, year).

use crate::{
    errors::{AppError, AppResult},
    models::{Employee, EmployeeCategory, EmployeeSummary, GenerateSlipRequest, Loan, LoanStatus},
    services::attendance::{self, AttendanceSummary},
};
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal::prelude::FromPrimitive;
use serde::Serialize;
use sqlx::PgPool;
use std::collections::HashMap;
use std::str::FromStr;
use tracing::info;
use utoipa::ToSchema;
use uuid::Uuid;

// ─── Rates ────────────────────────────────────────────────────────────────────

use rust_decimal_macros::dec;

const TRANSPORT_RATE_PER_DAY: Decimal = dec!(20000);
const MEAL_RATE_PER_DAY: Decimal = dec!(15000);
const UMT_RATE_PER_DAY: Decimal = dec!(15000);
const OVERTIME_RATE_PER_HOUR: Decimal = dec!(25000);
const PSB_INCENTIVE_RATE: Decimal = dec!(50000);
const INSTALLATION_RATE_5K: Decimal = dec!(5000);
const INSTALLATION_RATE_10K: Decimal = dec!(10000);
const BPJS_RATE: Decimal = dec!(0.02);
const JHT_RATE: Decimal = dec!(0.01);
/// Marketing base pay is 20% of the package revenue sum.
const MARKETING_SHARE: Decimal = dec!(0.20);

/// Per-unit package rates for marketing base pay, paired with their count
/// field names.
const PACKAGE_RATES: [(&str, Decimal); 6] = [
    (fields::COUNT_HOME_LITE, dec!(337800)),
    (fields::COUNT_HOME_BASIC, dec!(150000)),
    (fields::COUNT_HOME_STREAM, dec!(180180)),
    (fields::COUNT_HOME_ENTERTAIN, dec!(234234)),
    (fields::COUNT_HOME_SMALL, dec!(292793)),
    (fields::COUNT_HOME_ADVAN, dec!(418919)),
];

/// Role titles that qualify for the stored position allowance.
const ALLOWANCE_ROLES: [&str; 4] = ["LEADER", "MANAGER", "ADMIN", "SPV"];

pub mod fields {
    pub const BASE_SALARY: &str = "base_salary";
    pub const TRANSPORT_AMOUNT: &str = "transport_amount";
    pub const OVERTIME_AMOUNT: &str = "overtime_amount";
    pub const PERFORMANCE_BONUS: &str = "performance_bonus";
    pub const DISCIPLINE_BONUS: &str = "discipline_bonus";
    pub const POSITION_ALLOWANCE: &str = "position_allowance";
    pub const BPJS_ALLOWANCE: &str = "bpjs_allowance";
    pub const MEAL_ALLOWANCE: &str = "meal_allowance";
    pub const PSB_COUNT: &str = "psb_count";
    pub const INCENTIVE_PSB: &str = "incentive_psb";
    pub const INSTALLATION_COUNT_5K: &str = "installation_count_5k";
    pub const INSTALLATION_COUNT_10K: &str = "installation_count_10k";
    pub const INCENTIVE_INSTALASI: &str = "incentive_instalasi";
    pub const INCENTIVE_TAGIHAN: &str = "incentive_tagihan";
    pub const UMT_AMOUNT: &str = "umt_amount";
    pub const NEW_CUSTOMER_INCENTIVE: &str = "new_customer_incentive";
    pub const CLIENT_FEE: &str = "client_fee";
    pub const COUNT_HOME_LITE: &str = "count_home_lite";
    pub const COUNT_HOME_BASIC: &str = "count_home_basic";
    pub const COUNT_HOME_STREAM: &str = "count_home_stream";
    pub const COUNT_HOME_ENTERTAIN: &str = "count_home_entertain";
    pub const COUNT_HOME_SMALL: &str = "count_home_small";
    pub const COUNT_HOME_ADVAN: &str = "count_home_advan";
    pub const ARISAN_DEDUCTION: &str = "arisan_deduction";
    pub const JHT_DEDUCTION: &str = "jht_deduction";
    pub const LOAN_DEDUCTION: &str = "loan_deduction";

    pub const ALL: [&str; 26] = [
        BASE_SALARY,
        TRANSPORT_AMOUNT,
        OVERTIME_AMOUNT,
        PERFORMANCE_BONUS,
        DISCIPLINE_BONUS,
        POSITION_ALLOWANCE,
        BPJS_ALLOWANCE,
        MEAL_ALLOWANCE,
        PSB_COUNT,
        INCENTIVE_PSB,
        INSTALLATION_COUNT_5K,
        INSTALLATION_COUNT_10K,
        INCENTIVE_INSTALASI,
        INCENTIVE_TAGIHAN,
        UMT_AMOUNT,
        NEW_CUSTOMER_INCENTIVE,
        CLIENT_FEE,
        COUNT_HOME_LITE,
        COUNT_HOME_BASIC,
        COUNT_HOME_STREAM,
        COUNT_HOME_ENTERTAIN,
        COUNT_HOME_SMALL,
        COUNT_HOME_ADVAN,
        ARISAN_DEDUCTION,
        JHT_DEDUCTION,
        LOAN_DEDUCTION,
    ];
}

// ─── Overrides ────────────────────────────────────────────────────────────────

/// Caller-supplied replacements for computed fields, validated before any
/// computation runs. Scoped to one generation call, never persisted.
#[derive(Debug, Default)]
pub struct Overrides(HashMap<String, Decimal>);

impl Overrides {
    pub fn from_json(raw: &HashMap<String, serde_json::Value>) -> AppResult<Self> {
        let mut map = HashMap::with_capacity(raw.len());
        for (key, value) in raw {
            if !fields::ALL.contains(&key.as_str()) {
                return Err(AppError::Validation(format!(
                    "Unknown override field '{}'",
                    key
                )));
            }
            let number = match value {
                serde_json::Value::Number(n) => Decimal::from_str(&n.to_string())
                    .ok()
                    .or_else(|| n.as_f64().and_then(Decimal::from_f64)),
                _ => None,
            };
            let number = number.ok_or_else(|| {
                AppError::Validation(format!("Override '{}' must be numeric", key))
            })?;
            map.insert(key.clone(), number);
        }
        Ok(Overrides(map))
    }

    pub fn get(&self, field: &str) -> Option<Decimal> {
        self.0.get(field).copied()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    /// The one resolution policy every field goes through: an explicit
    /// override wins verbatim, otherwise the field's default is computed.
    pub fn resolve(&self, field: &str, default: impl FnOnce() -> Decimal) -> Decimal {
        self.get(field).unwrap_or_else(default)
    }
}

// ─── Computation ──────────────────────────────────────────────────────────────

/// Everything the pure computation needs, already fetched.
pub struct SlipInputs<'a> {
    pub employee: &'a Employee,
    pub attendance: AttendanceSummary,
    /// Sum of active-loan installments. Callers pass zero when
    /// `loan_deduction` is overridden; the loan store is not consulted then.
    pub active_loan_installments: Decimal,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ComputedSlip {
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
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SlipResponse {
    pub employee: EmployeeSummary,
    pub month: u32,
    pub year: i32,
    pub preview: bool,
    #[serde(flatten)]
    pub slip: ComputedSlip,
}

fn round_rupiah(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

fn qualifies_for_position_allowance(role: &str) -> bool {
    let role = role.to_uppercase();
    ALLOWANCE_ROLES.iter().any(|title| role.contains(title))
}

pub struct SlipEngine;

impl SlipEngine {
    /// Compute every line item for one employee/period. Pure: all reads have
    /// already happened, the caller decides whether the result is persisted.
    pub fn compute(inputs: &SlipInputs, overrides: &Overrides) -> ComputedSlip {
        let employee = inputs.employee;
        let present_days = Decimal::from(inputs.attendance.present_days);
        let overtime_hours = inputs.attendance.total_overtime_hours;

        // Package counts resolve first so marketing base pay can use them.
        let mut counts = [Decimal::ZERO; 6];
        for (slot, (field, _)) in counts.iter_mut().zip(PACKAGE_RATES.iter()) {
            *slot = overrides.resolve(field, || Decimal::ZERO);
        }

        let base_salary = overrides.resolve(fields::BASE_SALARY, || {
            if employee.category == EmployeeCategory::Marketing {
                let package_sum: Decimal = counts
                    .iter()
                    .zip(PACKAGE_RATES.iter())
                    .map(|(count, (_, rate))| *count * *rate)
                    .sum();
                round_rupiah(package_sum * MARKETING_SHARE)
            } else {
                employee.base_salary
            }
        });

        let transport_amount = overrides.resolve(fields::TRANSPORT_AMOUNT, || {
            present_days * TRANSPORT_RATE_PER_DAY
        });
        let overtime_amount = overrides.resolve(fields::OVERTIME_AMOUNT, || {
            overtime_hours * OVERTIME_RATE_PER_HOUR
        });
        let position_allowance = overrides.resolve(fields::POSITION_ALLOWANCE, || {
            if qualifies_for_position_allowance(&employee.role) {
                employee.position_allowance
            } else {
                Decimal::ZERO
            }
        });
        let meal_allowance =
            overrides.resolve(fields::MEAL_ALLOWANCE, || present_days * MEAL_RATE_PER_DAY);
        // Percentage items run off the resolved base, not the stored one.
        let bpjs_allowance =
            overrides.resolve(fields::BPJS_ALLOWANCE, || round_rupiah(base_salary * BPJS_RATE));
        let performance_bonus = overrides.resolve(fields::PERFORMANCE_BONUS, || Decimal::ZERO);
        let discipline_bonus = overrides.resolve(fields::DISCIPLINE_BONUS, || Decimal::ZERO);

        let psb_count = overrides.resolve(fields::PSB_COUNT, || Decimal::ZERO);
        let incentive_psb =
            overrides.resolve(fields::INCENTIVE_PSB, || psb_count * PSB_INCENTIVE_RATE);
        let installation_count_5k =
            overrides.resolve(fields::INSTALLATION_COUNT_5K, || Decimal::ZERO);
        let installation_count_10k =
            overrides.resolve(fields::INSTALLATION_COUNT_10K, || Decimal::ZERO);
        let incentive_instalasi = overrides.resolve(fields::INCENTIVE_INSTALASI, || {
            installation_count_5k * INSTALLATION_RATE_5K
                + installation_count_10k * INSTALLATION_RATE_10K
        });
        let incentive_tagihan = overrides.resolve(fields::INCENTIVE_TAGIHAN, || Decimal::ZERO);
        let umt_amount =
            overrides.resolve(fields::UMT_AMOUNT, || present_days * UMT_RATE_PER_DAY);
        let new_customer_incentive =
            overrides.resolve(fields::NEW_CUSTOMER_INCENTIVE, || Decimal::ZERO);
        let client_fee = overrides.resolve(fields::CLIENT_FEE, || Decimal::ZERO);

        let jht_deduction =
            overrides.resolve(fields::JHT_DEDUCTION, || round_rupiah(base_salary * JHT_RATE));
        let arisan_deduction = overrides.resolve(fields::ARISAN_DEDUCTION, || Decimal::ZERO);
        let loan_deduction =
            overrides.resolve(fields::LOAN_DEDUCTION, || inputs.active_loan_installments);

        // new_customer_incentive and client_fee are stored on the slip but are
        // not part of this sum. Known discrepancy carried over from the
        // existing payroll formula; do not fold them in without product sign-off.
        let total_income = base_salary
            + transport_amount
            + overtime_amount
            + performance_bonus
            + discipline_bonus
            + position_allowance
            + bpjs_allowance
            + meal_allowance
            + incentive_psb
            + incentive_instalasi
            + incentive_tagihan
            + umt_amount;
        let total_deduction = arisan_deduction + jht_deduction + loan_deduction;
        // May be negative; the slip reports what the numbers say.
        let net_salary = total_income - total_deduction;

        ComputedSlip {
            present_days: inputs.attendance.present_days,
            total_overtime_hours: overtime_hours,
            base_salary,
            transport_amount,
            overtime_amount,
            performance_bonus,
            discipline_bonus,
            position_allowance,
            bpjs_allowance,
            meal_allowance,
            incentive_psb,
            incentive_instalasi,
            incentive_tagihan,
            umt_amount,
            new_customer_incentive,
            client_fee,
            count_home_lite: counts[0],
            count_home_basic: counts[1],
            count_home_stream: counts[2],
            count_home_entertain: counts[3],
            count_home_small: counts[4],
            count_home_advan: counts[5],
            psb_count,
            installation_count_5k,
            installation_count_10k,
            arisan_deduction,
            jht_deduction,
            loan_deduction,
            total_income,
            total_deduction,
            net_salary,
        }
    }
}

/// Installments owed this month: active loans only, fixed installment,
/// payment history ignored.
pub fn sum_active_installments(loans: &[Loan]) -> Decimal {
    loans
        .iter()
        .filter(|l| l.status == LoanStatus::Active)
        .map(|l| l.monthly_installment)
        .sum()
}

// ─── Orchestration ────────────────────────────────────────────────────────────

/// Resolve a caller identifier to an employee: exact id first, then a
/// case-sensitive substring of the name (first match in name order).
pub async fn find_employee(db: &PgPool, identifier: &str) -> AppResult<Employee> {
    if let Ok(id) = Uuid::parse_str(identifier) {
        let by_id = sqlx::query_as::<_, Employee>("SELECT * FROM employees WHERE id = $1")
            .bind(id)
            .fetch_optional(db)
            .await?;
        if let Some(employee) = by_id {
            return Ok(employee);
        }
    }

    sqlx::query_as::<_, Employee>(
        "SELECT * FROM employees WHERE position($1 in name) > 0 ORDER BY name LIMIT 1",
    )
    .bind(identifier)
    .fetch_optional(db)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Employee '{}' not found", identifier)))
}

/// Run the full generation cycle: sequential reads, one computation, and —
/// unless previewing — a single upsert on (employee_id, month, year).
pub async fn generate(db: &PgPool, req: &GenerateSlipRequest) -> AppResult<SlipResponse> {
    // Fail fast: a bad override must not trigger any reads.
    let overrides = Overrides::from_json(&req.overrides)?;
    if !(1..=12).contains(&req.month) {
        return Err(AppError::Validation(format!(
            "Month must be between 1 and 12, got {}",
            req.month
        )));
    }

    let employee = find_employee(db, &req.employee).await?;
    let summary = attendance::monthly_summary(db, employee.id, req.month, req.year).await?;

    // The loan store is only consulted when the deduction is actually computed.
    let active_loan_installments = if overrides.contains(fields::LOAN_DEDUCTION) {
        Decimal::ZERO
    } else {
        let loans = sqlx::query_as::<_, Loan>("SELECT * FROM loans WHERE employee_id = $1")
            .bind(employee.id)
            .fetch_all(db)
            .await?;
        sum_active_installments(&loans)
    };

    let inputs = SlipInputs {
        employee: &employee,
        attendance: summary,
        active_loan_installments,
    };
    let slip = SlipEngine::compute(&inputs, &overrides);

    if !req.preview {
        upsert_slip(db, employee.id, req.month, req.year, &slip).await?;
        info!(
            "Slip committed for {} ({}/{}): net {}",
            employee.name, req.month, req.year, slip.net_salary
        );
    }

    Ok(SlipResponse {
        employee: EmployeeSummary::from(&employee),
        month: req.month,
        year: req.year,
        preview: req.preview,
        slip,
    })
}

async fn upsert_slip(
    db: &PgPool,
    employee_id: Uuid,
    month: u32,
    year: i32,
    slip: &ComputedSlip,
) -> AppResult<()> {
    sqlx::query(
        r#"INSERT INTO salary_slips (
            id, employee_id, month, year, present_days, total_overtime_hours,
            base_salary, transport_amount, overtime_amount, performance_bonus,
            discipline_bonus, position_allowance, bpjs_allowance, meal_allowance,
            incentive_psb, incentive_instalasi, incentive_tagihan, umt_amount,
            new_customer_incentive, client_fee,
            count_home_lite, count_home_basic, count_home_stream,
            count_home_entertain, count_home_small, count_home_advan,
            psb_count, installation_count_5k, installation_count_10k,
            arisan_deduction, jht_deduction, loan_deduction,
            total_income, total_deduction, net_salary, created_at, updated_at
        ) VALUES (
            $1,$2,$3,$4,$5,$6,$7,$8,$9,$10,$11,$12,$13,$14,$15,$16,$17,$18,
            $19,$20,$21,$22,$23,$24,$25,$26,$27,$28,$29,$30,$31,$32,$33,$34,$35,
            NOW(),NOW()
        )
        ON CONFLICT (employee_id, month, year) DO UPDATE SET
            present_days = EXCLUDED.present_days,
            total_overtime_hours = EXCLUDED.total_overtime_hours,
            base_salary = EXCLUDED.base_salary,
            transport_amount = EXCLUDED.transport_amount,
            overtime_amount = EXCLUDED.overtime_amount,
            performance_bonus = EXCLUDED.performance_bonus,
            discipline_bonus = EXCLUDED.discipline_bonus,
            position_allowance = EXCLUDED.position_allowance,
            bpjs_allowance = EXCLUDED.bpjs_allowance,
            meal_allowance = EXCLUDED.meal_allowance,
            incentive_psb = EXCLUDED.incentive_psb,
            incentive_instalasi = EXCLUDED.incentive_instalasi,
            incentive_tagihan = EXCLUDED.incentive_tagihan,
            umt_amount = EXCLUDED.umt_amount,
            new_customer_incentive = EXCLUDED.new_customer_incentive,
            client_fee = EXCLUDED.client_fee,
            count_home_lite = EXCLUDED.count_home_lite,
            count_home_basic = EXCLUDED.count_home_basic,
            count_home_stream = EXCLUDED.count_home_stream,
            count_home_entertain = EXCLUDED.count_home_entertain,
            count_home_small = EXCLUDED.count_home_small,
            count_home_advan = EXCLUDED.count_home_advan,
            psb_count = EXCLUDED.psb_count,
            installation_count_5k = EXCLUDED.installation_count_5k,
            installation_count_10k = EXCLUDED.installation_count_10k,
            arisan_deduction = EXCLUDED.arisan_deduction,
            jht_deduction = EXCLUDED.jht_deduction,
            loan_deduction = EXCLUDED.loan_deduction,
            total_income = EXCLUDED.total_income,
            total_deduction = EXCLUDED.total_deduction,
            net_salary = EXCLUDED.net_salary,
            updated_at = NOW()"#,
    )
    .bind(Uuid::new_v4())
    .bind(employee_id)
    .bind(month as i32)
    .bind(year)
    .bind(slip.present_days)
    .bind(slip.total_overtime_hours)
    .bind(slip.base_salary)
    .bind(slip.transport_amount)
    .bind(slip.overtime_amount)
    .bind(slip.performance_bonus)
    .bind(slip.discipline_bonus)
    .bind(slip.position_allowance)
    .bind(slip.bpjs_allowance)
    .bind(slip.meal_allowance)
    .bind(slip.incentive_psb)
    .bind(slip.incentive_instalasi)
    .bind(slip.incentive_tagihan)
    .bind(slip.umt_amount)
    .bind(slip.new_customer_incentive)
    .bind(slip.client_fee)
    .bind(slip.count_home_lite)
    .bind(slip.count_home_basic)
    .bind(slip.count_home_stream)
    .bind(slip.count_home_entertain)
    .bind(slip.count_home_small)
    .bind(slip.count_home_advan)
    .bind(slip.psb_count)
    .bind(slip.installation_count_5k)
    .bind(slip.installation_count_10k)
    .bind(slip.arisan_deduction)
    .bind(slip.jht_deduction)
    .bind(slip.loan_deduction)
    .bind(slip.total_income)
    .bind(slip.total_deduction)
    .bind(slip.net_salary)
    .execute(db)
    .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::json;

    fn employee(role: &str, category: EmployeeCategory, base_salary: Decimal) -> Employee {
        Employee {
            id: Uuid::new_v4(),
            name: "Andi Staff".to_string(),
            role: role.to_string(),
            department: "KEUANGAN".to_string(),
            category,
            base_salary,
            position_allowance: dec!(500000),
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn attendance(present_days: i32, overtime: Decimal) -> AttendanceSummary {
        AttendanceSummary {
            present_days,
            total_overtime_hours: overtime,
        }
    }

    fn overrides(pairs: &[(&str, serde_json::Value)]) -> Overrides {
        let raw = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect();
        Overrides::from_json(&raw).unwrap()
    }

    fn loan(status: LoanStatus, installment: Decimal) -> Loan {
        Loan {
            id: Uuid::new_v4(),
            employee_id: Uuid::new_v4(),
            amount: dec!(2400000),
            monthly_installment: installment,
            status,
            note: String::new(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn net_salary_is_income_minus_deductions() {
        let emp = employee("SPV KEUANGAN", EmployeeCategory::Office, dec!(3000000));
        let inputs = SlipInputs {
            employee: &emp,
            attendance: attendance(22, dec!(5.30)),
            active_loan_installments: dec!(150000),
        };
        let o = overrides(&[
            ("performance_bonus", json!(100000)),
            ("arisan_deduction", json!(50000)),
            ("psb_count", json!(3)),
        ]);
        let slip = SlipEngine::compute(&inputs, &o);
        assert_eq!(slip.net_salary, slip.total_income - slip.total_deduction);
    }

    #[test]
    fn non_marketing_staff_scenario() {
        // role STAFF, 20 present days, no overtime, no loans, no overrides
        let emp = employee("STAFF", EmployeeCategory::Office, dec!(2500000));
        let inputs = SlipInputs {
            employee: &emp,
            attendance: attendance(20, dec!(0)),
            active_loan_installments: dec!(0),
        };
        let slip = SlipEngine::compute(&inputs, &Overrides::default());

        assert_eq!(slip.base_salary, dec!(2500000));
        assert_eq!(slip.transport_amount, dec!(400000));
        assert_eq!(slip.meal_allowance, dec!(300000));
        assert_eq!(slip.umt_amount, dec!(300000));
        assert_eq!(slip.overtime_amount, dec!(0));
        // STAFF role does not qualify for the stored allowance
        assert_eq!(slip.position_allowance, dec!(0));
        assert_eq!(slip.bpjs_allowance, dec!(50000));
        assert_eq!(slip.jht_deduction, dec!(25000));
        assert_eq!(slip.loan_deduction, dec!(0));
        assert_eq!(slip.net_salary, slip.total_income - slip.total_deduction);
    }

    #[test]
    fn qualifying_roles_get_the_stored_position_allowance() {
        for role in ["SPV KEUANGAN", "LEADER TEKNISI", "manager", "ADMIN GUDANG"] {
            let emp = employee(role, EmployeeCategory::Office, dec!(2500000));
            let inputs = SlipInputs {
                employee: &emp,
                attendance: attendance(20, dec!(0)),
                active_loan_installments: dec!(0),
            };
            let slip = SlipEngine::compute(&inputs, &Overrides::default());
            assert_eq!(slip.position_allowance, dec!(500000), "role {}", role);
        }
    }

    #[test]
    fn marketing_base_comes_from_package_counts() {
        let emp = employee("SALES", EmployeeCategory::Marketing, dec!(9999999));
        let inputs = SlipInputs {
            employee: &emp,
            attendance: attendance(0, dec!(0)),
            active_loan_installments: dec!(0),
        };
        let o = overrides(&[("count_home_lite", json!(10))]);
        let slip = SlipEngine::compute(&inputs, &o);

        // 20% of 10 × 337800
        assert_eq!(slip.base_salary, dec!(675600));
        assert_eq!(slip.count_home_lite, dec!(10));
        assert_eq!(slip.bpjs_allowance, dec!(13512));
        assert_eq!(slip.jht_deduction, dec!(6756));
    }

    #[test]
    fn base_salary_override_beats_marketing_packages() {
        let emp = employee("SALES", EmployeeCategory::Marketing, dec!(9999999));
        let inputs = SlipInputs {
            employee: &emp,
            attendance: attendance(0, dec!(0)),
            active_loan_installments: dec!(0),
        };
        let o = overrides(&[
            ("base_salary", json!(1234567)),
            ("count_home_lite", json!(10)),
            ("count_home_advan", json!(5)),
        ]);
        let slip = SlipEngine::compute(&inputs, &o);

        assert_eq!(slip.base_salary, dec!(1234567));
        // percentage items follow the resolved base, not the package formula
        assert_eq!(slip.bpjs_allowance, round_rupiah(dec!(1234567) * dec!(0.02)));
        assert_eq!(slip.jht_deduction, round_rupiah(dec!(1234567) * dec!(0.01)));
    }

    #[test]
    fn marketing_with_all_packages_sums_before_the_share() {
        let emp = employee("SALES", EmployeeCategory::Marketing, dec!(0));
        let inputs = SlipInputs {
            employee: &emp,
            attendance: attendance(0, dec!(0)),
            active_loan_installments: dec!(0),
        };
        let o = overrides(&[
            ("count_home_lite", json!(1)),
            ("count_home_basic", json!(1)),
            ("count_home_stream", json!(1)),
            ("count_home_entertain", json!(1)),
            ("count_home_small", json!(1)),
            ("count_home_advan", json!(1)),
        ]);
        let slip = SlipEngine::compute(&inputs, &o);

        // (337800+150000+180180+234234+292793+418919) × 0.20 = 322785.2 → 322785
        assert_eq!(slip.base_salary, dec!(322785));
    }

    #[test]
    fn percentage_rounding_is_half_away_from_zero() {
        let emp = employee("STAFF", EmployeeCategory::Office, dec!(2500025));
        let inputs = SlipInputs {
            employee: &emp,
            attendance: attendance(0, dec!(0)),
            active_loan_installments: dec!(0),
        };
        let slip = SlipEngine::compute(&inputs, &Overrides::default());

        // 2% → 50000.5 rounds up, 1% → 25000.25 rounds down
        assert_eq!(slip.bpjs_allowance, dec!(50001));
        assert_eq!(slip.jht_deduction, dec!(25000));
    }

    #[test]
    fn overtime_pays_on_the_stored_notation() {
        let emp = employee("STAFF", EmployeeCategory::Office, dec!(2500000));
        let inputs = SlipInputs {
            employee: &emp,
            attendance: attendance(20, dec!(1.30)),
            active_loan_installments: dec!(0),
        };
        let slip = SlipEngine::compute(&inputs, &Overrides::default());
        // the hour.minutes decimal itself is the multiplier
        assert_eq!(slip.overtime_amount, dec!(1.30) * dec!(25000));
    }

    #[test]
    fn incentives_follow_their_resolved_counts() {
        let emp = employee("TEKNISI", EmployeeCategory::Technician, dec!(2000000));
        let inputs = SlipInputs {
            employee: &emp,
            attendance: attendance(20, dec!(0)),
            active_loan_installments: dec!(0),
        };
        let o = overrides(&[
            ("psb_count", json!(4)),
            ("installation_count_5k", json!(3)),
            ("installation_count_10k", json!(2)),
        ]);
        let slip = SlipEngine::compute(&inputs, &o);

        assert_eq!(slip.incentive_psb, dec!(200000));
        assert_eq!(slip.incentive_instalasi, dec!(35000));
    }

    #[test]
    fn technician_fields_are_stored_but_not_summed() {
        let emp = employee("TEKNISI", EmployeeCategory::Technician, dec!(2000000));
        let inputs = SlipInputs {
            employee: &emp,
            attendance: attendance(0, dec!(0)),
            active_loan_installments: dec!(0),
        };
        let base = SlipEngine::compute(&inputs, &Overrides::default());
        let o = overrides(&[
            ("new_customer_incentive", json!(75000)),
            ("client_fee", json!(120000)),
        ]);
        let slip = SlipEngine::compute(&inputs, &o);

        assert_eq!(slip.new_customer_incentive, dec!(75000));
        assert_eq!(slip.client_fee, dec!(120000));
        assert_eq!(slip.total_income, base.total_income);
    }

    #[test]
    fn only_active_loans_deduct() {
        let loans = vec![
            loan(LoanStatus::Active, dec!(200000)),
            loan(LoanStatus::Paid, dec!(500000)),
            loan(LoanStatus::Cancelled, dec!(300000)),
        ];
        assert_eq!(sum_active_installments(&loans), dec!(200000));
        assert_eq!(sum_active_installments(&[]), dec!(0));
    }

    #[test]
    fn loan_override_is_taken_verbatim() {
        let emp = employee("STAFF", EmployeeCategory::Office, dec!(2500000));
        let inputs = SlipInputs {
            employee: &emp,
            attendance: attendance(20, dec!(0)),
            // the caller passes zero here when the override is present
            active_loan_installments: dec!(0),
        };
        let o = overrides(&[("loan_deduction", json!(175000))]);
        let slip = SlipEngine::compute(&inputs, &o);
        assert_eq!(slip.loan_deduction, dec!(175000));
    }

    #[test]
    fn non_numeric_override_is_rejected() {
        let raw = HashMap::from([("base_salary".to_string(), json!("a lot"))]);
        assert!(matches!(
            Overrides::from_json(&raw),
            Err(AppError::Validation(_))
        ));

        let raw = HashMap::from([("base_salary".to_string(), json!(null))]);
        assert!(matches!(
            Overrides::from_json(&raw),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn unknown_override_field_is_rejected() {
        let raw = HashMap::from([("total_income".to_string(), json!(1))]);
        assert!(matches!(
            Overrides::from_json(&raw),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn fractional_override_values_survive_exactly() {
        let raw = HashMap::from([("incentive_tagihan".to_string(), json!(12500.75))]);
        let o = Overrides::from_json(&raw).unwrap();
        assert_eq!(o.get("incentive_tagihan"), Some(dec!(12500.75)));
    }
}
