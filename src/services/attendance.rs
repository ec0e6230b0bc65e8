// src/services/attendance.rs

use crate::{
    errors::{AppError, AppResult},
    models::{AttendanceRecord, AttendanceStatus},
    services::overtime::{hm_to_minutes, minutes_to_hm},
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

/// One month of attendance reduced to what the slip engine needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttendanceSummary {
    pub present_days: i32,
    /// Sum of stored per-day overtime, hour.minutes notation.
    pub total_overtime_hours: Decimal,
}

/// First and last day of a calendar month.
pub fn month_range(month: u32, year: i32) -> AppResult<(NaiveDate, NaiveDate)> {
    if !(1..=12).contains(&month) {
        return Err(AppError::Validation(format!(
            "Month must be between 1 and 12, got {}",
            month
        )));
    }
    let first = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| AppError::Validation(format!("Invalid year {}", year)))?;
    let next_first = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    }
    .ok_or_else(|| AppError::Validation(format!("Invalid year {}", year)))?;
    Ok((first, next_first.pred_opt().unwrap_or(first)))
}

/// Reduce present-day rows to a summary. Overtime values are summed in
/// integer minutes, never as raw decimals.
pub fn summarize(records: &[AttendanceRecord]) -> AttendanceSummary {
    let minutes: i64 = records.iter().map(|r| hm_to_minutes(r.overtime_hours)).sum();
    AttendanceSummary {
        present_days: records.len() as i32,
        total_overtime_hours: minutes_to_hm(minutes),
    }
}

/// Query one employee's PRESENT rows for the month and reduce them.
/// Zero matching rows is a normal outcome and yields zeros.
pub async fn monthly_summary(
    db: &PgPool,
    employee_id: Uuid,
    month: u32,
    year: i32,
) -> AppResult<AttendanceSummary> {
    let (first_day, last_day) = month_range(month, year)?;

    let records = sqlx::query_as::<_, AttendanceRecord>(
        "SELECT * FROM attendance_records
         WHERE employee_id = $1 AND date >= $2 AND date <= $3 AND status = $4",
    )
    .bind(employee_id)
    .bind(first_day)
    .bind(last_day)
    .bind(AttendanceStatus::Present)
    .fetch_all(db)
    .await?;

    Ok(summarize(&records))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn present_row(day: u32, overtime: Decimal) -> AttendanceRecord {
        AttendanceRecord {
            id: Uuid::new_v4(),
            employee_id: Uuid::new_v4(),
            date: NaiveDate::from_ymd_opt(2024, 3, day).unwrap(),
            check_in: None,
            check_out: None,
            status: AttendanceStatus::Present,
            overtime_hours: overtime,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn zero_records_yield_zeros() {
        let summary = summarize(&[]);
        assert_eq!(summary.present_days, 0);
        assert_eq!(summary.total_overtime_hours, dec!(0));
    }

    #[test]
    fn overtime_sums_in_minutes() {
        let rows = vec![
            present_row(1, dec!(1.30)),
            present_row(2, dec!(1.30)),
            present_row(3, dec!(0.45)),
        ];
        let summary = summarize(&rows);
        assert_eq!(summary.present_days, 3);
        // 90 + 90 + 45 minutes = 3h45m
        assert_eq!(summary.total_overtime_hours, dec!(3.45));
    }

    #[test]
    fn month_range_covers_the_calendar_month() {
        let (first, last) = month_range(2, 2024).unwrap();
        assert_eq!(first, NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
        assert_eq!(last, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());

        let (first, last) = month_range(12, 2023).unwrap();
        assert_eq!(first, NaiveDate::from_ymd_opt(2023, 12, 1).unwrap());
        assert_eq!(last, NaiveDate::from_ymd_opt(2023, 12, 31).unwrap());
    }

    #[test]
    fn month_out_of_range_is_rejected() {
        assert!(month_range(0, 2024).is_err());
        assert!(month_range(13, 2024).is_err());
    }
}
