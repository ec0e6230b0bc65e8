// src/services/overtime.rs
//
// Overtime math over the hour.minutes notation used by stored attendance
// values: 1.30 means 1 hour 30 minutes, not 1.5 hours. All arithmetic runs
// in integer minutes; the notation exists only at the storage boundary.

use chrono::{NaiveDateTime, Timelike};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

/// Check-ins at or before this second of day never derive overtime.
const SHIFT_END_SECONDS: u32 = 17 * 3600;

/// hour.minutes notation → total minutes. 1.30 → 90.
pub fn hm_to_minutes(hm: Decimal) -> i64 {
    let hours = hm.trunc();
    let minutes = ((hm - hours) * Decimal::from(100)).round();
    hours.to_i64().unwrap_or(0) * 60 + minutes.to_i64().unwrap_or(0)
}

/// Total minutes → hour.minutes notation. 90 → 1.30. Negative input clamps to 0.00.
pub fn minutes_to_hm(minutes: i64) -> Decimal {
    let minutes = minutes.max(0);
    Decimal::from(minutes / 60) + Decimal::new(minutes % 60, 2)
}

/// Overtime derivable from the punches alone, hour.minutes notation.
///
/// A check-in at or before 17:00 derives zero no matter when the checkout is:
/// normal-shift hours are never auto-counted as overtime. After 17:00 the
/// whole worked span counts, floored to whole minutes. A missing punch on
/// either side derives zero.
pub fn derive_overtime(check_in: Option<NaiveDateTime>, check_out: Option<NaiveDateTime>) -> Decimal {
    let (Some(check_in), Some(check_out)) = (check_in, check_out) else {
        return Decimal::ZERO;
    };
    if check_in.time().num_seconds_from_midnight() <= SHIFT_END_SECONDS {
        return Decimal::ZERO;
    }
    let minutes = (check_out - check_in).num_minutes();
    minutes_to_hm(minutes)
}

/// The manually added portion of a stored overtime total: stored minus
/// derived, floored at zero. hour.minutes notation on both sides.
pub fn extra_overtime(
    stored_total: Decimal,
    check_in: Option<NaiveDateTime>,
    check_out: Option<NaiveDateTime>,
) -> Decimal {
    let derived = derive_overtime(check_in, check_out);
    minutes_to_hm(hm_to_minutes(stored_total) - hm_to_minutes(derived))
}

/// Recombine punch-derived overtime with a caller-supplied extra into the
/// stored total. This is the inverse of [`extra_overtime`].
pub fn combine_overtime(
    check_in: Option<NaiveDateTime>,
    check_out: Option<NaiveDateTime>,
    extra: Decimal,
) -> Decimal {
    let derived = derive_overtime(check_in, check_out);
    minutes_to_hm(hm_to_minutes(derived) + hm_to_minutes(extra).max(0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn at(h: u32, m: u32, s: u32) -> Option<NaiveDateTime> {
        NaiveDate::from_ymd_opt(2024, 3, 4).and_then(|d| d.and_hms_opt(h, m, s))
    }

    #[test]
    fn hm_notation_round_trips_in_minutes() {
        assert_eq!(hm_to_minutes(dec!(1.30)), 90);
        assert_eq!(hm_to_minutes(dec!(2.00)), 120);
        assert_eq!(hm_to_minutes(dec!(0.45)), 45);
        assert_eq!(minutes_to_hm(90), dec!(1.30));
        assert_eq!(minutes_to_hm(59), dec!(0.59));
        assert_eq!(minutes_to_hm(60), dec!(1.00));
        assert_eq!(minutes_to_hm(-5), dec!(0.00));
    }

    #[test]
    fn hm_addition_carries_minutes_not_decimals() {
        // 1h30m + 1h30m is 3h00m, never the raw decimal sum 2.60
        let sum = minutes_to_hm(hm_to_minutes(dec!(1.30)) + hm_to_minutes(dec!(1.30)));
        assert_eq!(sum, dec!(3.00));
    }

    #[test]
    fn check_in_at_shift_end_derives_zero() {
        assert_eq!(derive_overtime(at(17, 0, 0), at(19, 0, 0)), dec!(0));
        assert_eq!(derive_overtime(at(8, 0, 0), at(22, 0, 0)), dec!(0));
    }

    #[test]
    fn check_in_after_shift_end_counts_whole_span() {
        assert_eq!(derive_overtime(at(17, 0, 1), at(19, 0, 1)), dec!(2.00));
        assert_eq!(derive_overtime(at(18, 0, 0), at(19, 30, 0)), dec!(1.30));
    }

    #[test]
    fn span_floors_to_whole_minutes() {
        // 1h59m50s works out to 119 whole minutes
        assert_eq!(derive_overtime(at(18, 0, 10), at(20, 0, 0)), dec!(1.59));
    }

    #[test]
    fn missing_punch_derives_zero() {
        assert_eq!(derive_overtime(None, at(19, 0, 0)), dec!(0));
        assert_eq!(derive_overtime(at(18, 0, 0), None), dec!(0));
        assert_eq!(derive_overtime(None, None), dec!(0));
    }

    #[test]
    fn extra_is_stored_minus_derived_floored_at_zero() {
        assert_eq!(extra_overtime(dec!(2.30), at(17, 0, 1), at(19, 0, 1)), dec!(0.30));
        assert_eq!(extra_overtime(dec!(1.00), at(17, 0, 1), at(19, 0, 1)), dec!(0.00));
        // no punches: the whole stored total is extra
        assert_eq!(extra_overtime(dec!(1.15), None, None), dec!(1.15));
    }

    #[test]
    fn combine_recovers_the_stored_total() {
        let stored = combine_overtime(at(17, 0, 1), at(19, 0, 1), dec!(0.30));
        assert_eq!(stored, dec!(2.30));
        assert_eq!(extra_overtime(stored, at(17, 0, 1), at(19, 0, 1)), dec!(0.30));
    }
}
